//! Lossless JSON snapshot of the pedestrian population
//!
//! Records are opaque structured data to whoever stores them. Loading never
//! fails on missing optional fields: everything is hydrated to defaults
//! (satisfaction 0.5, other numbers 0).

use crate::core::error::Result;
use crate::ecs::world::PedestrianWorld;
use crate::entity::pedestrian::Pedestrian;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationSnapshot {
    pub current_day: u64,
    pub clock: f32,
    pub pedestrians: Vec<Pedestrian>,
}

impl PopulationSnapshot {
    pub fn capture(world: &PedestrianWorld) -> Self {
        Self {
            current_day: world.current_day,
            clock: world.clock,
            pedestrians: world.pedestrians().to_vec(),
        }
    }

    /// Install this snapshot's population and clock into `world`
    pub fn restore_into(self, world: &mut PedestrianWorld) {
        world.current_day = self.current_day;
        world.clock = if self.clock.is_finite() { self.clock } else { 0.0 };
        world.replace_pedestrians(self.pedestrians);
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and hydrate every record
    pub fn from_json(json: &str) -> Result<Self> {
        let mut snapshot: PopulationSnapshot = serde_json::from_str(json)?;
        for pedestrian in &mut snapshot.pedestrians {
            pedestrian.hydrate();
        }
        Ok(snapshot)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        tracing::info!("Saved {} pedestrians to {}", self.pedestrians.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
