//! Simulation configuration with documented constants
//!
//! All tunables for the pedestrian core live here. The configuration is a
//! flat value owned by the simulation and passed by reference into every
//! entry point; there is no process-wide instance.

use crate::city::category::CategoryTable;
use crate::core::error::{Result, SimError};
use crate::entity::archetype::ArchetypeTable;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the pedestrian simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === POPULATION ===
    /// Maximum number of live pedestrians (autonomous and scripted)
    pub population_cap: usize,

    /// Expected spawns per second while below the cap
    pub spawn_rate: f32,

    /// Seed for the simulation RNG
    pub seed: u64,

    // === BUDGET ===
    /// Lower bound of the starting budget
    pub budget_min: f32,

    /// Upper bound of the starting budget.
    ///
    /// Also the normalizer for the budget term of the trigger probability.
    pub budget_max: f32,

    /// Price of one item; spend = items x price, capped at the budget
    pub average_item_price: f32,

    // === EPISODES ===
    /// Shortest shopping trip (seconds)
    pub duration_min: f32,

    /// Longest shopping trip (seconds)
    pub duration_max: f32,

    /// Base per-tick trigger probability for each archetype
    pub archetypes: ArchetypeTable,

    /// Weight of (1 - satisfaction) in the trigger probability
    pub satisfaction_weight: f32,

    /// Weight of min(1, budget / budget_max) in the trigger probability
    pub budget_weight: f32,

    /// Hard ceiling on the per-tick trigger probability
    ///
    /// At high tick rates even a modest probability compounds quickly, so
    /// no combination of inputs may exceed this.
    pub trigger_ceiling: f32,

    // === SATISFACTION ===
    /// Satisfaction lost per second, always applied
    pub satisfaction_decay_rate: f32,

    /// Satisfaction gained when a trip completes
    pub satisfaction_increment: f32,

    // === SPATIAL ===
    /// Half-width of the window searched for a shop to display as target
    pub shop_search_radius: usize,

    /// Percentage (0-100) of tall offices eligible as heliport sites
    pub heliport_acceptance_percent: u32,

    /// Flood-fill bound when generating tour waypoints
    pub waypoint_region_limit: usize,

    /// Category membership
    pub categories: CategoryTable,

    // === CLOCK ===
    /// Length of one simulated day (seconds); daily visit counters reset
    /// when the day index changes
    pub day_length_seconds: f32,

    // === RESERVED ===
    /// Carried for compatibility; not enforced by the trip logic
    pub max_visits_per_day: u32,

    /// Carried for compatibility; not enforced by the trip logic
    pub min_time_between_visits: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population_cap: 100,
            spawn_rate: 0.5,
            seed: 12345,

            budget_min: 200.0,
            budget_max: 1000.0,
            average_item_price: 50.0,

            duration_min: 5.0,
            duration_max: 15.0,
            archetypes: ArchetypeTable::default(),
            satisfaction_weight: 0.02,
            budget_weight: 0.01,
            trigger_ceiling: 0.5,

            satisfaction_decay_rate: 0.01,
            satisfaction_increment: 0.3,

            shop_search_radius: 20,
            heliport_acceptance_percent: 15,
            waypoint_region_limit: 200,
            categories: CategoryTable::default(),

            day_length_seconds: 600.0,

            max_visits_per_day: 3,
            min_time_between_visits: 60.0,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let floats = [
            ("spawn_rate", self.spawn_rate),
            ("budget_min", self.budget_min),
            ("budget_max", self.budget_max),
            ("average_item_price", self.average_item_price),
            ("duration_min", self.duration_min),
            ("duration_max", self.duration_max),
            ("satisfaction_weight", self.satisfaction_weight),
            ("budget_weight", self.budget_weight),
            ("trigger_ceiling", self.trigger_ceiling),
            ("satisfaction_decay_rate", self.satisfaction_decay_rate),
            ("satisfaction_increment", self.satisfaction_increment),
            ("day_length_seconds", self.day_length_seconds),
            ("min_time_between_visits", self.min_time_between_visits),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SimError::InvalidConfig(format!("{} ({}) must be finite", name, value)));
        }

        if !(self.budget_min >= 0.0 && self.budget_min <= self.budget_max) {
            return Err(SimError::InvalidConfig(format!(
                "budget range [{}, {}] must be non-negative and ordered",
                self.budget_min, self.budget_max
            )));
        }

        if !(self.duration_min > 0.0 && self.duration_min <= self.duration_max) {
            return Err(SimError::InvalidConfig(format!(
                "duration range [{}, {}] must be positive and ordered",
                self.duration_min, self.duration_max
            )));
        }

        if !(0.0..=1.0).contains(&self.trigger_ceiling) {
            return Err(SimError::InvalidConfig(format!(
                "trigger_ceiling ({}) must be within [0, 1]",
                self.trigger_ceiling
            )));
        }

        if self.satisfaction_decay_rate < 0.0 || self.satisfaction_increment < 0.0 {
            return Err("satisfaction rates must be non-negative".into());
        }

        if self.average_item_price < 0.0 || self.spawn_rate < 0.0 {
            return Err("prices and rates must be non-negative".into());
        }

        if self.heliport_acceptance_percent > 100 {
            return Err(SimError::InvalidConfig(format!(
                "heliport_acceptance_percent ({}) must be <= 100",
                self.heliport_acceptance_percent
            )));
        }

        if self.day_length_seconds <= 0.0 {
            return Err("day_length_seconds must be positive".into());
        }

        self.archetypes.validate()
    }
}
