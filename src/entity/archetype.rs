//! Pedestrian archetypes and their shopping propensity table

use crate::core::error::SimError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Behavioral profile shaping how often a pedestrian goes shopping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PedestrianArchetype {
    /// Browses shops for fun
    Shopper,
    /// On the way to or from work, rarely stops
    Commuter,
    /// Sightseeing, buys souvenirs
    Tourist,
    /// Small budget, occasional snacks
    Student,
    /// Regular, unhurried errands
    #[default]
    Resident,
}

impl PedestrianArchetype {
    pub const ALL: [PedestrianArchetype; 5] = [
        PedestrianArchetype::Shopper,
        PedestrianArchetype::Commuter,
        PedestrianArchetype::Tourist,
        PedestrianArchetype::Student,
        PedestrianArchetype::Resident,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Shopper => "shopper",
            Self::Commuter => "commuter",
            Self::Tourist => "tourist",
            Self::Student => "student",
            Self::Resident => "resident",
        }
    }
}

impl FromStr for PedestrianArchetype {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SimError::UnknownArchetype(s.to_string()))
    }
}

impl std::fmt::Display for PedestrianArchetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-tick base probability of starting a shopping trip, per archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeTable {
    pub shopper: f32,
    pub commuter: f32,
    pub tourist: f32,
    pub student: f32,
    pub resident: f32,
}

impl Default for ArchetypeTable {
    fn default() -> Self {
        Self {
            shopper: 0.02,
            commuter: 0.003,
            tourist: 0.012,
            student: 0.006,
            resident: 0.008,
        }
    }
}

impl ArchetypeTable {
    pub fn base_probability(&self, archetype: PedestrianArchetype) -> f32 {
        match archetype {
            PedestrianArchetype::Shopper => self.shopper,
            PedestrianArchetype::Commuter => self.commuter,
            PedestrianArchetype::Tourist => self.tourist,
            PedestrianArchetype::Student => self.student,
            PedestrianArchetype::Resident => self.resident,
        }
    }

    /// Every entry must be a probability
    pub fn validate(&self) -> Result<(), SimError> {
        for archetype in PedestrianArchetype::ALL {
            let p = self.base_probability(archetype);
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::InvalidConfig(format!(
                    "base probability for {} ({}) must be within [0, 1]",
                    archetype, p
                )));
            }
        }
        Ok(())
    }
}
