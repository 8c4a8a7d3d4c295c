//! The pedestrian record

use crate::core::types::{GridCoord, PedestrianId};
use crate::entity::archetype::PedestrianArchetype;
use crate::entity::shopping::{ShoppingPhase, ShoppingState, DEFAULT_SATISFACTION};
use crate::spatial::waypoints::Waypoint;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How a pedestrian looks; consumed by the renderer only
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Appearance {
    /// Index into the renderer's skin palette (0..6)
    pub skin_tone: u8,
    pub shirt_color: [u8; 3],
    pub pants_color: [u8; 3],
    pub has_hat: bool,
    /// Tiles per second
    pub walk_speed: f32,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            skin_tone: 0,
            shirt_color: [200, 60, 60],
            pants_color: [40, 40, 80],
            has_hat: false,
            walk_speed: 1.0,
        }
    }
}

impl Appearance {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            skin_tone: rng.gen_range(0..6),
            shirt_color: rng.gen(),
            pants_color: [rng.gen_range(20..120), rng.gen_range(20..120), rng.gen_range(40..160)],
            has_hat: rng.gen_bool(0.2),
            walk_speed: rng.gen_range(0.8..1.4),
        }
    }
}

/// A simulated person on the city grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pedestrian {
    pub id: PedestrianId,
    pub position: GridCoord,
    /// Where the (external) movement layer is taking this pedestrian
    pub destination: GridCoord,
    #[serde(default)]
    pub appearance: Appearance,
    /// Autonomous pedestrians run the shopping logic; scripted ones follow a tour
    #[serde(default = "default_autonomous")]
    pub autonomous: bool,
    #[serde(default)]
    pub archetype: PedestrianArchetype,
    /// Presentation flag: carrying a shopping bag
    #[serde(default)]
    pub has_bag: bool,
    #[serde(default)]
    pub shopping: Option<ShoppingState>,
    #[serde(default)]
    pub tour: Vec<Waypoint>,
}

fn default_autonomous() -> bool {
    true
}

impl Pedestrian {
    /// An autonomous pedestrian with a fresh shopping record
    pub fn new(
        id: PedestrianId,
        position: GridCoord,
        destination: GridCoord,
        archetype: PedestrianArchetype,
        appearance: Appearance,
        budget: f32,
    ) -> Self {
        let mut pedestrian = Self {
            id,
            position,
            destination,
            appearance,
            autonomous: true,
            archetype,
            has_bag: false,
            shopping: Some(ShoppingState::with_budget(budget)),
            tour: Vec::new(),
        };
        pedestrian.hydrate();
        pedestrian
    }

    /// A scripted pedestrian walking a fixed tour
    pub fn scripted(id: PedestrianId, tour: Vec<Waypoint>, appearance: Appearance) -> Self {
        let position = tour.first().map(|w| w.tile).unwrap_or_default();
        let destination = tour.last().map(|w| w.tile).unwrap_or(position);
        Self {
            id,
            position,
            destination,
            appearance,
            autonomous: false,
            archetype: PedestrianArchetype::Tourist,
            has_bag: false,
            shopping: None,
            tour,
        }
    }

    /// Apply the default policy to a loaded or freshly built record.
    ///
    /// Autonomous pedestrians always end up with a shopping record.
    pub fn hydrate(&mut self) {
        let mut repaired = false;
        if self.autonomous && self.shopping.is_none() {
            self.shopping = Some(ShoppingState::default());
            repaired = true;
        }
        if let Some(state) = self.shopping.as_mut() {
            repaired |= state.hydrate();
        }
        if !self.appearance.walk_speed.is_finite() || self.appearance.walk_speed <= 0.0 {
            self.appearance.walk_speed = Appearance::default().walk_speed;
            repaired = true;
        }
        if repaired {
            tracing::warn!("Pedestrian {} record normalized to defaults", self.id);
        }
    }

    pub fn is_shopping(&self) -> bool {
        self.shopping.as_ref().is_some_and(ShoppingState::is_shopping)
    }

    pub fn phase(&self) -> ShoppingPhase {
        self.shopping.as_ref().map_or(ShoppingPhase::None, |s| s.phase)
    }

    pub fn satisfaction(&self) -> f32 {
        self.shopping.as_ref().map_or(DEFAULT_SATISFACTION, |s| s.satisfaction)
    }

    pub fn total_spent(&self) -> f32 {
        self.shopping.as_ref().map_or(0.0, |s| s.total_spent)
    }

    /// Walking toward a destination the movement layer hasn't reached yet
    pub fn is_walking(&self) -> bool {
        !self.is_shopping() && self.position != self.destination
    }

    /// Label for the detail view: "shopping", "walking" or "idle"
    pub fn state_label(&self) -> &'static str {
        if self.is_shopping() {
            "shopping"
        } else if self.is_walking() {
            "walking"
        } else {
            "idle"
        }
    }

    /// Label for the detail view's shopping line
    pub fn phase_label(&self) -> &'static str {
        self.phase().label()
    }
}
