pub mod archetype;
pub mod pedestrian;
pub mod shopping;

pub use archetype::{ArchetypeTable, PedestrianArchetype};
pub use pedestrian::{Appearance, Pedestrian};
pub use shopping::{ShoppingPhase, ShoppingState};
