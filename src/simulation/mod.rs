pub mod animation;
pub mod population;
pub mod shopping;
pub mod snapshot;
pub mod stats;
pub mod tick;

pub use animation::animation_offset;
pub use population::{clear_all, initialize_population, maintain_population};
pub use shopping::{begin_episode, complete_episode, decide_shopping_trigger, tick_pedestrian};
pub use snapshot::PopulationSnapshot;
pub use stats::{aggregate_stats, PedestrianStats};
pub use tick::{run_simulation_tick, SimulationEvent};
