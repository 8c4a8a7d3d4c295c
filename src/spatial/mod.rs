//! Spatial queries over the city grid
//!
//! None of these mutate the grid. "Not found" is always an empty result.

pub mod flood_fill;
pub mod grid;
pub mod search;
pub mod waypoints;

pub use flood_fill::flood_fill_region;
pub use grid::{project_to_screen, Grid};
pub use search::{find_by_category, find_nearest_in_category, find_nearest_matching};
pub use waypoints::{generate_waypoints, Waypoint};
