//! City layer - tiles, building categories and a test city generator

pub mod category;
pub mod generator;
pub mod tile;

pub use category::{BuildingCategory, CategoryIndex, CategoryTable};
pub use generator::{generate_city, CityConfig};
pub use tile::{Building, BuildingType, Tile, TileGrid, ZoneType};
