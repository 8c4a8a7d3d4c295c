//! Procedural test city used by the headless runner and benchmarks
//!
//! The real grid is owned by the construction/zoning layer; this only needs
//! to be plausible: a road lattice, zoned blocks, a lake and a few civic
//! buildings.

use crate::city::tile::{BuildingType, Tile, TileGrid, ZoneType};
use crate::core::types::GridCoord;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Configuration for the generated city
#[derive(Clone, Debug)]
pub struct CityConfig {
    pub width: usize,
    pub height: usize,
    /// Distance between parallel roads
    pub block_size: usize,
    /// Fraction of the map (0.0-1.0) covered by the lake, roughly
    pub lake_fraction: f32,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            block_size: 6,
            lake_fraction: 0.06,
        }
    }
}

/// Generate a city grid
pub fn generate_city(config: &CityConfig, rng: &mut ChaCha8Rng) -> TileGrid {
    let block = config.block_size.max(2);
    let mut grid = TileGrid::from_fn(config.width, config.height, |coord| {
        if coord.x % block == 0 || coord.y % block == 0 {
            Tile::new(BuildingType::Road)
        } else {
            Tile::default()
        }
    });

    let zones = [ZoneType::Residential, ZoneType::Commercial, ZoneType::Industrial];
    let lots: Vec<GridCoord> = grid
        .iter()
        .filter(|(_, tile)| tile.building_type() != BuildingType::Road)
        .map(|(coord, _)| coord)
        .collect();
    for coord in lots {
        // Whole blocks share a zone
        let block_id = (coord.x / block) * 31 + (coord.y / block) * 17;
        let zone = zones[block_id % zones.len()];
        let tile = generate_building(zone, rng).with_zone(zone);
        grid.set(coord, tile);
    }

    carve_lake(&mut grid, config.lake_fraction, rng);
    tracing::debug!("Generated {}x{} city", config.width, config.height);
    grid
}

fn grid_coords(grid: &TileGrid) -> Vec<GridCoord> {
    grid.iter().map(|(coord, _)| coord).collect()
}

fn generate_building(zone: ZoneType, rng: &mut ChaCha8Rng) -> Tile {
    use BuildingType::*;
    let roll: f32 = rng.gen();
    let building_type = match zone {
        ZoneType::Residential => match roll {
            r if r < 0.35 => HouseSmall,
            r if r < 0.6 => HouseMedium,
            r if r < 0.7 => Mansion,
            r if r < 0.82 => ApartmentLow,
            r if r < 0.88 => ApartmentHigh,
            r if r < 0.93 => Park,
            r if r < 0.97 => School,
            _ => Playground,
        },
        ZoneType::Commercial => match roll {
            r if r < 0.35 => ShopSmall,
            r if r < 0.55 => ShopMedium,
            r if r < 0.7 => OfficeLow,
            r if r < 0.82 => OfficeHigh,
            r if r < 0.88 => Mall,
            r if r < 0.92 => Hospital,
            r if r < 0.95 => SubwayStation,
            _ => Grass,
        },
        _ => match roll {
            r if r < 0.3 => FactorySmall,
            r if r < 0.5 => FactoryMedium,
            r if r < 0.6 => FactoryLarge,
            r if r < 0.85 => Warehouse,
            r if r < 0.9 => PowerPlant,
            r if r < 0.95 => RailStation,
            _ => Tree,
        },
    };
    let mut tile = Tile::new(building_type);
    tile.has_subway = building_type == SubwayStation;
    tile
}

/// Circular lake at a random spot, ringed with piers where it meets roads
fn carve_lake(grid: &mut TileGrid, fraction: f32, rng: &mut ChaCha8Rng) {
    if grid.is_empty() || fraction <= 0.0 {
        return;
    }
    let area = grid.width as f32 * grid.height as f32 * fraction.min(1.0);
    let radius = (area / std::f32::consts::PI).sqrt();
    let center = GridCoord::new(rng.gen_range(0..grid.width), rng.gen_range(0..grid.height));

    for coord in grid_coords(grid) {
        let d = coord.distance(&center);
        if d <= radius {
            grid.set(coord, Tile::new(BuildingType::Water));
        } else if d <= radius + 1.0 && rng.gen_bool(0.1) {
            grid.set(coord, Tile::new(BuildingType::Pier));
        }
    }
}
