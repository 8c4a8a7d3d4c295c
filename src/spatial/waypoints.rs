//! Tour waypoint generation
//!
//! Picks a handful of well-spread points inside the connected region around
//! a start tile. Tiles are ranked by distance from the region centroid with a
//! random perturbation, then accepted greedily as long as they keep a minimum
//! spacing from every accepted waypoint. If spacing starves the target count,
//! random unused tiles fill the remaining slots.

use crate::city::tile::TileGrid;
use crate::core::types::{GridCoord, Vec2};
use crate::spatial::flood_fill::flood_fill_region;
use crate::spatial::grid::project_to_screen;
use ahash::AHashSet;
use ordered_float::OrderedFloat;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Regions smaller than this cannot host a tour
pub const MIN_REGION_SIZE: usize = 3;
pub const MIN_WAYPOINTS: usize = 2;
pub const MAX_WAYPOINTS: usize = 6;
/// Minimum Euclidean spacing between ranked picks (tiles)
pub const MIN_SPACING: f32 = 3.0;
/// Upper bound of the random term added to centroid distance
const RANK_JITTER: f32 = 2.0;

/// A tour stop: the tile and where it lands on screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub tile: GridCoord,
    pub screen: Vec2,
}

impl Waypoint {
    pub fn new(tile: GridCoord) -> Self {
        Self {
            tile,
            screen: project_to_screen(tile),
        }
    }
}

/// Number of waypoints to aim for in a region of `region_size` tiles
pub fn target_waypoint_count(region_size: usize) -> usize {
    (region_size / 10).clamp(MIN_WAYPOINTS, MAX_WAYPOINTS)
}

/// Generate tour waypoints in the region of tiles sharing `start`'s building type.
///
/// Returns an empty list when `start` is off the grid or the region has fewer
/// than `MIN_REGION_SIZE` tiles.
pub fn generate_waypoints<R: Rng + ?Sized>(
    grid: &TileGrid,
    start: GridCoord,
    max_region: usize,
    rng: &mut R,
) -> Vec<Waypoint> {
    let Some(start_tile) = grid.get(start) else {
        return Vec::new();
    };
    let kind = start_tile.building_type();
    let region = flood_fill_region(grid, start, |tile| tile.building_type() == kind, max_region);

    select_waypoints(&region, rng)
        .into_iter()
        .map(Waypoint::new)
        .collect()
}

/// Pick spaced tour stops from an already computed region
pub fn select_waypoints<R: Rng + ?Sized>(region: &[GridCoord], rng: &mut R) -> Vec<GridCoord> {
    if region.len() < MIN_REGION_SIZE {
        return Vec::new();
    }

    let target = target_waypoint_count(region.len());
    let centroid = centroid(region);

    let mut ranked: Vec<(usize, OrderedFloat<f32>)> = region
        .iter()
        .enumerate()
        .map(|(i, tile)| {
            let score = tile.as_vec2().distance(&centroid) + rng.gen_range(0.0..RANK_JITTER);
            (i, OrderedFloat(score))
        })
        .collect();
    // Outermost first
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let mut chosen: Vec<usize> = Vec::with_capacity(target);
    for (i, _) in ranked {
        if chosen.len() >= target {
            break;
        }
        let candidate = region[i];
        let spaced = chosen
            .iter()
            .all(|&j| candidate.distance(&region[j]) >= MIN_SPACING);
        if spaced {
            chosen.push(i);
        }
    }

    if chosen.len() < target {
        let used: AHashSet<usize> = chosen.iter().copied().collect();
        let mut unused: Vec<usize> = (0..region.len()).filter(|i| !used.contains(i)).collect();
        unused.shuffle(rng);
        let missing = target - chosen.len();
        chosen.extend(unused.into_iter().take(missing));
    }

    chosen.into_iter().map(|i| region[i]).collect()
}

fn centroid(region: &[GridCoord]) -> Vec2 {
    let n = region.len().max(1) as f32;
    let sum = region
        .iter()
        .fold(Vec2::ZERO, |acc, tile| acc + tile.as_vec2());
    sum * (1.0 / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::tile::{BuildingType, Tile};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn lake(width: usize, height: usize) -> TileGrid {
        TileGrid::from_fn(width, height, |_| Tile::new(BuildingType::Water))
    }

    #[test]
    fn test_target_count_clamped() {
        assert_eq!(target_waypoint_count(3), 2);
        assert_eq!(target_waypoint_count(25), 2);
        assert_eq!(target_waypoint_count(45), 4);
        assert_eq!(target_waypoint_count(200), 6);
    }

    #[test]
    fn test_tiny_region_yields_nothing() {
        let mut grid = TileGrid::new(5, 5);
        grid.set(GridCoord::new(1, 1), Tile::new(BuildingType::Water));
        grid.set(GridCoord::new(2, 1), Tile::new(BuildingType::Water));
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert!(generate_waypoints(&grid, GridCoord::new(1, 1), 200, &mut rng).is_empty());
    }

    #[test]
    fn test_off_grid_start_yields_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(generate_waypoints(&lake(4, 4), GridCoord::new(9, 9), 200, &mut rng).is_empty());
        assert!(generate_waypoints(&TileGrid::new(0, 0), GridCoord::new(0, 0), 200, &mut rng).is_empty());
    }

    #[test]
    fn test_three_tile_region_fills_two() {
        // A straight strip of 3 can't satisfy spacing 3.0 twice; fill kicks in
        let mut grid = TileGrid::new(5, 1);
        for x in 0..3 {
            grid.set(GridCoord::new(x, 0), Tile::new(BuildingType::Water));
        }
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let waypoints = generate_waypoints(&grid, GridCoord::new(0, 0), 200, &mut rng);

        assert_eq!(waypoints.len(), 2);
        assert_ne!(waypoints[0].tile, waypoints[1].tile);
    }

    #[test]
    fn test_large_lake_waypoints_are_distinct_and_inside() {
        let grid = lake(20, 20);
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let waypoints = generate_waypoints(&grid, GridCoord::new(10, 10), 200, &mut rng);

            assert_eq!(waypoints.len(), 6);
            let unique: AHashSet<_> = waypoints.iter().map(|w| w.tile).collect();
            assert_eq!(unique.len(), waypoints.len());
            for w in &waypoints {
                assert!(grid.contains(w.tile));
                assert_eq!(w.screen, project_to_screen(w.tile));
            }
        }
    }

    #[test]
    fn test_spaced_picks_respect_min_spacing() {
        // 20x20 region has plenty of room: no fill needed
        let region: Vec<GridCoord> = (0..20)
            .flat_map(|y| (0..20).map(move |x| GridCoord::new(x, y)))
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let picks = select_waypoints(&region, &mut rng);

        for (i, a) in picks.iter().enumerate() {
            for b in picks.iter().skip(i + 1) {
                assert!(a.distance(b) >= MIN_SPACING, "{} and {} too close", a, b);
            }
        }
    }
}
