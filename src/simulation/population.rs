//! Population lifecycle: initial seeding, trickle spawning, bulk clear

use crate::city::tile::{BuildingType, TileGrid};
use crate::core::types::{GridCoord, PedestrianId, Seconds};
use crate::ecs::world::PedestrianWorld;
use rand::seq::SliceRandom;
use rand::Rng;

/// Tiles pedestrians may appear on: roads, or anything if the city has none
pub fn spawn_candidates(grid: &TileGrid) -> Vec<GridCoord> {
    let roads: Vec<GridCoord> = grid
        .iter()
        .filter(|(_, tile)| tile.building_type() == BuildingType::Road)
        .map(|(coord, _)| coord)
        .collect();
    if roads.is_empty() {
        grid.iter().map(|(coord, _)| coord).collect()
    } else {
        roads
    }
}

/// Spawn on `origin` and keep the destination on the grid
fn spawn_on_grid(world: &mut PedestrianWorld, grid: &TileGrid, origin: GridCoord) -> Option<PedestrianId> {
    let id = world.spawn_random(origin)?;
    if let Some(pedestrian) = world.get_mut(id) {
        pedestrian.destination.x = pedestrian.destination.x.min(grid.width.saturating_sub(1));
        pedestrian.destination.y = pedestrian.destination.y.min(grid.height.saturating_sub(1));
    }
    Some(id)
}

/// Spawn up to `count` pedestrians on random spawn tiles.
///
/// Stops early at the population cap; returns how many were spawned.
pub fn initialize_population(world: &mut PedestrianWorld, grid: &TileGrid, count: usize) -> usize {
    let candidates = spawn_candidates(grid);
    let mut spawned = 0;

    for _ in 0..count {
        let Some(&origin) = candidates.choose(&mut world.rng) else {
            break;
        };
        if spawn_on_grid(world, grid, origin).is_none() {
            break;
        }
        spawned += 1;
    }

    tracing::info!("Spawned {} initial pedestrians ({} live)", spawned, world.count());
    spawned
}

/// Spawn at most one pedestrian with probability `spawn_rate * dt`
pub fn maintain_population(world: &mut PedestrianWorld, grid: &TileGrid, dt: Seconds) -> Option<PedestrianId> {
    if world.is_full() {
        return None;
    }
    let chance = (world.config().spawn_rate * dt).clamp(0.0, 1.0);
    if chance.is_nan() || world.rng.gen::<f32>() >= chance {
        return None;
    }

    let candidates = spawn_candidates(grid);
    let &origin = candidates.choose(&mut world.rng)?;
    spawn_on_grid(world, grid, origin)
}

/// Drop every autonomous pedestrian, keeping scripted ones.
/// Returns how many were removed.
pub fn clear_all(world: &mut PedestrianWorld) -> usize {
    let before = world.pedestrians.len();
    world.pedestrians.retain(|p| !p.autonomous);
    let removed = before - world.pedestrians.len();
    tracing::info!("Cleared {} autonomous pedestrians", removed);
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::tile::Tile;
    use crate::core::config::SimulationConfig;

    fn road_strip() -> TileGrid {
        TileGrid::from_fn(10, 10, |c| {
            if c.y == 4 {
                Tile::new(BuildingType::Road)
            } else {
                Tile::new(BuildingType::HouseSmall)
            }
        })
    }

    #[test]
    fn test_initialize_spawns_on_roads() {
        let mut world = PedestrianWorld::default();
        let grid = road_strip();
        assert_eq!(initialize_population(&mut world, &grid, 20), 20);
        for p in world.pedestrians() {
            assert_eq!(p.position.y, 4);
            assert!(grid.contains(p.destination));
        }
    }

    #[test]
    fn test_initialize_stops_at_cap() {
        let mut config = SimulationConfig::default();
        config.population_cap = 5;
        let mut world = PedestrianWorld::new(config);
        assert_eq!(initialize_population(&mut world, &road_strip(), 20), 5);
        assert_eq!(world.count(), 5);
    }

    #[test]
    fn test_initialize_on_empty_grid_is_noop() {
        let mut world = PedestrianWorld::default();
        assert_eq!(initialize_population(&mut world, &TileGrid::new(0, 0), 10), 0);
        assert_eq!(world.count(), 0);
    }

    #[test]
    fn test_roadless_grid_uses_any_tile() {
        let grid = TileGrid::new(3, 3);
        assert_eq!(spawn_candidates(&grid).len(), 9);
    }

    #[test]
    fn test_clear_keeps_scripted() {
        let mut world = PedestrianWorld::default();
        let lake = TileGrid::from_fn(8, 8, |_| Tile::new(BuildingType::Water));
        initialize_population(&mut world, &road_strip(), 4);
        world.spawn_tour(&lake, GridCoord::new(3, 3));

        assert_eq!(clear_all(&mut world), 4);
        assert_eq!(world.count(), 1);
        assert!(!world.pedestrians()[0].autonomous);
    }

    #[test]
    fn test_maintain_population_rate() {
        let mut world = PedestrianWorld::default();
        let grid = road_strip();

        world.config_mut().spawn_rate = 0.0;
        for _ in 0..50 {
            assert!(maintain_population(&mut world, &grid, 1.0).is_none());
        }

        world.config_mut().spawn_rate = 10.0;
        assert!(maintain_population(&mut world, &grid, 1.0).is_some());
        assert_eq!(world.count(), 1);
    }
}
