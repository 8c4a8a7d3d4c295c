//! Tick system - advances every autonomous pedestrian by one frame
//!
//! Single-threaded and in list order. Each pedestrian only touches its own
//! record and the grid is borrowed read-only for the whole tick, so order
//! only changes which random draw lands where.

use crate::city::tile::TileGrid;
use crate::core::types::{GridCoord, PedestrianId, Seconds};
use crate::ecs::world::PedestrianWorld;
use crate::simulation::shopping::tick_pedestrian;

/// Events generated during a simulation tick
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    /// A new simulated day began; daily visit counters were reset
    DayStarted { day: u64 },
    /// A pedestrian started a shopping trip
    EpisodeStarted {
        id: PedestrianId,
        /// Display-only destination, `None` if no shop was in range
        target_shop: Option<GridCoord>,
        duration: f32,
    },
    /// A pedestrian finished a shopping trip
    EpisodeCompleted {
        id: PedestrianId,
        items: u32,
        spent: f32,
        satisfaction: f32,
    },
}

/// Day index for a wall time; non-finite or negative times map to day 0
pub fn day_index(time: Seconds, day_length: Seconds) -> u64 {
    if !time.is_finite() || time <= 0.0 || !(day_length > 0.0) {
        return 0;
    }
    (time / day_length).floor() as u64
}

/// Run a single simulation tick
///
/// 1. Refresh the category index if the configuration changed
/// 2. Reset daily visit counters when the day rolls over
/// 3. Tick each autonomous pedestrian (decay, trip progress or trigger)
///
/// Returns the events that occurred during this tick.
pub fn run_simulation_tick(
    world: &mut PedestrianWorld,
    grid: &TileGrid,
    dt: Seconds,
    time: Seconds,
) -> Vec<SimulationEvent> {
    let mut events = Vec::new();

    world.refresh_categories();

    let day = day_index(time, world.config.day_length_seconds);
    if day != world.current_day {
        for state in world.pedestrians.iter_mut().filter_map(|p| p.shopping.as_mut()) {
            state.visits_today = 0;
        }
        world.current_day = day;
        tracing::debug!("Day {} started", day);
        events.push(SimulationEvent::DayStarted { day });
    }
    world.clock = time;

    let config = &world.config;
    let categories = &world.categories;
    let rng = &mut world.rng;
    for pedestrian in world.pedestrians.iter_mut().filter(|p| p.autonomous) {
        if let Some(event) = tick_pedestrian(pedestrian, grid, dt, time, config, categories, rng) {
            events.push(event);
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::entity::archetype::PedestrianArchetype;

    #[test]
    fn test_day_index() {
        assert_eq!(day_index(0.0, 600.0), 0);
        assert_eq!(day_index(599.9, 600.0), 0);
        assert_eq!(day_index(600.0, 600.0), 1);
        assert_eq!(day_index(f32::NAN, 600.0), 0);
        assert_eq!(day_index(100.0, 0.0), 0);
    }

    #[test]
    fn test_day_rollover_resets_visits() {
        let mut world = PedestrianWorld::default();
        let id = world.spawn(GridCoord::new(0, 0), PedestrianArchetype::Resident).unwrap();
        if let Some(state) = world.get_mut(id).and_then(|p| p.shopping.as_mut()) {
            state.visits_today = 2;
        }
        let grid = TileGrid::new(4, 4);

        let events = run_simulation_tick(&mut world, &grid, 0.0, 10.0);
        assert!(events.is_empty());

        let events = run_simulation_tick(&mut world, &grid, 0.0, 650.0);
        assert_eq!(events, vec![SimulationEvent::DayStarted { day: 1 }]);
        let visits = world.get(id).and_then(|p| p.shopping.as_ref()).map(|s| s.visits_today);
        assert_eq!(visits, Some(0));
    }

    #[test]
    fn test_saturated_trigger_starts_everyone_eventually() {
        let mut config = SimulationConfig::default();
        for archetype_p in [
            &mut config.archetypes.shopper,
            &mut config.archetypes.commuter,
            &mut config.archetypes.tourist,
            &mut config.archetypes.student,
            &mut config.archetypes.resident,
        ] {
            *archetype_p = 1.0;
        }
        let mut world = PedestrianWorld::new(config);
        for i in 0..10 {
            world.spawn_random(GridCoord::new(i, 0));
        }
        let grid = TileGrid::new(10, 10);

        // Probability is capped at 0.5 per tick; 40 ticks make a miss vanishingly rare
        for step in 0..40 {
            run_simulation_tick(&mut world, &grid, 0.01, step as f32 * 0.01);
        }
        assert!(world.pedestrians().iter().all(|p| p.is_shopping()));
    }
}
