//! Shopping trip state machine
//!
//! Idle -> Browsing -> Paying -> Leaving -> Idle. The three active phases are
//! bands of one progress ramp; the only transition that matters for the
//! economy is completion at `progress >= 1`, which is time driven. Whether a
//! shop was found nearby only affects what the renderer shows.

use crate::city::category::{BuildingCategory, CategoryIndex};
use crate::city::tile::TileGrid;
use crate::core::config::SimulationConfig;
use crate::core::types::Seconds;
use crate::entity::archetype::PedestrianArchetype;
use crate::entity::pedestrian::Pedestrian;
use crate::entity::shopping::{ShoppingPhase, ShoppingState};
use crate::simulation::tick::SimulationEvent;
use crate::spatial::search::find_nearest_in_category;
use rand::Rng;

/// Shortest trip we will run, guards against zero or NaN durations
pub const MIN_TRIP_DURATION: f32 = 0.1;
pub const MIN_ITEMS: u32 = 1;
pub const MAX_ITEMS: u32 = 5;

/// Outcome of a completed trip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Receipt {
    pub items: u32,
    /// Actual amount debited (never more than the budget before the trip)
    pub spent: f32,
    pub budget_before: f32,
}

/// Uniform draw from `[lo, hi]`
///
/// Falls back to `lo` if the range is empty or its span is not finite, and to
/// 0.0 if `lo` itself is not finite.
pub(crate) fn sample_range<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if !lo.is_finite() {
        return 0.0;
    }
    if lo < hi && (hi - lo).is_finite() {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}

/// Per-tick probability of starting a trip
///
/// Low satisfaction and a large remaining budget both push it up, but the
/// result never exceeds `config.trigger_ceiling`.
pub fn trigger_probability(state: &ShoppingState, archetype: PedestrianArchetype, config: &SimulationConfig) -> f32 {
    let base = config.archetypes.base_probability(archetype);
    let discontent = (1.0 - state.satisfaction) * config.satisfaction_weight;
    let wealth = if config.budget_max > 0.0 {
        (state.budget / config.budget_max).min(1.0) * config.budget_weight
    } else {
        0.0
    };

    let p = base + discontent + wealth;
    if p.is_nan() {
        return 0.0;
    }
    p.clamp(0.0, config.trigger_ceiling.clamp(0.0, 1.0))
}

/// Roll once to decide whether an idle pedestrian starts shopping this tick
pub fn decide_shopping_trigger<R: Rng + ?Sized>(
    state: &ShoppingState,
    archetype: PedestrianArchetype,
    config: &SimulationConfig,
    rng: &mut R,
) -> bool {
    if state.is_shopping() {
        return false;
    }
    rng.gen::<f32>() < trigger_probability(state, archetype, config)
}

/// Start a trip: browsing, progress 0, random duration, optional display target.
///
/// Returns false for pedestrians without a shopping record (scripted ones).
pub fn begin_episode<R: Rng + ?Sized>(
    pedestrian: &mut Pedestrian,
    grid: &TileGrid,
    config: &SimulationConfig,
    categories: &CategoryIndex,
    rng: &mut R,
) -> bool {
    let origin = pedestrian.position;
    let Some(state) = pedestrian.shopping.as_mut() else {
        return false;
    };

    state.phase = ShoppingPhase::Browsing;
    state.progress = 0.0;
    state.duration = sample_range(rng, config.duration_min, config.duration_max).max(MIN_TRIP_DURATION);
    state.target_shop = find_nearest_in_category(
        grid,
        origin,
        BuildingCategory::Commercial,
        config.shop_search_radius,
        categories,
    );
    true
}

/// Close a trip: buy 1-5 items, debit at most the remaining budget, reward
/// satisfaction and stamp the visit.
///
/// `max_visits_per_day` and `min_time_between_visits` are not consulted.
pub fn complete_episode<R: Rng + ?Sized>(
    state: &mut ShoppingState,
    config: &SimulationConfig,
    time: Seconds,
    rng: &mut R,
) -> Receipt {
    let items = rng.gen_range(MIN_ITEMS..=MAX_ITEMS);
    let nominal = items as f32 * config.average_item_price;
    let nominal = if nominal.is_nan() { 0.0 } else { nominal };
    let budget_before = state.budget;
    let spent = nominal.min(budget_before).max(0.0);

    state.budget = (budget_before - spent).max(0.0);
    state.total_spent += spent;
    state.items_bought = state.items_bought.saturating_add(items);
    state.add_satisfaction(config.satisfaction_increment);
    state.close_trip();
    state.last_visit_time = time;
    state.visits_today = state.visits_today.saturating_add(1);

    Receipt {
        items,
        spent,
        budget_before,
    }
}

/// Advance one autonomous pedestrian by `dt` seconds.
///
/// Satisfaction decays first, then the trip advances (possibly completing)
/// or, when idle, the trigger is rolled.
pub fn tick_pedestrian<R: Rng + ?Sized>(
    pedestrian: &mut Pedestrian,
    grid: &TileGrid,
    dt: Seconds,
    time: Seconds,
    config: &SimulationConfig,
    categories: &CategoryIndex,
    rng: &mut R,
) -> Option<SimulationEvent> {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let id = pedestrian.id;
    let archetype = pedestrian.archetype;
    let state = pedestrian.shopping.as_mut()?;

    state.add_satisfaction(-config.satisfaction_decay_rate * dt);

    if state.is_shopping() {
        state.progress += dt / state.duration.max(MIN_TRIP_DURATION);
        if state.progress >= 1.0 {
            let receipt = complete_episode(state, config, time, rng);
            let satisfaction = state.satisfaction;
            pedestrian.has_bag = false;
            tracing::debug!(
                "Pedestrian {} finished shopping: {} items for {:.2}",
                id,
                receipt.items,
                receipt.spent
            );
            return Some(SimulationEvent::EpisodeCompleted {
                id,
                items: receipt.items,
                spent: receipt.spent,
                satisfaction,
            });
        }
        state.phase = ShoppingPhase::from_progress(state.progress);
        pedestrian.has_bag = true;
        return None;
    }

    if !decide_shopping_trigger(state, archetype, config, rng) {
        return None;
    }

    begin_episode(pedestrian, grid, config, categories, rng);
    let state = pedestrian.shopping.as_ref()?;
    tracing::debug!(
        "Pedestrian {} started shopping for {:.1}s (target {:?})",
        id,
        state.duration,
        state.target_shop
    );
    Some(SimulationEvent::EpisodeStarted {
        id,
        target_shop: state.target_shop,
        duration: state.duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::category::CategoryTable;
    use crate::city::tile::{BuildingType, Tile};
    use crate::core::types::{GridCoord, PedestrianId};
    use crate::entity::pedestrian::Appearance;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup(budget: f32) -> (Pedestrian, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let p = Pedestrian::new(
            PedestrianId::from_rng(&mut rng),
            GridCoord::new(5, 5),
            GridCoord::new(5, 5),
            PedestrianArchetype::Shopper,
            Appearance::default(),
            budget,
        );
        (p, rng)
    }

    fn categories() -> CategoryIndex {
        CategoryIndex::from_table(&CategoryTable::default(), 0)
    }

    #[test]
    fn test_probability_never_exceeds_ceiling() {
        let mut config = SimulationConfig::default();
        config.archetypes.shopper = 0.9;
        config.satisfaction_weight = 1.0;
        config.budget_weight = 1.0;

        let state = ShoppingState {
            satisfaction: 0.0,
            budget: 1_000_000.0,
            ..ShoppingState::default()
        };
        assert_eq!(trigger_probability(&state, PedestrianArchetype::Shopper, &config), 0.5);
    }

    #[test]
    fn test_probability_terms() {
        let config = SimulationConfig::default();
        let content_broke = ShoppingState {
            satisfaction: 1.0,
            budget: 0.0,
            ..ShoppingState::default()
        };
        let unhappy_rich = ShoppingState {
            satisfaction: 0.0,
            budget: config.budget_max * 3.0,
            ..ShoppingState::default()
        };
        let base = config.archetypes.commuter;

        let low = trigger_probability(&content_broke, PedestrianArchetype::Commuter, &config);
        let high = trigger_probability(&unhappy_rich, PedestrianArchetype::Commuter, &config);
        assert!((low - base).abs() < 1e-6);
        // Budget term saturates at 1.0
        let expected = base + config.satisfaction_weight + config.budget_weight;
        assert!((high - expected).abs() < 1e-6);
    }

    #[test]
    fn test_sample_range_survives_unbounded_spans() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        assert_eq!(sample_range(&mut rng, 200.0, f32::INFINITY), 200.0);
        assert_eq!(sample_range(&mut rng, -f32::MAX, f32::MAX), -f32::MAX);
        assert_eq!(sample_range(&mut rng, 5.0, f32::NAN), 5.0);
        assert_eq!(sample_range(&mut rng, f32::NAN, 10.0), 0.0);
        let x = sample_range(&mut rng, 5.0, 15.0);
        assert!((5.0..=15.0).contains(&x));
    }

    #[test]
    fn test_nan_item_price_spends_nothing() {
        let mut config = SimulationConfig::default();
        config.average_item_price = f32::NAN;
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut state = ShoppingState {
            phase: ShoppingPhase::Leaving,
            progress: 0.9,
            duration: 5.0,
            budget: 400.0,
            ..ShoppingState::default()
        };

        let receipt = complete_episode(&mut state, &config, 1.0, &mut rng);
        assert_eq!(receipt.spent, 0.0);
        assert_eq!(state.budget, 400.0);
    }

    #[test]
    fn test_nan_decay_rate_keeps_satisfaction_valid() {
        let (mut p, mut rng) = setup(500.0);
        let mut config = SimulationConfig::default();
        config.satisfaction_decay_rate = f32::NAN;
        let grid = TileGrid::new(4, 4);

        for step in 0..20 {
            tick_pedestrian(&mut p, &grid, 0.5, step as f32 * 0.5, &config, &categories(), &mut rng);
            assert!((0.0..=1.0).contains(&p.satisfaction()));
        }
    }

    #[test]
    fn test_zero_budget_max_does_not_divide() {
        let mut config = SimulationConfig::default();
        config.budget_max = 0.0;
        let state = ShoppingState::default();
        let p = trigger_probability(&state, PedestrianArchetype::Resident, &config);
        assert!(p.is_finite());
    }

    #[test]
    fn test_shopping_pedestrian_never_retriggers() {
        let mut config = SimulationConfig::default();
        config.archetypes.shopper = 1.0;
        let state = ShoppingState {
            phase: ShoppingPhase::Paying,
            duration: 10.0,
            progress: 0.5,
            ..ShoppingState::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(!decide_shopping_trigger(&state, PedestrianArchetype::Shopper, &config, &mut rng));
        }
    }

    #[test]
    fn test_begin_episode_targets_nearest_shop() {
        let (mut p, mut rng) = setup(500.0);
        let mut grid = TileGrid::from_fn(20, 20, |_| Tile::new(BuildingType::Road));
        grid.set(GridCoord::new(7, 5), Tile::new(BuildingType::Mall));
        grid.set(GridCoord::new(15, 15), Tile::new(BuildingType::ShopSmall));
        let config = SimulationConfig::default();

        assert!(begin_episode(&mut p, &grid, &config, &categories(), &mut rng));
        let state = p.shopping.as_ref().unwrap();
        assert_eq!(state.phase, ShoppingPhase::Browsing);
        assert_eq!(state.progress, 0.0);
        assert!(state.duration >= config.duration_min && state.duration <= config.duration_max);
        assert_eq!(state.target_shop, Some(GridCoord::new(7, 5)));
    }

    #[test]
    fn test_complete_episode_caps_spend_at_budget() {
        let config = SimulationConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut state = ShoppingState {
            phase: ShoppingPhase::Leaving,
            progress: 0.9,
            duration: 5.0,
            budget: 30.0,
            ..ShoppingState::default()
        };

        let receipt = complete_episode(&mut state, &config, 99.0, &mut rng);
        assert!((1..=5).contains(&receipt.items));
        assert_eq!(receipt.spent, 30.0);
        assert_eq!(state.budget, 0.0);
        assert_eq!(state.total_spent, 30.0);
        assert_eq!(state.last_visit_time, 99.0);
        assert_eq!(state.visits_today, 1);
        assert!(!state.is_shopping());
        assert_eq!(state.progress, 0.0);
    }

    #[test]
    fn test_complete_with_empty_budget_spends_nothing() {
        let config = SimulationConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut state = ShoppingState {
            phase: ShoppingPhase::Browsing,
            duration: 5.0,
            ..ShoppingState::default()
        };
        let receipt = complete_episode(&mut state, &config, 0.0, &mut rng);
        assert_eq!(receipt.spent, 0.0);
        assert_eq!(state.budget, 0.0);
        assert!(state.items_bought >= 1);
    }

    #[test]
    fn test_tick_decays_idle_satisfaction() {
        let (mut p, mut rng) = setup(0.0);
        let mut config = SimulationConfig::default();
        config.archetypes.shopper = 0.0;
        config.satisfaction_weight = 0.0;
        config.budget_weight = 0.0;
        let grid = TileGrid::new(10, 10);

        let event = tick_pedestrian(&mut p, &grid, 10.0, 10.0, &config, &categories(), &mut rng);
        assert!(event.is_none());
        assert!((p.satisfaction() - 0.4).abs() < 1e-5);

        // Satisfaction floors at zero
        tick_pedestrian(&mut p, &grid, 1000.0, 1010.0, &config, &categories(), &mut rng);
        assert_eq!(p.satisfaction(), 0.0);
    }

    #[test]
    fn test_progress_advances_through_phases() {
        let (mut p, mut rng) = setup(500.0);
        let mut config = SimulationConfig::default();
        config.duration_min = 10.0;
        config.duration_max = 10.0;
        let grid = TileGrid::new(10, 10);
        begin_episode(&mut p, &grid, &config, &categories(), &mut rng);

        tick_pedestrian(&mut p, &grid, 4.0, 4.0, &config, &categories(), &mut rng);
        assert_eq!(p.phase(), ShoppingPhase::Paying);
        assert!(p.has_bag);

        tick_pedestrian(&mut p, &grid, 4.0, 8.0, &config, &categories(), &mut rng);
        assert_eq!(p.phase(), ShoppingPhase::Leaving);

        let event = tick_pedestrian(&mut p, &grid, 2.5, 10.5, &config, &categories(), &mut rng);
        assert!(matches!(event, Some(SimulationEvent::EpisodeCompleted { .. })));
        assert_eq!(p.phase(), ShoppingPhase::None);
        assert!(!p.has_bag);
    }

    #[test]
    fn test_scripted_pedestrian_is_untouched() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut p = Pedestrian::scripted(PedestrianId::from_rng(&mut rng), Vec::new(), Appearance::default());
        let before = p.clone();
        let config = SimulationConfig::default();
        let grid = TileGrid::new(4, 4);

        assert!(tick_pedestrian(&mut p, &grid, 1.0, 1.0, &config, &categories(), &mut rng).is_none());
        assert!(!begin_episode(&mut p, &grid, &config, &categories(), &mut rng));
        assert_eq!(p, before);
    }
}
