//! PedestrianWorld - owns the live pedestrians and everything needed to tick them

use crate::city::category::CategoryIndex;
use crate::city::tile::TileGrid;
use crate::core::config::SimulationConfig;
use crate::core::types::{GridCoord, PedestrianId, Seconds};
use crate::entity::archetype::PedestrianArchetype;
use crate::entity::pedestrian::{Appearance, Pedestrian};
use crate::simulation::shopping::sample_range;
use crate::spatial::waypoints::generate_waypoints;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Largest per-axis offset of a freshly spawned pedestrian's destination
pub const SPAWN_DESTINATION_SPREAD: isize = 3;

/// The pedestrian population and its simulation context
///
/// Configuration is owned here and passed by reference into every system,
/// so independent worlds (for instance in tests) never share state.
pub struct PedestrianWorld {
    pub(crate) config: SimulationConfig,
    /// Bumped on every `config_mut`; keys the category cache
    config_revision: u64,
    pub(crate) categories: CategoryIndex,
    /// Random number generator (deterministic)
    pub rng: ChaCha8Rng,
    pub(crate) pedestrians: Vec<Pedestrian>,
    /// Day index of the last tick, for resetting daily visit counters
    pub current_day: u64,
    /// Wall time of the last tick
    pub clock: Seconds,
}

impl PedestrianWorld {
    pub fn new(config: SimulationConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: SimulationConfig, rng: ChaCha8Rng) -> Self {
        let mut world = Self {
            config,
            config_revision: 0,
            categories: CategoryIndex::new(),
            rng,
            pedestrians: Vec::new(),
            current_day: 0,
            clock: 0.0,
        };
        world.refresh_categories();
        world
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Mutable access to the configuration; invalidates derived caches
    pub fn config_mut(&mut self) -> &mut SimulationConfig {
        self.config_revision += 1;
        &mut self.config
    }

    pub fn config_revision(&self) -> u64 {
        self.config_revision
    }

    /// Rebuild the category index if the configuration changed
    pub fn refresh_categories(&mut self) {
        self.categories.refresh(
            self.config_revision,
            &self.config.categories,
            self.config.heliport_acceptance_percent,
        );
    }

    /// Category index for the current configuration
    pub fn categories(&mut self) -> &CategoryIndex {
        self.refresh_categories();
        &self.categories
    }

    pub fn pedestrians(&self) -> &[Pedestrian] {
        &self.pedestrians
    }

    pub fn count(&self) -> usize {
        self.pedestrians.len()
    }

    pub fn autonomous_count(&self) -> usize {
        self.pedestrians.iter().filter(|p| p.autonomous).count()
    }

    pub fn is_full(&self) -> bool {
        self.pedestrians.len() >= self.config.population_cap
    }

    pub fn get(&self, id: PedestrianId) -> Option<&Pedestrian> {
        self.pedestrians.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PedestrianId) -> Option<&mut Pedestrian> {
        self.pedestrians.iter_mut().find(|p| p.id == id)
    }

    /// Remove one pedestrian (cap eviction by an outer system)
    pub fn remove(&mut self, id: PedestrianId) -> Option<Pedestrian> {
        let index = self.pedestrians.iter().position(|p| p.id == id)?;
        Some(self.pedestrians.remove(index))
    }

    /// Replace the whole population (snapshot restore); records are hydrated
    pub fn replace_pedestrians(&mut self, mut pedestrians: Vec<Pedestrian>) {
        for pedestrian in &mut pedestrians {
            pedestrian.hydrate();
        }
        self.pedestrians = pedestrians;
    }

    /// Spawn an autonomous pedestrian; `None` once the population cap is reached
    pub fn spawn(&mut self, origin: GridCoord, archetype: PedestrianArchetype) -> Option<PedestrianId> {
        if self.is_full() {
            return None;
        }

        let id = PedestrianId::from_rng(&mut self.rng);
        let dx = self.rng.gen_range(-SPAWN_DESTINATION_SPREAD..=SPAWN_DESTINATION_SPREAD);
        let dy = self.rng.gen_range(-SPAWN_DESTINATION_SPREAD..=SPAWN_DESTINATION_SPREAD);
        let destination = origin.offset(dx, dy).unwrap_or(origin);
        let appearance = Appearance::random(&mut self.rng);
        let budget = sample_range(&mut self.rng, self.config.budget_min, self.config.budget_max).max(0.0);

        self.pedestrians.push(Pedestrian::new(
            id,
            origin,
            destination,
            archetype,
            appearance,
            budget,
        ));
        Some(id)
    }

    /// Spawn with a uniformly drawn archetype
    pub fn spawn_random(&mut self, origin: GridCoord) -> Option<PedestrianId> {
        let archetype = PedestrianArchetype::random(&mut self.rng);
        self.spawn(origin, archetype)
    }

    /// Spawn a scripted pedestrian touring the region around `start`.
    ///
    /// `None` if the cap is reached or the region is too small for a tour.
    pub fn spawn_tour(&mut self, grid: &TileGrid, start: GridCoord) -> Option<PedestrianId> {
        if self.is_full() {
            return None;
        }
        let waypoints = generate_waypoints(grid, start, self.config.waypoint_region_limit, &mut self.rng);
        if waypoints.is_empty() {
            return None;
        }

        let id = PedestrianId::from_rng(&mut self.rng);
        let appearance = Appearance::random(&mut self.rng);
        self.pedestrians.push(Pedestrian::scripted(id, waypoints, appearance));
        Some(id)
    }
}

impl Default for PedestrianWorld {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}
