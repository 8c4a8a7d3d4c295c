//! Building categories and the revision-keyed membership cache
//!
//! A category is a set of building types. The heliport category has one
//! extra rule: tall offices only count when a deterministic hash of their
//! coordinates lands inside the configured acceptance band, so a stable
//! subset of rooftops is eligible without storing anything per tile.

use crate::city::tile::{BuildingType, Tile};
use crate::core::types::GridCoord;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

/// Building type admitted to the heliport category by siting hash only
pub const HELIPORT_SITED_TYPE: BuildingType = BuildingType::OfficeHigh;

/// Query categories over building types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingCategory {
    Residential,
    School,
    Commercial,
    Industrial,
    Park,
    RailStation,
    SubwayStation,
    Dock,
    Heliport,
}

impl BuildingCategory {
    pub const ALL: [BuildingCategory; 9] = [
        BuildingCategory::Residential,
        BuildingCategory::School,
        BuildingCategory::Commercial,
        BuildingCategory::Industrial,
        BuildingCategory::Park,
        BuildingCategory::RailStation,
        BuildingCategory::SubwayStation,
        BuildingCategory::Dock,
        BuildingCategory::Heliport,
    ];
}

/// Configured membership of each category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryTable {
    pub residential: Vec<BuildingType>,
    pub school: Vec<BuildingType>,
    pub commercial: Vec<BuildingType>,
    pub industrial: Vec<BuildingType>,
    pub park: Vec<BuildingType>,
    pub rail_station: Vec<BuildingType>,
    pub subway_station: Vec<BuildingType>,
    pub dock: Vec<BuildingType>,
    pub heliport: Vec<BuildingType>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        use BuildingType::*;
        Self {
            residential: vec![HouseSmall, HouseMedium, Mansion, ApartmentLow, ApartmentHigh],
            school: vec![School, University],
            commercial: vec![ShopSmall, ShopMedium, OfficeLow, OfficeHigh, Mall],
            industrial: vec![FactorySmall, FactoryMedium, FactoryLarge, Warehouse],
            park: vec![Park, ParkLarge, Playground],
            rail_station: vec![RailStation],
            subway_station: vec![SubwayStation],
            dock: vec![Marina, Pier],
            heliport: vec![Heliport, Hospital],
        }
    }
}

impl CategoryTable {
    pub fn members(&self, category: BuildingCategory) -> &[BuildingType] {
        match category {
            BuildingCategory::Residential => &self.residential,
            BuildingCategory::School => &self.school,
            BuildingCategory::Commercial => &self.commercial,
            BuildingCategory::Industrial => &self.industrial,
            BuildingCategory::Park => &self.park,
            BuildingCategory::RailStation => &self.rail_station,
            BuildingCategory::SubwayStation => &self.subway_station,
            BuildingCategory::Dock => &self.dock,
            BuildingCategory::Heliport => &self.heliport,
        }
    }
}

/// Deterministic 0..100 bucket for a coordinate
pub fn siting_hash(coord: GridCoord) -> u32 {
    let h = (coord.x as u32).wrapping_mul(73_856_093) ^ (coord.y as u32).wrapping_mul(19_349_663);
    // Finalizer so neighbouring tiles don't land in neighbouring buckets
    let h = (h ^ (h >> 16)).wrapping_mul(0x45d9_f3b);
    (h ^ (h >> 16)) % 100
}

/// Category membership sets, rebuilt when the configuration revision changes
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    revision: Option<u64>,
    sets: AHashMap<BuildingCategory, AHashSet<BuildingType>>,
    heliport_acceptance_percent: u32,
}

impl CategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index directly from a table (used by one-off queries)
    pub fn from_table(table: &CategoryTable, heliport_acceptance_percent: u32) -> Self {
        let mut index = Self::new();
        index.refresh(0, table, heliport_acceptance_percent);
        index
    }

    /// Rebuild the sets if `revision` differs from the cached one.
    /// Returns true when a rebuild happened.
    pub fn refresh(&mut self, revision: u64, table: &CategoryTable, heliport_acceptance_percent: u32) -> bool {
        if self.revision == Some(revision) {
            return false;
        }

        self.sets = BuildingCategory::ALL
            .iter()
            .map(|&category| (category, table.members(category).iter().copied().collect()))
            .collect();
        self.heliport_acceptance_percent = heliport_acceptance_percent.min(100);
        self.revision = Some(revision);
        tracing::debug!("Rebuilt building category index at config revision {}", revision);
        true
    }

    pub fn revision(&self) -> Option<u64> {
        self.revision
    }

    /// Does `tile` at `coord` belong to `category`?
    pub fn matches(&self, category: BuildingCategory, coord: GridCoord, tile: &Tile) -> bool {
        let building_type = tile.building_type();
        if self
            .sets
            .get(&category)
            .is_some_and(|set| set.contains(&building_type))
        {
            return true;
        }

        category == BuildingCategory::Heliport
            && building_type == HELIPORT_SITED_TYPE
            && siting_hash(coord) < self.heliport_acceptance_percent
    }
}
