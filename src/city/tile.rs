//! Tile data model consumed (read-only) by the pedestrian core

use crate::core::error::SimError;
use crate::spatial::grid::Grid;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Type of building occupying a tile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    #[default]
    Grass,
    Empty,
    Water,
    Road,
    Rail,
    Tree,
    HouseSmall,
    HouseMedium,
    Mansion,
    ApartmentLow,
    ApartmentHigh,
    ShopSmall,
    ShopMedium,
    OfficeLow,
    OfficeHigh,
    Mall,
    FactorySmall,
    FactoryMedium,
    FactoryLarge,
    Warehouse,
    School,
    University,
    Park,
    ParkLarge,
    Playground,
    RailStation,
    SubwayStation,
    Marina,
    Pier,
    Heliport,
    Hospital,
    PoliceStation,
    FireStation,
    PowerPlant,
    WaterTower,
}

impl BuildingType {
    /// Pedestrians can stand on these tiles
    pub fn is_walkable(&self) -> bool {
        matches!(
            self,
            BuildingType::Road | BuildingType::Grass | BuildingType::Empty | BuildingType::Park
        )
    }
}

impl FromStr for BuildingType {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|_| SimError::InvalidConfig(format!("unknown building type '{}'", s)))
    }
}

/// Zoning designation of a tile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneType {
    #[default]
    None,
    Residential,
    Commercial,
    Industrial,
}

/// Building occupying a tile, with its status flags
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub building_type: BuildingType,
    pub on_fire: bool,
    pub powered: bool,
    pub abandoned: bool,
    /// 0 = just zoned, 100 = finished
    pub construction_progress: u8,
}

impl Building {
    /// A finished, powered building
    pub fn new(building_type: BuildingType) -> Self {
        Self {
            building_type,
            on_fire: false,
            powered: true,
            abandoned: false,
            construction_progress: 100,
        }
    }

    pub fn is_operational(&self) -> bool {
        !self.on_fire && !self.abandoned && self.construction_progress >= 100
    }
}

impl Default for Building {
    fn default() -> Self {
        Self::new(BuildingType::Grass)
    }
}

/// One cell of the city grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub building: Building,
    pub zone: ZoneType,
    pub has_subway: bool,
}

impl Tile {
    pub fn new(building_type: BuildingType) -> Self {
        Self {
            building: Building::new(building_type),
            ..Self::default()
        }
    }

    pub fn with_zone(mut self, zone: ZoneType) -> Self {
        self.zone = zone;
        self
    }

    #[inline]
    pub fn building_type(&self) -> BuildingType {
        self.building.building_type
    }
}

/// The city grid as seen by the pedestrian core
pub type TileGrid = Grid<Tile>;
