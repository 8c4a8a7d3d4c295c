//! Pedestrian Sim - autonomous shoppers on a tile city grid
//!
//! Two layers: a spatial query engine over the (read-only) city grid and a
//! pedestrian behavior engine that runs the shopping economy every tick.

pub mod city;
pub mod core;
pub mod ecs;
pub mod entity;
pub mod simulation;
pub mod spatial;
