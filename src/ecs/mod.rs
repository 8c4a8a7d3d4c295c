pub mod world;

pub use world::PedestrianWorld;
