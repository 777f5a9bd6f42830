//! floorplan-nav - walkable floorplans for pedestrian simulation
//!
//! Turns a scanned floorplan into a walkability mask, checks the zones drawn
//! on it, and routes between pixels with A*.

pub mod core;
pub mod io;
pub mod mask;
pub mod pathfinding;
pub mod spatial;
pub mod zones;
