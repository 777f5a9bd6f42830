//! Geometry primitives shared by masks, zones and routing

pub mod grid;
pub mod polygon;

pub use grid::Grid;
pub use polygon::{Polygon, MIN_VERTICES};
