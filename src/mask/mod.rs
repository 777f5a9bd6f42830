//! Walkability masks and their generation from floorplan rasters

pub mod builder;
pub mod morphology;
pub mod paint;
pub mod threshold;
pub mod walk_mask;

pub use builder::{generate, MaskBuildReport, MaskBuilder, MaskConfig};
pub use threshold::{histogram, otsu_threshold, LumaSource};
pub use walk_mask::{WalkMask, BLOCKED_TINT, WALKABLE_TINT};
