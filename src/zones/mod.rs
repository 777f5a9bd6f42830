//! Zone model: anchors, area polygons and the project that validates them

pub mod project;
pub mod validation;
pub mod zone;
pub mod zone_type;

pub use project::{FloorplanProject, SourceDocument};
pub use validation::{walkable_fraction, ValidationIssue};
pub use zone::{Zone, ZoneShape};
pub use zone_type::ZoneType;
