use thiserror::Error;

use crate::zones::ZoneType;

#[derive(Error, Debug)]
pub enum FloorplanError {
    #[error("Invalid mask size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Zone {id} has type {zone_type:?}, which does not carry {expected}")]
    ZoneTypeMismatch {
        id: String,
        zone_type: ZoneType,
        expected: &'static str,
    },

    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("Anchor must be on a walkable pixel: ({x}, {y})")]
    AnchorNotWalkable { x: i32, y: i32 },

    #[error("Project is locked; unlock before editing")]
    Locked,

    #[error("No floorplan image loaded")]
    MissingImage,

    #[error("No walk mask generated")]
    MissingMask,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unsupported project format version {found} (expected at most {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, FloorplanError>;
