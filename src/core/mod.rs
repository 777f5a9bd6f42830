pub mod config;
pub mod error;
pub mod types;

pub use config::{config, set_config, FloorplanConfig, ValidationConfig};
pub use error::{FloorplanError, Result};
pub use types::{PixelPoint, PixelRect};
