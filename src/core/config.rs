//! Floorplan configuration with documented constants
//!
//! All tunable numbers are collected here with explanations of their purpose
//! and how they interact with each other. Every section can be overridden
//! from a TOML file; omitted keys keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{FloorplanError, Result};
use crate::mask::MaskConfig;
use crate::pathfinding::RouterConfig;

/// Thresholds used by project validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum absolute polygon area (square pixels) for an area zone
    ///
    /// Anything smaller is almost certainly a mis-click while drawing.
    pub min_area_px: f64,

    /// Minimum share of an area polygon that must be walkable
    ///
    /// The threshold is exact; the coverage it is compared against is a
    /// sampled estimate (see `max_coverage_samples`).
    pub min_walkable_fraction: f64,

    /// Upper bound on point samples per polygon coverage estimate
    ///
    /// Large polygons are sampled on a coarser stride so validation of a
    /// full airport plan stays interactive.
    pub max_coverage_samples: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_area_px: 50.0,
            min_walkable_fraction: 0.5,
            max_coverage_samples: 12_000,
        }
    }
}

/// Configuration for the whole floorplan pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorplanConfig {
    // === MASK GENERATION ===
    /// Auto-mask parameters (threshold, wall margin, exterior removal)
    pub mask: MaskConfig,

    // === ROUTING ===
    /// A* parameters used by test routes
    pub router: RouterConfig,

    // === VALIDATION ===
    pub validation: ValidationConfig,

    // === DISPLAY ===
    /// Alpha of the walkability overlay (0 = invisible, 255 = opaque)
    pub overlay_alpha: u8,
}

impl Default for FloorplanConfig {
    fn default() -> Self {
        Self {
            mask: MaskConfig::default(),
            router: RouterConfig::default(),
            validation: ValidationConfig::default(),
            overlay_alpha: 90,
        }
    }
}

impl FloorplanConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: FloorplanConfig = toml::from_str(text)?;
        config.validate().map_err(FloorplanError::InvalidConfig)?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.router.stride == 0 {
            return Err("router.stride must be >= 1".into());
        }

        if !(0.0..=1.0).contains(&self.validation.min_walkable_fraction) {
            return Err(format!(
                "validation.min_walkable_fraction ({}) must be within [0, 1]",
                self.validation.min_walkable_fraction
            ));
        }

        if self.validation.min_area_px < 0.0 {
            return Err("validation.min_area_px must not be negative".into());
        }

        if self.validation.max_coverage_samples == 0 {
            return Err("validation.max_coverage_samples must be positive".into());
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<FloorplanConfig> = OnceLock::new();

/// Get the global config (initializes with defaults if not set)
pub fn config() -> &'static FloorplanConfig {
    CONFIG.get_or_init(FloorplanConfig::new)
}

/// Set the global config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: FloorplanConfig) -> std::result::Result<(), FloorplanConfig> {
    CONFIG.set(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = FloorplanConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.validation.min_area_px, 50.0);
        assert_eq!(config.validation.max_coverage_samples, 12_000);
        assert_eq!(config.router.stride, 4);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = FloorplanConfig::from_toml_str(
            r#"
            overlay_alpha = 120

            [mask]
            threshold = 180
            auto_threshold = true

            [router]
            stride = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.overlay_alpha, 120);
        assert_eq!(config.mask.threshold, 180);
        assert!(config.mask.auto_threshold);
        assert_eq!(config.mask.inflate_px, MaskConfig::default().inflate_px);
        assert_eq!(config.router.stride, 2);
        assert!(config.router.allow_diagonal);
    }

    #[test]
    fn test_zero_stride_rejected() {
        let err = FloorplanConfig::from_toml_str("[router]\nstride = 0\n").unwrap_err();
        assert!(matches!(err, FloorplanError::InvalidConfig(_)));
    }

    #[test]
    fn test_bad_fraction_rejected() {
        let mut config = FloorplanConfig::new();
        config.validation.min_walkable_fraction = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml() {
        let err = FloorplanConfig::from_toml_str("[mask\nthreshold = ").unwrap_err();
        assert!(matches!(err, FloorplanError::TomlError(_)));
    }
}
