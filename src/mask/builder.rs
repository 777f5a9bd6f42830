//! Auto-mask generation: raster floorplan → walkability mask
//!
//! Pipeline:
//! 1. Binarize by luma (fixed threshold or Otsu)
//! 2. Seal thin gaps in wall outlines (closing of the wall set)
//! 3. Flood the exterior from the image border and block it
//! 4. Inflate walls by a safety margin
//!
//! The sealed wall set only acts as the barrier for step 3. Walkability is
//! decided against the raw walls, so doorways narrower than the seal radius
//! still stay open inside the building.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::error::{FloorplanError, Result};
use crate::mask::morphology;
use crate::mask::threshold::{histogram, luma_buffer, otsu_threshold, LumaSource};
use crate::mask::WalkMask;
use crate::spatial::Grid;

/// Parameters for auto-mask generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// Luma below this value is wall
    ///
    /// Ignored when `auto_threshold` is set. 200 suits typical scanned plans
    /// where walls are dark lines on near-white paper.
    pub threshold: u8,

    /// Pick the threshold per image with Otsu's method
    pub auto_threshold: bool,

    /// Safety margin (pixels) kept clear around every wall
    ///
    /// Keeps routes and anchors from hugging walls. Larger values shrink the
    /// walkable area monotonically.
    pub inflate_px: u32,

    /// Block open space connected to the image border
    pub remove_outside: bool,

    /// Radius of the closing used to seal wall outlines before the exterior
    /// flood, so the flood cannot leak through door openings
    pub seal_gaps_px: u32,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            threshold: 200,
            auto_threshold: false,
            inflate_px: 6,
            remove_outside: true,
            seal_gaps_px: 14,
        }
    }
}

/// Result of a mask build
#[derive(Debug, Clone)]
pub struct MaskBuildReport {
    pub mask: WalkMask,
    /// Threshold actually used for binarization
    pub effective_threshold: u8,
    /// Whether the threshold came from Otsu's method
    pub auto_threshold_used: bool,
    pub wall_pixels: usize,
    pub exterior_pixels: usize,
}

/// Converts raster images into walkability masks
#[derive(Debug, Clone, Default)]
pub struct MaskBuilder {
    config: MaskConfig,
}

impl MaskBuilder {
    pub fn new(config: MaskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MaskConfig {
        &self.config
    }

    /// Run the full pipeline over `source`
    pub fn build<S: LumaSource + Sync + ?Sized>(&self, source: &S) -> Result<MaskBuildReport> {
        let (width, height) = (source.width(), source.height());
        if width == 0 || height == 0 {
            return Err(FloorplanError::InvalidSize { width, height });
        }
        let (w, h) = (width as usize, height as usize);

        let luma = luma_buffer(source);

        // 1. Binarize
        let (threshold, auto_used) = self.effective_threshold(&luma);
        let walls: Vec<bool> = luma.iter().map(|&l| l < threshold).collect();
        let walls = Grid::from_vec(w, h, walls).ok_or(FloorplanError::InvalidSize { width, height })?;
        let wall_pixels = count(&walls);
        debug!(
            "Binarized {}x{} at threshold {} ({} wall pixels)",
            width, height, threshold, wall_pixels
        );

        // 2 + 3. Seal gaps, then flood the exterior through what stays open
        let exterior = if self.config.remove_outside && wall_pixels > 0 {
            let sealed = morphology::close(&walls, self.config.seal_gaps_px as usize);
            let open = morphology::invert(&sealed);
            morphology::flood_from_border(&open)
        } else {
            if self.config.remove_outside {
                warn!("No wall pixels found; skipping outside removal");
            }
            Grid::new(w, h, false)
        };
        let exterior_pixels = count(&exterior);

        // 4. Inflate walls (includes the raw walls themselves)
        let inflated = morphology::dilate(&walls, self.config.inflate_px as usize);

        let cells: Vec<bool> = exterior
            .as_slice()
            .iter()
            .zip(inflated.as_slice())
            .map(|(&outside, &near_wall)| !outside && !near_wall)
            .collect();
        let mask = WalkMask::from_cells(width, height, cells)?;

        info!(
            "Auto-mask ready: thr {}{} | inflate {}px | removeOutside={} | sealGaps {}px | {} walkable",
            threshold,
            if auto_used { " (auto)" } else { "" },
            self.config.inflate_px,
            self.config.remove_outside,
            self.config.seal_gaps_px,
            mask.walkable_count()
        );

        Ok(MaskBuildReport {
            mask,
            effective_threshold: threshold,
            auto_threshold_used: auto_used,
            wall_pixels,
            exterior_pixels,
        })
    }

    /// Otsu threshold when requested and the image has contrast; the fixed
    /// threshold otherwise
    fn effective_threshold(&self, luma: &[u8]) -> (u8, bool) {
        if !self.config.auto_threshold {
            return (self.config.threshold, false);
        }
        match otsu_threshold(&histogram(luma)) {
            Some(t) => (t, true),
            None => {
                debug!(
                    "Single gray level; falling back to fixed threshold {}",
                    self.config.threshold
                );
                (self.config.threshold, false)
            }
        }
    }
}

/// Build a mask from `source` with `config`
pub fn generate<S: LumaSource + Sync + ?Sized>(source: &S, config: &MaskConfig) -> Result<WalkMask> {
    Ok(MaskBuilder::new(config.clone()).build(source)?.mask)
}

fn count(set: &Grid<bool>) -> usize {
    set.as_slice().iter().filter(|&&m| m).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn plain() -> MaskConfig {
        MaskConfig {
            threshold: 128,
            auto_threshold: false,
            inflate_px: 0,
            remove_outside: false,
            seal_gaps_px: 0,
        }
    }

    /// White page with a closed square outline of dark walls
    fn room_image(size: u32, lo: u32, hi: u32) -> GrayImage {
        GrayImage::from_fn(size, size, |x, y| {
            let on_outline = (x == lo || x == hi) && (lo..=hi).contains(&y)
                || (y == lo || y == hi) && (lo..=hi).contains(&x);
            if on_outline {
                Luma([0])
            } else {
                Luma([255])
            }
        })
    }

    #[test]
    fn test_all_open_is_walkable() {
        let image = GrayImage::from_pixel(8, 6, Luma([255]));
        let mask = generate(&image, &plain()).unwrap();
        assert_eq!(mask.walkable_count(), 48);
    }

    #[test]
    fn test_all_wall_is_blocked() {
        let image = GrayImage::from_pixel(8, 6, Luma([0]));
        let mask = generate(&image, &MaskConfig::default()).unwrap();
        assert_eq!(mask.walkable_count(), 0);
    }

    #[test]
    fn test_all_open_with_outside_removal_stays_walkable() {
        let image = GrayImage::from_pixel(8, 6, Luma([255]));
        let config = MaskConfig {
            remove_outside: true,
            ..plain()
        };
        assert_eq!(generate(&image, &config).unwrap().walkable_count(), 48);
    }

    #[test]
    fn test_threshold_boundary() {
        let image = GrayImage::from_fn(2, 1, |x, _| if x == 0 { Luma([127]) } else { Luma([128]) });
        let mask = generate(&image, &plain()).unwrap();
        assert!(!mask.is_walkable(0, 0));
        assert!(mask.is_walkable(1, 0));
    }

    #[test]
    fn test_outside_removed_inside_kept() {
        let image = room_image(20, 4, 15);
        let config = MaskConfig {
            remove_outside: true,
            ..plain()
        };
        let report = MaskBuilder::new(config).build(&image).unwrap();

        assert!(!report.mask.is_walkable(0, 0));
        assert!(!report.mask.is_walkable(4, 10)); // wall
        assert!(report.mask.is_walkable(10, 10));
        // interior 10x10
        assert_eq!(report.mask.walkable_count(), 100);
        assert!(report.exterior_pixels > 0);
    }

    #[test]
    fn test_seal_gaps_stops_exterior_leak() {
        let mut image = room_image(30, 5, 24);
        // Two-pixel doorway in the left wall
        image.put_pixel(5, 14, Luma([255]));
        image.put_pixel(5, 15, Luma([255]));

        let leaky = MaskConfig {
            remove_outside: true,
            ..plain()
        };
        let leaked = generate(&image, &leaky).unwrap();
        assert!(!leaked.is_walkable(15, 15), "flood should leak through the doorway");

        let sealed = MaskConfig {
            seal_gaps_px: 2,
            ..leaky
        };
        let mask = generate(&image, &sealed).unwrap();
        assert!(mask.is_walkable(15, 15));
        // The doorway pixel itself is not a raw wall and stays walkable
        assert!(mask.is_walkable(5, 14));
        assert!(!mask.is_walkable(0, 0));
    }

    #[test]
    fn test_inflate_margin() {
        let image = room_image(20, 4, 15);
        let config = MaskConfig {
            inflate_px: 2,
            remove_outside: true,
            ..plain()
        };
        let mask = generate(&image, &config).unwrap();

        assert!(!mask.is_walkable(6, 10));
        assert!(mask.is_walkable(7, 10));
        // interior shrinks from 10x10 to 6x6
        assert_eq!(mask.walkable_count(), 36);
    }

    #[test]
    fn test_auto_threshold_used() {
        let image = GrayImage::from_fn(10, 10, |x, _| if x < 3 { Luma([30]) } else { Luma([220]) });
        let config = MaskConfig {
            threshold: 10,
            auto_threshold: true,
            ..plain()
        };
        let report = MaskBuilder::new(config).build(&image).unwrap();

        assert!(report.auto_threshold_used);
        assert!(report.effective_threshold > 30 && report.effective_threshold <= 220);
        assert_eq!(report.mask.walkable_count(), 70);
    }

    #[test]
    fn test_auto_threshold_uniform_falls_back() {
        let image = GrayImage::from_pixel(4, 4, Luma([0]));
        let config = MaskConfig {
            auto_threshold: true,
            ..plain()
        };
        let report = MaskBuilder::new(config).build(&image).unwrap();
        assert!(!report.auto_threshold_used);
        assert_eq!(report.effective_threshold, 128);
        assert_eq!(report.mask.walkable_count(), 0);
    }

    #[test]
    fn test_empty_image_rejected() {
        let image = GrayImage::new(0, 5);
        assert!(matches!(
            generate(&image, &plain()),
            Err(FloorplanError::InvalidSize { .. })
        ));
    }
}
