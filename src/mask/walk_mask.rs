//! Dense walkability grid, the ground truth for anchors and routing
//!
//! Out-of-range access never fails: reads report "blocked" and writes are
//! dropped, so geometry code can probe neighbours without bounds checks.

use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

use crate::core::error::{FloorplanError, Result};
use crate::spatial::Grid;

/// Overlay tint for walkable pixels (RGB)
pub const WALKABLE_TINT: [u8; 3] = [0x00, 0xCC, 0x00];
/// Overlay tint for blocked pixels (RGB)
pub const BLOCKED_TINT: [u8; 3] = [0xCC, 0x00, 0x00];

/// Binary walkability mask over image pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkMask {
    cells: Grid<bool>,
}

impl WalkMask {
    /// Create an all-blocked mask
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, false)
    }

    /// Create a mask with every cell set to `walkable`
    pub fn filled(width: u32, height: u32, walkable: bool) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FloorplanError::InvalidSize { width, height });
        }
        Ok(Self {
            cells: Grid::new(width as usize, height as usize, walkable),
        })
    }

    /// Build from a row-major cell buffer (crate-internal, sizes already checked)
    pub(crate) fn from_cells(width: u32, height: u32, cells: Vec<bool>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FloorplanError::InvalidSize { width, height });
        }
        let cells = Grid::from_vec(width as usize, height as usize, cells)
            .ok_or(FloorplanError::InvalidSize { width, height })?;
        Ok(Self { cells })
    }

    pub fn width(&self) -> u32 {
        self.cells.width as u32
    }

    pub fn height(&self) -> u32 {
        self.cells.height as u32
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.cells.in_bounds(x as i64, y as i64)
    }

    /// Walkability at `(x, y)`; false outside the mask
    #[inline]
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.cells.as_slice()[self.cells.index(x as usize, y as usize)]
    }

    /// Set walkability at `(x, y)`; ignored outside the mask
    #[inline]
    pub fn set_walkable(&mut self, x: i32, y: i32, walkable: bool) {
        if !self.in_bounds(x, y) {
            return;
        }
        self.cells.set(x as usize, y as usize, walkable);
    }

    pub fn fill(&mut self, walkable: bool) {
        self.cells.fill(walkable);
    }

    pub fn walkable_count(&self) -> usize {
        self.cells.as_slice().iter().filter(|&&w| w).count()
    }

    /// Row-major view of the cells
    pub fn cells(&self) -> &[bool] {
        self.cells.as_slice()
    }

    /// Semi-transparent visualization: walkable green, blocked red
    pub fn to_overlay_image(&self, alpha: u8) -> RgbaImage {
        let walk = Rgba([WALKABLE_TINT[0], WALKABLE_TINT[1], WALKABLE_TINT[2], alpha]);
        let block = Rgba([BLOCKED_TINT[0], BLOCKED_TINT[1], BLOCKED_TINT[2], alpha]);
        let width = self.cells.width;

        RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            if self.cells.as_slice()[y as usize * width + x as usize] {
                walk
            } else {
                block
            }
        })
    }

    /// Lossless persistence image: white = walkable, black = blocked
    pub fn to_binary_image(&self) -> GrayImage {
        let width = self.cells.width;
        GrayImage::from_fn(self.width(), self.height(), |x, y| {
            if self.cells.as_slice()[y as usize * width + x as usize] {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    /// Load from a binary image; any non-black pixel is walkable
    pub fn from_binary_image(image: &DynamicImage) -> Result<Self> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        let cells = rgb.pixels().map(|p| p.0 != [0, 0, 0]).collect();
        Self::from_cells(width, height, cells)
    }
}
