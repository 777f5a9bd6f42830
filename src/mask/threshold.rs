//! Luma extraction and threshold selection

use image::{DynamicImage, GenericImageView, GrayImage, Pixel, RgbImage, RgbaImage};
use rayon::prelude::*;

/// Read-only access to per-pixel brightness of a raster image
///
/// This is the seam to whatever renders the floorplan (PDF rasterizer,
/// scanner import, ...). Coordinates are always within `width × height`.
pub trait LumaSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn luma(&self, x: u32, y: u32) -> u8;
}

impl LumaSource for GrayImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    #[inline]
    fn luma(&self, x: u32, y: u32) -> u8 {
        self.get_pixel(x, y).0[0]
    }
}

impl LumaSource for RgbImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    #[inline]
    fn luma(&self, x: u32, y: u32) -> u8 {
        self.get_pixel(x, y).to_luma().0[0]
    }
}

impl LumaSource for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    // Alpha is ignored: scanned plans are opaque
    #[inline]
    fn luma(&self, x: u32, y: u32) -> u8 {
        self.get_pixel(x, y).to_luma().0[0]
    }
}

impl LumaSource for DynamicImage {
    fn width(&self) -> u32 {
        GenericImageView::width(self)
    }

    fn height(&self) -> u32 {
        GenericImageView::height(self)
    }

    #[inline]
    fn luma(&self, x: u32, y: u32) -> u8 {
        self.get_pixel(x, y).to_luma().0[0]
    }
}

/// Copy the source into a row-major luma buffer, one row per rayon task
pub fn luma_buffer<S: LumaSource + Sync + ?Sized>(source: &S) -> Vec<u8> {
    let width = source.width() as usize;
    let height = source.height() as usize;
    let mut buffer = vec![0u8; width * height];
    if width == 0 {
        return buffer;
    }

    buffer
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, value) in row.iter_mut().enumerate() {
                *value = source.luma(x as u32, y as u32);
            }
        });

    buffer
}

/// 256-bin gray-level histogram
pub fn histogram(luma: &[u8]) -> [u64; 256] {
    let mut hist = [0u64; 256];
    for &value in luma {
        hist[value as usize] += 1;
    }
    hist
}

/// Otsu's method: the split maximizing between-class variance
///
/// Returns `t` such that the two classes are `[0, t)` and `[t, 255]`, i.e. a
/// pixel is dark iff `luma < t`. `None` when fewer than two gray levels are
/// populated (no split separates anything).
pub fn otsu_threshold(hist: &[u64; 256]) -> Option<u8> {
    let total: u64 = hist.iter().sum();
    if total == 0 {
        return None;
    }
    let sum_total: f64 = hist
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut weight_dark = 0u64;
    let mut sum_dark = 0f64;
    let mut best: Option<(u8, f64)> = None;

    for t in 1..=255usize {
        weight_dark += hist[t - 1];
        sum_dark += (t - 1) as f64 * hist[t - 1] as f64;

        let weight_light = total - weight_dark;
        if weight_dark == 0 || weight_light == 0 {
            continue;
        }

        let mean_dark = sum_dark / weight_dark as f64;
        let mean_light = (sum_total - sum_dark) / weight_light as f64;
        let diff = mean_dark - mean_light;
        let variance = weight_dark as f64 * weight_light as f64 * diff * diff;

        if best.map_or(true, |(_, v)| variance > v) {
            best = Some((t as u8, variance));
        }
    }

    best.map(|(t, _)| t)
}
