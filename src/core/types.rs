//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Integer pixel coordinate in image space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(i32, i32)> for PixelPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for PixelPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned pixel rectangle, `width`/`height` may be zero for degenerate shapes
///
/// Extents are `i64` so the span between any two `i32` coordinates fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl PixelRect {
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub const fn right(&self) -> i64 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> i64 {
        self.y + self.height
    }

    /// Number of pixels covered (0 for degenerate rectangles)
    pub fn area(&self) -> u64 {
        if self.width <= 0 || self.height <= 0 {
            return 0;
        }
        (self.width as u64).saturating_mul(self.height as u64)
    }

    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = PixelPoint::new(0, 0);
        let b = PixelPoint::new(3, 4);
        assert_eq!(a.distance(&b), 5.0);
    }

    #[test]
    fn test_degenerate_rect_is_empty() {
        assert!(PixelRect::new(5, 5, 0, 10).is_empty());
        assert!(PixelRect::new(5, 5, -2, 10).is_empty());
        assert_eq!(PixelRect::new(0, 0, 4, 3).area(), 12);
    }

    #[test]
    fn test_full_i32_span_fits() {
        let span = i32::MAX as i64 - i32::MIN as i64;
        let rect = PixelRect::new(i32::MIN as i64, i32::MIN as i64, span, span);
        assert_eq!(rect.right(), i32::MAX as i64);
        assert_eq!(rect.area(), (span as u64) * (span as u64));
    }
}
