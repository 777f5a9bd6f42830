//! Manual mask edits: brush strokes and polygon fills

use crate::core::types::PixelPoint;
use crate::mask::WalkMask;
use crate::spatial::Polygon;

impl WalkMask {
    /// Paint a filled disc of `radius` pixels centered on `center`
    ///
    /// Radius 0 paints the center pixel only. Parts of the disc outside the
    /// mask are clipped.
    pub fn paint_disc(&mut self, center: PixelPoint, radius: u32, walkable: bool) {
        let r = radius as i64;
        let r2 = r * r;
        let (cx, cy) = (center.x as i64, center.y as i64);

        let y0 = (cy - r).max(0);
        let y1 = (cy + r).min(self.height() as i64 - 1);
        let x0 = (cx - r).max(0);
        let x1 = (cx + r).min(self.width() as i64 - 1);

        for y in y0..=y1 {
            let dy = y - cy;
            for x in x0..=x1 {
                let dx = x - cx;
                if dx * dx + dy * dy <= r2 {
                    self.set_walkable(x as i32, y as i32, walkable);
                }
            }
        }
    }

    /// Set every pixel whose center lies inside `polygon`
    ///
    /// Returns the number of pixels touched. Invalid polygons touch nothing.
    pub fn fill_polygon(&mut self, polygon: &Polygon, walkable: bool) -> usize {
        if !polygon.is_valid() {
            return 0;
        }
        let bounds = polygon.bounds();
        let x0 = bounds.x.max(0);
        let y0 = bounds.y.max(0);
        let x1 = bounds.right().min(self.width() as i64 - 1);
        let y1 = bounds.bottom().min(self.height() as i64 - 1);

        let mut touched = 0;
        for y in y0..=y1 {
            let y = y as i32;
            for x in x0..=x1 {
                let x = x as i32;
                if polygon.contains_pixel(x, y) {
                    self.set_walkable(x, y, walkable);
                    touched += 1;
                }
            }
        }
        touched
    }
}
