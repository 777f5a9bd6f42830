//! Closed integer polygons drawn over the floorplan image

use geo::{Area, LineString};
use serde::{Deserialize, Serialize};

use crate::core::types::{PixelPoint, PixelRect};

/// Minimum vertex count for a usable polygon
pub const MIN_VERTICES: usize = 3;

/// Closed polygon in image pixel coordinates
///
/// The closing edge (last vertex back to the first) is implicit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    vertices: Vec<PixelPoint>,
}

impl Polygon {
    pub fn new(vertices: Vec<PixelPoint>) -> Self {
        Self { vertices }
    }

    /// Axis-aligned rectangle polygon with corners at `(x, y)` and `(x + w, y + h)`
    ///
    /// The far corner saturates at the `i32` range.
    pub fn rect(x: i32, y: i32, w: i32, h: i32) -> Self {
        let (x1, y1) = (x.saturating_add(w), y.saturating_add(h));
        Self::new(vec![
            PixelPoint::new(x, y),
            PixelPoint::new(x1, y),
            PixelPoint::new(x1, y1),
            PixelPoint::new(x, y1),
        ])
    }

    pub fn vertices(&self) -> &[PixelPoint] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Has enough vertices to enclose an area
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= MIN_VERTICES
    }

    /// Absolute area in square pixels (shoelace formula)
    ///
    /// Degenerate polygons (fewer than three vertices, collinear points)
    /// report 0.0 rather than failing.
    pub fn area(&self) -> f64 {
        if !self.is_valid() {
            return 0.0;
        }
        self.to_geo().unsigned_area()
    }

    /// Bounding rectangle; width and height are `max - min` so a single
    /// vertical or horizontal line yields an empty rectangle
    pub fn bounds(&self) -> PixelRect {
        let Some(first) = self.vertices.first() else {
            return PixelRect::default();
        };

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.vertices[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let (min_x, min_y) = (min_x as i64, min_y as i64);
        PixelRect::new(min_x, min_y, max_x as i64 - min_x, max_y as i64 - min_y)
    }

    /// Even-odd containment test using ray casting
    ///
    /// Casts a ray from the point to the right and counts edge crossings.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        if !self.is_valid() {
            return false;
        }

        let mut inside = false;
        let n = self.vertices.len();

        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = (self.vertices[i].x as f64, self.vertices[i].y as f64);
            let (xj, yj) = (self.vertices[j].x as f64, self.vertices[j].y as f64);

            if ((yi > py) != (yj > py)) && (px < (xj - xi) * (py - yi) / (yj - yi) + xi) {
                inside = !inside;
            }

            j = i;
        }

        inside
    }

    /// Whether the center of pixel `(x, y)` lies inside the polygon
    #[inline]
    pub fn contains_pixel(&self, x: i32, y: i32) -> bool {
        self.contains(x as f64 + 0.5, y as f64 + 0.5)
    }

    fn to_geo(&self) -> geo::Polygon<f64> {
        let coords: Vec<(f64, f64)> = self
            .vertices
            .iter()
            .map(|p| (p.x as f64, p.y as f64))
            .collect();
        // geo closes the exterior ring itself
        geo::Polygon::new(LineString::from(coords), vec![])
    }
}

impl From<Vec<(i32, i32)>> for Polygon {
    fn from(points: Vec<(i32, i32)>) -> Self {
        Self::new(points.into_iter().map(PixelPoint::from).collect())
    }
}
