//! Generic dense grid for per-pixel and per-node data

/// Generic 2D grid stored row-major (`index = y * width + x`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T: Clone> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `value`
    pub fn new(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap an existing row-major buffer; `None` if its length does not match
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            Some(&self.data[y * self.width + x])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x < self.width && y < self.height {
            Some(&mut self.data[y * self.width + x])
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = value;
        }
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let mut grid = Grid::new(3, 2, 0u8);
        grid.set(2, 1, 7);
        assert_eq!(grid.as_slice()[grid.index(2, 1)], 7);
        assert_eq!(grid.index(2, 1), 5);
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut grid = Grid::new(2, 2, false);
        grid.set(5, 0, true);
        assert!(grid.get(5, 0).is_none());
        assert!(grid.as_slice().iter().all(|v| !v));
        assert!(!grid.in_bounds(-1, 0));
        assert!(grid.in_bounds(1, 1));
    }

    #[test]
    fn test_from_vec_length_checked() {
        assert!(Grid::from_vec(2, 2, vec![1, 2, 3]).is_none());
        assert!(Grid::from_vec(2, 2, vec![1, 2, 3, 4]).is_some());
    }
}
