//! Row-major congestion grid shape and index math.

use std::fmt;

/// Shape of the row-major congestion grid.
///
/// Cell `(x, y)` lives at flat index `y * width + x`, with `x` as the
/// column and `y` as the row. All bounds checks in the workspace go
/// through [`GridDims::contains`] / [`GridDims::index`] so the layout
/// is defined in exactly one place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridDims {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

impl GridDims {
    /// Create grid dimensions.
    ///
    /// Dimension validation (non-zero, cell count fits in memory) is the
    /// buffer configuration's job; this constructor is a plain record.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of cells, `width * height`.
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether `(x, y)` lies inside the grid.
    ///
    /// Takes signed coordinates so host-supplied values can be checked
    /// without a cast on the caller's side; negatives are out of bounds.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as u32) < self.width && y >= 0 && (y as u32) < self.height
    }

    /// Row-major flat index of `(x, y)`.
    ///
    /// Returns `None` when the coordinate is out of bounds.
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.contains(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }
}

impl fmt::Display for GridDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
