//! Array shapes.

use std::fmt;

/// Shape (`rows x cols x channels`) of an image-like sample array.
///
/// Displayed as a tuple, e.g. `(128, 2048, 4)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: usize,
    cols: usize,
    channels: usize,
}

impl Shape {
    /// Creates a new [`Shape`] of `rows x cols x channels`.
    pub fn new(rows: usize, cols: usize, channels: usize) -> Self {
        Self {
            rows,
            cols,
            channels,
        }
    }

    /// Returns the number of rows (the image height).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns (the image width).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn num_samples(&self) -> usize {
        self.rows * self.cols * self.channels
    }

    /// Returns the shape as an `ndarray` dimension pattern.
    #[inline]
    pub fn dim(&self) -> (usize, usize, usize) {
        (self.rows, self.cols, self.channels)
    }
}

impl From<(usize, usize, usize)> for Shape {
    fn from((rows, cols, channels): (usize, usize, usize)) -> Self {
        Self::new(rows, cols, channels)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.rows, self.cols, self.channels)
    }
}
