//! Corner coordinates and flat-index encoding.

/// Integer pixel coordinate of a detected corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Corner {
    /// X coordinate (column).
    pub x: usize,
    /// Y coordinate (row).
    pub y: usize,
}

impl Corner {
    /// Creates a corner at `(x, y)`.
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Decodes a flat buffer index for a buffer with the given stride.
    ///
    /// For a fixed stride this is the inverse of [`Corner::index`], so distinct
    /// indices never map to the same corner.
    #[inline]
    pub fn from_index(index: usize, stride: usize) -> Self {
        Self {
            x: index % stride,
            y: index / stride,
        }
    }

    /// Encodes the corner as a flat buffer index.
    #[inline]
    pub fn index(&self, stride: usize) -> usize {
        self.y * stride + self.x
    }
}

#[cfg(test)]
mod tests {
    use super::Corner;

    #[test]
    fn index_round_trips_for_every_position() {
        let stride = 7;
        for index in 0..stride * 5 {
            let corner = Corner::from_index(index, stride);
            assert!(corner.x < stride);
            assert_eq!(corner.index(stride), index);
        }
    }

    #[test]
    fn decodes_row_and_column() {
        assert_eq!(Corner::from_index(5, 3), Corner::new(2, 1));
        assert_eq!(Corner::from_index(0, 3), Corner::new(0, 0));
    }
}
