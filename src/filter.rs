//! Integer convolution kernels.
//!
//! A [`ConvKernel`] is a square, odd-sized grid of `i32` coefficients plus a
//! positive divisor applied after accumulation. The fixed kernels used by the
//! detector are exposed as constants.

use crate::util::{HarrisError, HarrisResult};

/// Square integer kernel with a normalizing divisor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvKernel {
    coeffs: Vec<i32>,
    size: usize,
    weight: i32,
}

impl ConvKernel {
    /// Creates a kernel from row-major coefficients.
    ///
    /// `size` must be odd and `coeffs.len() == size * size`; `weight` must be
    /// strictly positive.
    pub fn new(coeffs: Vec<i32>, size: usize, weight: i32) -> HarrisResult<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(HarrisError::InvalidKernel {
                reason: "size must be a positive odd integer",
            });
        }
        if size.checked_mul(size) != Some(coeffs.len()) {
            return Err(HarrisError::InvalidKernel {
                reason: "coefficient count must equal size * size",
            });
        }
        if weight <= 0 {
            return Err(HarrisError::InvalidKernel {
                reason: "weight must be positive",
            });
        }
        Ok(Self {
            coeffs,
            size,
            weight,
        })
    }

    /// Creates a 3x3 kernel from a fixed array.
    pub fn from_3x3(rows: [[i32; 3]; 3], weight: i32) -> HarrisResult<Self> {
        let coeffs = rows.iter().flatten().copied().collect();
        Self::new(coeffs, 3, weight)
    }

    /// 3x3 binomial smoothing kernel, normalized by 16.
    pub fn gaussian_3x3() -> Self {
        Self::fixed(&GAUSSIAN_3X3, 16)
    }

    /// 3x3 horizontal gradient kernel.
    pub fn sobel_x() -> Self {
        Self::fixed(&SOBEL_X, 1)
    }

    /// 3x3 vertical gradient kernel.
    pub fn sobel_y() -> Self {
        Self::fixed(&SOBEL_Y, 1)
    }

    fn fixed(rows: &[[i32; 3]; 3], weight: i32) -> Self {
        Self {
            coeffs: rows.iter().flatten().copied().collect(),
            size: 3,
            weight,
        }
    }

    /// Returns the side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `(size - 1) / 2`.
    pub fn radius(&self) -> usize {
        (self.size - 1) / 2
    }

    /// Returns the divisor applied after accumulation.
    pub fn weight(&self) -> i32 {
        self.weight
    }

    /// Returns the coefficients in row-major order.
    pub fn coeffs(&self) -> &[i32] {
        &self.coeffs
    }
}

/// Binomial smoothing coefficients (divisor 16).
pub const GAUSSIAN_3X3: [[i32; 3]; 3] = [[1, 2, 1], [2, 4, 2], [1, 2, 1]];

/// Horizontal gradient coefficients (divisor 1).
pub const SOBEL_X: [[i32; 3]; 3] = [[1, 0, -1], [2, 0, -2], [1, 0, -1]];

/// Vertical gradient coefficients (divisor 1).
pub const SOBEL_Y: [[i32; 3]; 3] = [[1, 2, 1], [0, 0, 0], [-1, -2, -1]];
