//! Grayscale raster views and owned buffers.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer. The detector does not
//! model row padding, so a valid view always has `stride == width` and a
//! buffer of exactly `stride * height` samples. `OwnedImage` is the owned
//! counterpart returned by the convolution stage.

use crate::util::{HarrisError, HarrisResult};

#[cfg(feature = "image-io")]
pub mod io;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> HarrisResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    ///
    /// The stride must equal the width and the buffer must hold exactly
    /// `stride * height` samples.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> HarrisResult<Self> {
        let expected = required_len(width, height, stride)?;
        if data.len() != expected {
            return Err(HarrisError::SizeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }
}

/// Owned contiguous grayscale image buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Creates an owned image from a contiguous grayscale buffer.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> HarrisResult<Self> {
        let expected = required_len(width, height, width)?;
        if data.len() != expected {
            return Err(HarrisError::SizeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Wraps a buffer whose length is already known to be `width * height`.
    pub(crate) fn from_parts(data: Vec<u8>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            data,
            width,
            height,
        }
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the samples in row-major order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image and returns its samples.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> HarrisResult<usize> {
    if width == 0 || height == 0 {
        return Err(HarrisError::InvalidDimensions { width, height });
    }
    if stride != width {
        return Err(HarrisError::InvalidStride { width, stride });
    }
    stride
        .checked_mul(height)
        .ok_or(HarrisError::InvalidDimensions { width, height })
}
