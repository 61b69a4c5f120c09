//! Stage backends for the Harris pipeline.
//!
//! [`Stages`] is the seam between the pipeline orchestrator and a compute
//! backend. [`scalar::ScalarStages`] is the single-threaded reference and
//! [`rayon::RayonStages`] the multi-threaded variant. Per-pixel arithmetic
//! lives in this module and is shared by both so their outputs match bit for
//! bit; the backends only differ in how they split the index space.

use crate::corner::Corner;
use crate::filter::ConvKernel;
use crate::image::{ImageView, OwnedImage};
use std::collections::HashSet;
use std::ops::Range;

/// Harris sensitivity constant.
pub const HARRIS_K: f64 = 0.04;

/// One implementation of every pipeline stage.
///
/// All buffers are row-major with `stride == width`. Stage methods panic if
/// handed buffers whose lengths disagree; the pipeline validates inputs
/// before the first stage runs, so a panic indicates a defect.
pub trait Stages {
    /// Convolves `image` with `kernel`, leaving a border of `kernel.radius()`
    /// pixels at zero.
    fn convolve(&self, image: ImageView<'_, u8>, kernel: &ConvKernel) -> OwnedImage;

    /// Elementwise product of two gradient buffers.
    fn multiply(&self, a: &[u8], b: &[u8]) -> Vec<i32>;

    /// Sums each `(2 * radius + 1)^2` neighborhood; border positions are zero.
    fn window_sum(&self, moments: &[i32], stride: usize, radius: usize) -> Vec<i32>;

    /// Computes the Harris response from summed moments.
    fn harris_response(&self, sxx: &[i32], syy: &[i32], sxy: &[i32]) -> Vec<f64>;

    /// Keeps only the maximum of each full `size x size` tile.
    fn suppress(&self, response: &[f64], stride: usize, size: usize) -> Vec<f64>;

    /// Collects positions at least `border` away from every edge whose value
    /// is `>= threshold`.
    fn threshold(
        &self,
        map: &[f64],
        stride: usize,
        border: usize,
        threshold: f64,
    ) -> HashSet<Corner>;
}

/// Harris response for one pixel.
///
/// The determinant is evaluated in `i64` so large window sums cannot
/// overflow.
#[inline]
pub fn harris_at(sxx: i32, syy: i32, sxy: i32) -> f64 {
    let det = i64::from(sxx) * i64::from(syy) - i64::from(sxy) * i64::from(sxy);
    let trace = f64::from(sxx) + f64::from(syy);
    det as f64 - HARRIS_K * trace * trace
}

/// Convolves row `y` of `src` into `out_row`.
///
/// Rows and columns inside the border band are left untouched.
pub(crate) fn convolve_row(
    src: &[u8],
    width: usize,
    height: usize,
    y: usize,
    kernel: &ConvKernel,
    out_row: &mut [u8],
) {
    let radius = kernel.radius();
    let size = kernel.size();
    if y < radius || y + radius >= height {
        return;
    }
    let coeffs = kernel.coeffs();
    let weight = kernel.weight();

    for x in radius..width.saturating_sub(radius) {
        let mut sum = 0i32;
        for (ky, kernel_row) in coeffs.chunks_exact(size).enumerate() {
            let start = (y + ky - radius) * width + x - radius;
            let src_row = &src[start..start + size];
            for (&value, &coeff) in src_row.iter().zip(kernel_row) {
                sum += i32::from(value) * coeff;
            }
        }
        // Integer division truncates toward zero before clamping.
        out_row[x] = (sum / weight).clamp(0, 255) as u8;
    }
}

#[inline]
pub(crate) fn product(a: u8, b: u8) -> i32 {
    i32::from(a) * i32::from(b)
}

/// Number of complete suppression tiles along an axis of length `len`.
#[inline]
pub(crate) fn tile_count(len: usize, size: usize) -> usize {
    len / size
}

/// Suppresses the tile rows in `tile_rows`.
///
/// `out_band` must start at image row `tile_rows.start * size`. Each tile
/// keeps its maximum, scanning row-major from the tile's top-left corner; the
/// first of several equal maxima wins.
pub(crate) fn suppress_tile_rows(
    response: &[f64],
    stride: usize,
    size: usize,
    tile_rows: Range<usize>,
    out_band: &mut [f64],
) {
    let band_origin = tile_rows.start * size * stride;
    let tile_cols = tile_count(stride, size);

    for tile_row in tile_rows {
        let y0 = tile_row * size;
        for tile_col in 0..tile_cols {
            let x0 = tile_col * size;
            let mut best = y0 * stride + x0;
            for dy in 0..size {
                let row_start = (y0 + dy) * stride + x0;
                for idx in row_start..row_start + size {
                    if response[idx] > response[best] {
                        best = idx;
                    }
                }
            }
            out_band[best - band_origin] = response[best];
        }
    }
}

/// Collects corners in the flat index range `range`.
pub(crate) fn collect_corners(
    map: &[f64],
    stride: usize,
    border: usize,
    threshold: f64,
    range: Range<usize>,
) -> Vec<Corner> {
    let height = map.len() / stride;
    let mut corners = Vec::new();
    for idx in range {
        if map[idx] < threshold {
            continue;
        }
        let corner = Corner::from_index(idx, stride);
        let inside = corner.x >= border
            && corner.y >= border
            && corner.x + border < stride
            && corner.y + border < height;
        if inside {
            corners.push(corner);
        }
    }
    corners
}

pub(crate) fn check_grid(len: usize, stride: usize) {
    assert!(stride > 0, "stride must be positive");
    assert_eq!(len % stride, 0, "buffer length must be a multiple of stride");
}

pub mod scalar;
pub mod window;

#[cfg(feature = "rayon")]
pub mod rayon;
