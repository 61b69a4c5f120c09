//! Box-filter summation of moment buffers.
//!
//! Two algorithms produce identical output:
//!
//! - [`window_sum_direct`] recomputes every `(2r+1)^2` square, `O(r^2)` per
//!   pixel. It is the reference.
//! - [`window_sum_sliding`] walks each column top to bottom, keeping a FIFO of
//!   the last `2r+1` horizontal row sums. Each step adds the newest row sum
//!   and drops the oldest, so the per-pixel cost is `O(r)`.
//!
//! Positions within `radius` of an edge are zero in both outputs.

use crate::kernel::check_grid;
use std::collections::VecDeque;
use std::ops::Range;

/// Largest summation radius whose sums of `u8 * u8` products fit in `i32`.
pub const MAX_SUM_RADIUS: usize = 90;

/// Interior rows for a buffer of `height` rows and the given radius.
#[inline]
pub(crate) fn interior_rows(height: usize, radius: usize) -> Range<usize> {
    radius..height.saturating_sub(radius).max(radius)
}

/// Reference box sum: direct accumulation over each square.
///
/// # Panics
///
/// Panics if `stride` is zero or does not divide `values.len()`.
pub fn window_sum_direct(values: &[i32], stride: usize, radius: usize) -> Vec<i32> {
    check_grid(values.len(), stride);
    let height = values.len() / stride;
    let mut out = vec![0i32; values.len()];

    for y in interior_rows(height, radius) {
        for x in radius..stride.saturating_sub(radius) {
            let mut sum = 0i32;
            for yy in y - radius..=y + radius {
                let row = &values[yy * stride..(yy + 1) * stride];
                sum += row[x - radius..=x + radius].iter().sum::<i32>();
            }
            out[y * stride + x] = sum;
        }
    }
    out
}

/// Sliding-window box sum, bit-identical to [`window_sum_direct`].
///
/// # Panics
///
/// Panics if `stride` is zero or does not divide `values.len()`.
pub fn window_sum_sliding(values: &[i32], stride: usize, radius: usize) -> Vec<i32> {
    check_grid(values.len(), stride);
    let height = values.len() / stride;
    let mut out = vec![0i32; values.len()];

    let rows = interior_rows(height, radius);
    if rows.is_empty() {
        return out;
    }
    let band = &mut out[rows.start * stride..rows.end * stride];
    sliding_sum_band(values, stride, radius, rows, band);
    out
}

/// Sum of the `2 * radius + 1` horizontal neighbours centered on `center`.
#[inline]
fn row_sum(values: &[i32], center: usize, radius: usize) -> i32 {
    values[center - radius..=center + radius].iter().sum()
}

/// Runs the column FIFO over the output rows in `rows`.
///
/// `out_band` holds exactly the rows in `rows`. The FIFO for each column is
/// seeded from the `2 * radius` rows above `rows.start`, so independent bands
/// can be processed concurrently.
pub(crate) fn sliding_sum_band(
    values: &[i32],
    stride: usize,
    radius: usize,
    rows: Range<usize>,
    out_band: &mut [i32],
) {
    debug_assert_eq!(out_band.len(), rows.len() * stride);
    let window = 2 * radius + 1;
    let mut fifo: VecDeque<i32> = VecDeque::with_capacity(window);

    for x in radius..stride.saturating_sub(radius) {
        fifo.clear();
        let mut acc = 0i32;
        for y in rows.start - radius..rows.start + radius {
            let sum = row_sum(values, y * stride + x, radius);
            fifo.push_back(sum);
            acc += sum;
        }

        for y in rows.clone() {
            let newest = row_sum(values, (y + radius) * stride + x, radius);
            fifo.push_back(newest);
            acc += newest;
            out_band[(y - rows.start) * stride + x] = acc;
            if let Some(oldest) = fifo.pop_front() {
                acc -= oldest;
            }
        }
    }
}
