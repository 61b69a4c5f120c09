//! Rayon-parallel backend (feature-gated).
//!
//! Every stage runs inside a dedicated thread pool, so each call is a full
//! barrier: it returns only after all of its tasks have finished. Tasks write
//! to disjoint output ranges obtained with `par_chunks_mut`, so no locking is
//! needed. The only merge step is the final corner collection, where each
//! task returns its own batch and the batches are folded into one set.

use crate::corner::Corner;
use crate::filter::ConvKernel;
use crate::image::{ImageView, OwnedImage};
use crate::kernel::window::{interior_rows, sliding_sum_band};
use crate::kernel::{
    check_grid, collect_corners, convolve_row, harris_at, product, suppress_tile_rows,
    tile_count, Stages,
};
use crate::util::{HarrisError, HarrisResult};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::collections::HashSet;

/// Default cap on the number of tasks a stage is split into.
pub const DEFAULT_MAX_WORKERS: usize = 64;

/// Multi-threaded stage implementations.
///
/// Windowed sums use the sliding-window algorithm. Stages with coarse work
/// units (suppression tile rows, summation row bands, collector chunks) are
/// split into `min(max_workers, units)` tasks.
pub struct RayonStages {
    pool: ThreadPool,
    max_workers: usize,
}

impl RayonStages {
    /// Builds a backend whose pool has `min(max_workers, available cores)`
    /// threads.
    pub fn new(max_workers: usize) -> HarrisResult<Self> {
        if max_workers == 0 {
            return Err(HarrisError::InvalidWorkerCount);
        }
        let cores = std::thread::available_parallelism().map_or(1, |n| n.get());
        let pool = ThreadPoolBuilder::new()
            .num_threads(max_workers.min(cores))
            .thread_name(|idx| format!("harris-worker-{idx}"))
            .build()
            .map_err(|err| HarrisError::ThreadPool {
                reason: err.to_string(),
            })?;
        Ok(Self { pool, max_workers })
    }

    /// Returns the configured task cap.
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Returns the number of threads in the pool.
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Task count for `units` independent work units.
    pub fn task_count(&self, units: usize) -> usize {
        self.max_workers.min(units).max(1)
    }
}

impl std::fmt::Debug for RayonStages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RayonStages")
            .field("max_workers", &self.max_workers)
            .field("num_threads", &self.num_threads())
            .finish()
    }
}

impl Stages for RayonStages {
    fn convolve(&self, image: ImageView<'_, u8>, kernel: &ConvKernel) -> OwnedImage {
        let width = image.width();
        let height = image.height();
        let src = image.as_slice();
        let mut out = vec![0u8; src.len()];
        self.pool.install(|| {
            out.par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| convolve_row(src, width, height, y, kernel, row));
        });
        OwnedImage::from_parts(out, width, height)
    }

    fn multiply(&self, a: &[u8], b: &[u8]) -> Vec<i32> {
        assert_eq!(a.len(), b.len(), "gradient buffers differ in length");
        self.pool.install(|| {
            a.par_iter()
                .zip(b.par_iter())
                .map(|(&x, &y)| product(x, y))
                .collect()
        })
    }

    fn window_sum(&self, moments: &[i32], stride: usize, radius: usize) -> Vec<i32> {
        check_grid(moments.len(), stride);
        let height = moments.len() / stride;
        let mut out = vec![0i32; moments.len()];

        let rows = interior_rows(height, radius);
        if rows.is_empty() {
            return out;
        }
        let tasks = self.task_count(rows.len());
        let band_rows = rows.len().div_ceil(tasks);
        let first = rows.start;
        let last = rows.end;

        self.pool.install(|| {
            out[first * stride..last * stride]
                .par_chunks_mut(band_rows * stride)
                .enumerate()
                .for_each(|(band_idx, band)| {
                    let y0 = first + band_idx * band_rows;
                    let y1 = y0 + band.len() / stride;
                    sliding_sum_band(moments, stride, radius, y0..y1, band);
                });
        });
        out
    }

    fn harris_response(&self, sxx: &[i32], syy: &[i32], sxy: &[i32]) -> Vec<f64> {
        assert!(
            sxx.len() == syy.len() && sxx.len() == sxy.len(),
            "moment buffers differ in length"
        );
        self.pool.install(|| {
            sxx.par_iter()
                .zip(syy.par_iter())
                .zip(sxy.par_iter())
                .map(|((&a, &b), &c)| harris_at(a, b, c))
                .collect()
        })
    }

    fn suppress(&self, response: &[f64], stride: usize, size: usize) -> Vec<f64> {
        check_grid(response.len(), stride);
        assert!(size % 2 == 1, "suppression window must be odd");
        let mut out = vec![0.0f64; response.len()];

        let tile_rows = tile_count(response.len() / stride, size);
        if tile_rows == 0 {
            return out;
        }
        let tasks = self.task_count(tile_rows);
        let rows_per_task = tile_rows.div_ceil(tasks);
        let band_len = rows_per_task * size * stride;

        self.pool.install(|| {
            out[..tile_rows * size * stride]
                .par_chunks_mut(band_len)
                .enumerate()
                .for_each(|(task, band)| {
                    let start = task * rows_per_task;
                    let end = (start + rows_per_task).min(tile_rows);
                    suppress_tile_rows(response, stride, size, start..end, band);
                });
        });
        out
    }

    fn threshold(
        &self,
        map: &[f64],
        stride: usize,
        border: usize,
        threshold: f64,
    ) -> HashSet<Corner> {
        check_grid(map.len(), stride);
        if map.is_empty() {
            return HashSet::new();
        }
        let tasks = self.task_count(map.len());
        let chunk = map.len().div_ceil(tasks);

        let batches: Vec<Vec<Corner>> = self.pool.install(|| {
            (0..tasks)
                .into_par_iter()
                .map(|task| {
                    let start = (task * chunk).min(map.len());
                    let end = (start + chunk).min(map.len());
                    collect_corners(map, stride, border, threshold, start..end)
                })
                .collect()
        });

        // Merge the per-task batches
        let mut corners = HashSet::with_capacity(batches.iter().map(Vec::len).sum());
        for batch in batches {
            corners.extend(batch);
        }
        corners
    }
}
