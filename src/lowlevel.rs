//! Low-level building blocks for custom pipelines.
//!
//! These expose the individual stages and both box-sum algorithms. Most users
//! should prefer [`Detector`](crate::Detector) or the `find_corners_*`
//! functions.

pub use crate::filter::{ConvKernel, GAUSSIAN_3X3, SOBEL_X, SOBEL_Y};
pub use crate::kernel::harris_at;
#[cfg(feature = "rayon")]
pub use crate::kernel::rayon::{RayonStages, DEFAULT_MAX_WORKERS};
pub use crate::kernel::scalar::ScalarStages;
pub use crate::kernel::window::{window_sum_direct, window_sum_sliding, MAX_SUM_RADIUS};
pub use crate::kernel::{Stages, HARRIS_K};
