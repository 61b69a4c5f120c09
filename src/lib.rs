//! Harris corner detection with interchangeable sequential and parallel
//! backends.
//!
//! The pipeline smooths a grayscale raster, takes clamped Sobel gradients,
//! sums the gradient moments over a square window, scores each pixel with
//! the Harris response, keeps one maximum per suppression tile and returns
//! the positions above a threshold. Both backends produce identical buffers
//! at every stage; the parallel one (feature `rayon`, on by default) splits
//! each stage across a worker pool and uses a sliding-window box sum.

pub mod corner;
pub mod detect;
pub mod filter;
pub mod image;
pub mod kernel;
pub mod lowlevel;
mod trace;
pub mod util;

pub use corner::Corner;
#[cfg(feature = "rayon")]
pub use detect::find_corners_parallel;
pub use detect::{find_corners_sequential, DetectConfig, Detector, Intermediates};
pub use filter::ConvKernel;
#[cfg(feature = "image-io")]
pub use image::io;
pub use image::{ImageView, OwnedImage};
pub use util::{HarrisError, HarrisResult};
