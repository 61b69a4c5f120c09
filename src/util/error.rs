//! Error types for harris-corners.

use thiserror::Error;

/// Result alias for harris-corners operations.
pub type HarrisResult<T> = std::result::Result<T, HarrisError>;

/// Errors that can occur when configuring or running the detector.
///
/// Every variant describes a configuration problem that is detected before
/// any pipeline stage runs.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum HarrisError {
    /// Width or height is zero.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row padding is not supported, so the stride must equal the width.
    #[error("invalid stride {stride} for width {width}: stride must equal width")]
    InvalidStride { width: usize, stride: usize },
    /// The sample buffer does not hold exactly `stride * height` samples.
    #[error("buffer size mismatch: expected {expected} samples, got {got}")]
    SizeMismatch { expected: usize, got: usize },
    /// The suppression window is zero or even.
    #[error("invalid suppression window size {size}: must be a positive odd integer")]
    InvalidWindowSize { size: usize },
    /// A convolution kernel is malformed.
    #[error("invalid kernel: {reason}")]
    InvalidKernel { reason: &'static str },
    /// The threshold is NaN or infinite.
    #[error("invalid threshold {value}: must be finite")]
    InvalidThreshold { value: f64 },
    /// The moment summation radius is zero or too large for `i32` sums.
    #[error("invalid summation radius {radius}: must be in 1..={max}")]
    InvalidSumRadius { radius: usize, max: usize },
    /// The worker cap is zero.
    #[error("invalid worker count: must be at least 1")]
    InvalidWorkerCount,
    /// A code path was requested whose cargo feature is disabled.
    #[error("feature `{feature}` is not enabled")]
    FeatureDisabled { feature: &'static str },
    /// The worker pool could not be created.
    #[error("failed to build worker pool: {reason}")]
    ThreadPool { reason: String },
    /// Image loading or saving failed.
    #[cfg(feature = "image-io")]
    #[error("image io: {reason}")]
    ImageIo { reason: String },
}
