//! Harris corner detection entry points.
//!
//! [`Detector`] validates a [`DetectConfig`] once and then runs the pipeline
//! on the selected backend. [`find_corners_sequential`] and
//! [`find_corners_parallel`] are one-shot wrappers with identical signatures
//! so callers can swap or benchmark them against each other.

pub(crate) mod pipeline;

pub use pipeline::Intermediates;

use crate::corner::Corner;
use crate::image::ImageView;
#[cfg(feature = "rayon")]
use crate::kernel::rayon::{RayonStages, DEFAULT_MAX_WORKERS};
use crate::kernel::scalar::ScalarStages;
use crate::kernel::window::MAX_SUM_RADIUS;
use crate::kernel::Stages;
use crate::util::{HarrisError, HarrisResult};
use pipeline::PipelineParams;
use std::collections::HashSet;

#[cfg(not(feature = "rayon"))]
const DEFAULT_MAX_WORKERS: usize = 64;

/// Detector configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectConfig {
    /// Minimum suppressed response for a position to be reported.
    pub threshold: f64,
    /// Side length of the suppression tiles; must be odd.
    pub suppression_window: usize,
    /// Radius of the moment summation window.
    pub sum_radius: usize,
    /// Runs the multi-threaded backend when true.
    pub parallel: bool,
    /// Upper bound on tasks per stage for the parallel backend.
    pub max_workers: usize,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            threshold: 20_000.0,
            suppression_window: 11,
            sum_radius: 1,
            parallel: false,
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }
}

impl DetectConfig {
    /// Checks every parameter before a pipeline is built.
    pub fn validate(&self) -> HarrisResult<()> {
        if !self.threshold.is_finite() {
            return Err(HarrisError::InvalidThreshold {
                value: self.threshold,
            });
        }
        if self.suppression_window == 0 || self.suppression_window % 2 == 0 {
            return Err(HarrisError::InvalidWindowSize {
                size: self.suppression_window,
            });
        }
        if self.sum_radius == 0 || self.sum_radius > MAX_SUM_RADIUS {
            return Err(HarrisError::InvalidSumRadius {
                radius: self.sum_radius,
                max: MAX_SUM_RADIUS,
            });
        }
        if self.max_workers == 0 {
            return Err(HarrisError::InvalidWorkerCount);
        }
        Ok(())
    }

    fn params(&self) -> PipelineParams {
        PipelineParams {
            threshold: self.threshold,
            suppression_window: self.suppression_window,
            sum_radius: self.sum_radius,
        }
    }
}

#[derive(Debug)]
enum Backend {
    Scalar(ScalarStages),
    #[cfg(feature = "rayon")]
    Rayon(RayonStages),
}

/// Harris corner detector bound to one backend.
#[derive(Debug)]
pub struct Detector {
    cfg: DetectConfig,
    backend: Backend,
}

impl Detector {
    /// Validates `cfg` and prepares the selected backend.
    ///
    /// Requesting the parallel backend without the `rayon` feature fails with
    /// [`HarrisError::FeatureDisabled`].
    pub fn new(cfg: DetectConfig) -> HarrisResult<Self> {
        cfg.validate()?;
        let backend = if cfg.parallel {
            parallel_backend(cfg.max_workers)?
        } else {
            Backend::Scalar(ScalarStages)
        };
        Ok(Self { cfg, backend })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &DetectConfig {
        &self.cfg
    }

    /// Returns true when the multi-threaded backend is active.
    pub fn is_parallel(&self) -> bool {
        !matches!(self.backend, Backend::Scalar(_))
    }

    /// Detects corners in a grayscale image.
    pub fn detect(&self, image: ImageView<'_, u8>) -> HashSet<Corner> {
        self.detect_traced(image).corners
    }

    /// Runs the pipeline and returns every intermediate buffer.
    pub fn detect_traced(&self, image: ImageView<'_, u8>) -> Intermediates {
        pipeline::run(self.stages(), image, self.cfg.params())
    }

    fn stages(&self) -> &dyn Stages {
        match &self.backend {
            Backend::Scalar(stages) => stages,
            #[cfg(feature = "rayon")]
            Backend::Rayon(stages) => stages,
        }
    }
}

#[cfg(feature = "rayon")]
fn parallel_backend(max_workers: usize) -> HarrisResult<Backend> {
    Ok(Backend::Rayon(RayonStages::new(max_workers)?))
}

#[cfg(not(feature = "rayon"))]
fn parallel_backend(_max_workers: usize) -> HarrisResult<Backend> {
    Err(HarrisError::FeatureDisabled { feature: "rayon" })
}

/// Detects corners with the single-threaded backend.
///
/// `stride` must equal `width`, `data` must hold `stride * height` samples
/// and `suppression_window` must be odd.
pub fn find_corners_sequential(
    data: &[u8],
    width: usize,
    height: usize,
    stride: usize,
    threshold: f64,
    suppression_window: usize,
) -> HarrisResult<HashSet<Corner>> {
    find_corners(data, width, height, stride, threshold, suppression_window, false)
}

/// Detects corners with the multi-threaded backend.
///
/// Same contract and result as [`find_corners_sequential`].
#[cfg(feature = "rayon")]
pub fn find_corners_parallel(
    data: &[u8],
    width: usize,
    height: usize,
    stride: usize,
    threshold: f64,
    suppression_window: usize,
) -> HarrisResult<HashSet<Corner>> {
    find_corners(data, width, height, stride, threshold, suppression_window, true)
}

fn find_corners(
    data: &[u8],
    width: usize,
    height: usize,
    stride: usize,
    threshold: f64,
    suppression_window: usize,
    parallel: bool,
) -> HarrisResult<HashSet<Corner>> {
    let detector = Detector::new(DetectConfig {
        threshold,
        suppression_window,
        parallel,
        ..DetectConfig::default()
    })?;
    let image = ImageView::new(data, width, height, stride)?;
    Ok(detector.detect(image))
}

#[cfg(test)]
mod tests {
    use super::{DetectConfig, Detector};
    use crate::util::HarrisError;

    #[test]
    fn default_config_is_valid() {
        assert!(DetectConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_even_or_zero_window() {
        for size in [0, 2, 10] {
            let cfg = DetectConfig {
                suppression_window: size,
                ..DetectConfig::default()
            };
            assert_eq!(
                Detector::new(cfg).err(),
                Some(HarrisError::InvalidWindowSize { size })
            );
        }
    }

    #[test]
    fn rejects_non_finite_threshold_and_bad_radius() {
        let cfg = DetectConfig {
            threshold: f64::INFINITY,
            ..DetectConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(HarrisError::InvalidThreshold { .. })
        ));

        let cfg = DetectConfig {
            sum_radius: 0,
            ..DetectConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(HarrisError::InvalidSumRadius { radius: 0, .. })
        ));

        let cfg = DetectConfig {
            max_workers: 0,
            ..DetectConfig::default()
        };
        assert_eq!(cfg.validate(), Err(HarrisError::InvalidWorkerCount));
    }

    #[cfg(not(feature = "rayon"))]
    #[test]
    fn parallel_requires_rayon_feature() {
        let cfg = DetectConfig {
            parallel: true,
            ..DetectConfig::default()
        };
        assert_eq!(
            Detector::new(cfg).err(),
            Some(HarrisError::FeatureDisabled { feature: "rayon" })
        );
    }
}
