//! Stage sequencing shared by both backends.
//!
//! Each stage consumes the complete output of its predecessor; the backend
//! only decides how a single stage is split across threads.

use crate::corner::Corner;
use crate::filter::ConvKernel;
use crate::image::{ImageView, OwnedImage};
use crate::kernel::Stages;
use crate::trace::{trace_event, trace_span};
use std::collections::HashSet;

/// Every buffer produced by one pipeline run.
#[derive(Clone, Debug)]
pub struct Intermediates {
    /// Gaussian-smoothed input.
    pub smoothed: OwnedImage,
    /// Horizontal gradient of `smoothed`, clamped to `u8`.
    pub dx: OwnedImage,
    /// Vertical gradient of `smoothed`, clamped to `u8`.
    pub dy: OwnedImage,
    /// `dx * dy` per pixel.
    pub xy: Vec<i32>,
    /// `dx * dx` per pixel.
    pub x2: Vec<i32>,
    /// `dy * dy` per pixel.
    pub y2: Vec<i32>,
    /// Windowed sum of `xy`.
    pub sum_xy: Vec<i32>,
    /// Windowed sum of `x2`.
    pub sum_x2: Vec<i32>,
    /// Windowed sum of `y2`.
    pub sum_y2: Vec<i32>,
    /// Harris response per pixel.
    pub response: Vec<f64>,
    /// Response after tile suppression.
    pub suppressed: Vec<f64>,
    /// Final corner set.
    pub corners: HashSet<Corner>,
}

/// Validated parameters for one run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PipelineParams {
    pub threshold: f64,
    pub suppression_window: usize,
    pub sum_radius: usize,
}

impl PipelineParams {
    /// Width of the band along every edge that can never hold a corner.
    pub(crate) fn border(&self, smoothing: &ConvKernel) -> usize {
        self.sum_radius.max(smoothing.radius())
    }
}

pub(crate) fn run<S: Stages + ?Sized>(
    stages: &S,
    image: ImageView<'_, u8>,
    params: PipelineParams,
) -> Intermediates {
    let stride = image.stride();
    let _span = trace_span!(
        "harris_pipeline",
        width = image.width(),
        height = image.height(),
        window = params.suppression_window
    )
    .entered();

    let gaussian = ConvKernel::gaussian_3x3();
    let (smoothed, dx, dy) = {
        let _span = trace_span!("convolve").entered();
        let smoothed = stages.convolve(image, &gaussian);
        let dx = stages.convolve(smoothed.view(), &ConvKernel::sobel_x());
        let dy = stages.convolve(smoothed.view(), &ConvKernel::sobel_y());
        (smoothed, dx, dy)
    };

    let (xy, x2, y2) = {
        let _span = trace_span!("moments").entered();
        (
            stages.multiply(dx.data(), dy.data()),
            stages.multiply(dx.data(), dx.data()),
            stages.multiply(dy.data(), dy.data()),
        )
    };

    let (sum_xy, sum_x2, sum_y2) = {
        let _span = trace_span!("window_sum", radius = params.sum_radius).entered();
        (
            stages.window_sum(&xy, stride, params.sum_radius),
            stages.window_sum(&x2, stride, params.sum_radius),
            stages.window_sum(&y2, stride, params.sum_radius),
        )
    };

    let response = {
        let _span = trace_span!("harris_response").entered();
        stages.harris_response(&sum_x2, &sum_y2, &sum_xy)
    };

    let suppressed = {
        let _span = trace_span!("suppress", size = params.suppression_window).entered();
        stages.suppress(&response, stride, params.suppression_window)
    };

    let corners = {
        let _span = trace_span!("threshold", threshold = params.threshold).entered();
        stages.threshold(
            &suppressed,
            stride,
            params.border(&gaussian),
            params.threshold,
        )
    };
    trace_event!("corners", count = corners.len());

    Intermediates {
        smoothed,
        dx,
        dy,
        xy,
        x2,
        y2,
        sum_xy,
        sum_x2,
        sum_y2,
        response,
        suppressed,
        corners,
    }
}
