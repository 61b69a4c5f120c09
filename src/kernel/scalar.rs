//! Single-threaded reference backend.

use crate::corner::Corner;
use crate::filter::ConvKernel;
use crate::image::{ImageView, OwnedImage};
use crate::kernel::window::window_sum_direct;
use crate::kernel::{
    check_grid, collect_corners, convolve_row, harris_at, product, suppress_tile_rows,
    tile_count, Stages,
};
use std::collections::HashSet;

/// Sequential stage implementations.
///
/// Uses the direct `O(r^2)` box sum, which serves as the reference for the
/// sliding-window variant used by the parallel backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarStages;

impl Stages for ScalarStages {
    fn convolve(&self, image: ImageView<'_, u8>, kernel: &ConvKernel) -> OwnedImage {
        let width = image.width();
        let height = image.height();
        let src = image.as_slice();
        let mut out = vec![0u8; src.len()];
        for (y, row) in out.chunks_exact_mut(width).enumerate() {
            convolve_row(src, width, height, y, kernel, row);
        }
        OwnedImage::from_parts(out, width, height)
    }

    fn multiply(&self, a: &[u8], b: &[u8]) -> Vec<i32> {
        assert_eq!(a.len(), b.len(), "gradient buffers differ in length");
        a.iter().zip(b).map(|(&x, &y)| product(x, y)).collect()
    }

    fn window_sum(&self, moments: &[i32], stride: usize, radius: usize) -> Vec<i32> {
        window_sum_direct(moments, stride, radius)
    }

    fn harris_response(&self, sxx: &[i32], syy: &[i32], sxy: &[i32]) -> Vec<f64> {
        assert!(
            sxx.len() == syy.len() && sxx.len() == sxy.len(),
            "moment buffers differ in length"
        );
        let mut response = Vec::with_capacity(sxx.len());
        for i in 0..sxx.len() {
            response.push(harris_at(sxx[i], syy[i], sxy[i]));
        }
        response
    }

    fn suppress(&self, response: &[f64], stride: usize, size: usize) -> Vec<f64> {
        check_grid(response.len(), stride);
        assert!(size % 2 == 1, "suppression window must be odd");
        let mut out = vec![0.0f64; response.len()];
        let tile_rows = tile_count(response.len() / stride, size);
        suppress_tile_rows(response, stride, size, 0..tile_rows, &mut out);
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
        collect_corners(map, stride, border, threshold, 0..map.len())
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::ScalarStages;
    use crate::corner::Corner;
    use crate::filter::ConvKernel;
    use crate::image::ImageView;
    use crate::kernel::Stages;
    use std::collections::HashSet;

    #[test]
    fn convolve_leaves_border_zero_and_smooths_interior() {
        let data = vec![16u8; 25];
        let view = ImageView::from_slice(&data, 5, 5).unwrap();
        let out = ScalarStages.convolve(view, &ConvKernel::gaussian_3x3());
        for y in 0..5 {
            for x in 0..5 {
                let expected = if (1..4).contains(&x) && (1..4).contains(&y) {
                    16
                } else {
                    0
                };
                assert_eq!(*out.view().get(x, y).unwrap(), expected);
            }
        }
    }

    #[test]
    fn convolve_clamps_negative_gradients() {
        // Intensity increases to the right, so SOBEL_X (left minus right) is
        // negative everywhere and clamps to zero.
        let data: Vec<u8> = (0..25).map(|i| ((i % 5) * 10) as u8).collect();
        let view = ImageView::from_slice(&data, 5, 5).unwrap();
        let dx = ScalarStages.convolve(view, &ConvKernel::sobel_x());
        assert!(dx.data().iter().all(|&v| v == 0));

        let flipped: Vec<u8> = (0..25).map(|i| ((4 - i % 5) * 10) as u8).collect();
        let view = ImageView::from_slice(&flipped, 5, 5).unwrap();
        let dx = ScalarStages.convolve(view, &ConvKernel::sobel_x());
        assert_eq!(*dx.view().get(2, 2).unwrap(), 80);
    }

    #[test]
    fn multiply_widens_products() {
        let out = ScalarStages.multiply(&[255, 2, 0], &[255, 3, 9]);
        assert_eq!(out, vec![65025, 6, 0]);
    }

    #[test]
    fn threshold_example() {
        let map = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let corners = ScalarStages.threshold(&map, 3, 0, 3.0);
        let expected: HashSet<Corner> = [(2, 0), (0, 1), (1, 1), (2, 1)]
            .into_iter()
            .map(|(x, y)| Corner::new(x, y))
            .collect();
        assert_eq!(corners, expected);
    }

    #[test]
    fn suppression_drops_tail_pixels() {
        // 4x4 map with a 3x3 window: one tile, the last row and column are
        // never evaluated.
        let mut response = vec![0.0; 16];
        response[5] = 2.0;
        response[15] = 9.0;
        let out = ScalarStages.suppress(&response, 4, 3);
        let mut expected = vec![0.0; 16];
        expected[5] = 2.0;
        assert_eq!(out, expected);
    }
}
