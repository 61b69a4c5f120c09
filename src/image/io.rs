//! Convenience helpers for loading images and drawing corner markers via the
//! `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::corner::Corner;
use crate::image::{ImageView, OwnedImage};
use crate::util::{HarrisError, HarrisResult};
use std::path::Path;

/// Creates a borrowed view from a grayscale image buffer.
pub fn view_from_gray_image(img: &image::GrayImage) -> HarrisResult<ImageView<'_, u8>> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    ImageView::from_slice(img.as_raw(), width, height)
}

/// Creates an owned grayscale image from a dynamic image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> HarrisResult<OwnedImage> {
    let gray = img.to_luma8();
    let width = gray.width() as usize;
    let height = gray.height() as usize;
    OwnedImage::new(gray.into_raw(), width, height)
}

/// Loads an image from disk and converts it to a grayscale owned image.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> HarrisResult<OwnedImage> {
    let img = image::open(path).map_err(|err| HarrisError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}

/// Loads an image from disk as RGB, e.g. as a canvas for [`mark_corners`].
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> HarrisResult<image::RgbImage> {
    let img = image::open(path).map_err(|err| HarrisError::ImageIo {
        reason: err.to_string(),
    })?;
    Ok(img.to_rgb8())
}

/// Draws a filled square marker of side `2 * half_size + 1` centered on each
/// corner. Markers are clipped at the image edges.
pub fn mark_corners<'a, I>(canvas: &mut image::RgbImage, corners: I, color: [u8; 3], half_size: u32)
where
    I: IntoIterator<Item = &'a Corner>,
{
    let width = canvas.width();
    let height = canvas.height();
    for corner in corners {
        let (Ok(cx), Ok(cy)) = (u32::try_from(corner.x), u32::try_from(corner.y)) else {
            continue;
        };
        if cx >= width || cy >= height {
            continue;
        }
        let x0 = cx.saturating_sub(half_size);
        let y0 = cy.saturating_sub(half_size);
        let x1 = cx.saturating_add(half_size).min(width - 1);
        let y1 = cy.saturating_add(half_size).min(height - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                canvas.put_pixel(x, y, image::Rgb(color));
            }
        }
    }
}

/// Saves an RGB image, inferring the format from the file extension.
pub fn save_rgb_image<P: AsRef<Path>>(img: &image::RgbImage, path: P) -> HarrisResult<()> {
    img.save(path).map_err(|err| HarrisError::ImageIo {
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::mark_corners;
    use crate::corner::Corner;

    #[test]
    fn markers_are_clipped_at_edges() {
        let mut canvas = image::RgbImage::new(4, 4);
        let corners = [Corner::new(0, 0), Corner::new(3, 2)];
        mark_corners(&mut canvas, corners.iter(), [255, 0, 0], 1);

        assert_eq!(canvas.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(canvas.get_pixel(1, 1).0, [255, 0, 0]);
        assert_eq!(canvas.get_pixel(2, 3).0, [255, 0, 0]);
        assert_eq!(canvas.get_pixel(3, 0).0, [0, 0, 0]);
        assert_eq!(canvas.get_pixel(0, 3).0, [0, 0, 0]);
    }
}
