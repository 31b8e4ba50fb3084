//! Utility functions for loading and preparing images.

use crate::core::ScanError;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, RgbImage, imageops};

/// Converts a DynamicImage to an RgbImage.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Converts a DynamicImage to a GrayImage.
pub fn dynamic_to_gray(img: DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Loads an image from a file path and converts it to RgbImage.
///
/// # Errors
///
/// Returns `ScanError::ImageLoad` if the file cannot be opened or decoded.
pub fn load_image(path: &std::path::Path) -> Result<RgbImage, ScanError> {
    let img = image::open(path).map_err(ScanError::ImageLoad)?;
    Ok(dynamic_to_rgb(img))
}

/// Downscales an image so its longest side does not exceed `max_dim`,
/// preserving aspect ratio. Images already within the limit are returned
/// unchanged.
pub fn resize_to_limit(image: &RgbImage, max_dim: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let largest = width.max(height);
    if largest <= max_dim {
        return image.clone();
    }

    let scale = max_dim as f32 / largest as f32;
    let new_width = ((width as f32 * scale) as u32).max(1);
    let new_height = ((height as f32 * scale) as u32).max(1);
    imageops::resize(image, new_width, new_height, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_within_limit_is_identity() {
        let image = RgbImage::new(640, 480);
        let resized = resize_to_limit(&image, 2000);
        assert_eq!(resized.dimensions(), (640, 480));
    }

    #[test]
    fn test_resize_caps_longest_side() {
        let image = RgbImage::new(4000, 2000);
        let resized = resize_to_limit(&image, 2000);
        assert_eq!(resized.dimensions(), (2000, 1000));
    }

    #[test]
    fn test_resize_keeps_aspect_ratio_portrait() {
        let image = RgbImage::new(1500, 3000);
        let resized = resize_to_limit(&image, 1000);
        assert_eq!(resized.dimensions(), (500, 1000));
    }
}
