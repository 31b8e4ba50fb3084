//! Edge map construction and contour tracing.
//!
//! Reproduces the boundary-detection preprocessing chain: grayscale,
//! Gaussian blur, Canny edge detection, then a morphological close to fuse
//! broken edge segments before contour tracing. The output of
//! [`extract_contours`] is what the quad detector consumes.

use crate::core::ScanConfig;
use crate::processors::geometry::Polygon;
use image::{GrayImage, RgbImage, imageops};
use imageproc::contours::find_contours;
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::close;

/// Builds the binary edge map used for boundary detection.
///
/// # Arguments
///
/// * `image` - The input image in RGB format.
/// * `config` - Blur, Canny, and morphology parameters.
///
/// # Returns
///
/// A grayscale image where edge pixels are non-zero.
pub fn extract_edge_map(image: &RgbImage, config: &ScanConfig) -> GrayImage {
    let gray = imageops::grayscale(image);
    let blurred = gaussian_blur_f32(&gray, config.blur_sigma);
    let edged = canny(&blurred, config.canny_low, config.canny_high);
    close(&edged, Norm::LInf, config.morph_radius)
}

/// Traces all region borders in a binary edge map.
///
/// Every border is returned, outer and hole borders alike, matching the
/// retrieve-all contour policy of the boundary detector. Area filtering is
/// the detector's job.
pub fn extract_contours(edges: &GrayImage) -> Vec<Polygon> {
    find_contours::<u32>(edges)
        .iter()
        .map(Polygon::from_contour)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_map_preserves_dimensions() {
        let image = RgbImage::new(64, 48);
        let edges = extract_edge_map(&image, &ScanConfig::default());
        assert_eq!(edges.dimensions(), (64, 48));
    }

    #[test]
    fn test_blank_edge_map_has_no_contours() {
        let edges = GrayImage::new(32, 32);
        assert!(extract_contours(&edges).is_empty());
    }

    #[test]
    fn test_filled_rectangle_produces_contour() {
        let mut edges = GrayImage::new(100, 100);
        for y in 20..80 {
            for x in 10..90 {
                edges.put_pixel(x, y, image::Luma([255]));
            }
        }
        let contours = extract_contours(&edges);
        assert!(!contours.is_empty());

        let largest = contours
            .iter()
            .map(|c| c.area())
            .fold(0.0f32, f32::max);
        // Border tracing walks pixel centers, so the traced area is one
        // pixel short of the filled extent on each axis.
        assert!((largest - (79.0 * 59.0)).abs() < 80.0 * 60.0 * 0.05);
    }
}
