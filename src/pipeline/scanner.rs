//! The document scanning pipeline.
//!
//! [`DocScanner`] chains the per-image stages: downscale, edge and contour
//! extraction, boundary detection with full-frame fallback, perspective
//! rectification, text recognition through the [`TextRecognizer`] seam,
//! and line aggregation into layout blocks. Every stage is a deterministic
//! function of its inputs; the scanner holds no per-image state, so one
//! scanner can serve concurrent callers processing different images.

use crate::core::{ScanConfig, ScanError, TextRecognizer};
use crate::domain::Block;
use crate::processors::contours::{extract_contours, extract_edge_map};
use crate::processors::geometry::{Polygon, Quad};
use crate::processors::layout::{PageComposer, PageLayoutPlan};
use crate::processors::lines::{aggregate_lines, lines_into_blocks};
use crate::processors::quad_detect::QuadDetector;
use crate::processors::rectify::{RectifyPlan, WarpResult, warp_perspective};
use crate::utils::resize_to_limit;
use image::RgbImage;
use tracing::{debug, info, warn};

/// Result of analyzing one image.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// The rectification outcome, including the quad used and whether
    /// perspective correction was applied.
    pub warp: WarpResult,
    /// The reconstructed layout blocks, in rendering order.
    pub blocks: Vec<Block>,
}

/// The document scanning pipeline.
#[derive(Debug, Clone)]
pub struct DocScanner {
    config: ScanConfig,
    detector: QuadDetector,
    composer: PageComposer,
}

impl DocScanner {
    /// Creates a scanner with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::ConfigError` if the configuration is invalid.
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        config.validate()?;
        let detector = QuadDetector::new(&config);
        Ok(Self {
            config,
            detector,
            composer: PageComposer::default(),
        })
    }

    /// The configuration this scanner was built with.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Locates the document boundary and produces the rectified view.
    ///
    /// When no boundary qualifies, the original image passes through
    /// unchanged under the full-frame quad with `used_warp` set to false.
    /// The pipeline never hard-fails on an undetectable boundary.
    pub fn rectify(&self, image: &RgbImage) -> Result<WarpResult, ScanError> {
        let edges = extract_edge_map(image, &self.config);
        let contours = extract_contours(&edges);
        self.rectify_from_contours(image, &contours)
    }

    /// Rectifies using an externally-supplied contour set.
    ///
    /// This is the seam to the edge-processing collaborator: callers that
    /// run their own edge extraction can feed contours directly.
    pub fn rectify_from_contours(
        &self,
        image: &RgbImage,
        contours: &[Polygon],
    ) -> Result<WarpResult, ScanError> {
        let (width, height) = image.dimensions();
        match self.detector.detect(contours, width, height)? {
            Some(quad) => {
                let plan = RectifyPlan::from_quad(&quad)?;
                debug!(
                    width = plan.width,
                    height = plan.height,
                    "warping detected boundary"
                );
                let warped = warp_perspective(image, &plan)?;
                Ok(WarpResult {
                    image: warped,
                    quad,
                    used_warp: true,
                })
            }
            None => {
                warn!("document boundary not found, using the full frame");
                Ok(WarpResult {
                    image: image.clone(),
                    quad: Quad::full_frame(width, height),
                    used_warp: false,
                })
            }
        }
    }

    /// Runs the full analysis for one image: rectification, recognition,
    /// and layout reconstruction.
    ///
    /// An empty recognition result is not an error; it yields an empty
    /// block list, which composition later degrades to a full-page image
    /// placement.
    pub fn analyze<R: TextRecognizer>(
        &self,
        image: &RgbImage,
        recognizer: &R,
    ) -> Result<ScanResult, ScanError> {
        let resized = resize_to_limit(image, self.config.max_image_dim);
        let warp = self.rectify(&resized)?;

        let tokens = recognizer.recognize(&warp.image)?;
        if tokens.is_empty() {
            debug!("recognizer returned no tokens");
        }
        let lines = aggregate_lines(&tokens);
        let blocks = lines_into_blocks(lines);

        info!(
            blocks = blocks.len(),
            used_warp = warp.used_warp,
            "analysis complete"
        );
        Ok(ScanResult { warp, blocks })
    }

    /// Builds the page placement plan for the rendering collaborator.
    pub fn compose_page(
        &self,
        page_width: u32,
        page_height: u32,
        blocks: &[Block],
    ) -> PageLayoutPlan {
        self.composer.compose(page_width, page_height, blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Token;
    use crate::processors::geometry::{Point, Rect};

    struct FixedRecognizer(Vec<Token>);

    impl TextRecognizer for FixedRecognizer {
        fn recognize(&self, _image: &RgbImage) -> Result<Vec<Token>, ScanError> {
            Ok(self.0.clone())
        }
    }

    struct FailingRecognizer;

    impl TextRecognizer for FailingRecognizer {
        fn recognize(&self, _image: &RgbImage) -> Result<Vec<Token>, ScanError> {
            Err(ScanError::recognition_error(std::io::Error::other(
                "engine unavailable",
            )))
        }
    }

    fn rectangle_contour(x1: f32, y1: f32, x2: f32, y2: f32) -> Polygon {
        Polygon::new(vec![
            Point::new(x1, y1),
            Point::new(x2, y1),
            Point::new(x2, y2),
            Point::new(x1, y2),
        ])
    }

    #[test]
    fn test_rectify_from_contours_warps_detected_boundary() {
        let scanner = DocScanner::new(ScanConfig::default()).unwrap();
        let image = RgbImage::new(600, 400);
        let contours = vec![rectangle_contour(50.0, 50.0, 250.0, 150.0)];

        let result = scanner.rectify_from_contours(&image, &contours).unwrap();
        assert!(result.used_warp);
        assert_eq!(result.image.dimensions(), (200, 100));
        assert_eq!(result.quad.top_left, Point::new(50.0, 50.0));
    }

    #[test]
    fn test_rectify_falls_back_to_full_frame() {
        let scanner = DocScanner::new(ScanConfig::default()).unwrap();
        let image = RgbImage::new(600, 400);
        // Only a speck: nothing qualifies, the frame passes through.
        let contours = vec![rectangle_contour(0.0, 0.0, 5.0, 5.0)];

        let result = scanner.rectify_from_contours(&image, &contours).unwrap();
        assert!(!result.used_warp);
        assert_eq!(result.image.dimensions(), (600, 400));
        assert_eq!(result.quad, Quad::full_frame(600, 400));
    }

    #[test]
    fn test_rectify_rejects_empty_contour_set() {
        let scanner = DocScanner::new(ScanConfig::default()).unwrap();
        let image = RgbImage::new(600, 400);
        assert!(scanner.rectify_from_contours(&image, &[]).is_err());
    }

    #[test]
    fn test_recognizer_errors_propagate() {
        let scanner = DocScanner::new(ScanConfig::default()).unwrap();
        let mut image = RgbImage::new(200, 200);
        for y in 40..160 {
            for x in 40..160 {
                image.put_pixel(x, y, image::Rgb([255, 255, 255]));
            }
        }
        let result = scanner.analyze(&image, &FailingRecognizer);
        assert!(matches!(result, Err(ScanError::Recognition(_))));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ScanConfig {
            simplify_tolerances: vec![],
            ..ScanConfig::default()
        };
        assert!(DocScanner::new(config).is_err());
    }

    #[test]
    fn test_compose_page_delegates_to_composer() {
        let scanner = DocScanner::new(ScanConfig::default()).unwrap();
        let plan = scanner.compose_page(800, 600, &[]);
        assert_eq!(plan.page_width, 800);
        assert_eq!(plan.page_height, 600);
        assert_eq!(plan.instructions.len(), 1);
    }
}
