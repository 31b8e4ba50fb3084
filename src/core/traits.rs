//! Traits defining the seams to external collaborators.

use crate::core::ScanError;
use crate::domain::Token;
use image::RgbImage;

/// The text recognition collaborator.
///
/// Implementations run an OCR engine over a rectified page image and return
/// word-level tokens with raster-space bounding boxes, confidences, and the
/// engine's block/line grouping ids. The pipeline never interprets the
/// grouping ids beyond equality; they only key line aggregation.
///
/// Returning an empty token list is not an error: the pipeline degrades to
/// an empty block list and a full-page image fallback at composition time.
pub trait TextRecognizer {
    /// Recognizes text in the given image.
    fn recognize(&self, image: &RgbImage) -> Result<Vec<Token>, ScanError>;
}
