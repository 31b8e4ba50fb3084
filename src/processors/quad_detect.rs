//! Document boundary detection from a contour set.
//!
//! The detector ranks in-band contours by area and tries to simplify each
//! one to a quadrilateral under an escalating tolerance ladder. The first
//! 4-vertex simplification whose area stays in band wins. This greedy
//! rank-then-tolerance order is the tie-break policy: changing it changes
//! the result on ambiguous images, so it is preserved as stated.

use crate::core::{ScanConfig, ScanError};
use crate::processors::geometry::{Polygon, Quad};
use tracing::debug;

/// Detects the document boundary quadrilateral in a set of contours.
#[derive(Debug, Clone)]
pub struct QuadDetector {
    /// Minimum candidate area as a fraction of the image area.
    pub min_area_ratio: f32,
    /// Maximum candidate area as a fraction of the image area.
    pub max_area_ratio: f32,
    /// Maximum number of ranked candidates to examine.
    pub max_candidates: usize,
    /// Simplification tolerances as fractions of contour perimeter,
    /// tried in order.
    pub tolerances: Vec<f32>,
}

impl QuadDetector {
    /// Creates a detector from the pipeline configuration.
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            min_area_ratio: config.min_area_ratio,
            max_area_ratio: config.max_area_ratio,
            max_candidates: config.max_candidates,
            tolerances: config.simplify_tolerances.clone(),
        }
    }

    /// Estimates the document boundary from externally-supplied contours.
    ///
    /// # Arguments
    ///
    /// * `contours` - Closed contours traced from the image's edge map.
    /// * `width` - Image width in pixels.
    /// * `height` - Image height in pixels.
    ///
    /// # Returns
    ///
    /// `Ok(Some(quad))` with an ordered boundary estimate, or `Ok(None)`
    /// when no contour qualifies. `None` is a degraded outcome, not an
    /// error; callers fall back to the full image frame.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::InvalidInput` for a zero-area image or an empty
    /// contour set. Both are contract violations of the edge-processing
    /// collaborator, surfaced to the caller rather than patched over.
    pub fn detect(
        &self,
        contours: &[Polygon],
        width: u32,
        height: u32,
    ) -> Result<Option<Quad>, ScanError> {
        let image_area = width as f32 * height as f32;
        if image_area <= 0.0 {
            return Err(ScanError::invalid_input(format!(
                "cannot detect a boundary in a {}x{} image",
                width, height
            )));
        }
        if contours.is_empty() {
            return Err(ScanError::invalid_input(
                "no contours supplied for boundary detection",
            ));
        }

        let min_area = self.min_area_ratio * image_area;
        let max_area = self.max_area_ratio * image_area;

        let mut candidates: Vec<(f32, &Polygon)> = contours
            .iter()
            .map(|contour| (contour.area(), contour))
            .filter(|&(area, _)| area > min_area && area < max_area)
            .collect();
        candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        candidates.truncate(self.max_candidates);

        debug!(
            total = contours.len(),
            in_band = candidates.len(),
            "ranked boundary candidates"
        );

        for (_, contour) in &candidates {
            let perimeter = contour.perimeter();
            for &tolerance in &self.tolerances {
                let approx = contour.approx_poly_closed(tolerance * perimeter);
                if approx.points.len() != 4 {
                    continue;
                }
                let area = approx.area();
                if area > min_area && area < max_area {
                    return Quad::order(&approx.points).map(Some);
                }
            }
        }

        debug!("no contour simplified to an in-band quadrilateral");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::geometry::Point;

    fn detector() -> QuadDetector {
        QuadDetector::new(&ScanConfig::default())
    }

    fn rectangle(x1: f32, y1: f32, x2: f32, y2: f32) -> Polygon {
        Polygon::new(vec![
            Point::new(x1, y1),
            Point::new(x2, y1),
            Point::new(x2, y2),
            Point::new(x1, y2),
        ])
    }

    #[test]
    fn test_detects_in_band_rectangle() {
        let contours = vec![rectangle(50.0, 50.0, 250.0, 150.0)];
        let quad = detector().detect(&contours, 600, 400).unwrap().unwrap();
        assert_eq!(quad.top_left, Point::new(50.0, 50.0));
        assert_eq!(quad.bottom_right, Point::new(250.0, 150.0));
    }

    #[test]
    fn test_detected_area_is_within_band() {
        let contours = vec![
            rectangle(2.0, 2.0, 8.0, 8.0),
            rectangle(50.0, 50.0, 250.0, 150.0),
        ];
        let (width, height) = (600, 400);
        let quad = detector().detect(&contours, width, height).unwrap().unwrap();
        let area = Polygon::new(quad.corners().to_vec()).area();
        let image_area = (width * height) as f32;
        assert!(area > 0.05 * image_area);
        assert!(area < 0.95 * image_area);
    }

    #[test]
    fn test_prefers_largest_candidate() {
        let contours = vec![
            rectangle(100.0, 100.0, 220.0, 220.0),
            rectangle(50.0, 50.0, 250.0, 150.0),
        ];
        // The 200x100 rectangle has the larger area and ranks first.
        let quad = detector().detect(&contours, 600, 400).unwrap().unwrap();
        assert_eq!(quad.top_left, Point::new(50.0, 50.0));
    }

    #[test]
    fn test_out_of_band_contours_are_not_found() {
        let contours = vec![
            rectangle(0.0, 0.0, 5.0, 5.0),
            rectangle(0.0, 0.0, 599.0, 399.0),
        ];
        // One speck and one near-full-frame artifact; neither qualifies.
        assert!(detector().detect(&contours, 600, 400).unwrap().is_none());
    }

    #[test]
    fn test_non_quadrilateral_contour_is_not_found() {
        // A five-pointed star does not simplify to 4 vertices at any
        // tolerance in the ladder.
        let star = Polygon::new(vec![
            Point::new(300.0, 20.0),
            Point::new(340.0, 160.0),
            Point::new(480.0, 160.0),
            Point::new(370.0, 240.0),
            Point::new(420.0, 380.0),
            Point::new(300.0, 290.0),
            Point::new(180.0, 380.0),
            Point::new(230.0, 240.0),
            Point::new(120.0, 160.0),
            Point::new(260.0, 160.0),
        ]);
        assert!(detector().detect(&[star], 600, 400).unwrap().is_none());
    }

    #[test]
    fn test_empty_contour_set_is_a_contract_violation() {
        assert!(detector().detect(&[], 600, 400).is_err());
    }

    #[test]
    fn test_zero_area_image_is_a_contract_violation() {
        let contours = vec![rectangle(0.0, 0.0, 10.0, 10.0)];
        assert!(detector().detect(&contours, 0, 400).is_err());
    }
}
