//! Configuration for the document scanning pipeline.
//!
//! [`ScanConfig`] gathers the tunables for boundary detection and edge
//! extraction. The defaults reproduce the reference behavior: images are
//! capped at 2000 pixels on the longest side, boundary candidates must
//! enclose between 5% and 95% of the frame, and simplification escalates
//! through five tolerance levels before giving up on a contour.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// A message describing the problem.
        message: String,
    },
}

/// Configuration for the scanning pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Maximum length of the longest image side before analysis; larger
    /// inputs are downscaled preserving aspect ratio.
    pub max_image_dim: u32,
    /// Minimum boundary candidate area as a fraction of the image area.
    pub min_area_ratio: f32,
    /// Maximum boundary candidate area as a fraction of the image area.
    pub max_area_ratio: f32,
    /// Maximum number of ranked contour candidates to examine.
    pub max_candidates: usize,
    /// Simplification tolerance ladder, as fractions of contour perimeter.
    /// Tried in order; the first tolerance producing a valid quadrilateral
    /// wins.
    pub simplify_tolerances: Vec<f32>,
    /// Sigma of the Gaussian blur applied before edge detection.
    pub blur_sigma: f32,
    /// Low threshold for Canny edge detection.
    pub canny_low: f32,
    /// High threshold for Canny edge detection.
    pub canny_high: f32,
    /// Radius of the morphological closing applied to the edge map.
    pub morph_radius: u8,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_image_dim: 2000,
            min_area_ratio: 0.05,
            max_area_ratio: 0.95,
            max_candidates: 10,
            simplify_tolerances: vec![0.01, 0.015, 0.02, 0.025, 0.03],
            blur_sigma: 1.1,
            canny_low: 50.0,
            canny_high: 150.0,
            morph_radius: 2,
        }
    }
}

impl ScanConfig {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if any parameter is
    /// inconsistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_image_dim == 0 {
            return Err(ConfigError::InvalidConfig {
                message: "max_image_dim must be greater than 0".to_string(),
            });
        }
        if !(0.0..1.0).contains(&self.min_area_ratio)
            || !(0.0..=1.0).contains(&self.max_area_ratio)
            || self.min_area_ratio >= self.max_area_ratio
        {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "area band [{}, {}] must satisfy 0 <= min < max <= 1",
                    self.min_area_ratio, self.max_area_ratio
                ),
            });
        }
        if self.max_candidates == 0 {
            return Err(ConfigError::InvalidConfig {
                message: "max_candidates must be greater than 0".to_string(),
            });
        }
        if self.simplify_tolerances.is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "simplify_tolerances must not be empty".to_string(),
            });
        }
        if self.simplify_tolerances.iter().any(|&t| t <= 0.0) {
            return Err(ConfigError::InvalidConfig {
                message: "simplify_tolerances must be positive".to_string(),
            });
        }
        if self.canny_low >= self.canny_high {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "canny thresholds must satisfy low < high, got {} >= {}",
                    self.canny_low, self.canny_high
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ScanConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_area_band_rejected() {
        let config = ScanConfig {
            min_area_ratio: 0.9,
            max_area_ratio: 0.1,
            ..ScanConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_tolerance_ladder_rejected() {
        let config = ScanConfig {
            simplify_tolerances: vec![],
            ..ScanConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_canny_thresholds_rejected() {
        let config = ScanConfig {
            canny_low: 200.0,
            canny_high: 100.0,
            ..ScanConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = ScanConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ScanConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.max_image_dim, config.max_image_dim);
        assert_eq!(parsed.simplify_tolerances, config.simplify_tolerances);
    }
}
