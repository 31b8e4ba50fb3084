//! Error types for the document scanning pipeline.
//!
//! Degraded outcomes are not errors here: an undetectable page boundary or
//! an empty recognition result is reported through return values
//! (`Option::None`, an empty sequence, the `used_warp` flag). Only
//! contract-violating inputs surface as [`ScanError`].

use thiserror::Error;

/// Enum identifying the stage of the pipeline an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessingStage {
    /// Error occurred while building the edge map or tracing contours.
    EdgeExtraction,
    /// Error occurred during polygon simplification.
    Simplification,
    /// Error occurred while computing or applying a rectification plan.
    Rectification,
    /// Error occurred while composing the page layout plan.
    Composition,
    /// Generic processing error.
    Generic,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::EdgeExtraction => write!(f, "edge extraction"),
            ProcessingStage::Simplification => write!(f, "simplification"),
            ProcessingStage::Rectification => write!(f, "rectification"),
            ProcessingStage::Composition => write!(f, "composition"),
            ProcessingStage::Generic => write!(f, "processing"),
        }
    }
}

/// Enum representing the errors that can occur while scanning a document.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Error occurred while loading an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error occurred during processing.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error reported by the text recognition collaborator.
    #[error("recognition")]
    Recognition(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Error indicating invalid input, including degenerate geometry.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// Creates a ScanError for a processing failure with stage context.
    pub fn processing_error(
        kind: ProcessingStage,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a ScanError for a failure inside a text recognizer.
    pub fn recognition_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Recognition(Box::new(error))
    }

    /// Creates a ScanError for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a ScanError for configuration errors.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

impl From<image::ImageError> for ScanError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageLoad(error)
    }
}

impl From<crate::core::config::ConfigError> for ScanError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_stage_display() {
        assert_eq!(ProcessingStage::EdgeExtraction.to_string(), "edge extraction");
        assert_eq!(ProcessingStage::Rectification.to_string(), "rectification");
        assert_eq!(ProcessingStage::Generic.to_string(), "processing");
    }

    #[test]
    fn test_invalid_input_message() {
        let err = ScanError::invalid_input("quad ordering requires exactly 4 points");
        assert!(err.to_string().contains("exactly 4 points"));
    }

    #[test]
    fn test_config_error_conversion() {
        let config_err = crate::core::config::ConfigError::InvalidConfig {
            message: "area band is inverted".to_string(),
        };
        let err: ScanError = config_err.into();
        assert!(matches!(err, ScanError::ConfigError { .. }));
    }
}
