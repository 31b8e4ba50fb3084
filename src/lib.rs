//! # docscan
//!
//! A Rust library for digitizing photographed document pages. Given a
//! raster image, it locates the page's quadrilateral boundary, rectifies
//! it to a flat rectangular view, and reconstructs a positionally-faithful
//! text layout from token-level OCR output, ready for re-rendering into a
//! paginated document.
//!
//! ## Components
//!
//! - **Boundary detection**: rank edge contours by area and simplify them
//!   to the most plausible document quadrilateral
//! - **Rectification**: estimate the target rectangle and warp the quad
//!   flat with a projective transform, falling back to the full frame when
//!   no boundary is found
//! - **Line aggregation**: merge word-level recognition tokens into line
//!   records with union boxes and worst-case confidence
//! - **Page composition**: translate blocks from raster space into
//!   page-space placement instructions with derived font sizes
//!
//! Character recognition itself sits behind the
//! [`TextRecognizer`](core::TextRecognizer) trait, and the emitted
//! [`PageLayoutPlan`](processors::PageLayoutPlan) is executed by an
//! external rendering collaborator; this crate implements the geometric
//! and layout reasoning between those seams.
//!
//! ## Modules
//!
//! * [`core`] - Configuration, error handling, and collaborator traits
//! * [`domain`] - Recognition and layout records crossing the boundary
//! * [`pipeline`] - The per-image scanning pipeline
//! * [`processors`] - Geometry, detection, rectification, and layout
//!   algorithms
//! * [`utils`] - Image loading helpers and logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docscan::prelude::*;
//! use std::path::Path;
//!
//! # struct MyEngine;
//! # impl TextRecognizer for MyEngine {
//! #     fn recognize(
//! #         &self,
//! #         _image: &image::RgbImage,
//! #     ) -> Result<Vec<docscan::domain::Token>, ScanError> {
//! #         Ok(Vec::new())
//! #     }
//! # }
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let scanner = DocScanner::new(ScanConfig::default())?;
//! let image = load_image(Path::new("page.jpg"))?;
//!
//! // Rectify, recognize (through your OCR engine), and reconstruct layout.
//! let result = scanner.analyze(&image, &MyEngine)?;
//!
//! // Build the placement plan for the rendering collaborator.
//! let (width, height) = result.warp.image.dimensions();
//! let plan = scanner.compose_page(width, height, &result.blocks);
//! # let _ = plan;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod pipeline;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use docscan::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{ScanConfig, ScanError, TextRecognizer};
    pub use crate::domain::{Block, Line, Token};
    pub use crate::pipeline::{DocScanner, ScanResult};
    pub use crate::processors::{PageInstruction, PageLayoutPlan, Quad, Rect, WarpResult};
    pub use crate::utils::load_image;
}
