//! Boundary data types for recognition and layout results.
//!
//! These are the records exposed across the system boundary: tokens come in
//! from the OCR collaborator, blocks go out to callers and eventually to
//! the rendering collaborator. Serialized shapes match the wire format the
//! renderer expects: boxes as 4-integer arrays, blocks tagged with a
//! `type` field, line confidence abbreviated to `conf`.

use crate::processors::geometry::Rect;
use serde::{Deserialize, Serialize};

/// A single recognized word from the OCR collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// The recognized text; may be empty or whitespace-only.
    pub text: String,
    /// Word bounding box in raster space.
    pub bbox: Rect,
    /// Recognition confidence in [0.0, 1.0].
    pub confidence: f32,
    /// Block grouping id assigned by the OCR engine. Opaque beyond
    /// equality.
    pub block_num: u32,
    /// Line grouping id assigned by the OCR engine. Opaque beyond
    /// equality.
    pub line_num: u32,
}

/// A line of text aggregated from tokens sharing a grouping id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    /// Space-joined, trimmed token texts in insertion order.
    pub text: String,
    /// Union of the constituent token boxes.
    pub bbox: Rect,
    /// Minimum confidence across constituent tokens.
    #[serde(rename = "conf")]
    pub confidence: f32,
}

/// A typed region of the reconstructed page layout.
///
/// Text blocks carry their lines; image and table blocks are opaque
/// regions referenced by coordinates only, to be copied verbatim at render
/// time. No block owns pixel data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    /// A text region with its aggregated lines.
    Text {
        /// Region bounding box in raster space.
        bbox: Rect,
        /// The lines contained in the region, in reading order.
        lines: Vec<Line>,
        /// Aggregate confidence of the region.
        confidence: f32,
    },
    /// An opaque image region.
    Image {
        /// Region bounding box in raster space.
        bbox: Rect,
    },
    /// An opaque table region.
    Table {
        /// Region bounding box in raster space.
        bbox: Rect,
    },
}

impl Block {
    /// The bounding box of the block, regardless of variant.
    pub fn bbox(&self) -> Rect {
        match self {
            Block::Text { bbox, .. } | Block::Image { bbox } | Block::Table { bbox } => *bbox,
        }
    }
}
