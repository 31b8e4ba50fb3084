//! Aggregation of recognition tokens into line records.
//!
//! The OCR collaborator emits word-level tokens tagged with opaque block
//! and line ids. Tokens sharing an id pair are merged into a single line:
//! texts joined with spaces, boxes unioned, confidence taken as the running
//! minimum, so a line is only as reliable as its weakest word.

use crate::domain::{Block, Line, Token};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::debug;

/// Groups recognition tokens into lines.
///
/// Tokens whose text is empty after trimming are discarded before grouping;
/// a group containing only such tokens yields no line. Output order is
/// first-seen group order, which is the canonical order for rendering.
pub fn aggregate_lines(tokens: &[Token]) -> Vec<Line> {
    let mut group_index: HashMap<(u32, u32), usize> = HashMap::new();
    let mut lines: Vec<Line> = Vec::new();
    let mut dropped = 0usize;

    for token in tokens {
        let text = token.text.trim();
        if text.is_empty() {
            dropped += 1;
            continue;
        }

        match group_index.entry((token.block_num, token.line_num)) {
            Entry::Vacant(slot) => {
                slot.insert(lines.len());
                lines.push(Line {
                    text: text.to_string(),
                    bbox: token.bbox,
                    confidence: token.confidence,
                });
            }
            Entry::Occupied(slot) => {
                let line = &mut lines[*slot.get()];
                line.text = format!("{} {}", line.text, text).trim().to_string();
                line.bbox = line.bbox.union(&token.bbox);
                line.confidence = line.confidence.min(token.confidence);
            }
        }
    }

    if dropped > 0 {
        debug!(dropped, kept = lines.len(), "discarded whitespace-only tokens");
    }
    lines
}

/// Wraps each line into a text block with a singleton line list.
///
/// The block/line split exists so multi-line text blocks can be introduced
/// later without changing the boundary interface.
pub fn lines_into_blocks(lines: Vec<Line>) -> Vec<Block> {
    lines
        .into_iter()
        .map(|line| Block::Text {
            bbox: line.bbox,
            confidence: line.confidence,
            lines: vec![line],
        })
        .collect()
}
