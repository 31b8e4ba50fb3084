//! Page layout composition.
//!
//! [`PageComposer`] maps layout blocks from raster coordinates into page
//! coordinates (origin bottom-left, y up) and emits the placement plan the
//! rendering collaborator executes. Instructions follow block order, then
//! line order within a block; the renderer honors paint order and no
//! occlusion resolution is performed here.

use crate::domain::Block;
use crate::processors::geometry::Rect;
use serde::{Deserialize, Serialize};

/// A single placement instruction in page space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PageInstruction {
    /// Copy a raster-space region of the source image onto the page.
    ImageCrop {
        /// Crop region in raster space.
        source: Rect,
        /// Page-space x of the placement origin.
        x: i32,
        /// Page-space y of the placement origin.
        y: i32,
        /// Placement width.
        width: i32,
        /// Placement height.
        height: i32,
    },
    /// Draw a line of text at a page-space position.
    DrawText {
        /// Page-space x of the text origin.
        x: i32,
        /// Page-space y of the text baseline.
        y: i32,
        /// Font size in points, derived from the detected line height.
        font_size: u32,
        /// The text to draw.
        text: String,
    },
}

/// An ordered placement plan for one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayoutPlan {
    /// Page width in pixels.
    pub page_width: u32,
    /// Page height in pixels.
    pub page_height: u32,
    /// Placement instructions in paint order.
    pub instructions: Vec<PageInstruction>,
}

/// Composes layout blocks into a page placement plan.
#[derive(Debug, Clone)]
pub struct PageComposer {
    /// Smallest font size ever emitted, keeping text legible at small
    /// detected line heights.
    pub min_font_size: u32,
    /// Fraction of the line box height used as the font size,
    /// approximating cap height against the full box.
    pub cap_height_ratio: f32,
}

impl Default for PageComposer {
    fn default() -> Self {
        Self {
            min_font_size: 8,
            cap_height_ratio: 0.8,
        }
    }
}

impl PageComposer {
    /// Builds the placement plan for a page.
    ///
    /// An empty block sequence degrades to a single full-page image
    /// placement; this is the valid "no layout info" outcome, not an
    /// error. Text lines that are empty after trimming are skipped.
    pub fn compose(&self, page_width: u32, page_height: u32, blocks: &[Block]) -> PageLayoutPlan {
        let height = page_height as i32;
        let full_page = Rect::new(0, 0, page_width as i32, height);
        let mut instructions = Vec::new();

        if blocks.is_empty() {
            instructions.push(PageInstruction::ImageCrop {
                source: full_page,
                x: 0,
                y: 0,
                width: full_page.width(),
                height: full_page.height(),
            });
            return PageLayoutPlan {
                page_width,
                page_height,
                instructions,
            };
        }

        for block in blocks {
            match block {
                Block::Image { bbox } | Block::Table { bbox } => {
                    let placed = bbox.flip_to_page_space(height);
                    instructions.push(PageInstruction::ImageCrop {
                        source: *bbox,
                        x: placed.x1,
                        y: placed.y1,
                        width: placed.width(),
                        height: placed.height(),
                    });
                }
                Block::Text { lines, .. } => {
                    for line in lines {
                        let text = line.text.trim();
                        if text.is_empty() {
                            continue;
                        }
                        let placed = line.bbox.flip_to_page_space(height);
                        let font_size = ((self.cap_height_ratio * placed.height() as f32) as u32)
                            .max(self.min_font_size);
                        instructions.push(PageInstruction::DrawText {
                            x: placed.x1,
                            y: placed.y1,
                            font_size,
                            text: text.to_string(),
                        });
                    }
                }
            }
        }

        PageLayoutPlan {
            page_width,
            page_height,
            instructions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Line;

    fn text_block(text: &str, bbox: Rect, confidence: f32) -> Block {
        Block::Text {
            bbox,
            lines: vec![Line {
                text: text.to_string(),
                bbox,
                confidence,
            }],
            confidence,
        }
    }

    #[test]
    fn test_empty_blocks_degrade_to_full_page_image() {
        let plan = PageComposer::default().compose(800, 600, &[]);
        assert_eq!(plan.instructions.len(), 1);
        assert_eq!(
            plan.instructions[0],
            PageInstruction::ImageCrop {
                source: Rect::new(0, 0, 800, 600),
                x: 0,
                y: 0,
                width: 800,
                height: 600,
            }
        );
    }

    #[test]
    fn test_text_line_is_flipped_and_sized() {
        let blocks = vec![text_block("Hello", Rect::new(10, 20, 110, 40), 0.9)];
        let plan = PageComposer::default().compose(800, 600, &blocks);
        assert_eq!(plan.instructions.len(), 1);
        match &plan.instructions[0] {
            PageInstruction::DrawText {
                x,
                y,
                font_size,
                text,
            } => {
                assert_eq!((*x, *y), (10, 560));
                // 0.8 x 20px line height, truncated.
                assert_eq!(*font_size, 16);
                assert_eq!(text, "Hello");
            }
            other => panic!("expected text draw, got {:?}", other),
        }
    }

    #[test]
    fn test_small_lines_use_minimum_font_size() {
        let blocks = vec![text_block("tiny", Rect::new(0, 0, 30, 6), 0.9)];
        let plan = PageComposer::default().compose(800, 600, &blocks);
        match &plan.instructions[0] {
            PageInstruction::DrawText { font_size, .. } => assert_eq!(*font_size, 8),
            other => panic!("expected text draw, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_text_lines_are_skipped() {
        let blocks = vec![
            text_block("  ", Rect::new(0, 0, 30, 10), 0.9),
            text_block("kept", Rect::new(0, 20, 30, 30), 0.9),
        ];
        let plan = PageComposer::default().compose(800, 600, &blocks);
        assert_eq!(plan.instructions.len(), 1);
    }

    #[test]
    fn test_image_block_is_cropped_and_placed() {
        let blocks = vec![Block::Image {
            bbox: Rect::new(100, 100, 300, 250),
        }];
        let plan = PageComposer::default().compose(800, 600, &blocks);
        assert_eq!(
            plan.instructions[0],
            PageInstruction::ImageCrop {
                source: Rect::new(100, 100, 300, 250),
                x: 100,
                y: 350,
                width: 200,
                height: 150,
            }
        );
    }

    #[test]
    fn test_instruction_order_follows_block_order() {
        let blocks = vec![
            text_block("first", Rect::new(0, 0, 30, 10), 0.9),
            Block::Table {
                bbox: Rect::new(0, 40, 100, 90),
            },
            text_block("last", Rect::new(0, 100, 30, 110), 0.9),
        ];
        let plan = PageComposer::default().compose(800, 600, &blocks);
        assert_eq!(plan.instructions.len(), 3);
        assert!(matches!(plan.instructions[0], PageInstruction::DrawText { ref text, .. } if text == "first"));
        assert!(matches!(plan.instructions[1], PageInstruction::ImageCrop { .. }));
        assert!(matches!(plan.instructions[2], PageInstruction::DrawText { ref text, .. } if text == "last"));
    }
}
