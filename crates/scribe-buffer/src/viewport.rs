//! The visible window onto the document.
//!
//! ## Learning: Immutable Values Instead of Shared Mutation
//!
//! `Viewport` is `Copy` and has no setters. Scrolling produces a new value
//! through the `with_*` constructors, so anyone still holding the old
//! viewport keeps a consistent snapshot.
//!
//! ## Coordinate Pipeline
//!
//! ```text
//! BufferPos ──buffer_to_content──▶ ContentPos ──content_to_screen──▶ ScreenPos
//!     ▲                                                                 │
//!     └──────────────────────── screen_to_buffer ───────────────────────┘
//! ```
//!
//! The forward direction can fail (`NotVisible`); the reverse direction is
//! total, because input such as a mouse click must always land somewhere.

use crate::{BufferPos, ContentPos, CoordResult, CoordinateError, ScreenPos};

/// Width of the line-number gutter for a document of `line_count` lines:
/// the digit count plus one separator column, never below `minimum`.
pub fn gutter_width_for(line_count: usize, minimum: usize) -> usize {
    let digits = line_count.max(1).to_string().len();
    (digits + 1).max(minimum)
}

/// Scroll offset, size and gutter of the text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    top_line: usize,
    left_column: usize,
    width: usize,
    height: usize,
    line_number_width: usize,
    tab_width: usize,
}

impl Viewport {
    /// Creates a viewport scrolled to the origin.
    pub fn new(width: usize, height: usize, line_number_width: usize, tab_width: usize) -> Self {
        Self {
            top_line: 0,
            left_column: 0,
            width,
            height,
            line_number_width,
            tab_width: tab_width.max(1),
        }
    }

    // ==================== Getters ====================

    pub fn top_line(&self) -> usize {
        self.top_line
    }

    pub fn left_column(&self) -> usize {
        self.left_column
    }

    /// Total width in columns, gutter included.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn line_number_width(&self) -> usize {
        self.line_number_width
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Columns left for text once the gutter is drawn.
    pub fn text_width(&self) -> usize {
        self.width.saturating_sub(self.line_number_width)
    }

    // ==================== Copy Constructors ====================

    pub fn with_top_line(self, top_line: usize) -> Self {
        Self { top_line, ..self }
    }

    pub fn with_left_column(self, left_column: usize) -> Self {
        Self {
            left_column,
            ..self
        }
    }

    pub fn with_dimensions(self, width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }

    pub fn with_line_number_width(self, line_number_width: usize) -> Self {
        Self {
            line_number_width,
            ..self
        }
    }

    // ==================== Transforms ====================

    /// Returns true if `pos` falls inside the visible text area.
    pub fn is_visible(&self, pos: BufferPos) -> bool {
        self.buffer_to_content(pos).is_ok()
    }

    /// Maps a buffer position into viewport-relative coordinates.
    pub fn buffer_to_content(&self, pos: BufferPos) -> CoordResult<ContentPos> {
        let bottom = self.top_line.saturating_add(self.height);
        if pos.line < self.top_line || pos.line >= bottom {
            return Err(CoordinateError::NotVisible {
                pos,
                reason: format!("line outside rows {}..{}", self.top_line, bottom),
            });
        }
        let right = self.left_column.saturating_add(self.text_width());
        if pos.col < self.left_column || pos.col >= right {
            return Err(CoordinateError::NotVisible {
                pos,
                reason: format!("column outside {}..{}", self.left_column, right),
            });
        }
        Ok(ContentPos {
            line: pos.line - self.top_line,
            col: (pos.col - self.left_column).saturating_add(self.line_number_width),
        })
    }

    /// Places viewport-relative coordinates on the terminal grid.
    ///
    /// The text area starts at the top-left cell, so this is a rename of
    /// axes; it exists to keep the two spaces separate types.
    pub fn content_to_screen(&self, pos: ContentPos) -> ScreenPos {
        ScreenPos {
            row: pos.line,
            col: pos.col,
        }
    }

    /// Maps a buffer position to a screen cell, failing if it is scrolled
    /// out of view.
    pub fn buffer_to_screen(&self, pos: BufferPos) -> CoordResult<ScreenPos> {
        self.buffer_to_content(pos)
            .map(|content| self.content_to_screen(content))
    }

    /// Maps a screen cell back to a buffer position. Never fails; cells in
    /// the gutter map to the scroll column.
    ///
    /// The result may lie outside the document; callers clamp or validate.
    pub fn screen_to_buffer(&self, pos: ScreenPos) -> BufferPos {
        BufferPos {
            line: pos.row.saturating_add(self.top_line),
            col: pos
                .col
                .saturating_sub(self.line_number_width)
                .saturating_add(self.left_column),
        }
    }

    /// Returns the smallest scroll that brings `pos` into view.
    ///
    /// Never centers: a position above or left of the view becomes the first
    /// visible row or column, one below or right becomes the last.
    pub fn scrolled_to_reveal(self, pos: BufferPos) -> Self {
        let mut top_line = self.top_line;
        if self.height > 0 {
            if pos.line < top_line {
                top_line = pos.line;
            } else if pos.line >= top_line.saturating_add(self.height) {
                top_line = pos.line - (self.height - 1);
            }
        }

        let mut left_column = self.left_column;
        let text_width = self.text_width();
        if text_width > 0 {
            if pos.col < left_column {
                left_column = pos.col;
            } else if pos.col >= left_column.saturating_add(text_width) {
                left_column = pos.col - (text_width - 1);
            }
        }

        Self {
            top_line,
            left_column,
            ..self
        }
    }

    /// Display column of char column `col` in `text`, expanding tabs to the
    /// next multiple of `tab_width`. For renderers; cursor transforms count
    /// chars.
    pub fn visual_column(&self, text: &str, col: usize) -> usize {
        text.chars().take(col).fold(0, |visual, ch| {
            if ch == '\t' {
                (visual / self.tab_width + 1) * self.tab_width
            } else {
                visual + 1
            }
        })
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24, 0, 4)
    }
}
