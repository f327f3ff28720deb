//! Contract with the external renderer.
//!
//! ## Learning: Read-Only Views
//!
//! A renderer receives a `RenderView` holding shared borrows of the editor's
//! state. Because the borrows are immutable, the compiler guarantees no
//! renderer can mutate the document, cursor or viewport.

use scribe_buffer::{Document, Line, ScreenPos, Selection, Viewport};

/// Everything a renderer may read for one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    pub document: &'a Document,
    pub viewport: Viewport,
    /// Cursor cell, or `None` when it is scrolled out of view
    pub cursor: Option<ScreenPos>,
    pub selection: Option<Selection>,
}

impl<'a> RenderView<'a> {
    /// Lines inside the viewport's rows, with their buffer line numbers.
    pub fn visible_lines(&self) -> impl Iterator<Item = (usize, &'a Line)> + 'a {
        let top = self.viewport.top_line();
        self.document
            .lines()
            .iter()
            .enumerate()
            .skip(top)
            .take(self.viewport.height())
    }
}

/// Turns a frame into terminal output.
pub trait Renderer {
    fn render(&self, view: &RenderView<'_>) -> String;
}

/// Uncolored renderer: line-number gutter plus the visible slice of each
/// line, one row per output line.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

impl PlainRenderer {
    fn gutter(number: usize, width: usize) -> String {
        if width == 0 {
            return String::new();
        }
        format!("{:>digits$} ", number, digits = width - 1)
    }
}

impl Renderer for PlainRenderer {
    fn render(&self, view: &RenderView<'_>) -> String {
        let viewport = view.viewport;
        let gutter_width = viewport.line_number_width();

        let rows: Vec<String> = view
            .visible_lines()
            .map(|(number, line)| {
                let mut row = Self::gutter(number + 1, gutter_width);
                row.extend(
                    line.text()
                        .chars()
                        .skip(viewport.left_column())
                        .take(viewport.text_width()),
                );
                row
            })
            .collect();
        rows.join("\n")
    }
}
