//! # Scribe Buffer
//!
//! The data layer of the editor: document text, coordinate spaces, cursor
//! state and undo history. Nothing here knows about terminals or key
//! events.
//!
//! ## Key Concepts for Learning Rust
//!
//! ### Ownership & Borrowing
//! - `Document` owns every `Line`; readers get `&str` borrows
//! - `CursorManager` borrows the document only for the duration of a
//!   validation call, never storing it
//! - `Viewport` is `Copy`, so "scrolling" builds a new value
//!
//! ### Typed Coordinates
//! - `BufferPos`, `ContentPos` and `ScreenPos` are distinct types; only a
//!   `Viewport` converts between them

mod cursor;
mod document;
mod history;
mod position;
mod selection;
mod viewport;

pub use cursor::{CursorManager, PositionValidator};
pub use document::{Document, Line, TokenSpan};
pub use history::{Change, ChangeKind, DEFAULT_GROUP_WINDOW, History, HistoryEntry};
pub use position::{BufferPos, ContentPos, ScreenPos};
pub use selection::{Selection, SelectionDirection};
pub use viewport::{Viewport, gutter_width_for};

/// Result type for coordinate operations
pub type CoordResult<T> = Result<T, CoordinateError>;

/// A position that is outside the document or outside the view.
///
/// Always recoverable: callers treat the cursor as off-screen, skip
/// rendering, or clamp and retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinateError {
    #[error("Position {pos} is out of bounds: {reason}")]
    OutOfBounds { pos: BufferPos, reason: String },

    #[error("Position {pos} is not visible: {reason}")]
    NotVisible { pos: BufferPos, reason: String },
}

impl CoordinateError {
    /// The offending position.
    pub fn pos(&self) -> BufferPos {
        match self {
            CoordinateError::OutOfBounds { pos, .. } | CoordinateError::NotVisible { pos, .. } => {
                *pos
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_creation() {
        let doc = Document::new();
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.get_line_length(0), Some(0));
    }

    #[test]
    fn test_edit_and_undo_through_changes() {
        let mut doc = Document::from("abc");
        let history = History::default();

        let before = BufferPos::ZERO;
        let after = doc.insert_char(before, 'X');
        history.add_change(Change::insert(before, "X"), before, after);
        assert_eq!(doc.get_text(), "Xabc");

        let entry = history.undo().unwrap();
        for change in entry.changes.iter().rev() {
            change.inverse().apply_to(&mut doc);
        }
        assert_eq!(doc.get_text(), "abc");
        assert_eq!(entry.cursor_before, BufferPos::ZERO);
    }

    #[test]
    fn test_error_display() {
        let err = CoordinateError::NotVisible {
            pos: BufferPos::new(4, 2),
            reason: "line outside rows 10..34".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Position 5:3 is not visible: line outside rows 10..34"
        );
        assert_eq!(err.pos(), BufferPos::new(4, 2));
    }
}
