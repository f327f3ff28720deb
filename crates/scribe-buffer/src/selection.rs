//! Text selection handling.
//!
//! ## Learning: Normalize on Read
//!
//! A selection stores its anchor (`start`) and its moving end (`end`)
//! exactly as the user produced them. Ordering is only applied when the
//! selection is read, so the direction of a selection is always
//! recoverable by comparing the two ends.

use crate::BufferPos;
use serde::{Deserialize, Serialize};

/// A selection of text in the document.
///
/// `start` is the anchor and never moves once set; `end` follows the
/// cursor. The two are not ordered at rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Anchor position
    pub start: BufferPos,
    /// Active position
    pub end: BufferPos,
}

/// Represents the direction of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionDirection {
    /// Selection extends forward (cursor at end)
    Forward,
    /// Selection extends backward (cursor before anchor)
    Backward,
}

impl Selection {
    /// Creates a selection without reordering its ends.
    pub fn new(start: BufferPos, end: BufferPos) -> Self {
        Self { start, end }
    }

    /// Creates a zero-width selection anchored at `pos`.
    pub fn collapsed(pos: BufferPos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Returns `(first, last)` in document order.
    pub fn normalized(&self) -> (BufferPos, BufferPos) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    /// Returns true if both ends coincide.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if the selection spans multiple lines.
    pub fn is_multiline(&self) -> bool {
        self.start.line != self.end.line
    }

    /// Returns the direction of the selection.
    pub fn direction(&self) -> SelectionDirection {
        if self.start <= self.end {
            SelectionDirection::Forward
        } else {
            SelectionDirection::Backward
        }
    }

    /// Returns true if `pos` lies inside the selection (end exclusive).
    pub fn contains(&self, pos: BufferPos) -> bool {
        let (first, last) = self.normalized();
        pos >= first && pos < last
    }
}
