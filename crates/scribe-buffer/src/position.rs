//! Position types for the three coordinate spaces.
//!
//! ## Learning: Newtypes Keep Spaces Apart
//!
//! `BufferPos`, `ContentPos` and `ScreenPos` all hold two numbers, but they
//! are distinct types. A function expecting a `ScreenPos` cannot be handed a
//! `BufferPos` by accident; the only way across is through a `Viewport`
//! transform.
//!
//! - `BufferPos`: authoritative line/column in the document (0-indexed,
//!   columns counted in chars, not bytes)
//! - `ContentPos`: viewport-relative line/column, gutter included
//! - `ScreenPos`: terminal row/column

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A position in the document.
///
/// Invariant (enforced by `Document`, not by this type): `line` is below the
/// document's line count and `col` is at most the line's length. `col` equal
/// to the length denotes end-of-line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BufferPos {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed, in chars)
    pub col: usize,
}

impl BufferPos {
    /// Creates a new position.
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// Position at the start of the document.
    pub const ZERO: BufferPos = BufferPos { line: 0, col: 0 };

    /// Returns true if this position is before another.
    pub fn is_before(&self, other: &BufferPos) -> bool {
        self < other
    }

    /// Returns true if this position is after another.
    pub fn is_after(&self, other: &BufferPos) -> bool {
        self > other
    }

    /// Returns the position reached after writing `text` starting here.
    ///
    /// Each `\n` moves to column 0 of the next line.
    pub fn advanced_by(self, text: &str) -> BufferPos {
        match text.rfind('\n') {
            None => BufferPos::new(self.line, self.col + text.chars().count()),
            Some(last_newline) => {
                let newlines = text.matches('\n').count();
                let tail = text[last_newline + 1..].chars().count();
                BufferPos::new(self.line + newlines, tail)
            }
        }
    }
}

impl PartialOrd for BufferPos {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BufferPos {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.line.cmp(&other.line) {
            Ordering::Equal => self.col.cmp(&other.col),
            other => other,
        }
    }
}

impl std::fmt::Display for BufferPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display as 1-indexed for user-facing output
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

/// A viewport-relative position.
///
/// Only a `Viewport` produces these. `col` already includes the line-number
/// gutter width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentPos {
    /// Line offset from the viewport's top line
    pub(crate) line: usize,
    /// Column offset from the left edge, gutter included
    pub(crate) col: usize,
}

impl ContentPos {
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn col(&self) -> usize {
        self.col
    }
}

/// A terminal cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenPos {
    /// Row (0-indexed)
    pub row: usize,
    /// Column (0-indexed), gutter included
    pub col: usize,
}

impl ScreenPos {
    /// Creates a screen position. Used for input such as mouse clicks.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}
