//! Line-oriented document storage.
//!
//! ## Why a Line Array?
//!
//! Every operation the editor performs is addressed by line and column:
//! cursor movement, rendering a viewport, attaching syntax tokens to a line.
//! Keeping one `Line` per row makes those lookups direct and lets tokens live
//! next to the text they describe.
//!
//! ## Learning: Never Panic on Input
//!
//! `Document` is the last line of defense for the bounds invariant, so every
//! method accepts any `BufferPos`. Out-of-range input is either clamped (for
//! movement) or turned into a no-op (for mutation). Only
//! `validate_buffer_pos` rejects, and it does so with a typed error.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{BufferPos, CoordResult, CoordinateError, Selection};

/// A highlight span supplied by the external syntax parser.
///
/// `start` and `end` are char columns within the line; `kind` is opaque to
/// the editing core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
    pub kind: String,
}

impl TokenSpan {
    pub fn new(start: usize, end: usize, kind: impl Into<String>) -> Self {
        Self {
            start,
            end,
            kind: kind.into(),
        }
    }
}

/// One line of text, without its terminating newline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    text: String,
    /// Length in chars, cached
    length: usize,
    tokens: Vec<TokenSpan>,
}

impl Line {
    fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let length = text.chars().count();
        Self {
            text,
            length,
            tokens: Vec::new(),
        }
    }

    /// The line's text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Highlight tokens last attached by the parser.
    pub fn tokens(&self) -> &[TokenSpan] {
        &self.tokens
    }

    fn chars(&self) -> Vec<char> {
        self.text.chars().collect()
    }

    /// Converts a char column into a byte offset. `col` must be <= length.
    fn byte_index(&self, col: usize) -> usize {
        self.text
            .char_indices()
            .nth(col)
            .map_or(self.text.len(), |(idx, _)| idx)
    }

    fn insert_char(&mut self, col: usize, ch: char) {
        let idx = self.byte_index(col);
        self.text.insert(idx, ch);
        self.length += 1;
    }

    fn remove_char(&mut self, col: usize) -> char {
        let idx = self.byte_index(col);
        self.length -= 1;
        self.text.remove(idx)
    }

    /// Splits at `col`, keeping the head here and returning the tail.
    fn split_off(&mut self, col: usize) -> Line {
        let idx = self.byte_index(col);
        let tail = self.text.split_off(idx);
        self.length = col;
        Line::new(tail)
    }

    fn append(&mut self, other: Line) {
        self.text.push_str(&other.text);
        self.length += other.length;
    }

    /// Text between two char columns.
    fn slice(&self, from: usize, to: usize) -> &str {
        &self.text[self.byte_index(from)..self.byte_index(to)]
    }
}

fn is_word_break(ch: char) -> bool {
    ch.is_whitespace()
}

/// The document being edited.
///
/// Always holds at least one line; an empty document is a single empty line.
#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<Line>,

    /// Last known file path
    filename: Option<PathBuf>,

    /// Whether the document has unsaved changes
    modified: bool,
}

impl Document {
    /// Creates an empty document.
    ///
    /// # Example
    /// ```
    /// use scribe_buffer::Document;
    ///
    /// let doc = Document::new();
    /// assert_eq!(doc.line_count(), 1);
    /// assert_eq!(doc.get_text(), "");
    /// ```
    pub fn new() -> Self {
        Self {
            lines: vec![Line::default()],
            filename: None,
            modified: false,
        }
    }

    /// Creates a document from raw text, splitting on `\n`.
    ///
    /// A trailing newline yields a trailing empty line, so `get_text`
    /// reproduces the input exactly.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(Line::new).collect(),
            filename: None,
            modified: false,
        }
    }

    /// Loads a document from disk.
    ///
    /// A missing file yields an empty document remembering `path`, so the
    /// file is created on first save. Unreadable or non-UTF-8 files fail.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let mut doc = match std::fs::read_to_string(path) {
            Ok(content) => Self::from_text(&content),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Self::new(),
            Err(err) => return Err(err),
        };
        doc.filename = Some(path.to_path_buf());
        Ok(doc)
    }

    /// Writes the joined text to `path` and remembers it as the filename.
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();

        // Write to a temporary file first, then rename (atomic write)
        let temp_path = path.with_extension("scribe-tmp");
        std::fs::write(&temp_path, self.get_text().as_bytes())?;
        if let Err(err) = std::fs::rename(&temp_path, path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(err);
        }

        self.filename = Some(path.to_path_buf());
        self.mark_saved();
        Ok(())
    }

    // ==================== Text Access ====================

    /// Number of lines (always at least 1).
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Text of line `n`, if it exists.
    pub fn get_line(&self, n: usize) -> Option<&str> {
        self.lines.get(n).map(Line::text)
    }

    /// Length of line `n` in chars, if it exists.
    pub fn get_line_length(&self, n: usize) -> Option<usize> {
        self.lines.get(n).map(Line::len)
    }

    /// All lines.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Whole document, lines joined with `\n`.
    pub fn get_text(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&line.text);
        }
        out
    }

    /// Position just past the last char of the document.
    pub fn end_position(&self) -> BufferPos {
        let last = self.lines.len() - 1;
        BufferPos::new(last, self.lines[last].len())
    }

    fn line_len(&self, n: usize) -> usize {
        self.lines.get(n).map_or(0, Line::len)
    }

    /// Extracts the text between the normalized ends of `selection`.
    ///
    /// Both ends are clamped first, so a selection lying wholly outside the
    /// document yields an empty string.
    pub fn get_selection_text(&self, selection: &Selection) -> String {
        let (start, end) = selection.normalized();
        self.text_between(start, end)
    }

    fn text_between(&self, start: BufferPos, end: BufferPos) -> String {
        let start = self.validate_position(start);
        let end = self.validate_position(end);
        if start >= end {
            return String::new();
        }

        if start.line == end.line {
            return self.lines[start.line].slice(start.col, end.col).to_string();
        }

        let first = &self.lines[start.line];
        let mut out = first.slice(start.col, first.len()).to_string();
        for line in &self.lines[start.line + 1..end.line] {
            out.push('\n');
            out.push_str(&line.text);
        }
        out.push('\n');
        out.push_str(self.lines[end.line].slice(0, end.col));
        out
    }

    // ==================== Mutations ====================

    /// Inserts one char at `pos` and returns the position after it.
    ///
    /// Out-of-range lines are a no-op; the column is clamped. A `'\n'` is
    /// routed to `insert_newline`.
    pub fn insert_char(&mut self, pos: BufferPos, ch: char) -> BufferPos {
        if ch == '\n' {
            return self.insert_newline(pos);
        }
        let Some(line) = self.lines.get_mut(pos.line) else {
            return pos;
        };
        let col = pos.col.min(line.len());
        line.insert_char(col, ch);
        self.modified = true;
        BufferPos::new(pos.line, col + 1)
    }

    /// Splits the line at `pos`, returning the start of the new line.
    pub fn insert_newline(&mut self, pos: BufferPos) -> BufferPos {
        let Some(line) = self.lines.get_mut(pos.line) else {
            return pos;
        };
        let col = pos.col.min(line.len());
        let tail = line.split_off(col);
        self.lines.insert(pos.line + 1, tail);
        self.modified = true;
        BufferPos::new(pos.line + 1, 0)
    }

    /// Inserts `text`, char by char, and returns the position after it.
    pub fn insert_str(&mut self, pos: BufferPos, text: &str) -> BufferPos {
        if pos.line >= self.lines.len() {
            return pos;
        }
        let mut at = BufferPos::new(pos.line, pos.col.min(self.line_len(pos.line)));
        for ch in text.chars() {
            at = if ch == '\n' {
                self.insert_newline(at)
            } else {
                self.insert_char(at, ch)
            };
        }
        at
    }

    /// Backspace: deletes the char before `pos`.
    ///
    /// No-op at column 0 or on an out-of-range line.
    pub fn delete_char(&mut self, pos: BufferPos) -> BufferPos {
        let Some(line) = self.lines.get_mut(pos.line) else {
            return pos;
        };
        let col = pos.col.min(line.len());
        if col == 0 {
            return pos;
        }
        line.remove_char(col - 1);
        self.modified = true;
        BufferPos::new(pos.line, col - 1)
    }

    /// Backspace at column 0: merges line `pos.line` into the previous one.
    ///
    /// Returns the join point, i.e. the old end of the previous line.
    pub fn delete_line(&mut self, pos: BufferPos) -> BufferPos {
        if pos.line == 0 || pos.line >= self.lines.len() {
            return pos;
        }
        let line = self.lines.remove(pos.line);
        let prev = &mut self.lines[pos.line - 1];
        let join = prev.len();
        prev.append(line);
        self.modified = true;
        BufferPos::new(pos.line - 1, join)
    }

    /// Delete key: removes the char at `pos`, or joins the next line when
    /// `pos` is at end of line. No-op at document end.
    pub fn delete_forward(&mut self, pos: BufferPos) -> BufferPos {
        if pos.line >= self.lines.len() {
            return pos;
        }
        let pos = self.validate_position(pos);
        if pos.col < self.lines[pos.line].len() {
            self.lines[pos.line].remove_char(pos.col);
            self.modified = true;
        } else if pos.line + 1 < self.lines.len() {
            self.delete_line(BufferPos::new(pos.line + 1, 0));
        }
        pos
    }

    /// Removes the text between `start` and `end` (any order, clamped) and
    /// returns it.
    pub fn delete_range(&mut self, start: BufferPos, end: BufferPos) -> String {
        let (start, end) = Selection::new(start, end).normalized();
        let start = self.validate_position(start);
        let end = self.validate_position(end);
        let removed = self.text_between(start, end);
        if removed.is_empty() {
            return removed;
        }

        if start.line == end.line {
            let line = &mut self.lines[start.line];
            let tail = line.split_off(end.col);
            line.split_off(start.col);
            line.append(tail);
        } else {
            let tail = self.lines[end.line].split_off(end.col);
            self.lines.drain(start.line + 1..=end.line);
            let first = &mut self.lines[start.line];
            first.split_off(start.col);
            first.append(tail);
        }
        self.modified = true;
        removed
    }

    // ==================== Word Navigation ====================

    /// Start of the word run ending at `pos`, on the same line.
    pub fn find_word_start(&self, pos: BufferPos) -> BufferPos {
        let pos = self.validate_position(pos);
        let chars = self.lines[pos.line].chars();
        let mut col = pos.col;
        while col > 0 && !is_word_break(chars[col - 1]) {
            col -= 1;
        }
        BufferPos::new(pos.line, col)
    }

    /// End of the word run starting at `pos`, on the same line.
    pub fn find_word_end(&self, pos: BufferPos) -> BufferPos {
        let pos = self.validate_position(pos);
        let chars = self.lines[pos.line].chars();
        let mut col = pos.col;
        while col < chars.len() && !is_word_break(chars[col]) {
            col += 1;
        }
        BufferPos::new(pos.line, col)
    }

    /// Moves to the start of the previous word, crossing lines.
    ///
    /// Skips whitespace backwards (line breaks count as whitespace, so blank
    /// lines are passed through), then the word run before it.
    pub fn move_cursor_word_left(&self, pos: BufferPos) -> BufferPos {
        let mut pos = self.validate_position(pos);
        loop {
            let chars = self.lines[pos.line].chars();
            while pos.col > 0 && is_word_break(chars[pos.col - 1]) {
                pos.col -= 1;
            }
            if pos.col > 0 || pos.line == 0 {
                break;
            }
            pos = BufferPos::new(pos.line - 1, self.line_len(pos.line - 1));
        }
        self.find_word_start(pos)
    }

    /// Moves to the start of the next word, crossing lines.
    ///
    /// Skips the rest of the current word run, then whitespace forwards
    /// (line breaks included). Stops at document end.
    pub fn move_cursor_word_right(&self, pos: BufferPos) -> BufferPos {
        let mut pos = self.find_word_end(pos);
        loop {
            let chars = self.lines[pos.line].chars();
            while pos.col < chars.len() && is_word_break(chars[pos.col]) {
                pos.col += 1;
            }
            if pos.col < chars.len() || pos.line + 1 >= self.lines.len() {
                return pos;
            }
            pos = BufferPos::new(pos.line + 1, 0);
        }
    }

    // ==================== Validation ====================

    /// Clamps `pos` into the document.
    pub fn validate_position(&self, pos: BufferPos) -> BufferPos {
        let line = pos.line.min(self.lines.len() - 1);
        BufferPos::new(line, pos.col.min(self.lines[line].len()))
    }

    /// Strict check: rejects positions outside the document.
    pub fn validate_buffer_pos(&self, pos: BufferPos) -> CoordResult<()> {
        let Some(line) = self.lines.get(pos.line) else {
            return Err(CoordinateError::OutOfBounds {
                pos,
                reason: format!("line {} beyond last line {}", pos.line, self.lines.len() - 1),
            });
        };
        if pos.col > line.len() {
            return Err(CoordinateError::OutOfBounds {
                pos,
                reason: format!("column {} beyond line length {}", pos.col, line.len()),
            });
        }
        Ok(())
    }

    // ==================== Syntax Tokens ====================

    /// Attaches parser tokens to line `n`. Ignored for out-of-range lines.
    pub fn set_line_tokens(&mut self, n: usize, tokens: Vec<TokenSpan>) {
        if let Some(line) = self.lines.get_mut(n) {
            line.tokens = tokens;
        }
    }

    /// Tokens attached to line `n`; empty for out-of-range lines.
    pub fn get_line_tokens(&self, n: usize) -> &[TokenSpan] {
        self.lines.get(n).map(Line::tokens).unwrap_or_default()
    }

    // ==================== State Queries ====================

    /// Last known file path.
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn set_filename(&mut self, path: impl Into<PathBuf>) {
        self.filename = Some(path.into());
    }

    /// Returns true if the document has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clears the modified flag, e.g. after an external save.
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Document {
    fn from(s: &str) -> Self {
        Self::from_text(s)
    }
}
