//! Cursor state: the authoritative position, sticky column and selection.
//!
//! ## Learning: Passing Collaborators Instead of Storing Them
//!
//! `CursorManager` needs the document to validate positions, but the editor
//! mutates that same document between cursor updates. Storing a `&Document`
//! here would freeze it for the manager's whole lifetime. Instead each
//! validating method borrows a `PositionValidator` just for the call, and
//! the borrow checker proves the document is not changing underneath it.

use crate::{BufferPos, CoordResult, Document, ScreenPos, Selection, Viewport};

/// Something that can say whether a buffer position exists.
pub trait PositionValidator {
    /// Rejects positions outside the valid range.
    fn validate_buffer_pos(&self, pos: BufferPos) -> CoordResult<()>;
}

impl PositionValidator for Document {
    fn validate_buffer_pos(&self, pos: BufferPos) -> CoordResult<()> {
        Document::validate_buffer_pos(self, pos)
    }
}

/// Owns the single cursor and its selection.
#[derive(Debug, Clone, Default)]
pub struct CursorManager {
    buffer_pos: BufferPos,

    /// Column vertical movement tries to return to
    desired_column: usize,

    selection: Option<Selection>,

    /// Snapshot of the viewport the editor currently shows
    viewport: Viewport,
}

impl CursorManager {
    /// Creates a cursor at the document start.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            buffer_pos: BufferPos::ZERO,
            desired_column: 0,
            selection: None,
            viewport,
        }
    }

    // ==================== Position ====================

    /// The authoritative cursor position.
    pub fn buffer_pos(&self) -> BufferPos {
        self.buffer_pos
    }

    pub fn desired_column(&self) -> usize {
        self.desired_column
    }

    /// Moves the cursor after validating `pos`; resets the desired column.
    ///
    /// On error the state is left unchanged.
    pub fn set_buffer_pos(
        &mut self,
        pos: BufferPos,
        validator: &impl PositionValidator,
    ) -> CoordResult<()> {
        self.set_buffer_pos_with_desired_column(pos, false, validator)
    }

    /// Like `set_buffer_pos`, but keeps the desired column when `preserve`
    /// is true. Vertical movement uses this for sticky columns.
    pub fn set_buffer_pos_with_desired_column(
        &mut self,
        pos: BufferPos,
        preserve: bool,
        validator: &impl PositionValidator,
    ) -> CoordResult<()> {
        validator.validate_buffer_pos(pos)?;
        self.buffer_pos = pos;
        if !preserve {
            self.desired_column = pos.col;
        }
        Ok(())
    }

    // ==================== Selection ====================

    /// The active selection, if any.
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Returns true if a selection with distinct ends exists.
    pub fn has_selection(&self) -> bool {
        self.selection.is_some_and(|sel| !sel.is_empty())
    }

    /// Anchors a new selection at the cursor.
    pub fn start_selection(&mut self) {
        self.selection = Some(Selection::collapsed(self.buffer_pos));
    }

    /// Moves the selection's free end to the cursor, or starts one.
    ///
    /// The anchor never changes once set.
    pub fn extend_selection(&mut self) {
        match self.selection.as_mut() {
            Some(sel) => sel.end = self.buffer_pos,
            None => self.start_selection(),
        }
    }

    /// Replaces the selection wholesale, e.g. for select-all.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // ==================== Screen ====================

    /// The viewport used for screen queries.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Swaps in a new viewport snapshot. Called between operations only.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Screen cell of the cursor; `NotVisible` when scrolled out of view.
    pub fn get_screen_pos(&self) -> CoordResult<ScreenPos> {
        self.viewport.buffer_to_screen(self.buffer_pos)
    }
}
