//! Main editor orchestration.
//!
//! ## Learning: The Facade Pattern
//!
//! `Editor` is the only type callers talk to. Every intent flows one way:
//!
//! ```text
//! Editor ──▶ Document (content) ──▶ new BufferPos ──▶ CursorManager
//!                                                       │
//!                        History ◀── Change             ▼
//!                                                    Viewport (reveal)
//! ```
//!
//! Renderers read the result through `render_view` and never write.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use scribe_buffer::{
    BufferPos, Change, CursorManager, Document, History, HistoryEntry, ScreenPos, Selection,
    Viewport, gutter_width_for,
};
use tokio::task::JoinHandle;

use crate::config::EditorConfig;
use crate::event::{EditorEvent, EventBus};
use crate::render::{RenderView, Renderer};
use crate::syntax::SyntaxParser;
use crate::timer::spawn_group_closer;
use crate::{CoreError, CoreResult};

/// A cursor movement intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    Left,
    Right,
    Up,
    Down,
    WordLeft,
    WordRight,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
}

impl Movement {
    /// Vertical moves keep the sticky column; all others reset it.
    fn is_vertical(self) -> bool {
        matches!(self, Movement::Up | Movement::Down)
    }
}

/// The editing core: one document, one cursor, one history, one viewport.
///
/// ## Thread Safety
///
/// `Editor` is owned by the event-loop thread and every method runs to
/// completion. The only shared piece is `History`, which a timer task may
/// close concurrently; it synchronizes internally.
pub struct Editor {
    document: Document,

    /// Cursor and selection
    cursor: CursorManager,

    /// Undo/redo history, shared with the group-closer task
    history: Arc<History>,

    /// The viewport currently shown
    viewport: Viewport,

    /// Clipboard content
    clipboard: String,

    config: EditorConfig,

    /// Injected syntax parser
    parser: Option<Box<dyn SyntaxParser>>,

    /// Event bus for notifications
    event_bus: EventBus,
}

impl Editor {
    /// Creates an editor with an empty document.
    pub fn new(config: EditorConfig) -> Self {
        let viewport = Viewport::new(
            usize::from(config.viewport_width),
            usize::from(config.viewport_height),
            config.initial_gutter_width(),
            config.tab_width,
        );
        let history = History::new(config.undo_limit, config.group_window());

        let mut editor = Self {
            document: Document::new(),
            cursor: CursorManager::new(viewport),
            history: Arc::new(history),
            viewport,
            clipboard: String::new(),
            config,
            parser: None,
            event_bus: EventBus::new(),
        };
        editor.sync_gutter();
        editor
    }

    /// Creates an editor that tokenizes lines with `parser`.
    pub fn with_parser(config: EditorConfig, parser: Box<dyn SyntaxParser>) -> Self {
        let mut editor = Self::new(config);
        editor.parser = Some(parser);
        editor
    }

    /// Creates an editor over in-memory text, with no filename.
    pub fn from_text(config: EditorConfig, text: &str) -> Self {
        let mut editor = Self::new(config);
        editor.replace_document(Document::from_text(text));
        editor
    }

    // ==================== Read Access ====================

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn cursor(&self) -> &CursorManager {
        &self.cursor
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn history(&self) -> &Arc<History> {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn clipboard(&self) -> &str {
        &self.clipboard
    }

    /// The authoritative cursor position.
    pub fn buffer_pos(&self) -> BufferPos {
        self.cursor.buffer_pos()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.cursor.selection()
    }

    /// Text inside the selection, if one is active.
    pub fn selected_text(&self) -> Option<String> {
        self.active_selection()
            .map(|sel| self.document.get_selection_text(&sel))
    }

    pub fn line_count(&self) -> usize {
        self.document.line_count()
    }

    pub fn get_line(&self, n: usize) -> Option<&str> {
        self.document.get_line(n)
    }

    pub fn get_line_length(&self, n: usize) -> Option<usize> {
        self.document.get_line_length(n)
    }

    pub fn get_text(&self) -> String {
        self.document.get_text()
    }

    /// Screen cell of the cursor; fails when it is scrolled out of view.
    pub fn get_screen_pos(&self) -> CoreResult<ScreenPos> {
        Ok(self.cursor.get_screen_pos()?)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_modified(&self) -> bool {
        self.document.is_modified()
    }

    /// Subscribes to editor events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<EditorEvent> {
        self.event_bus.subscribe()
    }

    // ==================== Rendering ====================

    /// Read-only snapshot for a renderer.
    pub fn render_view(&self) -> RenderView<'_> {
        RenderView {
            document: &self.document,
            viewport: self.viewport,
            cursor: self.cursor.get_screen_pos().ok(),
            selection: self.active_selection(),
        }
    }

    pub fn render(&self, renderer: &dyn Renderer) -> String {
        renderer.render(&self.render_view())
    }

    // ==================== File Operations ====================

    /// Replaces the document with the contents of `path`.
    ///
    /// A missing file starts an empty document that will be created on
    /// save. On a read error the current document is left untouched.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        let document = Document::load(path)?;
        tracing::info!(path = %path.display(), lines = document.line_count(), "document loaded");

        self.replace_document(document);
        self.emit(EditorEvent::DocumentLoaded(path.to_path_buf()));
        Ok(())
    }

    /// Writes the document to `path`, or to its last known filename.
    ///
    /// Returns the path written.
    pub fn save_file(&mut self, path: Option<&Path>) -> CoreResult<PathBuf> {
        let target = match path {
            Some(path) => path.to_path_buf(),
            None => self
                .document
                .filename()
                .map(Path::to_path_buf)
                .ok_or(CoreError::NoFilename)?,
        };

        self.history.close_group();
        self.document.save_to(&target)?;
        tracing::info!(path = %target.display(), "document saved");

        self.emit(EditorEvent::DocumentSaved(target.clone()));
        Ok(target)
    }

    fn replace_document(&mut self, document: Document) {
        self.document = document;
        self.history.clear();

        self.viewport = self.viewport.with_top_line(0).with_left_column(0);
        self.cursor = CursorManager::new(self.viewport);

        let last = self.document.line_count() - 1;
        self.refresh_tokens(0..=last);
        self.sync_gutter();
    }

    // ==================== Cursor Movement ====================

    /// Moves the cursor, optionally extending the selection.
    ///
    /// Closes the open undo group, so typing, moving and typing again gives
    /// two undo steps.
    pub fn move_cursor(&mut self, movement: Movement, extend_selection: bool) -> CoreResult<()> {
        self.history.close_group();

        if extend_selection {
            if self.cursor.selection().is_none() {
                self.cursor.start_selection();
            }
        } else {
            self.clear_selection();
        }

        let target = self.movement_target(movement);
        self.cursor.set_buffer_pos_with_desired_column(
            target,
            movement.is_vertical(),
            &self.document,
        )?;

        if extend_selection {
            self.cursor.extend_selection();
            self.emit(EditorEvent::SelectionChanged);
        }
        self.cursor_moved();
        Ok(())
    }

    /// Computes where `movement` leads from the current position.
    fn movement_target(&self, movement: Movement) -> BufferPos {
        let doc = &self.document;
        let pos = doc.validate_position(self.cursor.buffer_pos());
        let line_len = |line: usize| doc.get_line_length(line).unwrap_or(0);
        let last_line = doc.line_count() - 1;

        match movement {
            Movement::Left if pos.col > 0 => BufferPos::new(pos.line, pos.col - 1),
            Movement::Left if pos.line > 0 => BufferPos::new(pos.line - 1, line_len(pos.line - 1)),
            Movement::Right if pos.col < line_len(pos.line) => BufferPos::new(pos.line, pos.col + 1),
            Movement::Right if pos.line < last_line => BufferPos::new(pos.line + 1, 0),
            Movement::Up if pos.line > 0 => {
                let line = pos.line - 1;
                BufferPos::new(line, self.cursor.desired_column().min(line_len(line)))
            }
            Movement::Down if pos.line < last_line => {
                let line = pos.line + 1;
                BufferPos::new(line, self.cursor.desired_column().min(line_len(line)))
            }
            Movement::WordLeft => doc.move_cursor_word_left(pos),
            Movement::WordRight => doc.move_cursor_word_right(pos),
            Movement::LineStart => BufferPos::new(pos.line, 0),
            Movement::LineEnd => BufferPos::new(pos.line, line_len(pos.line)),
            Movement::DocumentStart => BufferPos::ZERO,
            Movement::DocumentEnd => doc.end_position(),
            // Already at the edge
            Movement::Left | Movement::Right | Movement::Up | Movement::Down => pos,
        }
    }

    pub fn move_cursor_left(&mut self) -> CoreResult<()> {
        self.move_cursor(Movement::Left, false)
    }

    pub fn move_cursor_right(&mut self) -> CoreResult<()> {
        self.move_cursor(Movement::Right, false)
    }

    pub fn move_cursor_up(&mut self) -> CoreResult<()> {
        self.move_cursor(Movement::Up, false)
    }

    pub fn move_cursor_down(&mut self) -> CoreResult<()> {
        self.move_cursor(Movement::Down, false)
    }

    pub fn move_cursor_word_left(&mut self) -> CoreResult<()> {
        self.move_cursor(Movement::WordLeft, false)
    }

    pub fn move_cursor_word_right(&mut self) -> CoreResult<()> {
        self.move_cursor(Movement::WordRight, false)
    }

    pub fn move_cursor_to_line_start(&mut self) -> CoreResult<()> {
        self.move_cursor(Movement::LineStart, false)
    }

    pub fn move_cursor_to_line_end(&mut self) -> CoreResult<()> {
        self.move_cursor(Movement::LineEnd, false)
    }

    pub fn move_cursor_to_document_start(&mut self) -> CoreResult<()> {
        self.move_cursor(Movement::DocumentStart, false)
    }

    pub fn move_cursor_to_document_end(&mut self) -> CoreResult<()> {
        self.move_cursor(Movement::DocumentEnd, false)
    }

    /// Jumps to `pos` (goto-line). Rejects positions outside the document
    /// and leaves the cursor where it was.
    pub fn move_cursor_to(&mut self, pos: BufferPos) -> CoreResult<()> {
        self.cursor.set_buffer_pos(pos, &self.document)?;
        self.history.close_group();
        self.clear_selection();
        self.cursor_moved();
        Ok(())
    }

    /// Places the cursor under a screen cell (mouse click). Cells past the
    /// end of a line or below the document land on the nearest position.
    pub fn move_cursor_to_screen(&mut self, screen: ScreenPos) -> CoreResult<()> {
        let pos = self.viewport.screen_to_buffer(screen);
        let pos = self.document.validate_position(pos);
        self.move_cursor_to(pos)
    }

    fn cursor_moved(&mut self) {
        self.adjust_viewport();
        self.emit(EditorEvent::CursorMoved(self.cursor.buffer_pos()));
    }

    // ==================== Selection ====================

    /// Anchors a selection at the cursor.
    pub fn start_selection(&mut self) {
        self.cursor.start_selection();
        self.emit(EditorEvent::SelectionChanged);
    }

    /// Moves the selection's free end to the cursor.
    pub fn extend_selection(&mut self) {
        self.cursor.extend_selection();
        self.emit(EditorEvent::SelectionChanged);
    }

    pub fn clear_selection(&mut self) {
        if self.cursor.selection().is_some() {
            self.cursor.clear_selection();
            self.emit(EditorEvent::SelectionChanged);
        }
    }

    /// Selects the whole document, leaving the cursor at its end.
    pub fn select_all(&mut self) -> CoreResult<()> {
        let end = self.document.end_position();
        self.history.close_group();
        self.cursor.set_buffer_pos(end, &self.document)?;
        self.cursor.set_selection(Selection::new(BufferPos::ZERO, end));
        self.emit(EditorEvent::SelectionChanged);
        self.cursor_moved();
        Ok(())
    }

    /// The selection, if it covers any text.
    fn active_selection(&self) -> Option<Selection> {
        self.cursor.selection().filter(|sel| !sel.is_empty())
    }

    // ==================== Text Editing ====================

    /// Inserts `text` at the cursor, replacing the selection if any.
    ///
    /// `\n` in `text` splits lines.
    pub fn insert_text(&mut self, text: &str) -> CoreResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let before = self.cursor.buffer_pos();

        let (start, change) = match self.active_selection() {
            Some(sel) => {
                let (start, end) = sel.normalized();
                let removed = self.document.delete_range(start, end);
                (start, Change::replace(start, removed, text))
            }
            None => {
                let start = self.document.validate_position(before);
                (start, Change::insert(start, text))
            }
        };

        let after = self.document.insert_str(start, text);
        self.commit_edit(change, before, after, start.line..=after.line)
    }

    pub fn insert_char(&mut self, ch: char) -> CoreResult<()> {
        let mut buf = [0u8; 4];
        self.insert_text(ch.encode_utf8(&mut buf))
    }

    pub fn insert_newline(&mut self) -> CoreResult<()> {
        self.insert_text("\n")
    }

    /// Backspace: deletes the selection, the char before the cursor, or the
    /// line break before the cursor when at column 0.
    pub fn delete_text(&mut self) -> CoreResult<()> {
        if self.active_selection().is_some() {
            return self.delete_selection();
        }
        let before = self.document.validate_position(self.cursor.buffer_pos());

        if before.col > 0 {
            let removed = self
                .document
                .get_line(before.line)
                .and_then(|line| line.chars().nth(before.col - 1));
            let Some(removed) = removed else {
                return Ok(());
            };
            let after = self.document.delete_char(before);
            self.commit_edit(
                Change::delete(after, removed.to_string()),
                before,
                after,
                after.line..=after.line,
            )
        } else if before.line > 0 {
            let after = self.document.delete_line(before);
            self.commit_edit(Change::delete(after, "\n"), before, after, after.line..=after.line)
        } else {
            Ok(())
        }
    }

    /// Delete key: deletes the selection, the char under the cursor, or the
    /// following line break.
    pub fn delete_forward(&mut self) -> CoreResult<()> {
        if self.active_selection().is_some() {
            return self.delete_selection();
        }
        let pos = self.document.validate_position(self.cursor.buffer_pos());
        if pos == self.document.end_position() {
            return Ok(());
        }

        let removed = self
            .document
            .get_line(pos.line)
            .and_then(|line| line.chars().nth(pos.col))
            .map_or_else(|| "\n".to_string(), |ch| ch.to_string());
        let after = self.document.delete_forward(pos);
        self.commit_edit(Change::delete(pos, removed), pos, after, pos.line..=pos.line)
    }

    /// Removes the selected text and collapses the cursor to its start.
    pub fn delete_selection(&mut self) -> CoreResult<()> {
        let Some(sel) = self.active_selection() else {
            self.clear_selection();
            return Ok(());
        };
        let before = self.cursor.buffer_pos();
        let (start, end) = sel.normalized();
        let removed = self.document.delete_range(start, end);
        if removed.is_empty() {
            self.clear_selection();
            return Ok(());
        }
        self.commit_edit(Change::delete(start, removed), before, start, start.line..=start.line)
    }

    /// Records `change`, moves the cursor to `after` and refreshes
    /// everything derived from the text.
    fn commit_edit(
        &mut self,
        change: Change,
        before: BufferPos,
        after: BufferPos,
        touched: RangeInclusive<usize>,
    ) -> CoreResult<()> {
        let first_line = *touched.start();
        self.history.add_change(change, before, after);
        self.clear_selection();
        self.cursor.set_buffer_pos(after, &self.document)?;

        self.refresh_tokens(touched);
        self.sync_gutter();
        self.emit(EditorEvent::DocumentChanged { first_line });
        self.cursor_moved();
        Ok(())
    }

    // ==================== Undo/Redo ====================

    /// Undoes the last group. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> CoreResult<bool> {
        let Some(entry) = self.history.undo() else {
            return Ok(false);
        };
        tracing::debug!(changes = entry.changes.len(), "undo");

        let first_line = self.replay(&entry, true);
        self.restore_cursor(entry.cursor_before)?;
        self.finish_replay(first_line);
        Ok(true)
    }

    /// Redoes the last undone group. Returns false if there was nothing to
    /// redo.
    pub fn redo(&mut self) -> CoreResult<bool> {
        let Some(entry) = self.history.redo() else {
            return Ok(false);
        };
        tracing::debug!(changes = entry.changes.len(), "redo");

        let first_line = self.replay(&entry, false);
        self.restore_cursor(entry.cursor_after)?;
        self.finish_replay(first_line);
        Ok(true)
    }

    /// Applies an entry straight to the document: inverted and in reverse
    /// order for undo, as recorded for redo. Returns the first line touched.
    fn replay(&mut self, entry: &HistoryEntry, undo: bool) -> usize {
        let mut first_line = usize::MAX;
        let mut apply = |editor: &mut Self, change: &Change| {
            let end = change.apply_to(&mut editor.document);
            editor.refresh_tokens(change.position.line..=end.line);
            first_line = first_line.min(change.position.line);
        };

        if undo {
            for change in entry.changes.iter().rev() {
                apply(self, &change.inverse());
            }
        } else {
            for change in &entry.changes {
                apply(self, change);
            }
        }
        first_line
    }

    fn restore_cursor(&mut self, pos: BufferPos) -> CoreResult<()> {
        self.cursor.clear_selection();
        if self.cursor.set_buffer_pos(pos, &self.document).is_err() {
            let clamped = self.document.validate_position(pos);
            tracing::warn!(%pos, %clamped, "restored cursor clamped into document");
            self.cursor.set_buffer_pos(clamped, &self.document)?;
        }
        Ok(())
    }

    fn finish_replay(&mut self, first_line: usize) {
        self.sync_gutter();
        self.emit(EditorEvent::DocumentChanged { first_line });
        self.emit(EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
        self.cursor_moved();
    }

    /// Ends the open undo group now instead of waiting for the window.
    pub fn commit_history_group(&self) {
        self.history.close_group();
    }

    /// Starts a tokio task that closes idle undo groups. Must be called
    /// from within a tokio runtime. The task ends on its own once the
    /// editor is dropped.
    pub fn spawn_group_closer(&self) -> JoinHandle<()> {
        let period = (self.history.group_window() / 4).max(Duration::from_millis(10));
        spawn_group_closer(&self.history, period)
    }

    // ==================== Clipboard ====================

    /// Copies the selection to the clipboard. Without a selection the
    /// clipboard is left alone.
    pub fn copy(&mut self) {
        if let Some(text) = self.selected_text() {
            self.clipboard = text;
        }
    }

    /// Copies the selection, then deletes it.
    pub fn cut(&mut self) -> CoreResult<()> {
        self.copy();
        self.delete_selection()
    }

    /// Inserts the clipboard at the cursor.
    pub fn paste(&mut self) -> CoreResult<()> {
        let text = self.clipboard.clone();
        self.insert_text(&text)
    }

    // ==================== Viewport ====================

    /// Scrolls without moving the cursor, which may leave it off-screen.
    pub fn scroll_to(&mut self, top_line: usize) {
        let top_line = top_line.min(self.document.line_count() - 1);
        self.swap_viewport(self.viewport.with_top_line(top_line));
    }

    /// Resizes the viewport and scrolls the cursor back into view.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.swap_viewport(self.viewport.with_dimensions(width, height));
        self.adjust_viewport();
    }

    /// Scrolls the minimum needed to show the cursor.
    fn adjust_viewport(&mut self) {
        let revealed = self.viewport.scrolled_to_reveal(self.cursor.buffer_pos());
        self.swap_viewport(revealed);
    }

    /// Widens or narrows the gutter to fit the line count.
    fn sync_gutter(&mut self) {
        if !self.config.line_numbers {
            return;
        }
        let width = gutter_width_for(self.document.line_count(), self.config.gutter_width);
        if width != self.viewport.line_number_width() {
            self.swap_viewport(self.viewport.with_line_number_width(width));
        }
    }

    /// Installs a new viewport in both the editor and the cursor manager.
    fn swap_viewport(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        let scrolled = viewport.top_line() != self.viewport.top_line()
            || viewport.left_column() != self.viewport.left_column();

        self.viewport = viewport;
        self.cursor.set_viewport(viewport);

        if scrolled {
            tracing::debug!(
                top_line = viewport.top_line(),
                left_column = viewport.left_column(),
                "viewport scrolled"
            );
            self.emit(EditorEvent::ViewportScrolled {
                top_line: viewport.top_line(),
                left_column: viewport.left_column(),
            });
        }
    }

    // ==================== Syntax ====================

    /// Re-tokenizes `lines` with the injected parser, if any.
    fn refresh_tokens(&mut self, lines: RangeInclusive<usize>) {
        let Some(parser) = self.parser.as_deref() else {
            return;
        };
        let last = (*lines.end()).min(self.document.line_count() - 1);
        for n in *lines.start()..=last {
            let Some(text) = self.document.get_line(n) else {
                continue;
            };
            let tokens = parser.tokenize_line(text);
            self.document.set_line_tokens(n, tokens);
        }
    }

    // ==================== Events ====================

    fn emit(&self, event: EditorEvent) {
        self.event_bus.emit(event);
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_buffer::{CoordinateError, TokenSpan};

    fn editor(text: &str) -> Editor {
        Editor::from_text(EditorConfig::default(), text)
    }

    fn pos(line: usize, col: usize) -> BufferPos {
        BufferPos::new(line, col)
    }

    #[test]
    fn test_word_right_twice() {
        let mut ed = editor("hello world");
        ed.move_cursor_word_right().unwrap();
        assert_eq!(ed.buffer_pos(), pos(0, 6));
        ed.move_cursor_word_right().unwrap();
        assert_eq!(ed.buffer_pos(), pos(0, 11));
    }

    #[test]
    fn test_insert_then_undo() {
        let mut ed = editor("abc");
        ed.insert_text("X").unwrap();
        assert_eq!(ed.get_text(), "Xabc");
        assert_eq!(ed.buffer_pos(), pos(0, 1));

        assert!(ed.undo().unwrap());
        assert_eq!(ed.get_text(), "abc");
        assert_eq!(ed.buffer_pos(), pos(0, 0));

        assert!(ed.redo().unwrap());
        assert_eq!(ed.get_text(), "Xabc");
        assert_eq!(ed.buffer_pos(), pos(0, 1));
    }

    #[test]
    fn test_backspace_at_column_zero_joins_lines() {
        let mut ed = editor("foo\nbar");
        ed.move_cursor_to(pos(1, 0)).unwrap();
        ed.delete_text().unwrap();
        assert_eq!(ed.get_text(), "foobar");
        assert_eq!(ed.buffer_pos(), pos(0, 3));

        ed.undo().unwrap();
        assert_eq!(ed.get_text(), "foo\nbar");
        assert_eq!(ed.buffer_pos(), pos(1, 0));
    }

    #[test]
    fn test_typing_burst_is_one_undo_step() {
        let mut ed = editor("");
        for ch in ['a', 'b', 'c'] {
            ed.insert_char(ch).unwrap();
        }
        assert_eq!(ed.get_text(), "abc");
        assert!(ed.undo().unwrap());
        assert_eq!(ed.get_text(), "");
        assert!(!ed.can_undo());
    }

    #[test]
    fn test_movement_closes_undo_group() {
        let mut ed = editor("");
        ed.insert_text("ab").unwrap();
        ed.move_cursor_left().unwrap();
        ed.insert_text("X").unwrap();
        assert_eq!(ed.get_text(), "aXb");

        ed.undo().unwrap();
        assert_eq!(ed.get_text(), "ab");
        assert_eq!(ed.buffer_pos(), pos(0, 1));
        ed.undo().unwrap();
        assert_eq!(ed.get_text(), "");
    }

    #[test]
    fn test_sticky_column() {
        let mut ed = editor("long line here\nab\nanother long line");
        ed.move_cursor_to(pos(0, 10)).unwrap();
        ed.move_cursor_down().unwrap();
        assert_eq!(ed.buffer_pos(), pos(1, 2));
        ed.move_cursor_down().unwrap();
        assert_eq!(ed.buffer_pos(), pos(2, 10));

        // Horizontal movement resets the desired column
        ed.move_cursor_left().unwrap();
        ed.move_cursor_up().unwrap();
        ed.move_cursor_up().unwrap();
        assert_eq!(ed.buffer_pos(), pos(0, 9));
    }

    #[test]
    fn test_horizontal_wraps_across_lines() {
        let mut ed = editor("ab\ncd");
        ed.move_cursor_to(pos(1, 0)).unwrap();
        ed.move_cursor_left().unwrap();
        assert_eq!(ed.buffer_pos(), pos(0, 2));
        ed.move_cursor_right().unwrap();
        assert_eq!(ed.buffer_pos(), pos(1, 0));

        ed.move_cursor_to_document_end().unwrap();
        ed.move_cursor_right().unwrap();
        assert_eq!(ed.buffer_pos(), pos(1, 2));
        ed.move_cursor_to_document_start().unwrap();
        ed.move_cursor_left().unwrap();
        ed.move_cursor_up().unwrap();
        assert_eq!(ed.buffer_pos(), BufferPos::ZERO);
    }

    #[test]
    fn test_goto_rejects_out_of_range() {
        let mut ed = editor("abc");
        ed.move_cursor_to(pos(0, 2)).unwrap();
        let err = ed.move_cursor_to(pos(3, 0)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Coordinate(CoordinateError::OutOfBounds { .. })
        ));
        assert_eq!(ed.buffer_pos(), pos(0, 2));
    }

    #[test]
    fn test_screen_click_clamps() {
        let mut ed = editor("short\nline two");
        let gutter = ed.viewport().line_number_width();
        ed.move_cursor_to_screen(ScreenPos::new(0, gutter + 40)).unwrap();
        assert_eq!(ed.buffer_pos(), pos(0, 5));
        ed.move_cursor_to_screen(ScreenPos::new(9, gutter + 2)).unwrap();
        assert_eq!(ed.buffer_pos(), pos(1, 2));
    }

    #[test]
    fn test_selection_replace_and_undo() {
        let mut ed = editor("hello world");
        ed.move_cursor_to(pos(0, 6)).unwrap();
        for _ in 0..5 {
            ed.move_cursor(Movement::Right, true).unwrap();
        }
        assert_eq!(ed.selected_text().as_deref(), Some("world"));

        ed.insert_text("there").unwrap();
        assert_eq!(ed.get_text(), "hello there");
        assert!(ed.selection().is_none());

        ed.undo().unwrap();
        assert_eq!(ed.get_text(), "hello world");
    }

    #[test]
    fn test_backward_selection_delete() {
        let mut ed = editor("one\ntwo\nthree");
        ed.move_cursor_to(pos(2, 2)).unwrap();
        ed.move_cursor(Movement::Up, true).unwrap();
        ed.move_cursor(Movement::Up, true).unwrap();
        let sel = ed.selection().unwrap();
        assert_eq!(sel.start, pos(2, 2));
        assert_eq!(sel.end, pos(0, 2));

        ed.delete_text().unwrap();
        assert_eq!(ed.get_text(), "onree");
        assert_eq!(ed.buffer_pos(), pos(0, 2));
    }

    #[test]
    fn test_copy_cut_paste() {
        let mut ed = editor("alpha beta");
        ed.move_cursor(Movement::WordRight, true).unwrap();
        ed.copy();
        assert_eq!(ed.clipboard(), "alpha ");

        ed.cut().unwrap();
        assert_eq!(ed.get_text(), "beta");
        ed.move_cursor_to_line_end().unwrap();
        ed.paste().unwrap();
        assert_eq!(ed.get_text(), "betaalpha ");
        assert_eq!(ed.buffer_pos(), pos(0, 10));
    }

    #[test]
    fn test_copy_without_selection_keeps_clipboard() {
        let mut ed = editor("abc");
        ed.select_all().unwrap();
        ed.copy();
        ed.clear_selection();
        ed.copy();
        assert_eq!(ed.clipboard(), "abc");
    }

    #[test]
    fn test_delete_forward() {
        let mut ed = editor("ab\ncd");
        ed.move_cursor_to(pos(0, 2)).unwrap();
        ed.delete_forward().unwrap();
        assert_eq!(ed.get_text(), "abcd");
        assert_eq!(ed.buffer_pos(), pos(0, 2));
        ed.delete_forward().unwrap();
        assert_eq!(ed.get_text(), "abd");

        ed.undo().unwrap();
        assert_eq!(ed.get_text(), "ab\ncd");
        assert_eq!(ed.buffer_pos(), pos(0, 2));
    }

    #[test]
    fn test_multiline_paste_undo() {
        let mut ed = editor("start end");
        ed.move_cursor_to(pos(0, 6)).unwrap();
        ed.insert_text("one\ntwo\n").unwrap();
        assert_eq!(ed.get_text(), "start one\ntwo\nend");
        assert_eq!(ed.buffer_pos(), pos(2, 0));

        ed.undo().unwrap();
        assert_eq!(ed.get_text(), "start end");
        assert_eq!(ed.buffer_pos(), pos(0, 6));
    }

    #[test]
    fn test_viewport_follows_cursor() {
        let text: Vec<String> = (0..100).map(|i| format!("line {i}")).collect();
        let mut ed = editor(&text.join("\n"));
        ed.move_cursor_to(pos(50, 0)).unwrap();
        assert_eq!(ed.viewport().top_line(), 27);
        assert_eq!(ed.get_screen_pos().unwrap().row, 23);

        ed.move_cursor_up().unwrap();
        assert_eq!(ed.viewport().top_line(), 27);
        ed.move_cursor_to_document_start().unwrap();
        assert_eq!(ed.viewport().top_line(), 0);
    }

    #[test]
    fn test_scroll_leaves_cursor_off_screen() {
        let text: Vec<String> = (0..100).map(|i| format!("line {i}")).collect();
        let mut ed = editor(&text.join("\n"));
        ed.scroll_to(60);
        assert!(matches!(
            ed.get_screen_pos(),
            Err(CoreError::Coordinate(CoordinateError::NotVisible { .. }))
        ));
        assert!(ed.render_view().cursor.is_none());

        ed.move_cursor_down().unwrap();
        assert_eq!(ed.viewport().top_line(), 1);
    }

    #[test]
    fn test_gutter_grows_with_line_count() {
        let mut ed = editor("x");
        assert_eq!(ed.viewport().line_number_width(), 4);
        ed.insert_text(&"\n".repeat(1200)).unwrap();
        assert_eq!(ed.viewport().line_number_width(), 5);
        ed.undo().unwrap();
        assert_eq!(ed.viewport().line_number_width(), 4);
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut ed = editor("abc");
        assert!(!ed.undo().unwrap());
        assert!(!ed.redo().unwrap());
    }

    struct HeadingParser;

    impl SyntaxParser for HeadingParser {
        fn tokenize_line(&self, line: &str) -> Vec<TokenSpan> {
            if line.starts_with('#') {
                vec![TokenSpan::new(0, line.chars().count(), "heading")]
            } else {
                Vec::new()
            }
        }
    }

    #[test]
    fn test_parser_refreshes_touched_lines() {
        let mut ed = Editor::with_parser(EditorConfig::default(), Box::new(HeadingParser));
        ed.insert_text("title\nbody").unwrap();
        assert!(ed.document().get_line_tokens(0).is_empty());

        ed.move_cursor_to_document_start().unwrap();
        ed.insert_char('#').unwrap();
        assert_eq!(ed.document().get_line_tokens(0)[0].end, 6);
        assert!(ed.document().get_line_tokens(1).is_empty());

        ed.undo().unwrap();
        assert!(ed.document().get_line_tokens(0).is_empty());
    }

    #[test]
    fn test_events_emitted() {
        let mut ed = editor("abc");
        let mut rx = ed.subscribe();
        ed.insert_char('x').unwrap();

        let mut saw_change = false;
        while let Ok(event) = rx.try_recv() {
            if event == (EditorEvent::DocumentChanged { first_line: 0 }) {
                saw_change = true;
            }
        }
        assert!(saw_change);
    }

    #[tokio::test]
    async fn test_group_closer_ends_with_editor() {
        let config = EditorConfig {
            group_window_ms: 20,
            ..EditorConfig::default()
        };
        let mut ed = Editor::from_text(config, "");
        let handle = ed.spawn_group_closer();

        ed.insert_text("a").unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!ed.history().is_grouping());

        let history = Arc::downgrade(ed.history());
        drop(ed);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(history.upgrade().is_none());
    }

    #[test]
    fn test_save_without_filename_fails() {
        let mut ed = editor("abc");
        assert!(matches!(ed.save_file(None), Err(CoreError::NoFilename)));
    }
}
