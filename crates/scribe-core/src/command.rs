//! Command system for editor intents.
//!
//! ## Learning: Command Pattern
//!
//! Each user intent is a value. A front end maps keys or mouse events to a
//! `Command` and hands it to `Editor::execute`, so key bindings never reach
//! into editor internals and commands can be logged, replayed or scripted.

use std::path::PathBuf;

use scribe_buffer::{BufferPos, ScreenPos};

use crate::CoreResult;
use crate::editor::{Editor, Movement};

/// An editor intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Move the cursor, extending the selection when `extend` is set
    Move { movement: Movement, extend: bool },
    /// Jump to a buffer position (goto-line)
    MoveTo(BufferPos),
    /// Place the cursor under a screen cell (mouse click)
    MoveToScreen(ScreenPos),

    InsertText(String),
    InsertNewline,
    DeleteBackward,
    DeleteForward,
    DeleteSelection,

    StartSelection,
    ExtendSelection,
    ClearSelection,
    SelectAll,

    Undo,
    Redo,
    /// Close the open undo group now
    CommitHistoryGroup,

    Copy,
    Cut,
    Paste,

    ScrollTo { top_line: usize },
    Resize { width: usize, height: usize },

    /// Write to `path`, or to the document's filename when `None`
    Save { path: Option<PathBuf> },
    Load { path: PathBuf },
}

impl Command {
    /// Human-readable name, for logs and command palettes.
    pub fn display_name(&self) -> &'static str {
        match self {
            Command::Move { movement, extend } => match (movement, extend) {
                (Movement::Left, false) => "Move Left",
                (Movement::Left, true) => "Select Left",
                (Movement::Right, false) => "Move Right",
                (Movement::Right, true) => "Select Right",
                (Movement::Up, false) => "Move Up",
                (Movement::Up, true) => "Select Up",
                (Movement::Down, false) => "Move Down",
                (Movement::Down, true) => "Select Down",
                (Movement::WordLeft, false) => "Move Word Left",
                (Movement::WordLeft, true) => "Select Word Left",
                (Movement::WordRight, false) => "Move Word Right",
                (Movement::WordRight, true) => "Select Word Right",
                (Movement::LineStart, false) => "Move to Line Start",
                (Movement::LineStart, true) => "Select to Line Start",
                (Movement::LineEnd, false) => "Move to Line End",
                (Movement::LineEnd, true) => "Select to Line End",
                (Movement::DocumentStart, false) => "Move to Document Start",
                (Movement::DocumentStart, true) => "Select to Document Start",
                (Movement::DocumentEnd, false) => "Move to Document End",
                (Movement::DocumentEnd, true) => "Select to Document End",
            },
            Command::MoveTo(_) => "Go to Position",
            Command::MoveToScreen(_) => "Click",
            Command::InsertText(_) => "Insert Text",
            Command::InsertNewline => "Insert Newline",
            Command::DeleteBackward => "Delete Backward",
            Command::DeleteForward => "Delete Forward",
            Command::DeleteSelection => "Delete Selection",
            Command::StartSelection => "Start Selection",
            Command::ExtendSelection => "Extend Selection",
            Command::ClearSelection => "Clear Selection",
            Command::SelectAll => "Select All",
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::CommitHistoryGroup => "Commit Undo Group",
            Command::Copy => "Copy",
            Command::Cut => "Cut",
            Command::Paste => "Paste",
            Command::ScrollTo { .. } => "Scroll",
            Command::Resize { .. } => "Resize",
            Command::Save { .. } => "Save",
            Command::Load { .. } => "Open",
        }
    }

    /// Returns true if the command can change document text.
    pub fn is_edit(&self) -> bool {
        matches!(
            self,
            Command::InsertText(_)
                | Command::InsertNewline
                | Command::DeleteBackward
                | Command::DeleteForward
                | Command::DeleteSelection
                | Command::Undo
                | Command::Redo
                | Command::Cut
                | Command::Paste
        )
    }
}

impl Editor {
    /// Runs one command to completion.
    pub fn execute(&mut self, command: &Command) -> CoreResult<()> {
        tracing::trace!(command = command.display_name(), "execute");

        match command {
            Command::Move { movement, extend } => self.move_cursor(*movement, *extend)?,
            Command::MoveTo(pos) => self.move_cursor_to(*pos)?,
            Command::MoveToScreen(screen) => self.move_cursor_to_screen(*screen)?,
            Command::InsertText(text) => self.insert_text(text)?,
            Command::InsertNewline => self.insert_newline()?,
            Command::DeleteBackward => self.delete_text()?,
            Command::DeleteForward => self.delete_forward()?,
            Command::DeleteSelection => self.delete_selection()?,
            Command::StartSelection => self.start_selection(),
            Command::ExtendSelection => self.extend_selection(),
            Command::ClearSelection => self.clear_selection(),
            Command::SelectAll => self.select_all()?,
            Command::Undo => {
                self.undo()?;
            }
            Command::Redo => {
                self.redo()?;
            }
            Command::CommitHistoryGroup => self.commit_history_group(),
            Command::Copy => self.copy(),
            Command::Cut => self.cut()?,
            Command::Paste => self.paste()?,
            Command::ScrollTo { top_line } => self.scroll_to(*top_line),
            Command::Resize { width, height } => self.resize(*width, *height),
            Command::Save { path } => {
                self.save_file(path.as_deref())?;
            }
            Command::Load { path } => self.load_file(path)?,
        }
        Ok(())
    }
}
