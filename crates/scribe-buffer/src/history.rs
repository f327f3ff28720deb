//! Undo/redo history with time-windowed grouping.
//!
//! ## Learning: The Command Pattern
//!
//! Each mutation is stored as a `Change` that can be applied again or
//! inverted. Changes that arrive in a quick burst are collected into one
//! `HistoryEntry`, the unit that undo and redo operate on.
//!
//! ```text
//!            add_change                 window elapsed / close_group
//!   Idle ───────────────▶ Grouping ─────────────────────────────────▶ Idle
//!                            │                  (entry committed)
//!                            └── undo / redo force the close first
//! ```
//!
//! ## Learning: Interior Mutability Behind a Mutex
//!
//! A timer may close the active group while the editor is adding to it.
//! All state lives behind one `Mutex`, and every method takes `&self`, so
//! `History` can be shared as `Arc<History>` between the editor and the
//! timer task. Closing is idempotent: whoever takes the lock first commits
//! the group, the other finds nothing to close.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::{BufferPos, Document};

/// Default grouping window.
pub const DEFAULT_GROUP_WINDOW: Duration = Duration::from_millis(500);

/// The type of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// `new_text` was inserted at `position`
    Insert,
    /// `old_text` was removed from `position`
    Delete,
    /// `old_text` at `position` was replaced by `new_text`
    Replace,
}

/// A single undoable mutation.
///
/// ## Learning: Clone vs Copy
///
/// `Change` implements `Clone` but not `Copy` because it owns `String`s.
#[derive(Debug, Clone)]
pub struct Change {
    pub kind: ChangeKind,
    /// Where the affected text starts
    pub position: BufferPos,
    pub old_text: String,
    pub new_text: String,
    pub timestamp: Instant,
}

impl Change {
    /// Creates an insert change.
    pub fn insert(position: BufferPos, text: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Insert,
            position,
            old_text: String::new(),
            new_text: text.into(),
            timestamp: Instant::now(),
        }
    }

    /// Creates a delete change; `position` is the start of the removed text.
    pub fn delete(position: BufferPos, text: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Delete,
            position,
            old_text: text.into(),
            new_text: String::new(),
            timestamp: Instant::now(),
        }
    }

    /// Creates a replace change.
    pub fn replace(
        position: BufferPos,
        old_text: impl Into<String>,
        new_text: impl Into<String>,
    ) -> Self {
        Self {
            kind: ChangeKind::Replace,
            position,
            old_text: old_text.into(),
            new_text: new_text.into(),
            timestamp: Instant::now(),
        }
    }

    /// Returns the change that undoes this one.
    pub fn inverse(&self) -> Self {
        Self {
            kind: match self.kind {
                ChangeKind::Insert => ChangeKind::Delete,
                ChangeKind::Delete => ChangeKind::Insert,
                ChangeKind::Replace => ChangeKind::Replace,
            },
            position: self.position,
            old_text: self.new_text.clone(),
            new_text: self.old_text.clone(),
            timestamp: self.timestamp,
        }
    }

    /// Applies the change to `doc` and returns the position after the
    /// written text (or `position` for a delete).
    pub fn apply_to(&self, doc: &mut Document) -> BufferPos {
        if !self.old_text.is_empty() {
            doc.delete_range(self.position, self.position.advanced_by(&self.old_text));
        }
        if self.new_text.is_empty() {
            self.position
        } else {
            doc.insert_str(self.position, &self.new_text)
        }
    }
}

/// A group of changes undone and redone together.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Changes in the order they were made
    pub changes: Vec<Change>,
    /// Cursor when the group opened; restored by undo
    pub cursor_before: BufferPos,
    /// Cursor after the last change; restored by redo
    pub cursor_after: BufferPos,
}

#[derive(Debug)]
struct ActiveGroup {
    entry: HistoryEntry,
    last_change: Instant,
}

#[derive(Debug, Default)]
struct HistoryState {
    entries: VecDeque<HistoryEntry>,
    /// Number of entries currently applied; `applied - 1` is the pointer
    applied: usize,
    active: Option<ActiveGroup>,
}

/// Bounded, grouped undo/redo history.
///
/// ## Design Decisions
///
/// 1. **Bounded history**: the oldest entry is evicted past `max_entries`
/// 2. **Time grouping**: changes within `group_window` of each other merge
/// 3. **Linear history**: a new group after an undo discards redo entries
#[derive(Debug)]
pub struct History {
    state: Mutex<HistoryState>,
    max_entries: usize,
    group_window: Duration,
}

impl History {
    /// Creates an empty history.
    pub fn new(max_entries: usize, group_window: Duration) -> Self {
        Self {
            state: Mutex::new(HistoryState::default()),
            max_entries: max_entries.max(1),
            group_window,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HistoryState> {
        // Every critical section leaves the state consistent, so a poisoned
        // lock is still safe to use.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn group_window(&self) -> Duration {
        self.group_window
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Records a change made now.
    pub fn add_change(&self, change: Change, cursor_before: BufferPos, cursor_after: BufferPos) {
        self.add_change_at(change, cursor_before, cursor_after, Instant::now());
    }

    /// Records a change made at `now`.
    ///
    /// Opens a group if none is active (discarding redo entries), otherwise
    /// appends to it. A group whose window already elapsed is committed
    /// first, even if no timer has fired yet.
    pub fn add_change_at(
        &self,
        change: Change,
        cursor_before: BufferPos,
        cursor_after: BufferPos,
        now: Instant,
    ) {
        let mut state = self.lock();

        if self.is_expired(&state, now) {
            self.commit(&mut state);
        }

        if let Some(group) = state.active.as_mut() {
            group.entry.changes.push(change);
            group.entry.cursor_after = cursor_after;
            group.last_change = now;
            return;
        }

        let applied = state.applied;
        state.entries.truncate(applied);
        state.active = Some(ActiveGroup {
            entry: HistoryEntry {
                changes: vec![change],
                cursor_before,
                cursor_after,
            },
            last_change: now,
        });
    }

    /// Commits the active group, if any.
    pub fn close_group(&self) {
        let mut state = self.lock();
        self.commit(&mut state);
    }

    /// Commits the active group if its window has elapsed at `now`.
    ///
    /// Returns true if a group was committed. Meant for timer callbacks.
    pub fn close_expired(&self, now: Instant) -> bool {
        let mut state = self.lock();
        let expired = self.is_expired(&state, now);
        if expired {
            self.commit(&mut state);
        }
        expired
    }

    fn is_expired(&self, state: &HistoryState, now: Instant) -> bool {
        state.active.as_ref().is_some_and(|group| {
            now.saturating_duration_since(group.last_change) >= self.group_window
        })
    }

    fn commit(&self, state: &mut HistoryState) {
        let Some(group) = state.active.take() else {
            return;
        };
        let applied = state.applied;
        state.entries.truncate(applied);
        tracing::debug!(changes = group.entry.changes.len(), "history group committed");
        state.entries.push_back(group.entry);
        state.applied += 1;

        // Enforce capacity
        while state.entries.len() > self.max_entries {
            state.entries.pop_front();
            state.applied -= 1;
        }
    }

    /// Steps back one entry and returns it for reverse replay.
    pub fn undo(&self) -> Option<HistoryEntry> {
        let mut state = self.lock();
        self.commit(&mut state);
        if state.applied == 0 {
            return None;
        }
        state.applied -= 1;
        state.entries.get(state.applied).cloned()
    }

    /// Steps forward one entry and returns it for forward replay.
    pub fn redo(&self) -> Option<HistoryEntry> {
        let mut state = self.lock();
        self.commit(&mut state);
        let entry = state.entries.get(state.applied).cloned()?;
        state.applied += 1;
        Some(entry)
    }

    /// Returns true if `undo` would return an entry.
    pub fn can_undo(&self) -> bool {
        let state = self.lock();
        state.applied > 0 || state.active.is_some()
    }

    /// Returns true if `redo` would return an entry.
    pub fn can_redo(&self) -> bool {
        let state = self.lock();
        state.active.is_none() && state.applied < state.entries.len()
    }

    /// Committed entries available to undo.
    pub fn undo_len(&self) -> usize {
        self.lock().applied
    }

    /// Entries available to redo.
    pub fn redo_len(&self) -> usize {
        let state = self.lock();
        state.entries.len() - state.applied
    }

    /// Returns true while a group is open.
    pub fn is_grouping(&self) -> bool {
        self.lock().active.is_some()
    }

    /// Drops everything, including an open group.
    pub fn clear(&self) {
        *self.lock() = HistoryState::default();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(1000, DEFAULT_GROUP_WINDOW)
    }
}
