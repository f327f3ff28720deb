//! Event system for editor notifications.
//!
//! ## Learning: Observer Pattern in Rust
//!
//! We use `tokio::sync::broadcast` for a safe event bus. Events are plain
//! values; subscribers (a renderer loop, a syntax parser reacting to
//! changes) receive clones and never hold references into the editor.

use std::path::PathBuf;

use scribe_buffer::BufferPos;
use tokio::sync::broadcast;

/// Events that can occur in the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// A document was loaded (or started empty) from a path
    DocumentLoaded(PathBuf),
    /// The document was written to a path
    DocumentSaved(PathBuf),
    /// Text changed; lines from `first_line` on may differ
    DocumentChanged { first_line: usize },
    /// The cursor moved
    CursorMoved(BufferPos),
    /// The selection was started, extended or cleared
    SelectionChanged,
    /// The viewport scroll offset changed
    ViewportScrolled { top_line: usize, left_column: usize },
    /// An undo or redo was applied
    HistoryChanged { can_undo: bool, can_redo: bool },
}

/// Event bus for broadcasting editor events.
///
/// ## Design
///
/// Using a broadcast channel allows:
/// - Multiple subscribers
/// - No direct coupling between components
/// - Lagged receivers don't block senders
pub struct EventBus {
    sender: broadcast::Sender<EditorEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    pub fn new() -> Self {
        // Capacity of 256 events in the buffer
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: EditorEvent) {
        // Ignore error if no receivers (not a problem)
        let _ = self.sender.send(event);
    }

    /// Subscribes to events.
    ///
    /// Returns a receiver that will get all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.emit(EditorEvent::SelectionChanged);

        let event = rx.recv().await.unwrap();
        assert_eq!(event, EditorEvent::SelectionChanged);
    }

    #[test]
    fn test_emit_without_subscribers() {
        let bus = EventBus::new();
        bus.emit(EditorEvent::CursorMoved(BufferPos::ZERO));

        let mut rx = bus.clone().subscribe();
        bus.emit(EditorEvent::DocumentChanged { first_line: 3 });
        assert_eq!(
            rx.try_recv().unwrap(),
            EditorEvent::DocumentChanged { first_line: 3 }
        );
    }
}
