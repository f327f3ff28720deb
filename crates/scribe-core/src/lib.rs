//! # Scribe Core
//!
//! Editor logic on top of `scribe-buffer`.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                        Editor                         │
//! │  ┌──────────┐ ┌──────────────┐ ┌──────────────────┐  │
//! │  │  Config  │ │   Commands   │ │  EventBus (out)  │  │
//! │  └──────────┘ └──────────────┘ └──────────────────┘  │
//! │  ┌──────────┐ ┌──────────────┐ ┌──────────┐          │
//! │  │ Document │ │ CursorManager│ │ History  │◀── timer │
//! │  └──────────┘ └──────────────┘ └──────────┘          │
//! │        ▲                                              │
//! │  SyntaxParser (in)              Renderer (read-only)  │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod command;
pub mod config;
pub mod editor;
pub mod event;
pub mod render;
pub mod syntax;
pub mod timer;

pub use command::Command;
pub use config::{Config, ConfigError, EditorConfig};
pub use editor::{Editor, Movement};
pub use event::{EditorEvent, EventBus};
pub use render::{PlainRenderer, RenderView, Renderer};
pub use syntax::SyntaxParser;
pub use timer::spawn_group_closer;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Coordinate error: {0}")]
    Coordinate(#[from] scribe_buffer::CoordinateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No filename to save to")]
    NoFilename,

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
