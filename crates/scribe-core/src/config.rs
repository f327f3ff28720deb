//! Editor configuration.
//!
//! ## Learning: Serde for Serialization
//!
//! `#[derive(Serialize, Deserialize)]` generates the TOML mapping.
//! `#[serde(default)]` fills missing fields from `Default`, and
//! `#[serde(deny_unknown_fields)]` turns a misspelled key into a load error
//! at the boundary instead of a silently ignored option.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main editor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Editor behavior settings
    pub editor: EditorConfig,
}

impl Config {
    /// Loads config from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::load_from_default_path() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Ignoring config: {}", err);
                Self::default()
            }
        }
    }

    /// Loads and validates config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parses and validates config from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.editor.validate()?;
        Ok(config)
    }

    /// Loads from the default config path.
    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("scribe").join("config.toml"))
    }

    /// Saves the config to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::default_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}

/// Editor behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Tab width in columns
    pub tab_width: usize,

    /// Show the line-number gutter
    pub line_numbers: bool,

    /// Minimum gutter width; grows with the line count's digits
    pub gutter_width: usize,

    /// Undo grouping window in milliseconds
    pub group_window_ms: u64,

    /// Undo history limit
    pub undo_limit: usize,

    /// Initial viewport width in columns
    pub viewport_width: u16,

    /// Initial viewport height in rows
    pub viewport_height: u16,
}

impl EditorConfig {
    /// Rejects values the editor cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tab_width == 0 {
            return Err(ConfigError::Invalid("tab_width must be at least 1".into()));
        }
        if self.undo_limit == 0 {
            return Err(ConfigError::Invalid("undo_limit must be at least 1".into()));
        }
        Ok(())
    }

    pub fn group_window(&self) -> Duration {
        Duration::from_millis(self.group_window_ms)
    }

    /// Gutter width to start with, before any document is loaded.
    pub fn initial_gutter_width(&self) -> usize {
        if self.line_numbers {
            self.gutter_width
        } else {
            0
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: 4,
            line_numbers: true,
            gutter_width: 4,
            group_window_ms: 500,
            undo_limit: 1000,
            viewport_width: 80,
            viewport_height: 24,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
