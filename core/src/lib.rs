//! keypad-core
//!
//! Editor state machine for a multi-tap virtual keyboard: the user edits a
//! short text by pressing keys on a grid, and every press arrives as a short
//! token. The core tracks text, caret and the active keyboard layer, and
//! renders the text with a caret marker. It performs no I/O besides optional
//! config/layout file loading, and holds no shared mutable state.
//!
//! Public API:
//! - `TextBuffer` - text plus code-point caret, line/coordinate views
//! - `Mode`, `ModeToggle` - four-bit layer mask
//! - `KeyToken`, `Control` - token classification
//! - `Layout`, `LayoutRegistry` - read-only grids keyed by mode
//! - `Editor` - one editing session's state
//! - `KeyDispatcher` - applies tokens to editors
//! - `EditorState` - compact mode/caret transport encoding
//! - `Config` - serde/TOML configuration

use serde::{Deserialize, Serialize};

pub mod buffer;
pub use buffer::TextBuffer;

pub mod codec;
pub use codec::EditorState;

pub mod dispatch;
pub use dispatch::{KeyAction, KeyDispatcher};

pub mod editor;
pub use editor::{Editor, MessageEntity, DEFAULT_CARET_MARKER};

pub mod error;
pub use error::{EditorError, LayoutError};

pub mod key;
pub use key::{Control, KeyToken};

pub mod layout;
pub use layout::{Layout, LayoutRegistry};

pub mod mode;
pub use mode::{Mode, ModeToggle};

pub mod render;
pub use render::Rendered;

/// Editor configuration.
///
/// Product crates flatten this into their own config with `#[serde(flatten)]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Marker spliced into the rendered text at the caret.
    pub caret_marker: String,

    /// Layer a new editor starts on.
    pub initial_mode: Mode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            caret_marker: DEFAULT_CARET_MARKER.to_string(),
            initial_mode: Mode::BASE,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// A fresh editor seeded with `text` using this configuration.
    pub fn new_editor(&self, text: impl Into<String>) -> Editor {
        Editor::with_text(text)
            .with_mode(self.initial_mode)
            .with_caret_marker(self.caret_marker.clone())
    }

    /// An editor rebuilt from transported state using this configuration.
    pub fn restore_editor(&self, text: impl Into<String>, state: EditorState) -> Editor {
        state.restore(text).with_caret_marker(self.caret_marker.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_present() {
        let cfg = Config::default();
        assert_eq!(cfg.caret_marker.chars().count(), 2);
        assert_eq!(cfg.initial_mode, Mode::BASE);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = Config {
            caret_marker: "▏".to_string(),
            initial_mode: Mode::new(2).unwrap(),
        };
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg = Config::from_toml_str("initial_mode = 1\n").unwrap();
        assert_eq!(cfg.initial_mode.bits(), 1);
        assert_eq!(cfg.caret_marker, DEFAULT_CARET_MARKER);
    }

    #[test]
    fn new_editor_uses_marker() {
        let cfg = Config {
            caret_marker: "^".to_string(),
            ..Config::default()
        };
        assert_eq!(cfg.new_editor("ab").render(), "ab^");
    }
}
