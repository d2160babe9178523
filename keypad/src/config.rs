//! Keypad configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All editor options from `keypad_core::Config` (flattened via serde)
//! - Session lock timing and cache size
//! - Storage and layout file locations
//!
//! # Example
//!
//! ```rust
//! use keypad::KeypadConfig;
//!
//! let config = KeypadConfig::from_toml_str("idle_timeout_ms = 2000\n").unwrap();
//! assert_eq!(config.idle_timeout().as_millis(), 2000);
//! assert_eq!(config.base.initial_mode.bits(), 0);
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct KeypadConfig {
    /// Editor options (caret marker, initial mode)
    #[serde(flatten)]
    pub base: keypad_core::Config,

    /// How long an owner keeps the editor after their last key.
    pub idle_timeout_ms: u64,

    /// Live editors kept in memory before the least recent is dropped.
    pub session_cache_size: usize,

    /// Redb database for editor texts and users; in-memory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,

    /// JSON layout set replacing the built-in English keyboard.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_path: Option<PathBuf>,

    /// Label shown on empty cells. Chat clients reject empty button text.
    pub blank_label: String,
}

impl Default for KeypadConfig {
    fn default() -> Self {
        Self {
            base: keypad_core::Config::default(),
            idle_timeout_ms: 5000,
            session_cache_size: 1000,
            store_path: None,
            layout_path: None,
            blank_label: " ".to_string(),
        }
    }
}

impl KeypadConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
