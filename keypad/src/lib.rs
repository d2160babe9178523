//! keypad crate root
//!
//! This crate wires the `keypad-core` editor into a shared, multi-user
//! keyboard: built-in layouts, button payloads, message views, persistence
//! and a session layer that serialises presses and locks an editor to the
//! user currently typing.
//!
//! Public API exported here:
//! - `SessionManager` and `SessionError` from `session`
//! - `KeyboardView`, `KeyButton` and `user_link` from `view`
//! - `ActionPayload` from `action`
//! - `EditorStore`, `UserProfile` and `UserChange` from `store`
//! - `KeypadConfig` from `config`
//! - the built-in `ENGLISH` layout registry from `layouts`

pub mod action;
pub mod config;
pub mod layouts;
pub mod session;
pub mod store;
pub mod view;

// Editor types callers need alongside the session layer.
pub use keypad_core::{
    Config, Control, Editor, EditorError, EditorState, KeyAction, KeyDispatcher, KeyToken, Layout,
    LayoutError, LayoutRegistry, Mode, ModeToggle,
};

pub use action::ActionPayload;
pub use config::KeypadConfig;
pub use layouts::ENGLISH;
pub use session::{SessionError, SessionKey, SessionManager};
pub use store::{EditorRecord, EditorStore, StoreError, UserChange, UserProfile};
pub use view::{user_link, KeyButton, KeyboardView};

/// Session manager built from `config`: layouts from `layout_path` (or the
/// built-in set) and a redb store at `store_path` (or an in-memory store).
pub fn open(config: &KeypadConfig) -> Result<SessionManager, Box<dyn std::error::Error + Send + Sync>> {
    let layouts = layouts::load(config.layout_path.as_deref())?;
    let store = match &config.store_path {
        Some(path) => EditorStore::new_redb(path)?,
        None => EditorStore::new_in_memory(),
    };
    Ok(SessionManager::new(config, layouts, store))
}
