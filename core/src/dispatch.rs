//! Key dispatcher: routes a classified token to the buffer or the layer mask.
//!
//! The dispatcher owns a shared, read-only layout registry and holds no other
//! state. Each call applies exactly one token to one editor. All checks that
//! can fail (classification, layout and cell lookup) run before anything is
//! mutated, so an error leaves the editor untouched.

use crate::editor::Editor;
use crate::error::EditorError;
use crate::key::{Control, KeyToken};
use crate::layout::LayoutRegistry;
use crate::mode::Mode;
use std::sync::Arc;
use tracing::debug;

/// What a successfully applied token did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// The layer mask changed.
    ModeChanged { from: Mode, to: Mode },
    /// A control action ran.
    Control(Control),
    /// A grid symbol was inserted (possibly the empty string).
    Inserted(String),
}

/// Applies key tokens to editors using a shared layout registry.
#[derive(Debug, Clone)]
pub struct KeyDispatcher {
    layouts: Arc<LayoutRegistry>,
}

impl KeyDispatcher {
    pub fn new(layouts: Arc<LayoutRegistry>) -> Self {
        Self { layouts }
    }

    pub fn layouts(&self) -> &LayoutRegistry {
        &self.layouts
    }

    /// Classify `token` and apply it to `editor` in place.
    pub fn process(&self, editor: &mut Editor, token: &str) -> Result<KeyAction, EditorError> {
        let key = KeyToken::parse(token)?;
        let action = self.apply(editor, key)?;
        debug!(token, ?action, caret = editor.caret_position(), mode = editor.mode().bits(), "key applied");
        Ok(action)
    }

    /// Apply `token` to an owned editor and return the updated value.
    pub fn dispatch(&self, mut editor: Editor, token: &str) -> Result<Editor, EditorError> {
        self.process(&mut editor, token)?;
        Ok(editor)
    }

    /// Apply an already classified key.
    pub fn apply(&self, editor: &mut Editor, key: KeyToken) -> Result<KeyAction, EditorError> {
        match key {
            KeyToken::Toggle(toggle) => {
                let from = editor.mode();
                let to = from.toggled(toggle);
                if !self.layouts.contains(to) {
                    return Err(EditorError::UnknownMode(to.bits()));
                }
                editor.set_mode(to);
                Ok(KeyAction::ModeChanged { from, to })
            }
            KeyToken::Control(control) => {
                run_control(editor, control);
                Ok(KeyAction::Control(control))
            }
            KeyToken::Cell { row, col } => {
                let symbol = self.layouts.symbol_at(editor.mode(), row, col)?.to_string();
                editor.buffer_mut().insert_symbol(&symbol);
                Ok(KeyAction::Inserted(symbol))
            }
        }
    }
}

fn run_control(editor: &mut Editor, control: Control) {
    if control == Control::Escape {
        editor.set_mode(Mode::BASE);
        return;
    }
    let buffer = editor.buffer_mut();
    match control {
        Control::Escape | Control::Fn => {}
        Control::Delete => {
            buffer.delete();
        }
        Control::Tab => {
            buffer.insert_symbol("\t");
        }
        Control::Backspace => {
            buffer.backspace();
        }
        Control::Enter => {
            buffer.insert_symbol("\n");
        }
        Control::ArrowUp => {
            buffer.move_up();
        }
        Control::ArrowLeft => {
            buffer.move_left();
        }
        Control::ArrowDown => {
            buffer.move_down();
        }
        Control::ArrowRight => {
            buffer.move_right();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;

    fn dispatcher() -> KeyDispatcher {
        let mut layouts = LayoutRegistry::new();
        let lower = Layout::from_rows(&[["a", "b", ""], ["c", "👍🏽", "x"]]);
        let upper = Layout::from_rows(&[["A", "B", ""], ["C", "👎", "X"]]);
        layouts.insert(Mode::BASE, lower).unwrap();
        layouts.insert(Mode::new(2).unwrap(), upper).unwrap();
        KeyDispatcher::new(Arc::new(layouts))
    }

    #[test]
    fn cell_inserts_symbol() {
        let editor = dispatcher().dispatch(Editor::new(), "00").unwrap();
        assert_eq!(editor.text(), "a");
        assert_eq!(editor.caret_position(), 1);
    }

    #[test]
    fn blank_cell_is_a_successful_noop() {
        let mut editor = Editor::with_text("q");
        let action = dispatcher().process(&mut editor, "02").unwrap();
        assert_eq!(action, KeyAction::Inserted(String::new()));
        assert_eq!(editor.text(), "q");
        assert_eq!(editor.caret_position(), 1);
    }

    #[test]
    fn toggle_into_unregistered_mode_fails_without_mutation() {
        let dispatcher = dispatcher();
        let mut editor = Editor::with_text("q");
        let err = dispatcher.process(&mut editor, "72").unwrap_err();
        assert_eq!(err, EditorError::UnknownMode(8));
        assert_eq!(editor.mode(), Mode::BASE);
    }

    #[test]
    fn escape_returns_to_base_layer() {
        let dispatcher = dispatcher();
        let mut editor = Editor::with_text("q");
        dispatcher.process(&mut editor, "60").unwrap();
        assert_eq!(editor.mode().bits(), 2);
        dispatcher.process(&mut editor, "escape").unwrap();
        assert_eq!(editor.mode(), Mode::BASE);
        assert_eq!(editor.text(), "q");
    }

    #[test]
    fn grid_lookup_in_unregistered_mode_fails() {
        let mut editor = Editor::restore("q", Mode::new(5).unwrap(), 1);
        let err = dispatcher().process(&mut editor, "00").unwrap_err();
        assert_eq!(err, EditorError::UnknownMode(5));
        assert_eq!(editor.text(), "q");
    }

    #[test]
    fn cell_outside_grid_fails() {
        let mut editor = Editor::new();
        let err = dispatcher().process(&mut editor, "05").unwrap_err();
        assert_eq!(err, EditorError::CellOutOfRange { mode: 0, row: 0, col: 5 });
        assert!(editor.text().is_empty());
    }
}
