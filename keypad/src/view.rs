//! Keyboard message views.
//!
//! A `KeyboardView` is what the chat collaborator ships after every key: the
//! rendered editor text and one button per grid cell of the active layer.

use crate::action::ActionPayload;
use crate::store::UserProfile;
use keypad_core::{Editor, EditorError, EditorState, LayoutRegistry};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static MARKDOWN_SPECIALS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([_*~])").expect("markdown pattern is valid"));

/// One inline button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyButton {
    pub label: String,
    pub payload: String,
}

/// Message text plus button grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyboardView {
    pub text: String,
    pub rows: Vec<Vec<KeyButton>>,
}

impl KeyboardView {
    /// Build the view for `editor`. With `owner` set, the text carries an
    /// "Editing by" footer and every payload is locked to the owner's id.
    pub fn build(
        editor: &Editor,
        layouts: &LayoutRegistry,
        owner: Option<&UserProfile>,
        blank_label: &str,
    ) -> Result<Self, EditorError> {
        let layout = layouts.layout(editor.mode())?;
        let state = EditorState::capture(editor);
        let owner_id = owner.map(|o| o.id);

        let rows = layout
            .rows()
            .iter()
            .enumerate()
            .map(|(row, keys)| {
                keys.iter()
                    .enumerate()
                    .map(|(col, key)| KeyButton {
                        label: if key.is_empty() {
                            blank_label.to_string()
                        } else {
                            key.clone()
                        },
                        payload: ActionPayload::new(state, row, col, owner_id).to_string(),
                    })
                    .collect()
            })
            .collect();

        let mut text = editor.render();
        if let Some(owner) = owner {
            text.push_str("\nEditing by ");
            text.push_str(&user_link(owner));
        }

        Ok(Self { text, rows })
    }

    /// Button at `(row, col)`.
    pub fn button(&self, row: usize, col: usize) -> Option<&KeyButton> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Plain-text rendering for terminals.
    pub fn to_plain(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.text);
        out.push('\n');
        for row in &self.rows {
            let labels: Vec<&str> = row.iter().map(|b| b.label.as_str()).collect();
            out.push_str("[ ");
            out.push_str(&labels.join(" | "));
            out.push_str(" ]\n");
        }
        out
    }
}

/// Markdown mention of a user: `@username` with markdown specials escaped,
/// or an inline `tg://` link on the first (else last) name.
pub fn user_link(user: &UserProfile) -> String {
    match user.username.as_deref() {
        Some(username) if !username.is_empty() => {
            format!("@{}", MARKDOWN_SPECIALS.replace_all(username, r"\$1"))
        }
        _ => {
            let name = if user.first_name.is_empty() {
                user.last_name.as_deref().unwrap_or_default()
            } else {
                user.first_name.as_str()
            };
            format!("[{name}](tg://user?id={})", user.id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keypad_core::{Layout, Mode};

    fn registry() -> LayoutRegistry {
        let mut layouts = LayoutRegistry::new();
        layouts
            .insert(Mode::BASE, Layout::from_rows(&[["a", ""], ["b", "c"]]))
            .unwrap();
        layouts
    }

    #[test]
    fn unlocked_view_has_plain_payloads() {
        let editor = Editor::with_text("hi").with_caret_marker("|");
        let view = KeyboardView::build(&editor, &registry(), None, " ").unwrap();
        assert_eq!(view.text, "hi|");
        assert_eq!(view.button(0, 1).unwrap().label, " ");
        assert_eq!(view.button(1, 0).unwrap().payload, "0102");
    }

    #[test]
    fn locked_view_names_owner() {
        let mut owner = UserProfile::new(42, "Ada");
        owner.username = Some("ada_l*".into());
        let editor = Editor::new().with_caret_marker("|");
        let view = KeyboardView::build(&editor, &registry(), Some(&owner), "·").unwrap();
        assert_eq!(view.text, "|\nEditing by @ada\\_l\\*");
        assert_eq!(view.button(1, 1).unwrap().payload, "0110:42");
        assert_eq!(view.button(0, 1).unwrap().label, "·");
    }

    #[test]
    fn user_link_falls_back_to_names() {
        let user = UserProfile::new(7, "Grace");
        assert_eq!(user_link(&user), "[Grace](tg://user?id=7)");

        let mut user = UserProfile::new(8, "");
        user.last_name = Some("Hopper".into());
        assert_eq!(user_link(&user), "[Hopper](tg://user?id=8)");
    }

    #[test]
    fn unregistered_mode_is_an_error() {
        let editor = Editor::new().with_mode(Mode::new(2).unwrap());
        assert_eq!(
            KeyboardView::build(&editor, &registry(), None, " "),
            Err(EditorError::UnknownMode(2))
        );
    }
}
