//! Compact encoding of the editor's mode and caret.
//!
//! Collaborators carry these two values through short opaque payloads and
//! rebuild an equivalent editor from stored text plus the decoded state when
//! no live editor is cached. The mode travels as one lowercase hex digit and
//! the caret as a decimal string.

use crate::editor::Editor;
use crate::error::EditorError;
use crate::mode::Mode;

pub fn encode_mode(mode: Mode) -> char {
    mode.to_hex_digit()
}

pub fn decode_mode(digit: &str) -> Result<Mode, EditorError> {
    let mut chars = digit.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Mode::from_hex_digit(c),
        _ => Err(EditorError::InvalidState(format!("mode {digit:?}"))),
    }
}

pub fn encode_caret(caret: usize) -> String {
    caret.to_string()
}

pub fn decode_caret(digits: &str) -> Result<usize, EditorError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EditorError::InvalidState(format!("caret {digits:?}")));
    }
    digits
        .parse()
        .map_err(|_| EditorError::InvalidState(format!("caret {digits:?}")))
}

/// The transportable part of an editor besides its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorState {
    pub mode: Mode,
    pub caret: usize,
}

impl EditorState {
    pub fn capture(editor: &Editor) -> Self {
        Self {
            mode: editor.mode(),
            caret: editor.caret_index(),
        }
    }

    /// `"{mode}{caret}"`, e.g. `"2" + "14"` → `"214"`.
    pub fn encode(&self) -> String {
        format!("{}{}", encode_mode(self.mode), encode_caret(self.caret))
    }

    pub fn decode(encoded: &str) -> Result<Self, EditorError> {
        let split = encoded
            .char_indices()
            .nth(1)
            .map_or(encoded.len(), |(offset, _)| offset);
        let (mode, caret) = encoded.split_at(split);
        Ok(Self {
            mode: decode_mode(mode)?,
            caret: decode_caret(caret)?,
        })
    }

    /// Rebuild an editor around `text`.
    pub fn restore(&self, text: impl Into<String>) -> Editor {
        Editor::restore(text, self.mode, self.caret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_and_decode() {
        let state = EditorState {
            mode: Mode::new(0xb).unwrap(),
            caret: 42,
        };
        assert_eq!(state.encode(), "b42");
        assert_eq!(EditorState::decode("b42"), Ok(state));
    }

    #[test]
    fn rejects_malformed_state() {
        for bad in ["", "b", "x1", "1-2", "1+3", "ä1"] {
            assert!(EditorState::decode(bad).is_err(), "{bad:?}");
        }
        assert!(decode_mode("12").is_err());
    }

    #[test]
    fn restore_matches_capture() {
        let editor = Editor::restore("abc", Mode::new(1).unwrap(), 2);
        let state = EditorState::capture(&editor);
        assert_eq!(state.restore("abc"), editor);
    }
}
