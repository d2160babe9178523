//! Key token classification.
//!
//! A key press arrives as a short string. It is, in priority order, a layer
//! toggle code, a control token (by code or by name), or a two-digit grid
//! cell. Anything else is rejected.

use crate::error::EditorError;
use crate::mode::ModeToggle;
use phf::phf_map;
use std::fmt;

/// Non-character actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Escape,
    /// Reserved, does nothing.
    Fn,
    Delete,
    Tab,
    Backspace,
    Enter,
    ArrowUp,
    ArrowLeft,
    ArrowDown,
    ArrowRight,
}

impl Control {
    pub fn name(self) -> &'static str {
        match self {
            Control::Escape => "escape",
            Control::Fn => "fn",
            Control::Delete => "delete",
            Control::Tab => "tab",
            Control::Backspace => "backspace",
            Control::Enter => "enter",
            Control::ArrowUp => "arrowUp",
            Control::ArrowLeft => "arrowLeft",
            Control::ArrowDown => "arrowDown",
            Control::ArrowRight => "arrowRight",
        }
    }
}

static TOGGLE_CODES: phf::Map<&'static str, ModeToggle> = phf_map! {
    "60" => ModeToggle::Shift,
    "70" => ModeToggle::Accents,
    "71" => ModeToggle::Symbols,
    "72" => ModeToggle::Emoji,
};

static CONTROL_CODES: phf::Map<&'static str, Control> = phf_map! {
    "00" => Control::Escape,
    "06" => Control::Fn,
    "07" => Control::Delete,
    "10" => Control::Tab,
    "17" => Control::Backspace,
    "37" => Control::Enter,
    "66" => Control::ArrowUp,
    "75" => Control::ArrowLeft,
    "76" => Control::ArrowDown,
    "77" => Control::ArrowRight,
};

static CONTROL_NAMES: phf::Map<&'static str, Control> = phf_map! {
    "escape" => Control::Escape,
    "fn" => Control::Fn,
    "delete" => Control::Delete,
    "tab" => Control::Tab,
    "backspace" => Control::Backspace,
    "enter" => Control::Enter,
    "arrowUp" => Control::ArrowUp,
    "arrowLeft" => Control::ArrowLeft,
    "arrowDown" => Control::ArrowDown,
    "arrowRight" => Control::ArrowRight,
};

/// A classified key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyToken {
    Toggle(ModeToggle),
    Control(Control),
    Cell { row: usize, col: usize },
}

impl KeyToken {
    /// Classify a raw token.
    pub fn parse(token: &str) -> Result<Self, EditorError> {
        if let Some(&toggle) = TOGGLE_CODES.get(token) {
            return Ok(KeyToken::Toggle(toggle));
        }
        if let Some(&control) = CONTROL_CODES.get(token).or_else(|| CONTROL_NAMES.get(token)) {
            return Ok(KeyToken::Control(control));
        }
        match token.as_bytes() {
            &[row @ b'0'..=b'9', col @ b'0'..=b'9'] => Ok(KeyToken::Cell {
                row: usize::from(row - b'0'),
                col: usize::from(col - b'0'),
            }),
            _ => Err(EditorError::InvalidToken(token.to_string())),
        }
    }

    /// Two-character code of a grid position.
    pub fn cell_code(row: usize, col: usize) -> String {
        format!("{row}{col}")
    }
}

impl std::str::FromStr for KeyToken {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyToken::parse(s)
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyToken::Toggle(toggle) => f.write_str(toggle.code()),
            KeyToken::Control(control) => f.write_str(control.name()),
            KeyToken::Cell { row, col } => write!(f, "{row}{col}"),
        }
    }
}
