//! Keyboard layer bitmask.
//!
//! A mode is a four-bit mask. Each toggle key flips one bit, and the
//! resulting value selects one of up to 16 layouts.

use crate::error::EditorError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Active layer combination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Mode(u8);

impl Mode {
    /// Base layer.
    pub const BASE: Mode = Mode(0);

    /// Highest representable mask.
    pub const MAX: u8 = 0b1111;

    /// Build a mode from a raw mask. Returns `None` above four bits.
    pub fn new(bits: u8) -> Option<Self> {
        (bits <= Self::MAX).then_some(Self(bits))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// XOR the toggle's bit into the mask. Applying the same toggle twice
    /// gives back the original mode.
    pub fn toggled(self, toggle: ModeToggle) -> Self {
        Self(self.0 ^ toggle.bit())
    }

    /// Single lowercase hex digit used in compact transport payloads.
    pub fn to_hex_digit(self) -> char {
        // Four bits always fit in one digit.
        char::from_digit(u32::from(self.0), 16).unwrap_or('0')
    }

    pub fn from_hex_digit(digit: char) -> Result<Self, EditorError> {
        digit
            .to_digit(16)
            .and_then(|bits| u8::try_from(bits).ok())
            .and_then(Mode::new)
            .ok_or_else(|| EditorError::InvalidState(format!("mode digit {digit:?}")))
    }
}

impl TryFrom<u8> for Mode {
    type Error = EditorError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Mode::new(bits).ok_or(EditorError::UnknownMode(bits))
    }
}

impl From<Mode> for u8 {
    fn from(mode: Mode) -> Self {
        mode.0
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06b}", self.0)
    }
}

/// The four layer toggles and the bit each one flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeToggle {
    /// Digits and punctuation (`71`).
    Symbols,
    /// Upper case (`60`).
    Shift,
    /// Accented letters (`70`).
    Accents,
    /// Emoji (`72`).
    Emoji,
}

impl ModeToggle {
    pub const ALL: [ModeToggle; 4] = [
        ModeToggle::Symbols,
        ModeToggle::Shift,
        ModeToggle::Accents,
        ModeToggle::Emoji,
    ];

    pub fn bit(self) -> u8 {
        match self {
            ModeToggle::Symbols => 0b0001,
            ModeToggle::Shift => 0b0010,
            ModeToggle::Accents => 0b0100,
            ModeToggle::Emoji => 0b1000,
        }
    }

    /// Two-character code of the toggle key.
    pub fn code(self) -> &'static str {
        match self {
            ModeToggle::Symbols => "71",
            ModeToggle::Shift => "60",
            ModeToggle::Accents => "70",
            ModeToggle::Emoji => "72",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_is_an_involution() {
        for bits in 0..=Mode::MAX {
            let mode = Mode::new(bits).unwrap();
            for toggle in ModeToggle::ALL {
                assert_eq!(mode.toggled(toggle).toggled(toggle), mode);
            }
        }
    }

    #[test]
    fn shift_sets_second_bit() {
        let mode = Mode::BASE.toggled(ModeToggle::Shift);
        assert_eq!(mode.bits(), 2);
        assert_eq!(mode.toggled(ModeToggle::Emoji).bits(), 0b1010);
    }

    #[test]
    fn hex_digit_roundtrip() {
        assert_eq!(Mode::new(0xa).unwrap().to_hex_digit(), 'a');
        assert_eq!(Mode::from_hex_digit('f').unwrap().bits(), 15);
        assert_eq!(Mode::from_hex_digit('F').unwrap().bits(), 15);
        assert!(Mode::from_hex_digit('g').is_err());
    }

    #[test]
    fn rejects_wide_masks() {
        assert!(Mode::new(16).is_none());
        assert_eq!(Mode::try_from(16u8), Err(EditorError::UnknownMode(16)));
    }
}
