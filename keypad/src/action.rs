//! Button payloads.
//!
//! Every keyboard button carries a short payload that encodes the pressed
//! cell together with the editor state at render time, so a press can be
//! replayed against an editor that is no longer cached:
//!
//! `{mode hex}{row}{col}{caret}[:{owner}]`, e.g. `2173` or `0150:4242`.
//!
//! The owner suffix is present while the editor is locked to one user.

use keypad_core::{codec, EditorState, KeyToken, Mode};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static PAYLOAD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9a-f])([0-7])([0-7])([0-9]+)(?::([0-9]+))?$").expect("payload pattern is valid")
});

/// Decoded button payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionPayload {
    pub mode: Mode,
    pub row: usize,
    pub col: usize,
    pub caret: usize,
    pub owner: Option<u64>,
}

impl ActionPayload {
    pub fn new(state: EditorState, row: usize, col: usize, owner: Option<u64>) -> Self {
        Self {
            mode: state.mode,
            row,
            col,
            caret: state.caret,
            owner,
        }
    }

    pub fn parse(data: &str) -> Result<Self, String> {
        let caps = PAYLOAD_RE
            .captures(data)
            .ok_or_else(|| format!("unrecognised payload {data:?}"))?;
        let mode = codec::decode_mode(&caps[1]).map_err(|e| e.to_string())?;
        let caret = codec::decode_caret(&caps[4]).map_err(|e| e.to_string())?;
        let owner = match caps.get(5) {
            Some(m) => Some(
                m.as_str()
                    .parse()
                    .map_err(|_| format!("owner id out of range in {data:?}"))?,
            ),
            None => None,
        };
        Ok(Self {
            mode,
            row: usize::from(caps[2].as_bytes()[0] - b'0'),
            col: usize::from(caps[3].as_bytes()[0] - b'0'),
            caret,
            owner,
        })
    }

    /// Key token of the pressed cell.
    pub fn token(&self) -> String {
        KeyToken::cell_code(self.row, self.col)
    }

    /// Editor state at render time.
    pub fn state(&self) -> EditorState {
        EditorState {
            mode: self.mode,
            caret: self.caret,
        }
    }
}

impl fmt::Display for ActionPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            codec::encode_mode(self.mode),
            self.row,
            self.col,
            codec::encode_caret(self.caret)
        )?;
        if let Some(owner) = self.owner {
            write!(f, ":{owner}")?;
        }
        Ok(())
    }
}
