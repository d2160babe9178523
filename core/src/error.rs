//! Error types for the editor core.

use thiserror::Error;

/// Errors produced while classifying or applying a key token.
///
/// Every variant except `CaretOutOfRange` is returned to the caller with the
/// editor left exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// The token is neither a toggle code, a control token nor a grid cell.
    #[error("invalid key token {0:?}")]
    InvalidToken(String),

    /// The active (or requested) mode has no registered layout.
    #[error("no layout registered for mode {0:#x}")]
    UnknownMode(u8),

    /// The grid cell does not exist in the active layout.
    #[error("cell ({row}, {col}) is outside the layout for mode {mode:#x}")]
    CellOutOfRange { mode: u8, row: usize, col: usize },

    /// A caret step would leave the buffer. Recovered by clamping inside the
    /// buffer and never returned from a public operation.
    #[error("caret {caret} is out of range for a buffer of {len} code points")]
    CaretOutOfRange { caret: isize, len: usize },

    /// Encoded mode/caret state could not be decoded.
    #[error("invalid encoded editor state: {0}")]
    InvalidState(String),
}

/// Errors produced while loading or validating a layout set.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Modes are four-bit masks.
    #[error("mode {0} does not fit in four bits")]
    ModeOutOfRange(u16),

    #[error("layout for mode {0} has no rows")]
    Empty(u8),

    #[error("layout for mode {mode} row {row} has {found} cells, expected {expected}")]
    Ragged {
        mode: u8,
        row: usize,
        found: usize,
        expected: usize,
    },
}
