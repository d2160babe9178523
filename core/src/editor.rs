//! The editor entity: buffer, active layer, caret marker and entities.

use crate::buffer::TextBuffer;
use crate::mode::Mode;
use serde::{Deserialize, Serialize};

/// Default caret marker: a vertical bar followed by a zero-width non-joiner.
pub const DEFAULT_CARET_MARKER: &str = "|\u{200C}";

/// Formatting range attached to the edited message. Opaque to the editor
/// and carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub kind: String,
    pub offset: usize,
    pub length: usize,
}

/// One editing session's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    buffer: TextBuffer,
    mode: Mode,
    caret_marker: String,
    entities: Vec<MessageEntity>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Empty editor on the base layer.
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Editor seeded with `text`, caret at the end, base layer.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            buffer: TextBuffer::with_text(text),
            mode: Mode::BASE,
            caret_marker: DEFAULT_CARET_MARKER.to_string(),
            entities: Vec::new(),
        }
    }

    /// Rebuild an editor from its three transportable parts. The caret is
    /// kept as given and clamped on first use.
    pub fn restore(text: impl Into<String>, mode: Mode, caret: usize) -> Self {
        Self {
            buffer: TextBuffer::with_caret(text, caret),
            mode,
            caret_marker: DEFAULT_CARET_MARKER.to_string(),
            entities: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_caret_marker(mut self, marker: impl Into<String>) -> Self {
        self.caret_marker = marker.into();
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_entities(mut self, entities: Vec<MessageEntity>) -> Self {
        self.entities = entities;
        self
    }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// Stored caret (may be past the end until the next mutation).
    pub fn caret_position(&self) -> usize {
        self.buffer.caret()
    }

    pub fn caret_coords(&self) -> (usize, usize) {
        self.buffer.caret_coords()
    }

    pub fn lines(&self) -> Vec<&str> {
        self.buffer.lines()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn caret_marker(&self) -> &str {
        &self.caret_marker
    }

    pub fn entities(&self) -> &[MessageEntity] {
        &self.entities
    }

    pub fn text_with_caret(&self) -> String {
        self.buffer.text_with_caret(&self.caret_marker)
    }
}
