//! Text buffer with code-point caret tracking.
//!
//! The buffer stores the edited text and a caret expressed as a code-point
//! index ("before code point i"). Byte offsets into the backing `String` are
//! derived on demand, so multi-byte and multi-code-point symbols are never
//! split. A caret past the end of the text is tolerated (it can arrive from a
//! collaborator) and is clamped before any read or write of the text.

use crate::error::EditorError;
use tracing::trace;

/// Text plus caret position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    caret: usize,
}

impl TextBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding `text` with the caret at its end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let caret = text.chars().count();
        Self { text, caret }
    }

    /// Create a buffer with an explicit caret. The caret is kept as given
    /// and clamped lazily.
    pub fn with_caret(text: impl Into<String>, caret: usize) -> Self {
        Self {
            text: text.into(),
            caret,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Stored caret, possibly past the end of the text.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Number of code points in the text.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Caret limited to `[0, len]`.
    pub fn clamped_caret(&self) -> usize {
        self.caret.min(self.len())
    }

    /// Store the clamped caret and return it.
    fn clamp(&mut self) -> usize {
        self.caret = self.clamped_caret();
        self.caret
    }

    /// Byte offset of code point `index`; the text length when `index` is at
    /// or past the end.
    fn byte_offset(&self, index: usize) -> usize {
        self.text
            .char_indices()
            .nth(index)
            .map_or(self.text.len(), |(offset, _)| offset)
    }

    /// One code point to the left of `caret`.
    fn step_back(&self, caret: usize) -> Result<usize, EditorError> {
        caret.checked_sub(1).ok_or(EditorError::CaretOutOfRange {
            caret: -1,
            len: self.len(),
        })
    }

    /// Splice `symbol` in at the caret and advance the caret by the number of
    /// code points in `symbol`.
    pub fn insert_symbol(&mut self, symbol: &str) -> &mut Self {
        let caret = self.clamp();
        let offset = self.byte_offset(caret);
        self.text.insert_str(offset, symbol);
        self.caret = caret + symbol.chars().count();
        self
    }

    /// Remove the code point before the caret.
    ///
    /// At the start of the buffer nothing is removed and the caret stays 0.
    pub fn backspace(&mut self) -> &mut Self {
        let caret = self.clamp();
        match self.step_back(caret) {
            Ok(prev) => {
                let offset = self.byte_offset(prev);
                self.text.remove(offset);
                self.caret = prev;
            }
            Err(err) => trace!(%err, "backspace at start of buffer"),
        }
        self
    }

    /// Remove the code point after the caret. No-op at the end of the text.
    pub fn delete(&mut self) -> &mut Self {
        let caret = self.clamp();
        if caret < self.len() {
            let offset = self.byte_offset(caret);
            self.text.remove(offset);
        }
        self
    }

    pub fn move_left(&mut self) -> &mut Self {
        let caret = self.clamp();
        self.caret = caret.saturating_sub(1);
        self
    }

    pub fn move_right(&mut self) -> &mut Self {
        let caret = self.clamp();
        self.caret = (caret + 1).min(self.len());
        self
    }

    /// Move one line up keeping the column where the line is long enough.
    /// On the first line the caret goes to the start of the text.
    pub fn move_up(&mut self) -> &mut Self {
        let (row, col) = self.caret_coords();
        let target = if row > 0 {
            let line_len = self.line_len(row - 1);
            (row - 1, col.min(line_len))
        } else {
            (0, 0)
        };
        self.caret = self.position_from_coords(target);
        self
    }

    /// Move one line down keeping the column where the line is long enough.
    /// On the last line the caret goes to the end of that line.
    pub fn move_down(&mut self) -> &mut Self {
        let (row, col) = self.caret_coords();
        let last = self.lines().len() - 1;
        let target = if row < last {
            let line_len = self.line_len(row + 1);
            (row + 1, col.min(line_len))
        } else {
            (last, self.line_len(last))
        };
        self.caret = self.position_from_coords(target);
        self
    }

    /// Text split on `'\n'`. Always at least one (possibly empty) line.
    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines().get(row).map_or(0, |line| line.chars().count())
    }

    /// `(row, col)` of the clamped caret.
    ///
    /// Walks the lines accumulating `length + 1` (the newline) and stops at
    /// the first line whose running sum reaches the caret. A caret right
    /// after a newline therefore reports the column one past the end of the
    /// line it terminates, and `position_from_coords` maps it back.
    pub fn caret_coords(&self) -> (usize, usize) {
        let caret = self.clamped_caret();
        let lines = self.lines();
        let mut sum = 0;
        for (row, line) in lines.iter().enumerate() {
            let width = line.chars().count() + 1;
            sum += width;
            if sum >= caret {
                return (row, width - (sum - caret));
            }
        }
        // The final running sum is len + line count, past any clamped caret.
        let last = lines.len() - 1;
        (last, lines[last].chars().count())
    }

    /// Inverse of [`caret_coords`](Self::caret_coords): the lengths (plus
    /// newline) of every line before `row`, plus `col`.
    pub fn position_from_coords(&self, (row, col): (usize, usize)) -> usize {
        let before: usize = self
            .lines()
            .iter()
            .take(row)
            .map(|line| line.chars().count() + 1)
            .sum();
        before + col
    }

    /// Snapshot of the text with `marker` spliced in at the clamped caret.
    pub fn text_with_caret(&self, marker: &str) -> String {
        let offset = self.byte_offset(self.clamped_caret());
        let mut out = String::with_capacity(self.text.len() + marker.len());
        out.push_str(&self.text[..offset]);
        out.push_str(marker);
        out.push_str(&self.text[offset..]);
        out
    }
}
