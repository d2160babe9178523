//! Display projections of an editor.
//!
//! Both projections are pure: they read the editor and never write the
//! clamped caret back.

use crate::editor::Editor;
use crate::mode::Mode;

impl Editor {
    /// Display string: the text with the caret marker at the clamped caret.
    pub fn render(&self) -> String {
        self.text_with_caret()
    }

    /// Caret as a plain integer, for encoding into outbound payloads.
    pub fn caret_index(&self) -> usize {
        self.caret_position()
    }

    /// Both projections at once.
    pub fn snapshot(&self) -> Rendered {
        Rendered {
            display: self.render(),
            caret: self.caret_index(),
            mode: self.mode(),
        }
    }
}

/// Rendered state handed to a collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub display: String,
    pub caret: usize,
    pub mode: Mode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_is_pure() {
        let editor = Editor::restore("abc", Mode::BASE, 1).with_caret_marker("^");
        let before = editor.clone();
        assert_eq!(editor.render(), "a^bc");
        assert_eq!(editor.caret_index(), 1);
        assert_eq!(editor, before);
    }

    #[test]
    fn snapshot_reports_stored_caret() {
        let snapshot = Editor::restore("ab", Mode::new(4).unwrap(), 7)
            .with_caret_marker("^")
            .snapshot();
        assert_eq!(snapshot.display, "ab^");
        assert_eq!(snapshot.caret, 7);
        assert_eq!(snapshot.mode.bits(), 4);
    }
}
