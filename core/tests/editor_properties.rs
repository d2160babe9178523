// core/tests/editor_properties.rs
//
// Integration tests for the editor state machine.
//
// Tests cover:
// - Caret/coordinate round trip over every caret position
// - Insert then backspace restores text and caret
// - Toggle involution through the dispatcher
// - Left/right arrow symmetry and idempotence at the edges
// - Multi-code-point symbol insertion
// - Worked scenarios for grid insert, coordinates, toggles, backspace at 0
//   and arrow down on the last line

use keypad_core::{
    Editor, EditorError, KeyDispatcher, Layout, LayoutRegistry, Mode, TextBuffer,
};
use std::sync::Arc;

const SAMPLES: &[&str] = &[
    "",
    "a",
    "ab\ncd",
    "\n",
    "\n\n",
    "héllo\nwörld\n",
    "a😀b\n👍🏽\n\nend",
    "tab\there",
];

fn dispatcher() -> KeyDispatcher {
    let mut layouts = LayoutRegistry::new();
    layouts
        .insert(
            Mode::BASE,
            Layout::from_rows(&[["a", "b", ""], ["é", "👍🏽", "👨‍👩‍👧"]]),
        )
        .unwrap();
    layouts
        .insert(
            Mode::new(0b0010).unwrap(),
            Layout::from_rows(&[["A", "B", ""], ["É", "👎", "X"]]),
        )
        .unwrap();
    KeyDispatcher::new(Arc::new(layouts))
}

#[test]
fn coords_roundtrip_for_every_caret() {
    for text in SAMPLES {
        let len = text.chars().count();
        for caret in 0..=len {
            let buf = TextBuffer::with_caret(*text, caret);
            let coords = buf.caret_coords();
            assert_eq!(
                buf.position_from_coords(coords),
                caret,
                "text {text:?} caret {caret} coords {coords:?}"
            );
            let (row, col) = coords;
            assert!(col <= buf.lines()[row].chars().count() + 1);
        }
    }
}

#[test]
fn insert_then_backspace_restores_state() {
    for text in SAMPLES {
        let len = text.chars().count();
        for caret in 0..=len {
            for symbol in ["x", "é", "😀", "\n", "\t"] {
                let mut buf = TextBuffer::with_caret(*text, caret);
                buf.insert_symbol(symbol).backspace();
                assert_eq!(buf.text(), *text);
                assert_eq!(buf.caret(), caret);
            }
        }
    }
}

#[test]
fn toggling_twice_restores_mode() {
    let dispatcher = dispatcher();
    let mut editor = Editor::with_text("q");
    dispatcher.process(&mut editor, "60").unwrap();
    dispatcher.process(&mut editor, "60").unwrap();
    assert_eq!(editor.mode(), Mode::BASE);
    assert_eq!(editor.text(), "q");
    assert_eq!(editor.caret_position(), 1);
}

#[test]
fn left_right_symmetry_and_edges() {
    let dispatcher = dispatcher();
    for text in SAMPLES {
        let len = text.chars().count();
        for caret in 1..len {
            let editor = Editor::restore(*text, Mode::BASE, caret);
            let editor = dispatcher.dispatch(editor, "arrowLeft").unwrap();
            let editor = dispatcher.dispatch(editor, "arrowRight").unwrap();
            assert_eq!(editor.caret_position(), caret);
        }

        let start = dispatcher
            .dispatch(Editor::restore(*text, Mode::BASE, 0), "75")
            .unwrap();
        assert_eq!(start.caret_position(), 0);

        let end = dispatcher
            .dispatch(Editor::restore(*text, Mode::BASE, len), "77")
            .unwrap();
        assert_eq!(end.caret_position(), len);
    }
}

#[test]
fn multi_code_point_symbols_advance_by_their_length() {
    let dispatcher = dispatcher();
    for (token, width) in [("11", 2), ("12", 5), ("10", 1)] {
        let before = Editor::restore("ab", Mode::BASE, 1);
        let after = dispatcher.dispatch(before, token).unwrap();
        assert_eq!(after.caret_position(), 1 + width);
        assert_eq!(after.text().chars().count(), 2 + width);
    }
}

#[test]
fn scenario_grid_insert_into_empty_text() {
    let editor = dispatcher().dispatch(Editor::new(), "00").unwrap();
    assert_eq!(editor.text(), "a");
    assert_eq!(editor.caret_position(), 1);
}

#[test]
fn scenario_caret_coords() {
    let editor = Editor::restore("ab\ncd", Mode::BASE, 4);
    assert_eq!(editor.caret_coords(), (1, 1));
}

#[test]
fn scenario_shift_toggle() {
    let dispatcher = dispatcher();
    let editor = dispatcher.dispatch(Editor::new(), "60").unwrap();
    assert_eq!(editor.mode().bits(), 2);
    let editor = dispatcher.dispatch(editor, "01").unwrap();
    assert_eq!(editor.text(), "B");
    let editor = dispatcher.dispatch(editor, "60").unwrap();
    assert_eq!(editor.mode().bits(), 0);
}

#[test]
fn scenario_backspace_at_start_keeps_text() {
    let editor = Editor::restore("x", Mode::BASE, 0);
    let editor = dispatcher().dispatch(editor, "backspace").unwrap();
    assert_eq!(editor.text(), "x");
    assert_eq!(editor.caret_position(), 0);
}

#[test]
fn scenario_arrow_down_on_last_line() {
    let dispatcher = dispatcher();
    let editor = Editor::restore("first\nlast line", Mode::BASE, 8);
    assert_eq!(editor.caret_coords(), (1, 2));
    let editor = dispatcher.dispatch(editor, "arrowDown").unwrap();
    assert_eq!(editor.caret_coords(), (1, 9));
    assert_eq!(editor.caret_position(), 15);
}

#[test]
fn caret_after_newline_stays_on_the_ended_line() {
    let dispatcher = dispatcher();
    assert_eq!(Editor::restore("ab\ncd", Mode::BASE, 3).caret_coords(), (0, 3));

    let down = dispatcher
        .dispatch(Editor::restore("abc\nd\nefg", Mode::BASE, 4), "arrowDown")
        .unwrap();
    assert_eq!(down.caret_position(), 5);

    let up = dispatcher
        .dispatch(Editor::restore("ab\ncd\nef", Mode::BASE, 6), "66")
        .unwrap();
    assert_eq!(up.caret_position(), 2);
}

#[test]
fn enter_and_tab_insert_whitespace() {
    let dispatcher = dispatcher();
    let editor = dispatcher.dispatch(Editor::with_text("a"), "enter").unwrap();
    let editor = dispatcher.dispatch(editor, "10").unwrap();
    assert_eq!(editor.text(), "a\n\t");
    assert_eq!(editor.caret_coords(), (1, 1));
}

#[test]
fn delete_and_fn_tokens() {
    let dispatcher = dispatcher();
    let editor = dispatcher
        .dispatch(Editor::restore("abc", Mode::BASE, 1), "07")
        .unwrap();
    assert_eq!(editor.text(), "ac");
    let editor = dispatcher.dispatch(editor, "fn").unwrap();
    assert_eq!(editor.text(), "ac");
    assert_eq!(editor.caret_position(), 1);
}

#[test]
fn invalid_tokens_leave_editor_untouched() {
    let dispatcher = dispatcher();
    let mut editor = Editor::restore("abc", Mode::BASE, 1);
    let before = editor.clone();
    for token in ["", "x", "123", "arrowup"] {
        assert_eq!(
            dispatcher.process(&mut editor, token),
            Err(EditorError::InvalidToken(token.to_string()))
        );
    }
    assert_eq!(editor, before);
}

#[test]
fn render_tracks_caret_through_edits() {
    let dispatcher = dispatcher();
    let editor = Editor::new().with_caret_marker("|");
    let editor = dispatcher.dispatch(editor, "00").unwrap();
    let editor = dispatcher.dispatch(editor, "01").unwrap();
    let editor = dispatcher.dispatch(editor, "arrowLeft").unwrap();
    assert_eq!(editor.render(), "a|b");
    assert_eq!(editor.caret_index(), 1);
}
