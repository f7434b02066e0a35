mod common;

use common::{document, init_tracing, numbered};
use linepad_core::{
    CursorEngine, CursorOutcome, EditorConfig, InputEvent, InputHub, Key, LineStore, Position,
    ViewportWindow,
};
use pretty_assertions::assert_eq;

fn press(doc: &mut linepad_core::Document, keys: &[Key]) {
    for key in keys {
        doc.handle(InputEvent::Key(*key)).unwrap();
    }
}

#[test]
fn test_typing_enter_and_backspace_scenario() {
    init_tracing();
    let mut doc = document("", 10);
    let hub = InputHub::new();
    let _subscription = doc.foreground(&hub);

    for key in [
        Key::Char('a'),
        Key::Char('b'),
        Key::Char('c'),
        Key::Enter,
        Key::Enter,
        Key::Enter,
        Key::Backspace,
    ] {
        assert!(hub.dispatch(InputEvent::Key(key)));
    }
    assert_eq!(doc.pump().unwrap(), 7);

    assert_eq!(doc.store().len(), 3);
    assert_eq!(doc.text(), "abc\n\n");
    assert_eq!(doc.cursor().position(), Position::new(2, 0));
    assert_eq!(doc.viewport().bound_rows(), vec![0, 1, 2]);

    let mut moves = 0;
    while doc.handle(InputEvent::Key(Key::ArrowUp)).unwrap().moved {
        moves += 1;
        assert!(moves <= 3, "ArrowUp kept moving past the first row");
    }
    assert_eq!(moves, 2);
    assert_eq!(doc.cursor().position(), Position::new(0, 0));
}

#[test]
fn test_repeated_navigate_up_stops_at_origin() {
    let mut doc = document(&numbered(200), 10);
    let hub = InputHub::new();
    let _subscription = doc.foreground(&hub);
    doc.handle(InputEvent::Pointer {
        slot: doc.viewport().slot_for_row(7).unwrap(),
        x_px: 7.8 * 4.0,
    })
    .unwrap();
    for _ in 0..150 {
        press(&mut doc, &[Key::ArrowDown]);
    }
    assert_eq!(doc.cursor().position(), Position::new(157, 4));

    let mut presses = 0;
    while doc.handle(InputEvent::Key(Key::ArrowUp)).unwrap().moved {
        presses += 1;
        assert!(presses <= 200, "navigate_up did not terminate");
    }
    assert_eq!(presses, 157);
    // Column 4 is kept by the anchor; the final no-op press stays on row 0.
    assert_eq!(doc.cursor().position(), Position::new(0, 4));
    assert_eq!(doc.viewport().top_row(), 0);

    press(&mut doc, &[Key::ArrowLeft, Key::ArrowLeft, Key::ArrowLeft, Key::ArrowLeft]);
    let outcome = doc.handle(InputEvent::Key(Key::ArrowUp)).unwrap();
    assert_eq!(outcome, CursorOutcome::default());
    assert_eq!(doc.cursor().position(), Position::new(0, 0));
}

#[test]
fn test_anchor_survives_a_run_of_short_lines() {
    let mut doc = document("a long first line\n\nx\nyz\nanother long line", 10);
    doc.handle(InputEvent::Key(Key::ArrowRight)).unwrap();
    for _ in 0..9 {
        doc.handle(InputEvent::Key(Key::ArrowRight)).unwrap();
    }
    assert_eq!(doc.cursor().position(), Position::new(0, 10));

    let expected = [
        Position::new(1, 0),
        Position::new(2, 1),
        Position::new(3, 2),
        Position::new(4, 10),
    ];
    for position in expected {
        doc.handle(InputEvent::Key(Key::ArrowDown)).unwrap();
        assert_eq!(doc.cursor().position(), position);
        assert_eq!(doc.cursor().col_anchor, Some(10));
    }

    // Typing clears the anchor; the next vertical run anchors at the new column.
    doc.handle(InputEvent::Key(Key::Char('!'))).unwrap();
    assert_eq!(doc.cursor().col_anchor, None);
    doc.handle(InputEvent::Key(Key::ArrowUp)).unwrap();
    assert_eq!(doc.cursor().position(), Position::new(3, 2));
    assert_eq!(doc.cursor().col_anchor, Some(11));
}

#[test]
fn test_cursor_moves_scroll_into_view_with_margin() {
    let mut doc = document(&numbered(100), 10);
    let hub = InputHub::new();
    let _subscription = doc.foreground(&hub);

    for _ in 0..7 {
        press(&mut doc, &[Key::ArrowDown]);
    }
    assert_eq!(doc.viewport().top_row(), 0);

    // Row 8 would leave fewer than two rows below it.
    press(&mut doc, &[Key::ArrowDown]);
    assert_eq!(doc.cursor().position().row, 8);
    assert_eq!(doc.viewport().top_row(), 1);

    for _ in 0..8 {
        press(&mut doc, &[Key::ArrowUp]);
    }
    assert_eq!(doc.cursor().position().row, 0);
    assert_eq!(doc.viewport().top_row(), 0);
}

#[test]
fn test_backspace_at_line_start_joins_lines() {
    let config = EditorConfig::default().with_viewport(800.0, 80.0);
    let mut store = LineStore::new("first\nsecond\nthird");
    let mut window = ViewportWindow::new(&config);
    let mut engine = CursorEngine::new(&store, &config);
    window.mount(&store, engine.position());

    engine
        .place_at(&store, &mut window, Position::new(2, 0))
        .unwrap();
    let outcome = engine.backspace(&mut store, &mut window).unwrap();
    assert_eq!(
        outcome,
        CursorOutcome {
            moved: true,
            edited: true
        }
    );
    assert_eq!(store.to_text(), "first\nsecondthird");
    assert_eq!(engine.position(), Position::new(1, 6));
    assert_eq!(engine.cursor().line, store.line_at_row(1).unwrap());
    assert_eq!(window.bound_rows(), vec![0, 1]);
}

#[test]
fn test_enter_in_middle_of_line_moves_tail_down() {
    let mut doc = document("hello world", 10);
    for _ in 0..5 {
        press(&mut doc, &[Key::ArrowRight]);
    }
    press(&mut doc, &[Key::Enter]);
    assert_eq!(doc.text(), "hello\n world");
    assert_eq!(doc.cursor().position(), Position::new(1, 0));

    press(&mut doc, &[Key::Backspace]);
    assert_eq!(doc.text(), "hello world");
    assert_eq!(doc.cursor().position(), Position::new(0, 5));
}
