use linepad_core::{EditorError, LineStore};
use pretty_assertions::assert_eq;

fn texts(store: &LineStore) -> Vec<String> {
    store.lines().map(|(_, text)| text.to_string()).collect()
}

#[test]
fn test_text_round_trip() {
    let samples = [
        "",
        "\n",
        "\n\n\n",
        "single",
        "trailing\n",
        "one\ntwo\nthree",
        "crlf\r\nkept\r\n",
        "日本語\nemoji 🦀\n\tindented",
    ];
    for text in samples {
        let store = LineStore::new(text);
        assert_eq!(store.to_text(), text, "round trip of {text:?}");
        assert_eq!(store.len(), text.split('\n').count());
    }
}

#[test]
fn test_empty_document_is_one_empty_line() {
    let store = LineStore::new("");
    assert_eq!(store.len(), 1);
    assert!(!store.is_empty());
    assert_eq!(store.text(store.head()), Some(""));
    assert_eq!(store.prev(store.head()), None);
    assert_eq!(store.next(store.head()), None);
}

#[test]
fn test_rows_and_handles_agree() {
    let store = LineStore::new("a\nb\nc\nd");
    for (row, (line, _)) in store.lines().enumerate() {
        assert_eq!(store.line_at_row(row), Some(line));
        assert_eq!(store.row_of(line), Some(row));
    }
    assert_eq!(store.line_at_row(4), None);
}

#[test]
fn test_split_then_merge_restores_text_at_every_column() {
    let original = "añb🦀c";
    for col in 0..=original.chars().count() {
        let mut store = LineStore::new(&format!("before\n{original}\nafter"));
        let line = store.line_at_row(1).unwrap();

        let tail = store.split_line(line, col).unwrap();
        assert_eq!(store.len(), 4);
        let head_text: String = original.chars().take(col).collect();
        let tail_text: String = original.chars().skip(col).collect();
        assert_eq!(store.text(line), Some(head_text.as_str()));
        assert_eq!(store.text(tail), Some(tail_text.as_str()));
        assert_eq!(store.next(tail), store.line_at_row(3));

        let join = store.merge_line(tail).unwrap();
        assert_eq!(join, col);
        assert_eq!(store.to_text(), format!("before\n{original}\nafter"));
    }
}

#[test]
fn test_merge_head_is_rejected() {
    let mut store = LineStore::new("only\nlines");
    let head = store.head();
    assert!(matches!(
        store.merge_line(head),
        Err(EditorError::NoPreviousLine(_))
    ));
    assert_eq!(texts(&store), vec!["only", "lines"]);
}

#[test]
fn test_merged_line_handle_is_stale() {
    let mut store = LineStore::new("a\nb");
    let second = store.line_at_row(1).unwrap();
    store.merge_line(second).unwrap();

    assert!(!store.contains(second));
    assert_eq!(store.text(second), None);
    assert!(matches!(
        store.insert_char(second, 0, 'x'),
        Err(EditorError::StaleLine(_))
    ));

    // The arena slot is reused, but the old handle stays stale.
    let fresh = store.split_line(store.head(), 1).unwrap();
    assert_ne!(fresh, second);
    assert!(!store.contains(second));
    assert_eq!(texts(&store), vec!["a", "b"]);
}

#[test]
fn test_character_edits() {
    let mut store = LineStore::new("ac");
    let line = store.head();
    store.insert_char(line, 1, 'b').unwrap();
    store.insert_char(line, 99, 'd').unwrap();
    assert_eq!(store.text(line), Some("abcd"));

    assert_eq!(store.delete_char(line, 4).unwrap(), Some('d'));
    assert_eq!(store.delete_char(line, 0).unwrap(), None);
    store.insert_spaces(line, 0, 2).unwrap();
    assert_eq!(store.text(line), Some("  abc"));
    assert_eq!(store.line_len(line), Some(5));
}
