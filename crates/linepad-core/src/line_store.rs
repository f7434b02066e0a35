//! Line Store
//!
//! The document model: an ordered, doubly-linked sequence of logical lines.
//!
//! # Overview
//!
//! Lines live in an arena and refer to their neighbors through [`LineId`] handles instead of
//! pointers. A handle carries a generation counter, so a handle to a line that was removed by
//! [`LineStore::merge_line`] is detected as stale rather than silently aliasing whatever line
//! later reuses the arena slot.
//!
//! The store knows nothing about rendering. Row lookups ([`LineStore::line_at_row`]) walk the
//! list from the head and cost O(row); callers that need repeated access cache the handles
//! (the viewport window binds one handle per render slot) and step with
//! [`LineStore::next`]/[`LineStore::prev`].
//!
//! # Example
//!
//! ```rust
//! use linepad_core::LineStore;
//!
//! let mut store = LineStore::new("hello\nworld");
//! let first = store.head();
//!
//! let second = store.split_line(first, 2).unwrap();
//! assert_eq!(store.text(first), Some("he"));
//! assert_eq!(store.text(second), Some("llo"));
//! assert_eq!(store.len(), 3);
//!
//! let join = store.merge_line(second).unwrap();
//! assert_eq!(join, 2);
//! assert_eq!(store.to_text(), "hello\nworld");
//! ```

use crate::error::{EditorError, Result};
use crate::text::{byte_offset, char_len, split_lines};

/// Stable handle to one line of a [`LineStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct LineNode {
    text: String,
    prev: Option<LineId>,
    next: Option<LineId>,
}

#[derive(Debug, Clone)]
struct ArenaEntry {
    generation: u32,
    node: Option<LineNode>,
}

/// Arena-backed doubly-linked list of lines.
///
/// Invariants:
/// - there is always at least one line (an empty document is a single empty line);
/// - `prev`/`next` links are mutually consistent and acyclic;
/// - `len()` equals the number of lines reachable from `head()`.
#[derive(Debug, Clone)]
pub struct LineStore {
    entries: Vec<ArenaEntry>,
    free: Vec<u32>,
    head: LineId,
    len: usize,
}

impl LineStore {
    /// Build a store from document text, splitting on `'\n'`.
    pub fn new(text: &str) -> Self {
        let mut store = Self {
            entries: Vec::new(),
            free: Vec::new(),
            head: LineId {
                index: 0,
                generation: 0,
            },
            len: 0,
        };

        let mut tail: Option<LineId> = None;
        for line in split_lines(text) {
            let id = store.alloc(LineNode {
                text: line.to_string(),
                prev: tail,
                next: None,
            });
            match tail {
                Some(prev) => {
                    if let Some(node) = store.node_mut_unchecked(prev) {
                        node.next = Some(id);
                    }
                }
                None => store.head = id,
            }
            tail = Some(id);
            store.len += 1;
        }

        tracing::debug!(lines = store.len, "line store constructed");
        store
    }

    /// Create a store holding a single empty line.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// First line of the document.
    pub fn head(&self) -> LineId {
        self.head
    }

    /// Number of lines in the document (never zero).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: a document has at least one line.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `line` refers to a live line of this store.
    pub fn contains(&self, line: LineId) -> bool {
        self.node(line).is_some()
    }

    /// Text of a line, without its line break.
    pub fn text(&self, line: LineId) -> Option<&str> {
        self.node(line).map(|node| node.text.as_str())
    }

    /// Length of a line in columns.
    pub fn line_len(&self, line: LineId) -> Option<usize> {
        self.text(line).map(char_len)
    }

    /// Line following `line`, if any.
    pub fn next(&self, line: LineId) -> Option<LineId> {
        self.node(line).and_then(|node| node.next)
    }

    /// Line preceding `line`, if any.
    pub fn prev(&self, line: LineId) -> Option<LineId> {
        self.node(line).and_then(|node| node.prev)
    }

    /// Walk `row` steps from the head. `None` if `row >= len()`.
    pub fn line_at_row(&self, row: usize) -> Option<LineId> {
        if row >= self.len {
            return None;
        }
        let mut current = self.head;
        for _ in 0..row {
            current = self.next(current)?;
        }
        Some(current)
    }

    /// Row number of `line`, found by walking from the head. O(row).
    pub fn row_of(&self, line: LineId) -> Option<usize> {
        if !self.contains(line) {
            return None;
        }
        self.lines().position(|(id, _)| id == line)
    }

    /// Iterate over `(handle, text)` pairs in document order.
    pub fn lines(&self) -> Lines<'_> {
        Lines {
            store: self,
            next: Some(self.head),
        }
    }

    /// Full document text, lines joined with `'\n'`.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (row, (_, text)) in self.lines().enumerate() {
            if row > 0 {
                out.push('\n');
            }
            out.push_str(text);
        }
        out
    }

    /// Insert `ch` at `col`. Columns past the end of the line are clamped to the end.
    pub fn insert_char(&mut self, line: LineId, col: usize, ch: char) -> Result<()> {
        let node = self.node_mut(line)?;
        let at = byte_offset(&node.text, col);
        node.text.insert(at, ch);
        Ok(())
    }

    /// Insert `count` spaces at `col` (clamped). Used for soft tabs.
    pub fn insert_spaces(&mut self, line: LineId, col: usize, count: usize) -> Result<()> {
        let node = self.node_mut(line)?;
        let at = byte_offset(&node.text, col);
        node.text.insert_str(at, &" ".repeat(count));
        Ok(())
    }

    /// Remove the character immediately before `col` and return it.
    ///
    /// No-op returning `None` when `col == 0`. Columns past the end are clamped.
    pub fn delete_char(&mut self, line: LineId, col: usize) -> Result<Option<char>> {
        let node = self.node_mut(line)?;
        if col == 0 || node.text.is_empty() {
            return Ok(None);
        }
        let col = col.min(char_len(&node.text));
        let at = byte_offset(&node.text, col - 1);
        Ok(Some(node.text.remove(at)))
    }

    /// Split `line` at `col`: the tail `text[col..]` moves into a new line linked right after
    /// it. Returns the new line.
    pub fn split_line(&mut self, line: LineId, col: usize) -> Result<LineId> {
        let (tail_text, old_next) = {
            let node = self.node_mut(line)?;
            let at = byte_offset(&node.text, col);
            (node.text.split_off(at), node.next)
        };

        let new_line = self.alloc(LineNode {
            text: tail_text,
            prev: Some(line),
            next: old_next,
        });

        if let Some(next) = old_next
            && let Some(node) = self.node_mut_unchecked(next)
        {
            node.prev = Some(new_line);
        }
        if let Some(node) = self.node_mut_unchecked(line) {
            node.next = Some(new_line);
        }
        self.len += 1;

        tracing::trace!(len = self.len, col, "split line");
        Ok(new_line)
    }

    /// Remove `line`, appending its text to the previous line.
    ///
    /// Returns the column in the previous line where the two texts were joined. The handle
    /// of the removed line becomes stale.
    pub fn merge_line(&mut self, line: LineId) -> Result<usize> {
        let node = self.node(line).ok_or(EditorError::StaleLine(line))?;
        let prev = node.prev.ok_or(EditorError::NoPreviousLine(line))?;
        let next = node.next;

        let removed = self.release(line);
        let join_col = {
            let prev_node = self.node_mut(prev)?;
            let join_col = char_len(&prev_node.text);
            prev_node.text.push_str(&removed.text);
            prev_node.next = next;
            join_col
        };
        if let Some(next) = next
            && let Some(node) = self.node_mut_unchecked(next)
        {
            node.prev = Some(prev);
        }
        self.len -= 1;

        tracing::trace!(len = self.len, join_col, "merged line");
        Ok(join_col)
    }

    fn node(&self, line: LineId) -> Option<&LineNode> {
        self.entries
            .get(line.index as usize)
            .filter(|entry| entry.generation == line.generation)
            .and_then(|entry| entry.node.as_ref())
    }

    fn node_mut(&mut self, line: LineId) -> Result<&mut LineNode> {
        self.node_mut_unchecked(line)
            .ok_or(EditorError::StaleLine(line))
    }

    fn node_mut_unchecked(&mut self, line: LineId) -> Option<&mut LineNode> {
        self.entries
            .get_mut(line.index as usize)
            .filter(|entry| entry.generation == line.generation)
            .and_then(|entry| entry.node.as_mut())
    }

    fn alloc(&mut self, node: LineNode) -> LineId {
        if let Some(index) = self.free.pop() {
            let entry = &mut self.entries[index as usize];
            entry.node = Some(node);
            return LineId {
                index,
                generation: entry.generation,
            };
        }
        let index = self.entries.len() as u32;
        self.entries.push(ArenaEntry {
            generation: 0,
            node: Some(node),
        });
        LineId {
            index,
            generation: 0,
        }
    }

    /// Caller guarantees `line` is live.
    fn release(&mut self, line: LineId) -> LineNode {
        let entry = &mut self.entries[line.index as usize];
        let node = entry.node.take().unwrap_or_else(|| LineNode {
            text: String::new(),
            prev: None,
            next: None,
        });
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(line.index);
        node
    }
}

impl Default for LineStore {
    fn default() -> Self {
        Self::empty()
    }
}

/// Iterator over the lines of a [`LineStore`] in document order.
pub struct Lines<'a> {
    store: &'a LineStore,
    next: Option<LineId>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = (LineId, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.store.node(id)?;
        self.next = node.next;
        Some((id, node.text.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(store: &LineStore) -> Vec<&str> {
        store.lines().map(|(_, text)| text).collect()
    }

    #[test]
    fn test_empty_text_is_one_empty_line() {
        let store = LineStore::new("");
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert_eq!(store.text(store.head()), Some(""));
        assert_eq!(store.to_text(), "");
    }

    #[test]
    fn test_construct_splits_on_newlines() {
        let store = LineStore::new("one\ntwo\n\nfour\n");
        assert_eq!(store.len(), 5);
        assert_eq!(texts(&store), vec!["one", "two", "", "four", ""]);
        assert_eq!(store.to_text(), "one\ntwo\n\nfour\n");
    }

    #[test]
    fn test_carriage_returns_round_trip() {
        let text = "a\r\nb\r\n";
        let store = LineStore::new(text);
        assert_eq!(store.len(), 3);
        assert_eq!(store.to_text(), text);
    }

    #[test]
    fn test_line_at_row_bounds() {
        let store = LineStore::new("a\nb\nc");
        assert_eq!(store.line_at_row(0), Some(store.head()));
        let third = store.line_at_row(2).unwrap();
        assert_eq!(store.text(third), Some("c"));
        assert_eq!(store.line_at_row(3), None);
        assert_eq!(store.row_of(third), Some(2));
    }

    #[test]
    fn test_links_are_consistent() {
        let store = LineStore::new("a\nb\nc");
        let a = store.head();
        let b = store.next(a).unwrap();
        let c = store.next(b).unwrap();
        assert_eq!(store.prev(a), None);
        assert_eq!(store.prev(b), Some(a));
        assert_eq!(store.prev(c), Some(b));
        assert_eq!(store.next(c), None);
    }

    #[test]
    fn test_insert_char_clamps_column() {
        let mut store = LineStore::new("ab");
        let line = store.head();
        store.insert_char(line, 1, 'x').unwrap();
        assert_eq!(store.text(line), Some("axb"));
        store.insert_char(line, 99, '!').unwrap();
        assert_eq!(store.text(line), Some("axb!"));
    }

    #[test]
    fn test_delete_char_before_column() {
        let mut store = LineStore::new("abc");
        let line = store.head();
        assert_eq!(store.delete_char(line, 0).unwrap(), None);
        assert_eq!(store.delete_char(line, 2).unwrap(), Some('b'));
        assert_eq!(store.text(line), Some("ac"));
        assert_eq!(store.delete_char(line, 50).unwrap(), Some('c'));
        assert_eq!(store.text(line), Some("a"));
    }

    #[test]
    fn test_unicode_columns() {
        let mut store = LineStore::new("héllo");
        let line = store.head();
        store.insert_char(line, 2, 'ß').unwrap();
        assert_eq!(store.text(line), Some("héßllo"));
        assert_eq!(store.line_len(line), Some(6));
        let tail = store.split_line(line, 3).unwrap();
        assert_eq!(store.text(line), Some("héß"));
        assert_eq!(store.text(tail), Some("llo"));
    }

    #[test]
    fn test_split_line_relinks_successor() {
        let mut store = LineStore::new("abcd\nz");
        let first = store.head();
        let z = store.next(first).unwrap();
        let new_line = store.split_line(first, 2).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(texts(&store), vec!["ab", "cd", "z"]);
        assert_eq!(store.next(first), Some(new_line));
        assert_eq!(store.prev(new_line), Some(first));
        assert_eq!(store.next(new_line), Some(z));
        assert_eq!(store.prev(z), Some(new_line));
    }

    #[test]
    fn test_split_at_end_creates_empty_line() {
        let mut store = LineStore::new("abc");
        let new_line = store.split_line(store.head(), 3).unwrap();
        assert_eq!(store.text(new_line), Some(""));
        assert_eq!(store.to_text(), "abc\n");
    }

    #[test]
    fn test_merge_line_returns_join_column() {
        let mut store = LineStore::new("foo\nbar\nbaz");
        let bar = store.line_at_row(1).unwrap();
        let join = store.merge_line(bar).unwrap();
        assert_eq!(join, 3);
        assert_eq!(store.len(), 2);
        assert_eq!(texts(&store), vec!["foobar", "baz"]);

        let baz = store.line_at_row(1).unwrap();
        assert_eq!(store.prev(baz), Some(store.head()));
    }

    #[test]
    fn test_merge_last_line() {
        let mut store = LineStore::new("a\n");
        let last = store.line_at_row(1).unwrap();
        assert_eq!(store.merge_line(last).unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.next(store.head()), None);
    }

    #[test]
    fn test_merge_first_line_is_error() {
        let mut store = LineStore::new("a\nb");
        let err = store.merge_line(store.head()).unwrap_err();
        assert!(matches!(err, EditorError::NoPreviousLine(_)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_merged_handle_becomes_stale() {
        let mut store = LineStore::new("a\nb");
        let b = store.line_at_row(1).unwrap();
        store.merge_line(b).unwrap();

        assert!(!store.contains(b));
        assert_eq!(store.text(b), None);
        assert!(matches!(
            store.insert_char(b, 0, 'x'),
            Err(EditorError::StaleLine(_))
        ));

        // The arena slot is reused with a new generation; the old handle stays stale.
        let fresh = store.split_line(store.head(), 1).unwrap();
        assert!(store.contains(fresh));
        assert!(!store.contains(b));
        assert_ne!(fresh, b);
    }

    #[test]
    fn test_split_then_merge_is_identity() {
        let original = "the quick brown fox";
        for col in 0..=original.len() {
            let mut store = LineStore::new(original);
            let new_line = store.split_line(store.head(), col).unwrap();
            assert_eq!(store.len(), 2);
            let join = store.merge_line(new_line).unwrap();
            assert_eq!(join, col);
            assert_eq!(store.len(), 1);
            assert_eq!(store.text(store.head()), Some(original));
        }
    }
}
