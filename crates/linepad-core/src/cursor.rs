//! Cursor Engine
//!
//! Translates navigation and editing intents into [`LineStore`] mutations and
//! [`ViewportWindow`] updates.
//!
//! # Overview
//!
//! The engine owns the single cursor of a document: its row, its column and the *column
//! anchor*. The anchor is set on the first vertical move of a run and reused by every following
//! vertical move, so passing through a short line and coming back to a long one restores the
//! original column. Any horizontal move or edit clears it.
//!
//! Every action leaves the three components consistent before returning:
//!
//! 1. the store is mutated (if the action edits);
//! 2. the window rebinds what changed (one slot for a character edit, the slots below the edit
//!    point for a split/merge);
//! 3. the window scrolls the cursor row into view and moves the cursor decoration.
//!
//! Navigation at a document boundary is a no-op, never an error. Merging is only attempted
//! when the cursor line has a predecessor, so [`LineStore::merge_line`]'s precondition always
//! holds.

use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::line_store::{LineId, LineStore};
use crate::viewport::{SlotId, ViewportWindow};

/// A `(row, column)` pair; columns count chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Zero-based row.
    pub row: usize,
    /// Zero-based column within the row's line.
    pub col: usize,
}

impl Position {
    /// Create a position.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Cursor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Current row.
    pub row: usize,
    /// Current column, `0 <= col <= line length`.
    pub col: usize,
    /// Column remembered across a run of vertical moves.
    pub col_anchor: Option<usize>,
    /// Handle of the line at `row`.
    pub line: LineId,
}

impl Cursor {
    /// Position of the cursor.
    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

/// What an action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorOutcome {
    /// The cursor position changed.
    pub moved: bool,
    /// The document text changed.
    pub edited: bool,
}

/// Cursor state machine for one document.
#[derive(Debug, Clone)]
pub struct CursorEngine {
    cursor: Cursor,
    tab_width: usize,
    soft_tab_backspace: bool,
}

impl CursorEngine {
    /// Cursor at (0, 0) of `store`.
    pub fn new(store: &LineStore, config: &EditorConfig) -> Self {
        Self {
            cursor: Cursor {
                row: 0,
                col: 0,
                col_anchor: None,
                line: store.head(),
            },
            tab_width: config.tab_width,
            soft_tab_backspace: config.soft_tab_backspace,
        }
    }

    /// Current cursor state.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Current cursor position.
    pub fn position(&self) -> Position {
        self.cursor.position()
    }

    /// Move one column left, wrapping to the end of the previous line.
    pub fn navigate_left(
        &mut self,
        store: &LineStore,
        window: &mut ViewportWindow,
    ) -> Result<CursorOutcome> {
        let before = self.position();
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        } else if let Some(prev) = store.prev(self.cursor.line) {
            self.cursor.row -= 1;
            self.cursor.line = prev;
            self.cursor.col = line_len(store, prev)?;
        }
        self.cursor.col_anchor = None;
        Ok(self.finish(store, window, before, false))
    }

    /// Move one column right, wrapping to the start of the next line.
    pub fn navigate_right(
        &mut self,
        store: &LineStore,
        window: &mut ViewportWindow,
    ) -> Result<CursorOutcome> {
        let before = self.position();
        if self.cursor.col < line_len(store, self.cursor.line)? {
            self.cursor.col += 1;
        } else if let Some(next) = store.next(self.cursor.line) {
            self.cursor.row += 1;
            self.cursor.line = next;
            self.cursor.col = 0;
        }
        self.cursor.col_anchor = None;
        Ok(self.finish(store, window, before, false))
    }

    /// Move one row up, keeping the anchored column where the line allows.
    pub fn navigate_up(
        &mut self,
        store: &LineStore,
        window: &mut ViewportWindow,
    ) -> Result<CursorOutcome> {
        let before = self.position();
        if let Some(prev) = store.prev(self.cursor.line) {
            self.move_vertically(store, prev, self.cursor.row - 1)?;
        }
        Ok(self.finish(store, window, before, false))
    }

    /// Move one row down, keeping the anchored column where the line allows.
    pub fn navigate_down(
        &mut self,
        store: &LineStore,
        window: &mut ViewportWindow,
    ) -> Result<CursorOutcome> {
        let before = self.position();
        if let Some(next) = store.next(self.cursor.line) {
            self.move_vertically(store, next, self.cursor.row + 1)?;
        }
        Ok(self.finish(store, window, before, false))
    }

    /// Insert `ch` at the cursor and advance past it. `'\n'` splits the line.
    pub fn insert_char(
        &mut self,
        store: &mut LineStore,
        window: &mut ViewportWindow,
        ch: char,
    ) -> Result<CursorOutcome> {
        if ch == '\n' {
            return self.newline(store, window);
        }
        let before = self.position();
        store.insert_char(self.cursor.line, self.cursor.col, ch)?;
        self.cursor.col += 1;
        self.cursor.col_anchor = None;
        window.refresh_row(store, self.cursor.row);
        Ok(self.finish(store, window, before, true))
    }

    /// Insert `tab_width` spaces at the cursor.
    pub fn insert_tab(
        &mut self,
        store: &mut LineStore,
        window: &mut ViewportWindow,
    ) -> Result<CursorOutcome> {
        let before = self.position();
        store.insert_spaces(self.cursor.line, self.cursor.col, self.tab_width)?;
        self.cursor.col += self.tab_width;
        self.cursor.col_anchor = None;
        window.refresh_row(store, self.cursor.row);
        Ok(self.finish(store, window, before, true))
    }

    /// Delete the character before the cursor, or join the line onto the previous one when
    /// the cursor is at column 0.
    pub fn backspace(
        &mut self,
        store: &mut LineStore,
        window: &mut ViewportWindow,
    ) -> Result<CursorOutcome> {
        let before = self.position();
        let mut edited = false;

        if self.cursor.col > 0 {
            let count = self.backspace_width(store)?;
            for _ in 0..count {
                store.delete_char(self.cursor.line, self.cursor.col)?;
                self.cursor.col -= 1;
            }
            window.refresh_row(store, self.cursor.row);
            edited = true;
        } else if let Some(prev) = store.prev(self.cursor.line) {
            let join_col = store.merge_line(self.cursor.line)?;
            self.cursor.row -= 1;
            self.cursor.line = prev;
            self.cursor.col = join_col;
            window.refresh_after_structural_edit(store, self.cursor.row);
            tracing::debug!(row = self.cursor.row, join_col, "joined line with previous");
            edited = true;
        }

        self.cursor.col_anchor = None;
        Ok(self.finish(store, window, before, edited))
    }

    /// Split the line at the cursor and move to the start of the new line.
    pub fn newline(
        &mut self,
        store: &mut LineStore,
        window: &mut ViewportWindow,
    ) -> Result<CursorOutcome> {
        let before = self.position();
        let new_line = store.split_line(self.cursor.line, self.cursor.col)?;
        window.refresh_after_structural_edit(store, self.cursor.row);
        self.cursor.row += 1;
        self.cursor.line = new_line;
        self.cursor.col = 0;
        self.cursor.col_anchor = None;
        tracing::debug!(row = self.cursor.row, "split line at cursor");
        Ok(self.finish(store, window, before, true))
    }

    /// Place the cursor under a pointer: `slot` is resolved through its current binding and
    /// `x_px` is converted to a column clamped to the line length.
    pub fn place_at_slot(
        &mut self,
        store: &LineStore,
        window: &mut ViewportWindow,
        slot: SlotId,
        x_px: f64,
    ) -> Result<CursorOutcome> {
        let before = self.position();
        let binding = window.binding(slot)?;
        let len = line_len(store, binding.line)?;
        self.cursor.row = binding.row;
        self.cursor.line = binding.line;
        self.cursor.col = window.column_at_x(x_px).min(len);
        self.cursor.col_anchor = None;
        window.place_cursor(self.position());
        Ok(CursorOutcome {
            moved: self.position() != before,
            edited: false,
        })
    }

    /// Place the cursor at `position`, clamped to the document. Walks O(row) to find the line.
    pub fn place_at(
        &mut self,
        store: &LineStore,
        window: &mut ViewportWindow,
        position: Position,
    ) -> Result<CursorOutcome> {
        let before = self.position();
        let row = position.row.min(store.len() - 1);
        let line = store.line_at_row(row).unwrap_or_else(|| store.head());
        self.cursor.row = row;
        self.cursor.line = line;
        self.cursor.col = position.col.min(line_len(store, line)?);
        self.cursor.col_anchor = None;
        Ok(self.finish(store, window, before, false))
    }

    fn move_vertically(&mut self, store: &LineStore, target: LineId, row: usize) -> Result<()> {
        let anchor = *self.cursor.col_anchor.get_or_insert(self.cursor.col);
        self.cursor.col = anchor.min(line_len(store, target)?);
        self.cursor.row = row;
        self.cursor.line = target;
        Ok(())
    }

    /// Columns removed by one Backspace: a whole indentation unit when enabled and the cursor
    /// sits right after `tab_width` spaces, otherwise one.
    fn backspace_width(&self, store: &LineStore) -> Result<usize> {
        let col = self.cursor.col;
        if !self.soft_tab_backspace || col < self.tab_width {
            return Ok(1);
        }
        let text = store
            .text(self.cursor.line)
            .ok_or(EditorError::StaleLine(self.cursor.line))?;
        let unit = text
            .chars()
            .skip(col - self.tab_width)
            .take(self.tab_width)
            .all(|ch| ch == ' ');
        Ok(if unit { self.tab_width } else { 1 })
    }

    fn finish(
        &self,
        store: &LineStore,
        window: &mut ViewportWindow,
        before: Position,
        edited: bool,
    ) -> CursorOutcome {
        let position = self.position();
        window.scroll_into_view(store, position);
        if position != before {
            tracing::trace!(row = position.row, col = position.col, "cursor moved");
        }
        CursorOutcome {
            moved: position != before,
            edited,
        }
    }
}

fn line_len(store: &LineStore, line: LineId) -> Result<usize> {
    store.line_len(line).ok_or(EditorError::StaleLine(line))
}
