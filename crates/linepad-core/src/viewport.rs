//! Viewport Window
//!
//! Virtualized rendering: a fixed pool of render slots mapped onto an arbitrarily long
//! document.
//!
//! # Overview
//!
//! The window owns `ceil(viewport_height / line_height)` [`RenderSlot`]s. Each slot is bound to
//! at most one `(row, line)` pair. The slots form a ring (head/tail indices into the pool); the
//! head slot represents `top_row`, and walking the ring from head to tail visits consecutive
//! rows. Scrolling by less than a window's worth of rows rotates slots from one end of the ring
//! to the other and rebinds only those slots; scrolling further than that (a jump) rebinds every
//! slot from a freshly located starting line (a *remap*).
//!
//! Invariant: the bound rows are exactly `[top_row, top_row + slot_count - 1] ∩ [0, len - 1]`,
//! ascending in ring order. `top_row` is clamped to `len - slot_count` so the window never
//! extends past the end of the document; when the document is shorter than the window the
//! trailing slots are unbound.
//!
//! Scroll notifications are coalesced: [`ViewportWindow::request_scroll`] only records the
//! latest offset, and [`ViewportWindow::on_frame`] applies it at most once per frame.
//!
//! The window is headless. It keeps each slot's decorated content, gutter line number and
//! vertical position, plus the cursor decoration; the presentation surface repaints the slots
//! reported by [`ViewportWindow::take_dirty_slots`].

use crate::config::EditorConfig;
use crate::cursor::Position;
use crate::error::{EditorError, Result};
use crate::highlight::{Highlighter, PlainHighlighter, StyledRun};
use crate::line_store::{LineId, LineStore};
use std::collections::BTreeSet;
use std::fmt;

/// Identity of a render slot. Stable for as long as the window stays mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub usize);

/// The row and line a slot currently represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotBinding {
    /// Zero-based document row.
    pub row: usize,
    /// Handle of the line at that row.
    pub line: LineId,
}

/// A reusable render unit.
#[derive(Debug, Clone)]
pub struct RenderSlot {
    id: SlotId,
    binding: Option<SlotBinding>,
    runs: Vec<StyledRun>,
    y_px: f64,
}

impl RenderSlot {
    fn unbound(id: SlotId) -> Self {
        Self {
            id,
            binding: None,
            runs: Vec::new(),
            y_px: 0.0,
        }
    }

    /// Slot identity.
    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Current binding, if the slot represents a row.
    pub fn binding(&self) -> Option<SlotBinding> {
        self.binding
    }

    /// Bound row.
    pub fn row(&self) -> Option<usize> {
        self.binding.map(|binding| binding.row)
    }

    /// One-based line number shown in the gutter.
    pub fn line_number(&self) -> Option<usize> {
        self.row().map(|row| row + 1)
    }

    /// Decorated content of the bound line.
    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    /// Plain text of the bound line, rebuilt from the runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.lexeme.as_str()).collect()
    }

    /// Vertical position of the slot inside the scrollable content, in pixels.
    pub fn y_px(&self) -> f64 {
        self.y_px
    }
}

/// Where the cursor is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorDecoration {
    /// Slot bound to the cursor's row.
    pub slot: SlotId,
    /// Cursor column.
    pub col: usize,
    /// Horizontal offset of the caret inside the slot.
    pub x_px: f64,
}

#[derive(Debug, Clone, Copy)]
struct SlotRing {
    head: usize,
    tail: usize,
    len: usize,
}

impl SlotRing {
    fn new(len: usize) -> Self {
        Self {
            head: 0,
            tail: len.saturating_sub(1),
            len,
        }
    }

    fn slot_at(&self, position: usize) -> usize {
        (self.head + position) % self.len
    }

    fn rotate_forward(&mut self) {
        self.head = (self.head + 1) % self.len;
        self.tail = (self.tail + 1) % self.len;
    }

    fn rotate_backward(&mut self) {
        self.head = (self.head + self.len - 1) % self.len;
        self.tail = (self.tail + self.len - 1) % self.len;
    }
}

/// Dirty flag for scroll recomputation: one pending offset, overwritten by later requests.
#[derive(Debug, Clone, Copy, Default)]
struct ScrollThrottle {
    pending: Option<f64>,
}

impl ScrollThrottle {
    /// Returns `true` if this request scheduled a new frame.
    fn request(&mut self, offset_px: f64) -> bool {
        let newly_scheduled = self.pending.is_none();
        self.pending = Some(offset_px);
        newly_scheduled
    }

    fn take(&mut self) -> Option<f64> {
        self.pending.take()
    }
}

/// Fixed pool of render slots mapped onto a moving window of document rows.
pub struct ViewportWindow {
    line_height_px: f64,
    char_width_px: f64,
    slot_count: usize,
    visible_rows: usize,
    scroll_margin_rows: usize,
    slots: Vec<RenderSlot>,
    ring: SlotRing,
    top_row: usize,
    scroll_offset_px: f64,
    cursor: Option<CursorDecoration>,
    throttle: ScrollThrottle,
    dirty: BTreeSet<SlotId>,
    highlighter: Box<dyn Highlighter>,
    recompute_count: u64,
}

impl fmt::Debug for ViewportWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportWindow")
            .field("slot_count", &self.slot_count)
            .field("mounted", &self.is_mounted())
            .field("top_row", &self.top_row)
            .field("scroll_offset_px", &self.scroll_offset_px)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl ViewportWindow {
    /// Create an unmounted window sized from `config`, decorating with [`PlainHighlighter`].
    pub fn new(config: &EditorConfig) -> Self {
        Self::with_highlighter(config, Box::new(PlainHighlighter))
    }

    /// Create an unmounted window with a custom highlighter.
    pub fn with_highlighter(config: &EditorConfig, highlighter: Box<dyn Highlighter>) -> Self {
        let slot_count = config.slot_count();
        Self {
            line_height_px: config.line_height_px,
            char_width_px: config.char_width_px,
            slot_count,
            visible_rows: config.visible_rows(),
            scroll_margin_rows: config.scroll_margin_rows,
            slots: Vec::new(),
            ring: SlotRing::new(slot_count),
            top_row: 0,
            scroll_offset_px: 0.0,
            cursor: None,
            throttle: ScrollThrottle::default(),
            dirty: BTreeSet::new(),
            highlighter,
            recompute_count: 0,
        }
    }

    /// Replace the highlighter and re-decorate every bound slot.
    pub fn set_highlighter(&mut self, store: &LineStore, highlighter: Box<dyn Highlighter>) {
        self.highlighter = highlighter;
        for index in 0..self.slots.len() {
            if let Some(binding) = self.slots[index].binding {
                self.bind(index, binding.row, binding.line, store);
            }
        }
    }

    /// Whether the slot pool exists.
    pub fn is_mounted(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Create the slot pool and bind it at the current scroll offset.
    pub fn mount(&mut self, store: &LineStore, cursor: Position) {
        self.slots = (0..self.slot_count)
            .map(|index| RenderSlot::unbound(SlotId(index)))
            .collect();
        self.ring = SlotRing::new(self.slot_count);
        self.cursor = None;
        self.dirty.clear();
        self.remap(store);
        self.place_cursor(cursor);
        tracing::debug!(
            slots = self.slot_count,
            top_row = self.top_row,
            "viewport window mounted"
        );
    }

    /// Release every slot. The scroll offset is kept for the next mount.
    pub fn unmount(&mut self) {
        self.slots.clear();
        self.cursor = None;
        self.dirty.clear();
        self.throttle = ScrollThrottle::default();
        tracing::debug!(
            scroll_offset_px = self.scroll_offset_px,
            "viewport window unmounted"
        );
    }

    /// Size of the slot pool.
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Rows that fit fully inside the viewport.
    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    /// Row represented by the head of the ring.
    pub fn top_row(&self) -> usize {
        self.top_row
    }

    /// Current (clamped) scroll offset in pixels.
    pub fn scroll_offset_px(&self) -> f64 {
        self.scroll_offset_px
    }

    /// Height of the whole scrollable content.
    pub fn content_height_px(&self, store: &LineStore) -> f64 {
        store.len() as f64 * self.line_height_px
    }

    /// Number of scroll recomputations performed so far.
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    /// Slots in pool order (empty while unmounted).
    pub fn slots(&self) -> &[RenderSlot] {
        &self.slots
    }

    /// Look up one slot.
    pub fn slot(&self, id: SlotId) -> Option<&RenderSlot> {
        self.slots.get(id.0)
    }

    /// Slots in ring order, i.e. ascending rows.
    pub fn slots_in_row_order(&self) -> impl Iterator<Item = &RenderSlot> + '_ {
        let count = self.slots.len();
        (0..count).map(move |position| &self.slots[self.ring.slot_at(position)])
    }

    /// Rows currently bound, in ring order.
    pub fn bound_rows(&self) -> Vec<usize> {
        self.slots_in_row_order()
            .filter_map(|slot| slot.row())
            .collect()
    }

    /// Resolve a slot to its `(row, line)` binding for hit-testing.
    pub fn binding(&self, id: SlotId) -> Result<SlotBinding> {
        if !self.is_mounted() {
            return Err(EditorError::NotMounted);
        }
        let slot = self.slots.get(id.0).ok_or(EditorError::UnknownSlot(id))?;
        slot.binding.ok_or(EditorError::UnboundSlot(id))
    }

    /// Slot bound to `row`, if the row is inside the window.
    pub fn slot_for_row(&self, row: usize) -> Option<SlotId> {
        if !self.is_mounted() || row < self.top_row {
            return None;
        }
        let position = row - self.top_row;
        if position >= self.slots.len() {
            return None;
        }
        let index = self.ring.slot_at(position);
        self.slots[index]
            .binding
            .filter(|binding| binding.row == row)
            .map(|_| SlotId(index))
    }

    /// Where the cursor is currently drawn, if it is inside the window.
    pub fn cursor_decoration(&self) -> Option<CursorDecoration> {
        self.cursor
    }

    /// Column under a horizontal pixel offset inside a slot (not clamped to a line).
    pub fn column_at_x(&self, x_px: f64) -> usize {
        if !x_px.is_finite() || x_px <= 0.0 {
            return 0;
        }
        (x_px / self.char_width_px).round() as usize
    }

    /// Slots whose content, position or cursor decoration changed since the last call.
    pub fn take_dirty_slots(&mut self) -> Vec<SlotId> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }

    /// Record a scroll notification. Returns `true` if it scheduled a new frame, `false` if
    /// it was coalesced into the already pending one.
    pub fn request_scroll(&mut self, offset_px: f64) -> bool {
        self.throttle.request(offset_px)
    }

    /// Whether a scroll is waiting for the next frame.
    pub fn has_pending_scroll(&self) -> bool {
        self.throttle.pending.is_some()
    }

    /// Apply the pending scroll, if any. Returns `true` if a recomputation ran.
    pub fn on_frame(&mut self, store: &LineStore, cursor: Position) -> bool {
        let Some(offset_px) = self.throttle.take() else {
            return false;
        };
        self.scroll_to(store, offset_px, cursor);
        true
    }

    /// Scroll immediately to `offset_px` (clamped), rebinding only what moved.
    pub fn scroll_to(&mut self, store: &LineStore, offset_px: f64, cursor: Position) {
        let len = store.len();
        self.scroll_offset_px = self.clamp_offset(offset_px, len);
        let new_top = self.top_row_for(self.scroll_offset_px, len);

        if !self.is_mounted() {
            self.top_row = new_top;
            return;
        }
        self.recompute_count += 1;

        let old_top = self.top_row;
        let count = self.slot_count;
        if new_top >= old_top + count || new_top + count <= old_top {
            self.remap(store);
        } else if new_top > old_top {
            for _ in old_top..new_top {
                if !self.rotate_down(store) {
                    self.remap(store);
                    break;
                }
            }
        } else {
            for _ in new_top..old_top {
                if !self.rotate_up(store) {
                    self.remap(store);
                    break;
                }
            }
        }

        self.place_cursor(cursor);
    }

    /// Scroll just enough for the cursor row to be visible, keeping `scroll_margin_rows`
    /// below it, then move the cursor decoration. Returns `true` if the window scrolled.
    pub fn scroll_into_view(&mut self, store: &LineStore, cursor: Position) -> bool {
        let visible = self.visible_rows;
        let margin = self.scroll_margin_rows.min(visible.saturating_sub(1));
        let top = self.top_row;

        let target_top = if cursor.row < top {
            Some(cursor.row)
        } else if cursor.row + margin >= top + visible {
            Some(cursor.row + margin + 1 - visible)
        } else {
            None
        };

        let Some(target_top) = target_top else {
            self.place_cursor(cursor);
            return false;
        };
        let before = self.top_row;
        self.scroll_to(store, target_top as f64 * self.line_height_px, cursor);
        self.top_row != before
    }

    /// Rebind every slot from the row under the current scroll offset.
    ///
    /// Costs O(top_row) to locate the first line plus O(slot_count) to rebind.
    pub fn remap(&mut self, store: &LineStore) {
        if !self.is_mounted() {
            return;
        }
        let len = store.len();
        self.scroll_offset_px = self.clamp_offset(self.scroll_offset_px, len);
        self.top_row = self.top_row_for(self.scroll_offset_px, len);

        let mut line = store.line_at_row(self.top_row);
        for position in 0..self.slot_count {
            let index = self.ring.slot_at(position);
            match line {
                Some(id) => {
                    self.bind(index, self.top_row + position, id, store);
                    line = store.next(id);
                }
                None => self.unbind(index),
            }
        }
        tracing::debug!(top_row = self.top_row, len, "remapped viewport window");
    }

    /// Bring slot bindings back in line after a line split or merge.
    ///
    /// `first_affected_row` is the first row whose line identity or text changed (the split
    /// line, or the line a merge appended to). Rows above it keep their bindings; when it is
    /// inside the window only the slots from that row down are rebound, walking from the line
    /// already bound there. An edit above the window shifts every row below it, so that case
    /// (and any change of the clamped top row) falls back to a full remap.
    pub fn refresh_after_structural_edit(&mut self, store: &LineStore, first_affected_row: usize) {
        if !self.is_mounted() {
            return;
        }
        let len = store.len();
        let clamped = self.clamp_offset(self.scroll_offset_px, len);
        if first_affected_row < self.top_row || self.top_row_for(clamped, len) != self.top_row {
            self.remap(store);
            return;
        }

        let start_position = first_affected_row - self.top_row;
        if start_position >= self.slot_count {
            return;
        }
        let start_index = self.ring.slot_at(start_position);
        let start_line = self.slots[start_index]
            .binding
            .map(|binding| binding.line)
            .filter(|line| store.contains(*line));
        let Some(start_line) = start_line else {
            self.remap(store);
            return;
        };

        let mut line = Some(start_line);
        for position in start_position..self.slot_count {
            let index = self.ring.slot_at(position);
            match line {
                Some(id) => {
                    self.bind(index, self.top_row + position, id, store);
                    line = store.next(id);
                }
                None => self.unbind(index),
            }
        }
        tracing::debug!(
            first_affected_row,
            top_row = self.top_row,
            len,
            "rebound slots after structural edit"
        );
    }

    /// Re-decorate the slot bound to `row` after its text changed.
    pub fn refresh_row(&mut self, store: &LineStore, row: usize) {
        if let Some(SlotId(index)) = self.slot_for_row(row)
            && let Some(binding) = self.slots[index].binding
        {
            self.bind(index, binding.row, binding.line, store);
        }
    }

    /// Attach, move or detach the cursor decoration for the cursor at `cursor`.
    pub fn place_cursor(&mut self, cursor: Position) {
        let target = self.slot_for_row(cursor.row);
        match (target, self.cursor) {
            (Some(slot), Some(current)) if current.slot == slot && current.col == cursor.col => {}
            (Some(slot), current) => {
                if let Some(current) = current {
                    self.dirty.insert(current.slot);
                }
                self.cursor = Some(CursorDecoration {
                    slot,
                    col: cursor.col,
                    x_px: cursor.col as f64 * self.char_width_px,
                });
                self.dirty.insert(slot);
                tracing::trace!(row = cursor.row, col = cursor.col, ?slot, "cursor attached");
            }
            (None, Some(current)) => {
                self.cursor = None;
                self.dirty.insert(current.slot);
                tracing::trace!(row = cursor.row, "cursor detached");
            }
            (None, None) => {}
        }
    }

    fn rotate_down(&mut self, store: &LineStore) -> bool {
        let Some(tail) = self.slots[self.ring.tail].binding else {
            return false;
        };
        let Some(next) = store.next(tail.line) else {
            return false;
        };
        let head = self.ring.head;
        self.bind(head, tail.row + 1, next, store);
        self.ring.rotate_forward();
        self.top_row += 1;
        tracing::trace!(row = tail.row + 1, slot = head, "rotated slot to tail");
        true
    }

    fn rotate_up(&mut self, store: &LineStore) -> bool {
        let Some(head) = self.slots[self.ring.head].binding else {
            return false;
        };
        let Some(prev) = store.prev(head.line) else {
            return false;
        };
        let tail = self.ring.tail;
        self.bind(tail, head.row - 1, prev, store);
        self.ring.rotate_backward();
        self.top_row -= 1;
        tracing::trace!(row = head.row - 1, slot = tail, "rotated slot to head");
        true
    }

    fn bind(&mut self, index: usize, row: usize, line: LineId, store: &LineStore) {
        let runs = store
            .text(line)
            .map(|text| self.highlighter.decorate(text))
            .unwrap_or_default();
        let slot = &mut self.slots[index];
        slot.binding = Some(SlotBinding { row, line });
        slot.runs = runs;
        slot.y_px = row as f64 * self.line_height_px;
        self.dirty.insert(slot.id);
    }

    fn unbind(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        if slot.binding.take().is_some() {
            slot.runs.clear();
            self.dirty.insert(slot.id);
        }
    }

    fn max_top_row(&self, len: usize) -> usize {
        len.saturating_sub(self.slot_count)
    }

    fn clamp_offset(&self, offset_px: f64, len: usize) -> f64 {
        if !offset_px.is_finite() {
            return 0.0;
        }
        let max_offset_px = self.max_top_row(len) as f64 * self.line_height_px;
        offset_px.clamp(0.0, max_offset_px)
    }

    fn top_row_for(&self, offset_px: f64, len: usize) -> usize {
        ((offset_px / self.line_height_px).floor() as usize).min(self.max_top_row(len))
    }
}
