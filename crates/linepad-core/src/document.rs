//! Document session.
//!
//! A [`Document`] is one open file: exactly one [`LineStore`], one [`ViewportWindow`] and one
//! [`CursorEngine`], mutated only by the event flow in [`Document::handle`]. Key and pointer
//! events go through the cursor engine; scroll events go straight to the window and are
//! applied on the next [`InputEvent::Frame`].
//!
//! # Example
//!
//! ```rust
//! use linepad_core::{Document, EditorConfig, InputEvent, InputHub, Key, Position};
//!
//! let hub = InputHub::new();
//! let mut doc = Document::new("", EditorConfig::default()).unwrap();
//! let subscription = doc.foreground(&hub);
//!
//! for ch in "abc".chars() {
//!     hub.dispatch(InputEvent::Key(Key::Char(ch)));
//! }
//! hub.dispatch(InputEvent::Key(Key::Enter));
//! doc.pump().unwrap();
//!
//! assert_eq!(doc.text(), "abc\n");
//! assert_eq!(doc.cursor().position(), Position::new(1, 0));
//!
//! doc.background(subscription);
//! assert!(!hub.dispatch(InputEvent::Frame));
//! ```

use crate::config::EditorConfig;
use crate::cursor::{Cursor, CursorEngine, CursorOutcome};
use crate::error::Result;
use crate::highlight::{Highlighter, PlainHighlighter};
use crate::input::{Inbox, InputEvent, InputHub, Key, ListenerTicket, Subscription};
use crate::line_store::LineStore;
use crate::viewport::ViewportWindow;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// One open document and its editing state.
#[derive(Debug)]
pub struct Document {
    config: EditorConfig,
    store: LineStore,
    window: ViewportWindow,
    engine: CursorEngine,
    inbox: Inbox,
    listener: Option<ListenerTicket>,
}

impl Document {
    /// Open `text` with the plain highlighter.
    pub fn new(text: &str, config: EditorConfig) -> Result<Self> {
        Self::with_highlighter(text, config, Box::new(PlainHighlighter))
    }

    /// Open `text` with a custom highlighter.
    pub fn with_highlighter(
        text: &str,
        config: EditorConfig,
        highlighter: Box<dyn Highlighter>,
    ) -> Result<Self> {
        config.validate()?;
        let store = LineStore::new(text);
        let window = ViewportWindow::with_highlighter(&config, highlighter);
        let engine = CursorEngine::new(&store, &config);
        tracing::debug!(lines = store.len(), "document opened");
        Ok(Self {
            config,
            store,
            window,
            engine,
            inbox: Rc::new(RefCell::new(VecDeque::new())),
            listener: None,
        })
    }

    /// Mount the window and start receiving events from `hub`.
    ///
    /// The document stays in the foreground until [`Document::background`] is called with the
    /// returned guard. If the guard is dropped, or another document takes the foreground of the
    /// same hub, delivery stops at once and the render slots are released on the next
    /// [`Document::pump`] or [`Document::handle`].
    pub fn foreground(&mut self, hub: &InputHub) -> Subscription {
        self.window.mount(&self.store, self.engine.position());
        let subscription = hub.subscribe(&self.inbox);
        self.listener = Some(subscription.ticket());
        subscription
    }

    /// Stop receiving events and release the render slots.
    pub fn background(&mut self, subscription: Subscription) {
        drop(subscription);
        self.listener = None;
        self.window.unmount();
        self.inbox.borrow_mut().clear();
    }

    /// Whether the window is mounted and this document is still the hub's listener.
    pub fn is_foreground(&self) -> bool {
        self.window.is_mounted() && self.listener.as_ref().is_some_and(ListenerTicket::is_active)
    }

    /// Unmount the window if the subscription was displaced or dropped. Queued events are kept.
    fn release_if_displaced(&mut self) {
        if !self.window.is_mounted() || self.listener.as_ref().is_some_and(ListenerTicket::is_active)
        {
            return;
        }
        self.listener = None;
        self.window.unmount();
        tracing::debug!("document lost the foreground; render slots released");
    }

    /// Apply every queued event in arrival order. Returns how many were handled.
    ///
    /// Stops at the first failing event; events after it stay queued.
    pub fn pump(&mut self) -> Result<usize> {
        self.release_if_displaced();
        let mut handled = 0;
        loop {
            let event = self.inbox.borrow_mut().pop_front();
            let Some(event) = event else {
                break;
            };
            self.handle(event)?;
            handled += 1;
        }
        Ok(handled)
    }

    /// Apply one event.
    pub fn handle(&mut self, event: InputEvent) -> Result<CursorOutcome> {
        self.release_if_displaced();
        let store = &mut self.store;
        let window = &mut self.window;
        let engine = &mut self.engine;
        match event {
            InputEvent::Key(key) => match key {
                Key::ArrowUp => engine.navigate_up(store, window),
                Key::ArrowDown => engine.navigate_down(store, window),
                Key::ArrowLeft => engine.navigate_left(store, window),
                Key::ArrowRight => engine.navigate_right(store, window),
                Key::Backspace => engine.backspace(store, window),
                Key::Enter => engine.newline(store, window),
                Key::Tab => engine.insert_tab(store, window),
                Key::Char(ch) => engine.insert_char(store, window, ch),
                Key::Modifier => Ok(CursorOutcome::default()),
            },
            InputEvent::Pointer { slot, x_px } => engine.place_at_slot(store, window, slot, x_px),
            InputEvent::Scroll { offset_px } => {
                window.request_scroll(offset_px);
                Ok(CursorOutcome::default())
            }
            InputEvent::Frame => {
                window.on_frame(store, engine.position());
                Ok(CursorOutcome::default())
            }
        }
    }

    /// Replace the highlighter; bound slots are re-decorated.
    pub fn set_highlighter(&mut self, highlighter: Box<dyn Highlighter>) {
        self.window.set_highlighter(&self.store, highlighter);
    }

    /// The line store.
    pub fn store(&self) -> &LineStore {
        &self.store
    }

    /// The viewport window.
    pub fn viewport(&self) -> &ViewportWindow {
        &self.window
    }

    /// Mutable access to the window, for draining dirty slots.
    pub fn viewport_mut(&mut self) -> &mut ViewportWindow {
        &mut self.window
    }

    /// The cursor.
    pub fn cursor(&self) -> &Cursor {
        self.engine.cursor()
    }

    /// The configuration the document was opened with.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Full text, lines joined with `'\n'`.
    pub fn text(&self) -> String {
        self.store.to_text()
    }
}
