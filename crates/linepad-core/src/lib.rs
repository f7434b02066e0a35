#![warn(missing_docs)]
//! linepad core - headless editing kernel for line-oriented text editors
//!
//! # Overview
//!
//! `linepad-core` keeps a document, a virtualized render window and a cursor consistent under
//! edits and scrolling. It never paints anything: the presentation surface reads slot
//! snapshots, repaints the slots reported dirty, and feeds input back as [`InputEvent`]s.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Document + InputHub (event routing)        │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  CursorEngine (navigation / edit intents)   │  ← State machine
//! ├─────────────────────────────────────────────┤
//! │  ViewportWindow (render-slot ring)          │  ← Virtualization
//! ├─────────────────────────────────────────────┤
//! │  LineStore (arena-linked lines)             │  ← Document model
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use linepad_core::{Document, EditorConfig, InputEvent, InputHub, Key, Position};
//!
//! let config = EditorConfig::default().with_viewport(800.0, 160.0);
//! let text: String = (0..1_000).map(|i| format!("line {i}\n")).collect();
//! let mut doc = Document::new(&text, config).unwrap();
//! let hub = InputHub::new();
//! let _subscription = doc.foreground(&hub);
//!
//! // Scroll notifications are coalesced until the next frame.
//! hub.dispatch(InputEvent::Scroll { offset_px: 4_000.0 });
//! hub.dispatch(InputEvent::Scroll { offset_px: 8_000.0 });
//! hub.dispatch(InputEvent::Frame);
//! doc.pump().unwrap();
//! assert_eq!(doc.viewport().top_row(), 500);
//! assert_eq!(doc.viewport().recompute_count(), 1);
//!
//! // Moving the cursor scrolls it back into view.
//! doc.handle(InputEvent::Key(Key::ArrowDown)).unwrap();
//! assert_eq!(doc.cursor().position(), Position::new(1, 0));
//! assert_eq!(doc.viewport().top_row(), 1);
//! ```
//!
//! # Module Description
//!
//! - [`line_store`] - arena-backed doubly-linked lines
//! - [`viewport`] - render-slot pool, ring rotation, remap and frame throttle
//! - [`cursor`] - cursor state machine and edit intents
//! - [`document`] - per-document session and event handling
//! - [`input`] - input events and scoped listener registration
//! - [`highlight`] - highlighter seam
//! - [`config`] - geometry and editing settings
//! - [`error`] - error type
//!
//! # Columns
//!
//! Columns count Unicode scalar values (`char`s). There is no grapheme clustering and no
//! display-width measurement; the presentation surface is assumed to be monospace.

pub mod config;
pub mod cursor;
pub mod document;
pub mod error;
pub mod highlight;
pub mod input;
pub mod line_store;
mod text;
pub mod viewport;

pub use config::EditorConfig;
pub use cursor::{Cursor, CursorEngine, CursorOutcome, Position};
pub use document::Document;
pub use error::{EditorError, Result};
pub use highlight::{Highlighter, PlainHighlighter, StyledRun, TokenCategory};
pub use input::{InputEvent, InputHub, Key, Subscription};
pub use line_store::{LineId, LineStore, Lines};
pub use viewport::{CursorDecoration, RenderSlot, SlotBinding, SlotId, ViewportWindow};
