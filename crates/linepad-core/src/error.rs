//! Error types.
//!
//! Boundary conditions (navigating past the first/last line, out-of-range columns) are
//! clamped or treated as no-ops and never surface here. [`EditorError`] covers the cases where
//! a caller hands the core something it cannot act on: a handle to a line that no longer
//! exists, a slot id the window never issued, or a configuration that makes no geometric sense.

use crate::line_store::LineId;
use crate::viewport::SlotId;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EditorError>;

#[derive(Debug, Error)]
/// Errors produced by the line store, the viewport window and the cursor engine.
pub enum EditorError {
    #[error("line handle {0:?} does not refer to a live line")]
    /// The handle was removed by a merge, or belongs to another store.
    StaleLine(LineId),

    #[error("line {0:?} has no previous line to merge into")]
    /// `merge_line` was called on the first line of the document.
    NoPreviousLine(LineId),

    #[error("render slot {0:?} does not exist")]
    /// The slot id is outside the pool of the currently mounted window.
    UnknownSlot(SlotId),

    #[error("render slot {0:?} is not bound to a row")]
    /// The slot exists but currently represents no row (document shorter than the window).
    UnboundSlot(SlotId),

    #[error("viewport window is not mounted")]
    /// A slot operation was requested while the document is in the background.
    NotMounted,

    #[error("invalid configuration: {0}")]
    /// Configuration values failed validation.
    InvalidConfig(String),

    #[error("configuration parse error: {0}")]
    /// Configuration JSON could not be parsed.
    ConfigParse(#[from] serde_json::Error),
}
