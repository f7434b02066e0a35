//! Input events and listener lifecycle.
//!
//! The presentation surface turns raw key, pointer, scroll and frame callbacks into
//! [`InputEvent`]s and hands them to an [`InputHub`]. The hub forwards events to the inbox of
//! the single foreground document. Registration is tied to a [`Subscription`] guard: dropping
//! it deregisters the document, so no listener outlives the document that created it.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`), like the event loop that drives it.

use crate::viewport::SlotId;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

/// Keys the core reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Move up one row.
    ArrowUp,
    /// Move down one row.
    ArrowDown,
    /// Move left one column.
    ArrowLeft,
    /// Move right one column.
    ArrowRight,
    /// Delete before the cursor / join lines.
    Backspace,
    /// Split the line at the cursor.
    Enter,
    /// Insert a soft tab.
    Tab,
    /// Insert a character.
    Char(char),
    /// Shift, Meta and other keys without an editing meaning; ignored.
    Modifier,
}

/// An event from the presentation surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A key press.
    Key(Key),
    /// A pointer press on a slot, `x_px` pixels from the slot's left edge.
    Pointer {
        /// Slot under the pointer.
        slot: SlotId,
        /// Horizontal offset inside the slot.
        x_px: f64,
    },
    /// The scroll container moved.
    Scroll {
        /// New scroll offset from the top, in pixels.
        offset_px: f64,
    },
    /// A display frame is about to be drawn.
    Frame,
}

pub(crate) type Inbox = Rc<RefCell<VecDeque<InputEvent>>>;

struct Listener {
    id: u64,
    inbox: Weak<RefCell<VecDeque<InputEvent>>>,
}

#[derive(Default)]
struct HubState {
    next_id: u64,
    active: Option<Listener>,
}

impl HubState {
    /// The foreground inbox, dropping the listener if its document is gone.
    fn live_inbox(&mut self) -> Option<Inbox> {
        let inbox = self.active.as_ref()?.inbox.upgrade();
        if inbox.is_none()
            && let Some(listener) = self.active.take()
        {
            tracing::debug!(id = listener.id, "foreground document dropped; listener released");
        }
        inbox
    }

    fn is_live(&mut self, id: u64) -> bool {
        self.live_inbox().is_some() && self.active.as_ref().is_some_and(|l| l.id == id)
    }
}

/// Routes input events to the foreground document.
///
/// The hub never keeps a document's inbox alive: once the document is dropped its listener
/// is released, even if the [`Subscription`] still exists.
#[derive(Clone, Default)]
pub struct InputHub {
    state: Rc<RefCell<HubState>>,
}

impl InputHub {
    /// Hub with no listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event` for the foreground document. Returns `false` when no document listens.
    pub fn dispatch(&self, event: InputEvent) -> bool {
        let inbox = self.state.borrow_mut().live_inbox();
        match inbox {
            Some(inbox) => {
                inbox.borrow_mut().push_back(event);
                true
            }
            None => {
                tracing::trace!(?event, "dropping input event: no foreground document");
                false
            }
        }
    }

    /// Whether a live document is currently subscribed.
    pub fn has_listener(&self) -> bool {
        self.state.borrow_mut().live_inbox().is_some()
    }

    /// Register `inbox` as the foreground listener, replacing any previous one.
    pub(crate) fn subscribe(&self, inbox: &Inbox) -> Subscription {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let listener = Listener {
            id,
            inbox: Rc::downgrade(inbox),
        };
        if state.active.replace(listener).is_some() {
            tracing::debug!(id, "replaced foreground listener");
        }
        Subscription {
            ticket: ListenerTicket {
                id,
                hub: Rc::downgrade(&self.state),
            },
        }
    }
}

/// Non-owning view of a registration, kept by the document to notice displacement.
#[derive(Clone)]
pub(crate) struct ListenerTicket {
    id: u64,
    hub: Weak<RefCell<HubState>>,
}

impl ListenerTicket {
    /// Whether the registration is still the hub's live foreground listener.
    pub(crate) fn is_active(&self) -> bool {
        let Some(state) = self.hub.upgrade() else {
            return false;
        };
        let mut state = state.borrow_mut();
        state.is_live(self.id)
    }
}

impl std::fmt::Debug for ListenerTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerTicket")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Keeps a document registered with an [`InputHub`]; deregisters on drop.
#[must_use = "dropping the subscription immediately deregisters the document"]
pub struct Subscription {
    ticket: ListenerTicket,
}

impl Subscription {
    /// Whether this subscription is still the hub's foreground listener.
    ///
    /// `false` once another document took the foreground, or once the subscribed document
    /// was dropped.
    pub fn is_active(&self) -> bool {
        self.ticket.is_active()
    }

    pub(crate) fn ticket(&self) -> ListenerTicket {
        self.ticket.clone()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(state) = self.ticket.hub.upgrade() else {
            return;
        };
        let mut state = state.borrow_mut();
        if state
            .active
            .as_ref()
            .is_some_and(|listener| listener.id == self.ticket.id)
        {
            state.active = None;
            tracing::debug!(id = self.ticket.id, "foreground listener released");
        }
    }
}
