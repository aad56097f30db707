//! Request generations for refreshable views
//!
//! Each fetch takes a ticket before it is sent. Only the result of the most
//! recently issued ticket may be applied, so a slow response to an earlier
//! fetch can never overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

/// Ticket identifying one request generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// Issues tickets and tells whether a ticket is still the latest
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    latest: Arc<AtomicU64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding every earlier ticket
    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Value slot that only accepts results of the latest request
#[derive(Debug)]
pub struct Latest<T> {
    sequencer: RequestSequencer,
    value: Mutex<Option<T>>,
}

impl<T: Clone> Default for Latest<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Latest<T> {
    pub fn new() -> Self {
        Self {
            sequencer: RequestSequencer::new(),
            value: Mutex::new(None),
        }
    }

    /// Ticket for a request about to be sent
    pub fn begin(&self) -> RequestTicket {
        self.sequencer.issue()
    }

    /// Store `value` if `ticket` is still current; returns whether it was
    /// applied
    pub fn offer(&self, ticket: RequestTicket, value: T) -> bool {
        let mut slot = self.value.lock().unwrap_or_else(|e| e.into_inner());
        if !self.sequencer.is_current(ticket) {
            debug!("Dropping stale response {:?}", ticket);
            return false;
        }
        *slot = Some(value);
        true
    }

    /// Offer `value` and return what the slot holds afterwards, falling back
    /// to `value` while nothing newer has landed yet
    pub fn settle(&self, ticket: RequestTicket, value: T) -> T {
        if self.offer(ticket, value.clone()) {
            return value;
        }
        self.get().unwrap_or(value)
    }

    pub fn get(&self) -> Option<T> {
        self.value
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
