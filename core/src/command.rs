//! Request tickets and the commands stores hand to their host.
//!
//! # Design
//! A store action is split in two: `begin_*` updates loading flags and
//! returns a [`Command`], `finish_*` takes the command's ticket back together
//! with the response. Every slot (list, current record, save, ...) has its
//! own [`Tickets`] counter, and only the most recently issued ticket for a
//! slot may change state. Older completions are dropped, so overlapping
//! actions no longer race on shared fields.

use crate::http::HttpRequest;

/// State region an action writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    PostingsList,
    PostingsCurrent,
    PostingsSave,
    Profile,
    ProfileSave,
}

/// Proof that a response belongs to a particular action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    slot: Slot,
    seq: u64,
}

impl Ticket {
    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Monotonic ticket source for one slot.
#[derive(Debug, Clone)]
pub struct Tickets {
    slot: Slot,
    latest: u64,
}

impl Tickets {
    pub fn new(slot: Slot) -> Self {
        Self { slot, latest: 0 }
    }

    /// Issue a new ticket, invalidating every earlier one.
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket {
            slot: self.slot,
            seq: self.latest,
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        let current = ticket.slot == self.slot && ticket.seq == self.latest;
        if !current {
            tracing::debug!(
                slot = ?ticket.slot,
                seq = ticket.seq,
                latest = self.latest,
                "discarding stale response"
            );
        }
        current
    }
}

/// Effect description returned by `begin_*`: execute `request`, then pass
/// `ticket` and the outcome to the matching `finish_*`.
#[derive(Debug, Clone)]
pub struct Command {
    pub ticket: Ticket,
    pub request: HttpRequest,
}
