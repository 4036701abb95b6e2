//! Deferred-evaluation scheduler.
//!
//! Device handlers never evaluate their outputs inline; they post an
//! "evaluate at time T" token instead. This module keeps those tokens:
//! 1. **Ordering:** Tokens are released in timestamp order.
//! 2. **Coalescing:** Any number of requests for the same timestamp collapse into one token.
//! 3. **No cancellation:** A posted token is only ever removed by being released.

use std::collections::BTreeSet;

use crate::common::Timestamp;

/// Time-ordered, coalescing queue of evaluation tokens.
#[derive(Clone, Debug, Default)]
pub struct EvalScheduler {
    pending: BTreeSet<Timestamp>,
    requested: u64,
    coalesced: u64,
}

impl EvalScheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests an evaluation at `at`.
    ///
    /// Returns `false` if a token for that instant was already queued.
    pub fn notify(&mut self, at: Timestamp) -> bool {
        self.requested += 1;
        let fresh = self.pending.insert(at);
        if !fresh {
            self.coalesced += 1;
        }
        fresh
    }

    /// Removes and returns the earliest token due at or before `now`.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<Timestamp> {
        let first = *self.pending.first()?;
        if first > now {
            return None;
        }
        self.pending.pop_first()
    }

    /// Timestamp of the earliest queued token.
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.pending.first().copied()
    }

    /// Number of queued tokens.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Total requests received, including coalesced ones.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Requests that were merged into an already-queued token.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}
