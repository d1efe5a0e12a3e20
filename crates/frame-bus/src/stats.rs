//! # Registry Statistics
//!
//! Counters describing what a registry did with its inbound traffic. Discards
//! are counted here instead of being logged.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::registry::DiscardReason;

/// Live counters, updated by the dispatch loop.
#[derive(Debug, Default)]
pub struct RegistryStats {
    messages_delivered: AtomicU64,
    listener_invocations: AtomicU64,
    listener_failures: AtomicU64,
    discarded_malformed: AtomicU64,
    discarded_token_mismatch: AtomicU64,
    discarded_unrouted: AtomicU64,
}

/// Point-in-time copy of [`RegistryStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Messages that reached at least one listener.
    pub messages_delivered: u64,
    pub listener_invocations: u64,
    pub listener_failures: u64,
    pub discarded_malformed: u64,
    pub discarded_token_mismatch: u64,
    /// Well-formed, paired messages of a type nobody listens to.
    pub discarded_unrouted: u64,
}

impl StatsSnapshot {
    /// Total messages dropped by any filter.
    #[must_use]
    pub fn discarded(&self) -> u64 {
        self.discarded_malformed + self.discarded_token_mismatch + self.discarded_unrouted
    }

    /// Every message the registry has finished handling, delivered or not.
    #[must_use]
    pub fn processed(&self) -> u64 {
        self.messages_delivered + self.discarded()
    }
}

impl RegistryStats {
    pub(crate) fn record_discard(&self, reason: DiscardReason) {
        let counter = match reason {
            DiscardReason::Malformed => &self.discarded_malformed,
            DiscardReason::TokenMismatch => &self.discarded_token_mismatch,
            DiscardReason::NoSubscribers => &self.discarded_unrouted,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivery(&self, invoked: usize, failed: usize) {
        self.messages_delivered.fetch_add(1, Ordering::Relaxed);
        self.listener_invocations
            .fetch_add(invoked as u64, Ordering::Relaxed);
        self.listener_failures
            .fetch_add(failed as u64, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            messages_delivered: self.messages_delivered.load(Ordering::Relaxed),
            listener_invocations: self.listener_invocations.load(Ordering::Relaxed),
            listener_failures: self.listener_failures.load(Ordering::Relaxed),
            discarded_malformed: self.discarded_malformed.load(Ordering::Relaxed),
            discarded_token_mismatch: self.discarded_token_mismatch.load(Ordering::Relaxed),
            discarded_unrouted: self.discarded_unrouted.load(Ordering::Relaxed),
        }
    }
}
