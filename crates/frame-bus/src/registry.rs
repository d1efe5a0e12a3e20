//! # Subscription Registry
//!
//! Per-context routing table: logical type → ordered listeners.
//!
//! ## Dispatch (one raw notification)
//!
//! ```text
//! decode ──None──────────────► discard (Malformed)
//!   │
//! token == own token? ──no───► discard (TokenMismatch)
//!   │
//! listeners for type? ──none─► discard (NoSubscribers)
//!   │
//! payload fits T? ──no───────► discard (Malformed)
//!   │
//! snapshot listeners, then invoke each in registration order
//!   └─ Err / panic ──► ErrorSink, continue with the next listener
//! ```
//!
//! Discards are normal outcomes: they are counted in [`RegistryStats`] and
//! never logged or reported.
//!
//! The listener list is copied before the first listener runs and the lock is
//! released, so listeners may subscribe or dispose freely. Such changes apply
//! from the next message on.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use frame_types::{decode, CorrelationToken, WireMessage};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ListenerError, ListenerFailure};
use crate::error_sink::{ErrorSink, TracingErrorSink};
use crate::stats::{RegistryStats, StatsSnapshot};
use crate::subscription::{Disposer, SubscriptionEntry, SubscriptionId};
use crate::transport::RawNotification;

/// Why an inbound message reached no listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Not an envelope, or the payload does not fit the registry's payload type.
    Malformed,
    /// Stamped with another pairing's token.
    TokenMismatch,
    /// No active subscription for the message type.
    NoSubscribers,
}

/// What the registry did with one inbound message.
///
/// Informational only: none of these outcomes is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Discarded(DiscardReason),
    /// `invoked` listeners ran, `failed` of them were contained.
    Delivered { invoked: usize, failed: usize },
}

impl DispatchOutcome {
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered { .. })
    }
}

type Routes<T> = HashMap<String, Vec<Arc<SubscriptionEntry<T>>>>;

/// State shared between a registry, its clones and its disposers.
pub(crate) struct RegistryShared<T> {
    token: CorrelationToken,
    routes: Mutex<Routes<T>>,
    next_id: AtomicU64,
    sink: Arc<dyn ErrorSink>,
    stats: RegistryStats,
}

impl<T> RegistryShared<T> {
    pub(crate) fn remove(&self, kind: &str, id: SubscriptionId) -> bool {
        let mut routes = self.routes.lock();
        let Some(entries) = routes.get_mut(kind) else {
            return false;
        };
        let Some(index) = entries.iter().position(|entry| entry.id == id) else {
            return false;
        };

        let removed = entries.remove(index);
        if entries.is_empty() {
            routes.remove(kind);
        }
        drop(routes);

        // The listener's captured state may itself touch the registry.
        drop(removed);
        true
    }

    pub(crate) fn contains(&self, kind: &str, id: SubscriptionId) -> bool {
        self.routes
            .lock()
            .get(kind)
            .is_some_and(|entries| entries.iter().any(|entry| entry.id == id))
    }

    fn snapshot(&self, kind: &str) -> Vec<Arc<SubscriptionEntry<T>>> {
        self.routes.lock().get(kind).cloned().unwrap_or_default()
    }
}

/// Routing table of one receiving context.
///
/// Cheap to clone; clones share the same subscriptions. `T` is the payload
/// type listeners receive (defaults to the raw [`WireMessage`]).
pub struct SubscriptionRegistry<T = WireMessage> {
    shared: Arc<RegistryShared<T>>,
}

impl<T> SubscriptionRegistry<T> {
    /// Create a registry for a context owning `token`, logging listener failures.
    pub fn new(token: impl Into<CorrelationToken>) -> Self {
        Self::with_error_sink(token, Arc::new(TracingErrorSink))
    }

    /// Create a registry that reports listener failures to `sink`.
    pub fn with_error_sink(token: impl Into<CorrelationToken>, sink: Arc<dyn ErrorSink>) -> Self {
        Self {
            shared: Arc::new(RegistryShared {
                token: token.into(),
                routes: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
                sink,
                stats: RegistryStats::default(),
            }),
        }
    }

    /// The correlation token this registry accepts.
    #[must_use]
    pub fn token(&self) -> &CorrelationToken {
        &self.shared.token
    }

    /// Register `listener` for messages of type `kind`.
    ///
    /// Registering the same listener twice yields two independent subscriptions.
    pub fn subscribe<F>(&self, kind: impl Into<String>, listener: F) -> Disposer<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.subscribe_fallible(kind, move |payload| {
            listener(payload);
            Ok(())
        })
    }

    /// Register a listener whose errors are reported to the registry's sink.
    pub fn subscribe_fallible<F>(&self, kind: impl Into<String>, listener: F) -> Disposer<T>
    where
        F: Fn(&T) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        let kind = kind.into();
        let id = SubscriptionId(self.shared.next_id.fetch_add(1, Ordering::Relaxed));
        let entry = Arc::new(SubscriptionEntry::new(id, Box::new(listener)));

        self.shared
            .routes
            .lock()
            .entry(kind.clone())
            .or_default()
            .push(entry);

        debug!(kind = %kind, subscription = %id, "Subscription registered");
        Disposer::new(Arc::downgrade(&self.shared), kind, id)
    }

    /// Number of active subscriptions for `kind`.
    #[must_use]
    pub fn subscription_count(&self, kind: &str) -> usize {
        self.shared.routes.lock().get(kind).map_or(0, Vec::len)
    }

    /// Types with at least one active subscription, sorted.
    #[must_use]
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.shared.routes.lock().keys().cloned().collect();
        kinds.sort();
        kinds
    }

    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.shared.stats.snapshot()
    }

    fn discard(&self, reason: DiscardReason) -> DispatchOutcome {
        self.shared.stats.record_discard(reason);
        DispatchOutcome::Discarded(reason)
    }
}

impl<T: DeserializeOwned> SubscriptionRegistry<T> {
    /// Entry point for every raw notification addressed to this context.
    ///
    /// Never fails: filtered messages are dropped and listener failures are
    /// contained and reported to the sink.
    pub fn on_raw_message(&self, notification: &RawNotification) -> DispatchOutcome {
        let Some(envelope) = decode(&notification.data) else {
            return self.discard(DiscardReason::Malformed);
        };
        if !envelope.is_paired_with(&self.shared.token) {
            return self.discard(DiscardReason::TokenMismatch);
        }

        let listeners = self.shared.snapshot(&envelope.kind);
        if listeners.is_empty() {
            return self.discard(DiscardReason::NoSubscribers);
        }
        let Ok(envelope) = envelope.into_typed::<T>() else {
            return self.discard(DiscardReason::Malformed);
        };

        let mut failed = 0;
        for entry in &listeners {
            if let Err(cause) = entry.invoke(&envelope.payload) {
                failed += 1;
                self.shared.sink.report(ListenerFailure {
                    kind: envelope.kind.clone(),
                    subscription: entry.id,
                    cause,
                });
            }
        }

        self.shared.stats.record_delivery(listeners.len(), failed);
        DispatchOutcome::Delivered {
            invoked: listeners.len(),
            failed,
        }
    }

    /// Entry point for hosts that only deliver strings.
    pub fn on_raw_text(&self, text: &str, origin: &str) -> DispatchOutcome {
        let data = WireMessage::String(text.to_string());
        self.on_raw_message(&RawNotification::new(data, origin))
    }
}

impl<T> Clone for SubscriptionRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for SubscriptionRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionRegistry")
            .field("token", &self.shared.token)
            .field("kinds", &self.kinds())
            .finish()
    }
}
