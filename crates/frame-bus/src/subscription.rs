//! # Subscriptions
//!
//! A subscription is one listener registered under one logical type. Its
//! lifecycle is `Active --dispose()--> Disposed`, with no way back.
//!
//! The [`Disposer`] handed out at registration is a small record naming the
//! registry (weakly), the type key and the subscription id. Dropping it does
//! not unsubscribe: a subscription lives as long as its registry unless it is
//! explicitly disposed. Use [`Disposer::into_guard`] for scope-bound listeners.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Weak;

use tracing::debug;

use crate::error::{FailureCause, ListenerError};
use crate::registry::RegistryShared;

/// Registry-unique subscription identity. Ids increase in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub(crate) u64);

impl SubscriptionId {
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub(crate) type Listener<T> = Box<dyn Fn(&T) -> Result<(), ListenerError> + Send + Sync>;

/// A registered listener.
pub(crate) struct SubscriptionEntry<T> {
    pub(crate) id: SubscriptionId,
    listener: Listener<T>,
}

impl<T> SubscriptionEntry<T> {
    pub(crate) fn new(id: SubscriptionId, listener: Listener<T>) -> Self {
        Self { id, listener }
    }

    /// Run the listener, converting both error returns and panics into a `FailureCause`.
    pub(crate) fn invoke(&self, payload: &T) -> Result<(), FailureCause> {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.listener)(payload))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(FailureCause::Returned(e.to_string())),
            Err(panic_err) => Err(FailureCause::Panicked(panic_message(panic_err.as_ref()))),
        }
    }
}

fn panic_message(any: &(dyn Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Handle that removes one subscription from its registry.
pub struct Disposer<T> {
    registry: Weak<RegistryShared<T>>,
    kind: String,
    id: SubscriptionId,
}

impl<T> Disposer<T> {
    pub(crate) fn new(registry: Weak<RegistryShared<T>>, kind: String, id: SubscriptionId) -> Self {
        Self { registry, kind, id }
    }

    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Logical type the subscription listens to.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Remove the subscription. Later calls, or calls after the registry is
    /// gone, are no-ops. Returns true only for the call that removed it.
    pub fn dispose(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let removed = registry.remove(&self.kind, self.id);
        if removed {
            debug!(kind = %self.kind, subscription = %self.id, "Subscription disposed");
        }
        removed
    }

    /// Returns true while the subscription is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.contains(&self.kind, self.id))
    }

    /// Tie the subscription to a scope: it is disposed when the guard drops.
    #[must_use]
    pub fn into_guard(self) -> SubscriptionGuard<T> {
        SubscriptionGuard { disposer: self }
    }
}

impl<T> Clone for Disposer<T> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            kind: self.kind.clone(),
            id: self.id,
        }
    }
}

impl<T> fmt::Debug for Disposer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .finish()
    }
}

/// Disposes its subscription on drop.
#[derive(Debug)]
pub struct SubscriptionGuard<T> {
    disposer: Disposer<T>,
}

impl<T> SubscriptionGuard<T> {
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.disposer.id()
    }
}

impl<T> Drop for SubscriptionGuard<T> {
    fn drop(&mut self) {
        self.disposer.dispose();
    }
}
