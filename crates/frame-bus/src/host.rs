//! # In-Process Host
//!
//! A host transport for contexts living in one process: each attached context
//! gets an unbounded inbox drained by its own tokio task, which is the single
//! raw-message handler of that context. Sends never block and never fail.
//!
//! ```text
//! HostEndpoint::send_raw ──► router ──► [inbox ctx A] ──► task A ──► registry A
//!                                   └─► [inbox ctx B] ──► task B ──► registry B
//! ```
//!
//! Messages from one endpoint to one context arrive in send order.

use std::collections::HashMap;
use std::sync::Arc;

use frame_types::WireMessage;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::registry::SubscriptionRegistry;
use crate::transport::{ContextId, FrameElement, HostTransport, RawNotification, ANY_ORIGIN};

struct ContextInbox {
    origin: String,
    sender: mpsc::UnboundedSender<RawNotification>,
}

/// Router shared by every context of the process.
#[derive(Clone, Default)]
pub struct InProcessHost {
    contexts: Arc<RwLock<HashMap<ContextId, ContextInbox>>>,
}

/// A receiving context attached to an [`InProcessHost`].
#[derive(Debug)]
pub struct AttachedContext {
    pub id: ContextId,
    /// The context's raw-message handler task; ends once the context is detached.
    pub handle: JoinHandle<()>,
}

impl InProcessHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a receiving context served by `registry`.
    ///
    /// Spawns the context's only raw-message handler, so it must be called
    /// from within a tokio runtime.
    pub fn attach<T>(
        &self,
        registry: SubscriptionRegistry<T>,
        origin: impl Into<String>,
    ) -> AttachedContext
    where
        T: DeserializeOwned + 'static,
    {
        let id = ContextId::new();
        let origin = origin.into();
        let (sender, mut receiver) = mpsc::unbounded_channel::<RawNotification>();

        debug!(context = %id, origin = %origin, token = %registry.token(), "Context attached");
        self.contexts
            .write()
            .insert(id, ContextInbox { origin, sender });

        let handle = tokio::spawn(async move {
            while let Some(notification) = receiver.recv().await {
                registry.on_raw_message(&notification);
            }
        });

        AttachedContext { id, handle }
    }

    /// Remove a context; messages still queued for it are delivered first.
    pub fn detach(&self, id: &ContextId) -> bool {
        let removed = self.contexts.write().remove(id).is_some();
        if removed {
            debug!(context = %id, "Context detached");
        }
        removed
    }

    #[must_use]
    pub fn context_count(&self) -> usize {
        self.contexts.read().len()
    }

    /// A sending handle for a context running at `origin`.
    #[must_use]
    pub fn endpoint(&self, origin: impl Into<String>) -> HostEndpoint {
        HostEndpoint {
            host: self.clone(),
            origin: origin.into(),
            source: None,
        }
    }

    fn route(&self, target: &ContextId, notification: RawNotification, target_origin: &str) {
        let contexts = self.contexts.read();
        let Some(inbox) = contexts.get(target) else {
            debug!(context = %target, "Dropping message for unknown context");
            return;
        };
        if target_origin != ANY_ORIGIN && target_origin != inbox.origin {
            debug!(
                context = %target,
                target_origin = target_origin,
                "Dropping message, target origin does not match"
            );
            return;
        }
        if inbox.sender.send(notification).is_err() {
            debug!(context = %target, "Dropping message, context handler has stopped");
        }
    }
}

/// Sending side of one context on an [`InProcessHost`].
#[derive(Clone)]
pub struct HostEndpoint {
    host: InProcessHost,
    origin: String,
    source: Option<ContextId>,
}

impl HostEndpoint {
    /// Identify the sending context in the notifications it produces.
    #[must_use]
    pub fn with_source(mut self, source: ContextId) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl HostTransport for HostEndpoint {
    fn send_raw(&self, target: &ContextId, message: WireMessage, target_origin: &str) {
        let mut notification = RawNotification::new(message, self.origin.clone());
        notification.source = self.source;
        self.host.route(target, notification, target_origin);
    }
}

/// A [`FrameElement`] backed by a fixed attribute map.
#[derive(Debug, Clone)]
pub struct StaticFrame {
    context: ContextId,
    attributes: HashMap<String, String>,
}

impl StaticFrame {
    pub fn new(context: ContextId) -> Self {
        Self {
            context,
            attributes: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

impl FrameElement for StaticFrame {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn content_context(&self) -> ContextId {
        self.context
    }
}
