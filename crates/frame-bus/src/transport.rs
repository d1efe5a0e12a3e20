//! # Host Transport Boundary
//!
//! The raw cross-context primitive the bus is layered on. The bus only needs
//! to hand a wire value to a target context, and to be told when one arrives.
//! Delivery is fire-and-forget and unordered across senders.

use std::fmt;

use frame_types::WireMessage;
use uuid::Uuid;

/// Target origin policy that accepts any receiving origin.
pub const ANY_ORIGIN: &str = "*";

/// Identity of an execution context known to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(Uuid);

impl ContextId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One "message arrived" notification as surfaced by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNotification {
    /// The wire value exactly as sent.
    pub data: WireMessage,
    /// Origin of the sending context.
    pub origin: String,
    /// Sending context, when the host knows it.
    pub source: Option<ContextId>,
}

impl RawNotification {
    pub fn new(data: WireMessage, origin: impl Into<String>) -> Self {
        Self {
            data,
            origin: origin.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: ContextId) -> Self {
        self.source = Some(source);
        self
    }
}

/// Sending half of the host primitive.
pub trait HostTransport: Send + Sync {
    /// Hand `message` to `target`. No result is observed; delivery is best-effort.
    fn send_raw(&self, target: &ContextId, message: WireMessage, target_origin: &str);
}

impl<H: HostTransport + ?Sized> HostTransport for &H {
    fn send_raw(&self, target: &ContextId, message: WireMessage, target_origin: &str) {
        (**self).send_raw(target, message, target_origin);
    }
}

/// The embedding element of a frame, as seen by the parent.
pub trait FrameElement {
    /// Read an attribute of the element. Must be synchronous and side-effect free.
    fn attribute(&self, name: &str) -> Option<String>;

    /// The context running inside the frame.
    fn content_context(&self) -> ContextId;
}
