//! # Error Types
//!
//! Errors of the sending side, and the failure record a contained listener
//! error turns into. Nothing in here is ever propagated into the dispatch loop.

use frame_types::EnvelopeError;
use thiserror::Error;

use crate::subscription::SubscriptionId;

/// Error a fallible listener may return.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Errors from sending operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// The frame element carries no correlation attribute.
    #[error("Frame has no `{attribute}` attribute to read the correlation token from")]
    MissingSentinel { attribute: String },

    /// The outbound payload could not be encoded.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
}

/// How a listener failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// The listener returned an error.
    #[error("returned error: {0}")]
    Returned(String),

    /// The listener panicked; the panic was caught.
    #[error("panicked: {0}")]
    Panicked(String),
}

/// A contained listener failure, as handed to an `ErrorSink`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Listener {subscription} for type `{kind}` failed: {cause}")]
pub struct ListenerFailure {
    /// Logical type of the message being dispatched.
    pub kind: String,
    /// The subscription whose listener failed.
    pub subscription: SubscriptionId,
    pub cause: FailureCause,
}
