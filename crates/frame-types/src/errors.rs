//! # Error Types
//!
//! Errors raised while building or converting envelopes.

use thiserror::Error;

/// Errors from envelope encoding and payload conversion.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The outbound payload has no JSON representation.
    #[error("Payload cannot be serialized: {0}")]
    Serialize(String),

    /// An opted-out payload is a string that would read as an envelope.
    #[error("Opted-out payload must not start with the envelope prefix `{prefix}`")]
    ReservedPrefix { prefix: String },

    /// The inbound payload does not match the requested application type.
    #[error("Payload does not match type `{kind}`: {reason}")]
    Payload { kind: String, reason: String },
}
