//! # Text Framing
//!
//! Opted-in messages travel as a fixed prefix followed by JSON text. The prefix
//! marks protocol traffic: a listener cheaply skips anything without it, and
//! hosts that only carry strings need no further conversion.

use crate::envelope::WireMessage;
use crate::errors::EnvelopeError;

/// Prefixed JSON text framing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFraming {
    prefix: String,
}

impl TextFraming {
    /// Default prefix marking frame-bus traffic.
    pub const DEFAULT_PREFIX: &'static str = "frame-";

    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Render a wire value as framed text.
    ///
    /// # Errors
    ///
    /// Returns `EnvelopeError::Serialize` if the value cannot be written as JSON.
    pub fn to_text(&self, wire: &WireMessage) -> Result<String, EnvelopeError> {
        let body =
            serde_json::to_string(wire).map_err(|e| EnvelopeError::Serialize(e.to_string()))?;
        Ok(format!("{}{}", self.prefix, body))
    }

    /// Returns true if `text` starts with this framing's prefix.
    #[must_use]
    pub fn is_framed(&self, text: &str) -> bool {
        text.starts_with(self.prefix.as_str())
    }

    /// Parse framed text. Foreign or malformed text yields `None`.
    #[must_use]
    pub fn from_text(&self, text: &str) -> Option<WireMessage> {
        let body = text.strip_prefix(self.prefix.as_str())?;
        serde_json::from_str(body).ok()
    }
}

impl Default for TextFraming {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PREFIX)
    }
}
