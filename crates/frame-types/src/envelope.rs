//! # `Envelope` Codec
//!
//! The wrapper a sender puts around a payload when it opts into typed routing.
//!
//! ## Wire Shape
//!
//! ```text
//! opted in:   "frame-{\"token\":\"<correlation token>\",\"type\":\"<logical type>\",\"payload\":<data>}"
//! opted out:  <data>                      (never matched by a typed subscription)
//! ```
//!
//! Opted-in traffic is the [`TextFraming`] prefix followed by the JSON text of
//! the envelope. A receiver only accepts prefixed text whose body is an object
//! with string `token` and `type` members. Anything else is a silent non-match,
//! not an error. An opted-out payload is sent as its own JSON value, so it can
//! only carry the prefix if it is itself a prefixed string, and `encode`
//! refuses those.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::EnvelopeError;
use crate::framing::TextFraming;
use crate::token::CorrelationToken;

/// Structured data carried by the host transport.
pub type WireMessage = serde_json::Value;

const TOKEN_FIELD: &str = "token";
const TYPE_FIELD: &str = "type";
const PAYLOAD_FIELD: &str = "payload";

/// A typed, token-stamped message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Correlation token of the pairing this message belongs to.
    pub token: String,

    /// Logical type used for routing on the receiving side.
    #[serde(rename = "type")]
    pub kind: String,

    /// Opaque application data.
    pub payload: T,
}

impl<T> Envelope<T> {
    pub fn new(token: impl Into<String>, kind: impl Into<String>, payload: T) -> Self {
        Self {
            token: token.into(),
            kind: kind.into(),
            payload,
        }
    }

    /// Returns true if the envelope was stamped with `token`.
    #[must_use]
    pub fn is_paired_with(&self, token: &CorrelationToken) -> bool {
        token.matches(&self.token)
    }
}

impl Envelope<WireMessage> {
    /// Convert the opaque payload into an application type.
    ///
    /// # Errors
    ///
    /// Returns `EnvelopeError::Payload` if the payload does not deserialize into `U`.
    pub fn into_typed<U: DeserializeOwned>(self) -> Result<Envelope<U>, EnvelopeError> {
        let payload =
            serde_json::from_value(self.payload).map_err(|e| EnvelopeError::Payload {
                kind: self.kind.clone(),
                reason: e.to_string(),
            })?;
        Ok(Envelope {
            token: self.token,
            kind: self.kind,
            payload,
        })
    }
}

/// Produce the wire form of an outbound message.
///
/// With `protocol_opt_in` the payload is wrapped in an [`Envelope`] and framed
/// as prefixed text; without it the payload's own JSON value is returned
/// unmodified.
///
/// # Errors
///
/// Returns `EnvelopeError::Serialize` if the payload has no JSON representation,
/// or `EnvelopeError::ReservedPrefix` if an opted-out payload is a string
/// starting with the envelope prefix.
pub fn encode<T: Serialize + ?Sized>(
    token: &str,
    kind: &str,
    payload: &T,
    protocol_opt_in: bool,
) -> Result<WireMessage, EnvelopeError> {
    let framing = TextFraming::default();
    if protocol_opt_in {
        let envelope = serde_json::to_value(Envelope::new(token, kind, payload))
            .map_err(|e| EnvelopeError::Serialize(e.to_string()))?;
        return Ok(WireMessage::String(framing.to_text(&envelope)?));
    }

    let raw = serde_json::to_value(payload).map_err(|e| EnvelopeError::Serialize(e.to_string()))?;
    if raw.as_str().is_some_and(|text| framing.is_framed(text)) {
        return Err(EnvelopeError::ReservedPrefix {
            prefix: framing.prefix().to_string(),
        });
    }
    Ok(raw)
}

/// Recover an envelope from its wire form.
///
/// Returns `None` unless the value is prefixed text whose body has a string
/// `token` and `type` member. A missing `payload` member decodes as `null`.
#[must_use]
pub fn decode(wire: &WireMessage) -> Option<Envelope<WireMessage>> {
    let body = TextFraming::default().from_text(wire.as_str()?)?;
    let object = body.as_object()?;
    let token = object.get(TOKEN_FIELD)?.as_str()?;
    let kind = object.get(TYPE_FIELD)?.as_str()?;
    let payload = object
        .get(PAYLOAD_FIELD)
        .cloned()
        .unwrap_or(WireMessage::Null);

    Some(Envelope::new(token, kind, payload))
}
