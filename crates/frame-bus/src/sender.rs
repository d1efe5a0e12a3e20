//! # Frame Messenger
//!
//! Sending helper: encodes a payload (wrapped or raw) and hands it to the host
//! transport, addressed at the context inside a frame element.

use frame_types::{encode, WireMessage};
use serde::Serialize;
use tracing::debug;

use crate::config::BusConfig;
use crate::error::BusError;
use crate::transport::{FrameElement, HostTransport};

/// Sends typed messages into frames over a host transport.
pub struct FrameMessenger<H> {
    transport: H,
    config: BusConfig,
}

impl<H: HostTransport> FrameMessenger<H> {
    pub fn new(transport: H, config: BusConfig) -> Self {
        Self { transport, config }
    }

    #[must_use]
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Send `payload` to the frame's context, stamped with an explicit token.
    ///
    /// Without `protocol_opt_in` the payload is sent unwrapped and no typed
    /// subscription will ever receive it.
    ///
    /// # Errors
    ///
    /// Returns `BusError::Envelope` if the payload cannot be encoded, or if an
    /// opted-out payload is a string carrying the envelope prefix.
    pub fn post<P: Serialize + ?Sized>(
        &self,
        frame: &dyn FrameElement,
        token: &str,
        kind: &str,
        payload: &P,
        protocol_opt_in: bool,
    ) -> Result<(), BusError> {
        let wire = encode(token, kind, payload, protocol_opt_in)?;
        let target = frame.content_context();

        debug!(
            context = %target,
            kind = kind,
            enveloped = protocol_opt_in,
            "Posting message to frame"
        );
        self.transport
            .send_raw(&target, wire, &self.config.target_origin);
        Ok(())
    }

    /// Send an enveloped message using the token stored on the frame element.
    ///
    /// # Errors
    ///
    /// Returns `BusError::MissingSentinel` if the frame has no token attribute,
    /// or `BusError::Envelope` if the payload cannot be encoded.
    pub fn post_to_frame<P: Serialize + ?Sized>(
        &self,
        frame: &dyn FrameElement,
        kind: &str,
        payload: &P,
    ) -> Result<(), BusError> {
        let token = frame
            .attribute(&self.config.sentinel_attribute)
            .ok_or_else(|| BusError::MissingSentinel {
                attribute: self.config.sentinel_attribute.clone(),
            })?;
        self.post(frame, &token, kind, payload, true)
    }

    /// Encode an enveloped message as the framed text string-only hosts carry.
    ///
    /// # Errors
    ///
    /// Returns `BusError::Envelope` if the payload cannot be encoded.
    pub fn frame_text<P: Serialize + ?Sized>(
        &self,
        token: &str,
        kind: &str,
        payload: &P,
    ) -> Result<String, BusError> {
        match encode(token, kind, payload, true)? {
            WireMessage::String(text) => Ok(text),
            other => Ok(other.to_string()),
        }
    }
}
