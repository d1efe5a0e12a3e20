//! # Frame Types Crate
//!
//! Wire-level vocabulary of the frame messaging protocol: the `Envelope<T>`
//! codec, the `CorrelationToken` that pairs a parent with its frames, and the
//! text framing that marks opted-in traffic.
//!
//! ## Design Principles
//!
//! - **Pure Codec**: `encode`/`decode` have no side effects and never panic.
//! - **Opaque Payloads**: the envelope is generic over its payload; application
//!   schemas live outside this crate.
//! - **Silent Non-Match**: a value without the envelope shape is not an error,
//!   `decode` simply returns `None`.
//! - **Marked Opt-In**: only prefixed text decodes, so an opted-out payload is
//!   never routed however much it resembles an envelope.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod envelope;
pub mod errors;
pub mod framing;
pub mod token;

pub use envelope::{decode, encode, Envelope, WireMessage};
pub use errors::EnvelopeError;
pub use framing::TextFraming;
pub use token::CorrelationToken;
