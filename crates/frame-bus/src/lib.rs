//! # Frame Bus - Typed Messaging Between a Parent and Its Frames
//!
//! A parent context embeds untrusted frames and talks to them through a host
//! message-passing primitive. This crate lets the parent receive typed,
//! token-authenticated notifications from those frames.
//!
//! ## Message Flow
//!
//! ```text
//! ┌────────────────┐ encode() ┌───────────────┐ raw notification ┌──────────────────────┐
//! │ FrameMessenger │ ───────► │ HostTransport │ ───────────────► │ SubscriptionRegistry │
//! └────────────────┘          └───────────────┘                  │ decode → token check │
//!                                                                │ → route → fan out    │
//!                                                                └──────────┬───────────┘
//!                                                                           ▼
//!                                                                 listener 1 .. listener N
//! ```
//!
//! ## Guarantees
//!
//! - **Silent Discard:** malformed envelopes, foreign tokens and unrouted types
//!   are dropped without error or log output.
//! - **Registration Order:** listeners of one type run in the order they subscribed.
//! - **Failure Containment:** a failing or panicking listener is reported to the
//!   registry's `ErrorSink`; its siblings and later messages are unaffected.
//! - **Snapshot Dispatch:** the listeners of one message are fixed before the first runs.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod config;
pub mod error;
pub mod error_sink;
pub mod host;
pub mod registry;
pub mod sender;
pub mod stats;
pub mod subscription;
pub mod transport;

// Re-export main types
pub use config::BusConfig;
pub use error::{BusError, FailureCause, ListenerError, ListenerFailure};
pub use error_sink::{ChannelErrorSink, CollectingErrorSink, ErrorSink, TracingErrorSink};
pub use host::{AttachedContext, HostEndpoint, InProcessHost, StaticFrame};
pub use registry::{DiscardReason, DispatchOutcome, SubscriptionRegistry};
pub use sender::FrameMessenger;
pub use stats::{RegistryStats, StatsSnapshot};
pub use subscription::{Disposer, SubscriptionGuard, SubscriptionId};
pub use transport::{ContextId, FrameElement, HostTransport, RawNotification, ANY_ORIGIN};

pub use frame_types::{CorrelationToken, Envelope, WireMessage};
