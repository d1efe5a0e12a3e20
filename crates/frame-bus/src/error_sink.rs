//! # Error Sinks
//!
//! Where contained listener failures go. The sink is injected into each
//! registry rather than being a process-wide hook, so diagnostics and tests
//! can observe failures without touching shared state.

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::warn;

use crate::error::ListenerFailure;

/// Receiver of contained listener failures.
///
/// `report` is called synchronously from the dispatch loop and must not block.
pub trait ErrorSink: Send + Sync {
    fn report(&self, failure: ListenerFailure);
}

/// Default sink: logs every failure at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, failure: ListenerFailure) {
        warn!(
            kind = %failure.kind,
            subscription = %failure.subscription,
            cause = %failure.cause,
            "Listener failed, continuing dispatch"
        );
    }
}

/// Forwards failures to an asynchronous channel.
///
/// Once the receiving half is dropped, failures fall back to the log.
#[derive(Debug, Clone)]
pub struct ChannelErrorSink {
    sender: mpsc::UnboundedSender<ListenerFailure>,
}

impl ChannelErrorSink {
    /// Create a sink and the receiver its failures arrive on.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ListenerFailure>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ErrorSink for ChannelErrorSink {
    fn report(&self, failure: ListenerFailure) {
        if let Err(mpsc::error::SendError(failure)) = self.sender.send(failure) {
            TracingErrorSink.report(failure);
        }
    }
}

/// Keeps failures in memory until they are taken.
#[derive(Debug, Default)]
pub struct CollectingErrorSink {
    failures: Mutex<Vec<ListenerFailure>>,
}

impl CollectingErrorSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every failure reported so far.
    #[must_use]
    pub fn failures(&self) -> Vec<ListenerFailure> {
        self.failures.lock().clone()
    }

    /// Drain the collected failures.
    pub fn take(&self) -> Vec<ListenerFailure> {
        std::mem::take(&mut *self.failures.lock())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.lock().is_empty()
    }
}

impl ErrorSink for CollectingErrorSink {
    fn report(&self, failure: ListenerFailure) {
        self.failures.lock().push(failure);
    }
}
