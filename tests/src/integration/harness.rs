//! # Test Fixtures
//!
//! A parent posting into one embedded frame over an `InProcessHost`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use frame_bus::{
    BusConfig, BusError, Disposer, ErrorSink, FrameMessenger, HostEndpoint, InProcessHost,
    StaticFrame, SubscriptionRegistry, TracingErrorSink,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;

/// Token of the frame under test.
pub const TOKEN: &str = "123-123";
/// Token of some other pairing sharing the host.
pub const FOREIGN_TOKEN: &str = "1234-1234";

pub const PARENT_ORIGIN: &str = "https://publisher.example";
pub const FRAME_ORIGIN: &str = "https://frame.example";

/// Upper bound on waiting for a context to drain its inbox.
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(1);

/// Payload used throughout the suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub s: String,
}

/// Shared, append-only record of what listeners observed.
#[derive(Debug, Clone, Default)]
pub struct Trace(Arc<Mutex<String>>);

impl Trace {
    pub fn push(&self, s: &str) {
        self.0.lock().push_str(s);
    }

    pub fn get(&self) -> String {
        self.0.lock().clone()
    }
}

/// A parent and one attached frame.
pub struct Pairing {
    pub host: InProcessHost,
    pub registry: SubscriptionRegistry<Progress>,
    pub frame: StaticFrame,
    pub messenger: FrameMessenger<HostEndpoint>,
    pub trace: Trace,
    sent: AtomicU64,
}

impl Pairing {
    /// Must be called from within a tokio runtime.
    pub fn new() -> Self {
        Self::with_error_sink(Arc::new(TracingErrorSink))
    }

    pub fn with_error_sink(sink: Arc<dyn ErrorSink>) -> Self {
        frame_telemetry::init_test_logging();

        let host = InProcessHost::new();
        let registry = SubscriptionRegistry::with_error_sink(TOKEN, sink);
        let attached = host.attach(registry.clone(), FRAME_ORIGIN);

        let config = BusConfig::default();
        let frame =
            StaticFrame::new(attached.id).with_attribute(config.sentinel_attribute.clone(), TOKEN);
        let messenger = FrameMessenger::new(host.endpoint(PARENT_ORIGIN), config);

        Self {
            host,
            registry,
            frame,
            messenger,
            trace: Trace::default(),
            sent: AtomicU64::new(0),
        }
    }

    /// Subscribe a listener that appends each payload's `s` to the shared trace.
    pub fn listen(&self, kind: &str) -> Disposer<Progress> {
        let trace = self.trace.clone();
        self.registry
            .subscribe(kind, move |payload: &Progress| trace.push(&payload.s))
    }

    /// Post `{s}` from the parent into the frame.
    pub fn post(&self, token: &str, kind: &str, s: &str, opt_in: bool) -> Result<(), BusError> {
        let payload = Progress { s: s.to_string() };
        self.send(token, kind, &payload, opt_in)
    }

    /// Post an arbitrary payload from the parent into the frame.
    pub fn send<P: Serialize + ?Sized>(
        &self,
        token: &str,
        kind: &str,
        payload: &P,
        opt_in: bool,
    ) -> Result<(), BusError> {
        self.messenger
            .post(&self.frame, token, kind, payload, opt_in)?;
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Post `{s}` using the token stored on the frame element.
    pub fn post_to_frame(&self, kind: &str, s: &str) -> Result<(), BusError> {
        let payload = Progress { s: s.to_string() };
        self.messenger.post_to_frame(&self.frame, kind, &payload)?;
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Wait until the frame has handled every message posted so far.
    pub async fn settle(&self) {
        let expected = self.sent.load(Ordering::SeqCst);
        timeout(SETTLE_TIMEOUT, async {
            while self.registry.stats().processed() < expected {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("frame context did not drain its inbox");
    }
}
