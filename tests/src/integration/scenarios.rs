//! # Delivery Scenarios
//!
//! Typed routing end to end: filter correctness, opt-out passthrough,
//! fan-out order and disposal.

use frame_bus::{BusError, DispatchOutcome};
use frame_types::EnvelopeError;
use serde_json::json;

use super::harness::{Pairing, Progress, FOREIGN_TOKEN, TOKEN};

#[tokio::test]
async fn test_receives_only_enveloped_paired_messages() {
    let pairing = Pairing::new();
    let _sub = pairing.listen("test");

    pairing.post(TOKEN, "test", "a", true).unwrap();
    pairing.post(TOKEN, "test", "b", false).unwrap();
    pairing.post(FOREIGN_TOKEN, "other", "c", true).unwrap();
    pairing.post(TOKEN, "test", "d", true).unwrap();
    pairing.settle().await;

    assert_eq!(pairing.trace.get(), "ad");
}

#[tokio::test]
async fn test_fans_out_across_subscriptions_and_types() {
    let pairing = Pairing::new();
    let _first = pairing.listen("test");
    let _second = pairing.listen("test");
    let _third = pairing.listen("test2");

    pairing.post(TOKEN, "test", "a", true).unwrap();
    pairing.post(TOKEN, "test2", "a", true).unwrap();
    pairing.post(TOKEN, "test2", "a", true).unwrap();
    pairing.post(TOKEN, "test", "b", false).unwrap();
    pairing.post(TOKEN, "other", "c", true).unwrap();
    pairing.post(TOKEN, "test2", "a", true).unwrap();
    pairing.post(TOKEN, "test", "d", true).unwrap();
    pairing.settle().await;

    assert_eq!(pairing.trace.get(), "aaaaadd");
}

#[tokio::test]
async fn test_supports_unlisten() {
    let pairing = Pairing::new();
    let unlisten0 = pairing.listen("test");
    let unlisten1 = pairing.listen("test");
    let unlisten2 = pairing.listen("test2");

    pairing.post(TOKEN, "test", "a", true).unwrap();
    pairing.settle().await;
    assert_eq!(pairing.trace.get(), "aa");

    unlisten0.dispose();
    pairing.post(TOKEN, "test2", "a", true).unwrap();
    pairing.post(TOKEN, "test2", "a", true).unwrap();
    pairing.post(TOKEN, "test", "b", true).unwrap();
    pairing.settle().await;

    unlisten2.dispose();
    unlisten1.dispose();
    pairing.post(TOKEN, "test2", "a", true).unwrap();
    pairing.post(TOKEN, "test", "d", true).unwrap();
    pairing.settle().await;

    assert_eq!(pairing.trace.get(), "aaaab");
    assert!(pairing.registry.kinds().is_empty());
}

#[tokio::test]
async fn test_disposing_twice_leaves_others_untouched() {
    let pairing = Pairing::new();
    let gone = pairing.listen("test");
    let _kept = pairing.listen("test");

    assert!(gone.dispose());
    assert!(!gone.dispose());

    pairing.post(TOKEN, "test", "x", true).unwrap();
    pairing.settle().await;

    assert_eq!(pairing.trace.get(), "x");
    assert_eq!(pairing.registry.subscription_count("test"), 1);
}

#[tokio::test]
async fn test_post_to_frame_uses_frame_sentinel() {
    let pairing = Pairing::new();
    let _sub = pairing.listen("resize");

    pairing.post_to_frame("resize", "r").unwrap();
    pairing.settle().await;

    assert_eq!(pairing.trace.get(), "r");
}

#[tokio::test]
async fn test_opted_out_envelope_lookalike_is_not_delivered() {
    let pairing = Pairing::new();
    let _sub = pairing.listen("test");

    // Exactly the shape of a paired "test" envelope, but sent opted out.
    let lookalike = json!({"token": TOKEN, "type": "test", "payload": {"s": "z"}});
    pairing.send(TOKEN, "test", &lookalike, false).unwrap();
    pairing.send(TOKEN, "test", &json!({"token": TOKEN, "s": "y"}), false).unwrap();
    pairing.post(TOKEN, "test", "a", true).unwrap();
    pairing.settle().await;

    assert_eq!(pairing.trace.get(), "a");
    let stats = pairing.registry.stats();
    assert_eq!(stats.discarded_malformed, 2);
    assert_eq!(stats.messages_delivered, 1);
}

#[tokio::test]
async fn test_opting_out_a_framed_envelope_is_refused() {
    let pairing = Pairing::new();
    let _sub = pairing.listen("test");

    let framed = pairing
        .messenger
        .frame_text(TOKEN, "test", &Progress { s: "z".into() })
        .unwrap();
    let err = pairing.send(TOKEN, "test", &framed, false).unwrap_err();
    pairing.settle().await;

    assert!(matches!(
        err,
        BusError::Envelope(EnvelopeError::ReservedPrefix { .. })
    ));
    assert!(pairing.trace.get().is_empty());
    assert_eq!(pairing.registry.stats().processed(), 0);
}

#[test]
fn test_direct_dispatch_without_host() {
    use frame_bus::{RawNotification, SubscriptionRegistry};
    use frame_types::encode;

    let registry = SubscriptionRegistry::<Progress>::new(TOKEN);
    let _sub = registry.subscribe("test", |_| {});

    let wire = encode(TOKEN, "test", &Progress { s: "a".into() }, true).unwrap();
    let outcome = registry.on_raw_message(&RawNotification::new(wire, "https://a.example"));

    assert_eq!(outcome, DispatchOutcome::Delivered { invoked: 1, failed: 0 });
}
