//! # Frame-Bus Dispatch Benchmarks
//!
//! | Path | Target |
//! |------|--------|
//! | Envelope decode | < 1µs |
//! | Silent discard (token mismatch) | < 1µs |
//! | Fan-out to N listeners | linear in N |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use frame_bus::{RawNotification, SubscriptionRegistry};
use frame_types::{decode, encode};
use serde_json::{json, Value};
use std::time::Duration;

const TOKEN: &str = "123-123";

fn notification(token: &str, kind: &str) -> RawNotification {
    let wire = encode(token, kind, &json!({"s": "a", "n": 42}), true).unwrap_or(Value::Null);
    RawNotification::new(wire, "https://frame.example")
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelope-codec");
    group.measurement_time(Duration::from_secs(5));

    let payload = json!({"s": "a", "n": 42});
    group.bench_function("encode_opt_in", |b| {
        b.iter(|| black_box(encode(TOKEN, "test", &payload, true)))
    });

    let wire = notification(TOKEN, "test").data;
    group.bench_function("decode", |b| b.iter(|| black_box(decode(&wire))));

    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry-dispatch");
    group.measurement_time(Duration::from_secs(5));

    let registry = SubscriptionRegistry::<Value>::new(TOKEN);
    let _sub = registry.subscribe("test", |_| {});
    let foreign = notification("1234-1234", "test");
    group.bench_function("discard_token_mismatch", |b| {
        b.iter(|| black_box(registry.on_raw_message(&foreign)))
    });

    for listeners in [1usize, 10, 100] {
        let registry = SubscriptionRegistry::<Value>::new(TOKEN);
        for _ in 0..listeners {
            let _ = registry.subscribe("test", |payload: &Value| {
                black_box(payload);
            });
        }
        let message = notification(TOKEN, "test");

        group.throughput(Throughput::Elements(listeners as u64));
        group.bench_with_input(
            BenchmarkId::new("fan_out", listeners),
            &message,
            |b, message| b.iter(|| black_box(registry.on_raw_message(message))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_codec, bench_dispatch);
criterion_main!(benches);
