//! # Frame-Bus Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/         # Parent and frame contexts wired through InProcessHost
//!     ├── harness.rs       # Shared fixtures (frame, messenger, trace recorder)
//!     ├── scenarios.rs     # Delivery, fan-out and disposal scenarios
//!     └── containment.rs   # Token isolation and listener failure containment
//!
//! tests/benches/
//! └── dispatch_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p frame-tests
//!
//! # By category
//! cargo test -p frame-tests integration::scenarios::
//! cargo test -p frame-tests integration::containment::
//!
//! # Benchmarks
//! cargo bench -p frame-tests
//! ```

pub mod integration;
