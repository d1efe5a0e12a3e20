//! # Integration Tests
//!
//! A parent context embeds a frame whose registry is attached to an
//! `InProcessHost`; messages travel through the host exactly as they would
//! between real contexts, so delivery is asynchronous.

pub mod harness;

#[cfg(test)]
mod scenarios;
