//! # Correlation Token
//!
//! The cooperative identifier that pairs a receiving context with the frames
//! allowed to talk to it. It is a correlation id, not a secret.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque per-context token, fixed for the lifetime of the context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationToken(String);

impl CorrelationToken {
    /// Wrap an externally established token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Create a fresh `"<n>-<n>"` token for a newly created context.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self(format!("{}-{}", rng.gen::<u32>(), rng.gen::<u32>()))
    }

    /// Borrow the raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `other` carries the same token.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Display for CorrelationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CorrelationToken {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CorrelationToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}
