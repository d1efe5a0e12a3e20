//! Bus configuration from environment variables.

use std::env;

/// Default attribute on a frame element holding its correlation token.
pub const DEFAULT_SENTINEL_ATTRIBUTE: &str = "data-frame-sentinel";

/// Sending-side settings shared by a parent and its frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    /// Frame attribute the messenger reads the correlation token from.
    pub sentinel_attribute: String,

    /// Target origin policy stamped on every outbound send (`*` = any).
    pub target_origin: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            sentinel_attribute: DEFAULT_SENTINEL_ATTRIBUTE.to_string(),
            target_origin: crate::transport::ANY_ORIGIN.to_string(),
        }
    }
}

impl BusConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `FB_SENTINEL_ATTRIBUTE`: Frame token attribute (default: data-frame-sentinel)
    /// - `FB_TARGET_ORIGIN`: Target origin policy (default: *)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            sentinel_attribute: env::var("FB_SENTINEL_ATTRIBUTE")
                .unwrap_or(defaults.sentinel_attribute),

            target_origin: env::var("FB_TARGET_ORIGIN").unwrap_or(defaults.target_origin),
        }
    }

    /// Restrict outbound messages to one receiving origin.
    #[must_use]
    pub fn with_target_origin(mut self, origin: impl Into<String>) -> Self {
        self.target_origin = origin.into();
        self
    }
}
