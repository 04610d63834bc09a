//! Rate limit policies and key derivation.

use std::time::Duration;

/// An immutable rate limit policy.
///
/// A policy pairs a fixed time window with a request cap and a key namespace.
/// The namespace prefixes every derived storage key so that policies sharing
/// raw identifiers (an IP address used for both API and download limits, say)
/// never collide in a shared store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    /// Key namespace, prepended to every identifier
    prefix: String,
    /// Duration of the fixed window
    window: Duration,
    /// Maximum requests allowed in one window (should be at least 1)
    max_requests: u32,
}

impl Policy {
    /// Create a new policy.
    pub fn new(prefix: impl Into<String>, window: Duration, max_requests: u32) -> Self {
        Self {
            prefix: prefix.into(),
            window,
            max_requests,
        }
    }

    /// General API traffic: 1000 requests per hour.
    pub fn general_api() -> Self {
        Self::new("api", Duration::from_secs(3600), 1000)
    }

    /// Query endpoints: 500 requests per hour.
    pub fn query_api() -> Self {
        Self::new("query", Duration::from_secs(3600), 500)
    }

    /// Downloads per client: 10 per hour.
    pub fn download() -> Self {
        Self::new("download", Duration::from_secs(3600), 10)
    }

    /// Short-window download burst protection: 3 per 15 minutes.
    pub fn download_burst() -> Self {
        Self::new("download_burst", Duration::from_secs(900), 3)
    }

    /// Derive the namespaced storage key for a caller-supplied identifier.
    ///
    /// The identifier's semantic meaning (real client IP, API key, ...) is the
    /// caller's responsibility; any string, including the empty string, simply
    /// forms its own bucket.
    pub fn key_for(&self, identifier: &str) -> String {
        format!("{}:{}", self.prefix, identifier)
    }

    /// The key namespace for this policy.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The window duration.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// The window duration in milliseconds, saturating at `i64::MAX`.
    pub fn window_ms(&self) -> i64 {
        i64::try_from(self.window.as_millis()).unwrap_or(i64::MAX)
    }

    /// Maximum requests allowed in one window.
    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }
}
