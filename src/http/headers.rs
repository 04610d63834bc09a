//! Projection of limit decisions onto HTTP response headers.

use crate::ratelimit::Decision;

/// Requests left in the current window.
pub const REMAINING_HEADER: &str = "X-RateLimit-Remaining";
/// End of the current window in epoch seconds.
pub const RESET_HEADER: &str = "X-RateLimit-Reset";
/// Seconds the client should wait before retrying; only sent with a 429.
pub const RETRY_AFTER_HEADER: &str = "Retry-After";

/// Header values derived from a [`Decision`].
///
/// A pure projection: building one has no side effects and touches no state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitHeaders {
    /// Value for [`REMAINING_HEADER`]
    pub remaining: String,
    /// Value for [`RESET_HEADER`], epoch seconds
    pub reset: String,
    /// Value for [`RETRY_AFTER_HEADER`]; present only on denial
    pub retry_after: Option<String>,
}

impl RateLimitHeaders {
    /// Project a decision into header values.
    pub fn from_decision(decision: &Decision) -> Self {
        Self {
            remaining: decision.remaining.to_string(),
            reset: (decision.reset_time / 1000).to_string(),
            retry_after: decision.retry_after.map(|secs| secs.to_string()),
        }
    }

    /// Name/value pairs in the order they should be attached to a response.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            (REMAINING_HEADER, self.remaining.clone()),
            (RESET_HEADER, self.reset.clone()),
        ];
        if let Some(ref retry) = self.retry_after {
            pairs.push((RETRY_AFTER_HEADER, retry.clone()));
        }
        pairs
    }
}

impl From<&Decision> for RateLimitHeaders {
    fn from(decision: &Decision) -> Self {
        Self::from_decision(decision)
    }
}
