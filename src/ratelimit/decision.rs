//! Outcome of a rate limit check.

use serde::Serialize;

/// The result of checking one request against a policy.
///
/// Denial is a normal outcome, not an error: callers translate it into an
/// HTTP 429 with the appropriate headers. Serializable so handlers can embed
/// it in a JSON response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Requests left in the current window
    pub remaining: u32,
    /// End of the current window, milliseconds since the Unix epoch
    pub reset_time: i64,
    /// Seconds until the window resets; present only on denial
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}
