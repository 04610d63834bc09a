//! HTTP-facing helpers around the limiter.
//!
//! The limiter itself has no transport interface; these helpers cover the two
//! edges route handlers need: deriving an identifier from proxy headers and
//! turning a [`crate::ratelimit::Decision`] into response headers.

mod headers;
mod identity;

pub use headers::{RateLimitHeaders, REMAINING_HEADER, RESET_HEADER, RETRY_AFTER_HEADER};
pub use identity::{client_identifier, ForwardHeaders, UNKNOWN_CLIENT};
