//! Error types for the floodgate library.
//!
//! Limit checks themselves cannot fail: denial is an ordinary
//! [`crate::ratelimit::Decision`]. Errors only arise around the edges,
//! loading policy configuration in particular.

use thiserror::Error;

/// Main error type for floodgate operations.
#[derive(Error, Debug)]
pub enum FloodgateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for floodgate operations.
pub type Result<T> = std::result::Result<T, FloodgateError>;
