//! Error types for the poll-stream crate.

use thiserror::Error;

/// Errors that can occur in the polling event stream itself.
///
/// Fetch failures are *not* represented here; they are relayed to
/// subscribers as [`PollError`] payloads on the error channel and never
/// surface through the stream's own API.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Invalid configuration provided
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Convenience type alias for Results using StreamError.
pub type Result<T> = std::result::Result<T, StreamError>;

/// An opaque failure produced by a poll source.
///
/// The stream inspects nothing about the failure; it is carried verbatim
/// from the source's `poll` call to the error event channel.
#[derive(Debug, Error)]
#[error("poll source failed: {0}")]
pub struct PollError(Box<dyn std::error::Error + Send + Sync>);

impl PollError {
    /// Wrap an arbitrary error value.
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(err.into())
    }

    /// Create a poll error from a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self(message.into().into())
    }

    /// Borrow the wrapped error value.
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync) {
        self.0.as_ref()
    }
}
