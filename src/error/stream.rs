//! Stream lifecycle error types.
//!
//! This module defines errors that are surfaced to callers of the event
//! stream and the HTTP client: fatal transport failures, rejected connection
//! attempts and lifecycle misuse.

use thiserror::Error;

use super::TransportError;

/// Stream-specific error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The underlying transport failed while reading.
    #[error("Event stream transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The server rejected the stream request.
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// The configured server URL cannot be used.
    #[error("Invalid event stream URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// `begin_listening` was called on a stream that is already listening.
    #[error("Event stream is already listening")]
    AlreadyStarted,

    /// The stream has been disposed.
    #[error("Event stream has been disposed")]
    Disposed,

    /// `begin_listening` was called outside a tokio runtime.
    #[error("Event stream requires a running tokio runtime")]
    NoRuntime,
}

impl StreamError {
    /// Check if this error is likely transient.
    ///
    /// Informational only: the stream never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            StreamError::Transport(TransportError::LineTooLong { .. }) => false,
            StreamError::Transport(_) => true,
            StreamError::ServerError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::Transport(_) => "E_STREAM_TRANSPORT",
            StreamError::ServerError { .. } => "E_STREAM_SERVER",
            StreamError::InvalidUrl { .. } => "E_STREAM_URL",
            StreamError::AlreadyStarted => "E_STREAM_STARTED",
            StreamError::Disposed => "E_STREAM_DISPOSED",
            StreamError::NoRuntime => "E_STREAM_RUNTIME",
        }
    }
}
