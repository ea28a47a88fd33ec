//! Transport-level errors raised by line sources.

use thiserror::Error;

/// Failure of the underlying line transport.
///
/// A transport error is fatal for the stream instance that observed it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Reading from the underlying reader failed.
    #[error("I/O error while reading event stream: {message}")]
    Io { message: String },

    /// The HTTP body stream reported an error.
    #[error("HTTP error while reading event stream: {message}")]
    Http { message: String },

    /// A line grew past the configured limit without a terminator.
    #[error("Event stream line exceeds {limit} bytes")]
    LineTooLong { limit: usize },
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::Io {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Http {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err: TransportError = io.into();
        assert_eq!(
            err,
            TransportError::Io {
                message: "reset".to_string()
            }
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            TransportError::LineTooLong { limit: 1024 }.to_string(),
            "Event stream line exceeds 1024 bytes"
        );
        assert_eq!(
            TransportError::Http {
                message: "body error".to_string()
            }
            .to_string(),
            "HTTP error while reading event stream: body error"
        );
    }
}
