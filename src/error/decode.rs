//! Payload decoding errors.
//!
//! These are expected on the hot path (servers send payloads the client does
//! not fully understand), so they are plain values: no backtraces, no boxing.

use thiserror::Error;

/// Reasons a raw event payload could not become a domain event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload is not valid JSON or does not have the expected shape.
    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },

    /// A mandatory field is absent or null.
    #[error("Missing mandatory field '{field}'")]
    MissingField {
        field: &'static str,
        project_key: Option<String>,
    },

    /// A field is present but its value cannot be interpreted.
    #[error("Invalid value for field '{field}': {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
}

impl DecodeError {
    /// Stable name of the error kind, used in log entries.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::MalformedPayload { .. } => "MalformedPayload",
            DecodeError::MissingField { .. } => "MissingField",
            DecodeError::InvalidField { .. } => "InvalidField",
        }
    }

    /// Name of the offending field, when the error concerns a single field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            DecodeError::MissingField { field, .. } | DecodeError::InvalidField { field, .. } => {
                Some(*field)
            }
            DecodeError::MalformedPayload { .. } => None,
        }
    }

    /// Project key carried by the payload, when it was known at failure time.
    pub fn project_key(&self) -> Option<&str> {
        match self {
            DecodeError::MissingField { project_key, .. } => project_key.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn missing(field: &'static str) -> Self {
        DecodeError::MissingField {
            field,
            project_key: None,
        }
    }

    /// Attach a project key to a `MissingField` error that has none yet.
    pub(crate) fn in_project(self, key: Option<&str>) -> Self {
        match self {
            DecodeError::MissingField {
                field,
                project_key: None,
            } => DecodeError::MissingField {
                field,
                project_key: key.map(str::to_string),
            },
            other => other,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::MalformedPayload {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(DecodeError::missing("key").kind(), "MissingField");
        assert_eq!(
            DecodeError::MalformedPayload {
                message: "eof".to_string()
            }
            .kind(),
            "MalformedPayload"
        );
        assert_eq!(
            DecodeError::InvalidField {
                field: "resolved",
                message: "not a boolean".to_string()
            }
            .kind(),
            "InvalidField"
        );
    }

    #[test]
    fn test_in_project_only_fills_missing_key() {
        let err = DecodeError::missing("branchName").in_project(Some("projectKey1"));
        assert_eq!(err.project_key(), Some("projectKey1"));
        assert_eq!(err.field(), Some("branchName"));

        let err = err.in_project(Some("other"));
        assert_eq!(err.project_key(), Some("projectKey1"));
    }

    #[test]
    fn test_from_serde_error() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: DecodeError = serde_err.into();
        assert_eq!(err.kind(), "MalformedPayload");
        assert!(err.field().is_none());
    }

    #[test]
    fn test_display_names_field() {
        assert_eq!(
            DecodeError::missing("branchName").to_string(),
            "Missing mandatory field 'branchName'"
        );
    }
}
