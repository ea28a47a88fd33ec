//! IssueChanged event

use serde::Serialize;

use super::common::{optional_enum, required, IssueSeverity, IssueType};
use super::payloads::{BoolOrString, BranchIssuePayload, IssueChangedPayload};
use crate::error::DecodeError;

/// Issue key scoped to the branch it lives on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchIssue {
    issue_key: String,
    branch_name: String,
}

impl BranchIssue {
    pub fn new(issue_key: impl Into<String>, branch_name: impl Into<String>) -> Self {
        Self {
            issue_key: issue_key.into(),
            branch_name: branch_name.into(),
        }
    }

    pub fn issue_key(&self) -> &str {
        &self.issue_key
    }

    pub fn branch_name(&self) -> &str {
        &self.branch_name
    }
}

impl TryFrom<BranchIssuePayload> for BranchIssue {
    type Error = DecodeError;

    fn try_from(payload: BranchIssuePayload) -> Result<Self, Self::Error> {
        Ok(Self {
            issue_key: required(payload.issue_key, "issueKey")?,
            branch_name: required(payload.branch_name, "branchName")?,
        })
    }
}

/// One or more issues were resolved, reopened or had their severity/type changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueChangedEvent {
    project_key: String,
    is_resolved: bool,
    issues: Vec<BranchIssue>,
    user_severity: Option<IssueSeverity>,
    user_type: Option<IssueType>,
}

impl IssueChangedEvent {
    pub fn new(project_key: impl Into<String>, is_resolved: bool, issues: Vec<BranchIssue>) -> Self {
        Self {
            project_key: project_key.into(),
            is_resolved,
            issues,
            user_severity: None,
            user_type: None,
        }
    }

    /// Set the severity chosen by a user on the server.
    pub fn with_user_severity(mut self, severity: IssueSeverity) -> Self {
        self.user_severity = Some(severity);
        self
    }

    /// Set the issue type chosen by a user on the server.
    pub fn with_user_type(mut self, issue_type: IssueType) -> Self {
        self.user_type = Some(issue_type);
        self
    }

    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    pub fn is_resolved(&self) -> bool {
        self.is_resolved
    }

    pub fn issues(&self) -> &[BranchIssue] {
        &self.issues
    }

    pub fn user_severity(&self) -> Option<IssueSeverity> {
        self.user_severity
    }

    pub fn user_type(&self) -> Option<IssueType> {
        self.user_type
    }
}

fn parse_resolved(value: Option<BoolOrString>) -> Result<bool, DecodeError> {
    match value {
        None => Ok(false),
        Some(BoolOrString::Bool(b)) => Ok(b),
        Some(BoolOrString::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(DecodeError::InvalidField {
                field: "resolved",
                message: format!("expected a boolean, got '{}'", text),
            }),
        },
    }
}

impl TryFrom<IssueChangedPayload> for IssueChangedEvent {
    type Error = DecodeError;

    fn try_from(payload: IssueChangedPayload) -> Result<Self, Self::Error> {
        let project_key = required(payload.project_key, "projectKey")?;

        let build = || -> Result<Self, DecodeError> {
            let issues = required(payload.issues, "issues")?
                .into_iter()
                .map(BranchIssue::try_from)
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Self {
                is_resolved: parse_resolved(payload.resolved)?,
                issues,
                user_severity: optional_enum(payload.user_severity, "userSeverity")?,
                user_type: optional_enum(payload.user_type, "userType")?,
                project_key: project_key.clone(),
            })
        };

        build().map_err(|err| err.in_project(Some(&project_key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Result<IssueChangedEvent, DecodeError> {
        let payload: IssueChangedPayload = serde_json::from_str(json)?;
        IssueChangedEvent::try_from(payload)
    }

    #[test]
    fn test_decode_full_payload() {
        let event = decode(
            r#"{"projectKey":"projectKey1","issues":[{"issueKey":"key1","branchName":"master"}],"resolved":"true"}"#,
        )
        .unwrap();

        assert_eq!(event.project_key(), "projectKey1");
        assert!(event.is_resolved());
        assert_eq!(event.issues(), &[BranchIssue::new("key1", "master")]);
        assert_eq!(event.user_severity(), None);
    }

    #[test]
    fn test_resolved_accepts_bool_and_defaults_to_false() {
        let event = decode(r#"{"projectKey":"p","issues":[],"resolved":false}"#).unwrap();
        assert!(!event.is_resolved());

        let event = decode(r#"{"projectKey":"p","issues":[],"resolved":true}"#).unwrap();
        assert!(event.is_resolved());

        let event = decode(r#"{"projectKey":"p","issues":[]}"#).unwrap();
        assert!(!event.is_resolved());
    }

    #[test]
    fn test_resolved_garbage_is_invalid() {
        let err = decode(r#"{"projectKey":"p","issues":[],"resolved":"maybe"}"#).unwrap_err();
        assert_eq!(err.kind(), "InvalidField");
        assert_eq!(err.field(), Some("resolved"));
    }

    #[test]
    fn test_user_severity_and_type() {
        let event = decode(
            r#"{"projectKey":"p","issues":[{"issueKey":"k","branchName":"b"}],"userSeverity":"CRITICAL","userType":"BUG"}"#,
        )
        .unwrap();
        assert_eq!(event.user_severity(), Some(IssueSeverity::Critical));
        assert_eq!(event.user_type(), Some(IssueType::Bug));
    }

    #[test]
    fn test_missing_branch_name_names_field_and_project() {
        let err = decode(r#"{"projectKey":"projectKey1","issues":[{"issueKey":"key1"}],"resolved":"true"}"#)
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingField {
                field: "branchName",
                project_key: Some("projectKey1".to_string()),
            }
        );
    }

    #[test]
    fn test_missing_project_key() {
        let err = decode(r#"{"issues":[]}"#).unwrap_err();
        assert_eq!(err.field(), Some("projectKey"));
        assert_eq!(err.project_key(), None);
    }

    #[test]
    fn test_null_issues_is_missing() {
        let err = decode(r#"{"projectKey":"p","issues":null}"#).unwrap_err();
        assert_eq!(err.field(), Some("issues"));
    }
}
