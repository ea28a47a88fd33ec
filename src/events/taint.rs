//! Taint vulnerability events

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use super::common::{optional_enum, required, IssueSeverity, IssueType};
use super::payloads::{
    FlowPayload, LocationPayload, TaintVulnerabilityClosedPayload, TaintVulnerabilityRaisedPayload,
    TextRangePayload,
};
use crate::error::DecodeError;

/// Line/offset range inside a file, with the hash of the covered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRange {
    pub start_line: u32,
    pub start_line_offset: u32,
    pub end_line: u32,
    pub end_line_offset: u32,
    pub hash: String,
}

impl TryFrom<TextRangePayload> for TextRange {
    type Error = DecodeError;

    fn try_from(payload: TextRangePayload) -> Result<Self, Self::Error> {
        Ok(Self {
            start_line: required(payload.start_line, "startLine")?,
            start_line_offset: required(payload.start_line_offset, "startLineOffset")?,
            end_line: required(payload.end_line, "endLine")?,
            end_line_offset: required(payload.end_line_offset, "endLineOffset")?,
            hash: required(payload.hash, "hash")?,
        })
    }
}

/// A location in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub file_path: String,
    pub message: String,
    pub text_range: TextRange,
}

impl TryFrom<LocationPayload> for Location {
    type Error = DecodeError;

    fn try_from(payload: LocationPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            file_path: required(payload.file_path, "filePath")?,
            message: required(payload.message, "message")?,
            text_range: required(payload.text_range, "textRange")?.try_into()?,
        })
    }
}

/// Secondary path of locations leading to the vulnerability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flow {
    pub locations: Vec<Location>,
}

impl TryFrom<FlowPayload> for Flow {
    type Error = DecodeError;

    fn try_from(payload: FlowPayload) -> Result<Self, Self::Error> {
        let locations = payload
            .locations
            .into_iter()
            .map(Location::try_from)
            .collect::<Result<_, _>>()?;
        Ok(Self { locations })
    }
}

/// A taint vulnerability was raised (or reopened) on a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaintVulnerabilityRaisedEvent {
    key: String,
    project_key: String,
    branch: String,
    creation_date: Option<DateTime<Utc>>,
    rule_key: String,
    severity: IssueSeverity,
    issue_type: IssueType,
    main_location: Location,
    flows: Vec<Flow>,
    rule_description_context_key: Option<String>,
}

impl TaintVulnerabilityRaisedEvent {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn creation_date(&self) -> Option<DateTime<Utc>> {
        self.creation_date
    }

    pub fn rule_key(&self) -> &str {
        &self.rule_key
    }

    pub fn severity(&self) -> IssueSeverity {
        self.severity
    }

    pub fn issue_type(&self) -> IssueType {
        self.issue_type
    }

    pub fn main_location(&self) -> &Location {
        &self.main_location
    }

    pub fn flows(&self) -> &[Flow] {
        &self.flows
    }

    pub fn rule_description_context_key(&self) -> Option<&str> {
        self.rule_description_context_key.as_deref()
    }
}

fn parse_creation_date(millis: Option<i64>) -> Result<Option<DateTime<Utc>>, DecodeError> {
    millis
        .map(|ms| {
            Utc.timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| DecodeError::InvalidField {
                    field: "creationDate",
                    message: format!("timestamp {} out of range", ms),
                })
        })
        .transpose()
}

impl TryFrom<TaintVulnerabilityRaisedPayload> for TaintVulnerabilityRaisedEvent {
    type Error = DecodeError;

    fn try_from(payload: TaintVulnerabilityRaisedPayload) -> Result<Self, Self::Error> {
        let project_key = payload.project_key.clone();

        let build = || -> Result<Self, DecodeError> {
            let severity = optional_enum(payload.severity, "severity")?;
            let issue_type = optional_enum(payload.issue_type, "type")?;

            Ok(Self {
                key: required(payload.key, "key")?,
                project_key: required(payload.project_key, "projectKey")?,
                branch: required(payload.branch, "branch")?,
                creation_date: parse_creation_date(payload.creation_date)?,
                rule_key: required(payload.rule_key, "ruleKey")?,
                severity: required(severity, "severity")?,
                issue_type: required(issue_type, "type")?,
                main_location: required(payload.main_location, "mainLocation")?.try_into()?,
                flows: payload
                    .flows
                    .unwrap_or_default()
                    .into_iter()
                    .map(Flow::try_from)
                    .collect::<Result<_, _>>()?,
                rule_description_context_key: payload.rule_description_context_key,
            })
        };

        build().map_err(|err| err.in_project(project_key.as_deref()))
    }
}

/// A taint vulnerability was closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaintVulnerabilityClosedEvent {
    project_key: String,
    key: String,
}

impl TaintVulnerabilityClosedEvent {
    pub fn new(project_key: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            key: key.into(),
        }
    }

    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl TryFrom<TaintVulnerabilityClosedPayload> for TaintVulnerabilityClosedEvent {
    type Error = DecodeError;

    fn try_from(payload: TaintVulnerabilityClosedPayload) -> Result<Self, Self::Error> {
        let project_key = required(payload.project_key, "projectKey")?;
        let key = required(payload.key, "key").map_err(|e| e.in_project(Some(&project_key)))?;
        Ok(Self { project_key, key })
    }
}
