//! Value types shared by several server events.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;

/// Unwrap a mandatory payload field or name it in the error.
pub(crate) fn required<T>(value: Option<T>, field: &'static str) -> Result<T, DecodeError> {
    value.ok_or_else(|| DecodeError::missing(field))
}

/// Parse an optional enum-valued field, reporting unknown values by field name.
pub(crate) fn optional_enum<T>(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<T>, DecodeError>
where
    T: FromStr<Err = String>,
{
    value
        .map(|raw| raw.parse().map_err(|message| DecodeError::InvalidField { field, message }))
        .transpose()
}

/// Issue severity as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueSeverity {
    Blocker,
    Critical,
    Major,
    Minor,
    Info,
}

impl FromStr for IssueSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BLOCKER" => Ok(IssueSeverity::Blocker),
            "CRITICAL" => Ok(IssueSeverity::Critical),
            "MAJOR" => Ok(IssueSeverity::Major),
            "MINOR" => Ok(IssueSeverity::Minor),
            "INFO" => Ok(IssueSeverity::Info),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IssueSeverity::Blocker => "BLOCKER",
            IssueSeverity::Critical => "CRITICAL",
            IssueSeverity::Major => "MAJOR",
            IssueSeverity::Minor => "MINOR",
            IssueSeverity::Info => "INFO",
        };
        f.write_str(name)
    }
}

/// Issue type as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    Bug,
    CodeSmell,
    Vulnerability,
    SecurityHotspot,
}

impl FromStr for IssueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUG" => Ok(IssueType::Bug),
            "CODE_SMELL" => Ok(IssueType::CodeSmell),
            "VULNERABILITY" => Ok(IssueType::Vulnerability),
            "SECURITY_HOTSPOT" => Ok(IssueType::SecurityHotspot),
            other => Err(format!("unknown issue type '{}'", other)),
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IssueType::Bug => "BUG",
            IssueType::CodeSmell => "CODE_SMELL",
            IssueType::Vulnerability => "VULNERABILITY",
            IssueType::SecurityHotspot => "SECURITY_HOTSPOT",
        };
        f.write_str(name)
    }
}
