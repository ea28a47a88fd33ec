//! Wire payload deserialization structs
//!
//! Mandatory fields are still `Option` here so that a missing value can be
//! reported by name during validation instead of as an opaque serde error.

use serde::Deserialize;

/// `resolved` is sent either as a JSON boolean or as `"true"`/`"false"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum BoolOrString {
    Bool(bool),
    Text(String),
}

/// IssueChanged payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IssueChangedPayload {
    #[serde(default)]
    pub project_key: Option<String>,
    #[serde(default)]
    pub issues: Option<Vec<BranchIssuePayload>>,
    #[serde(default)]
    pub resolved: Option<BoolOrString>,
    #[serde(default)]
    pub user_severity: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
}

/// One `{issueKey, branchName}` entry of an IssueChanged payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BranchIssuePayload {
    #[serde(default)]
    pub issue_key: Option<String>,
    #[serde(default)]
    pub branch_name: Option<String>,
}

/// TaintVulnerabilityRaised payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TaintVulnerabilityRaisedPayload {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub project_key: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    /// Epoch milliseconds
    #[serde(default)]
    pub creation_date: Option<i64>,
    #[serde(default)]
    pub rule_key: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default, rename = "type")]
    pub issue_type: Option<String>,
    #[serde(default)]
    pub main_location: Option<LocationPayload>,
    #[serde(default)]
    pub flows: Option<Vec<FlowPayload>>,
    #[serde(default)]
    pub rule_description_context_key: Option<String>,
}

/// Location inside a taint vulnerability
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LocationPayload {
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub text_range: Option<TextRangePayload>,
}

/// Text range of a location
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TextRangePayload {
    #[serde(default)]
    pub start_line: Option<u32>,
    #[serde(default)]
    pub start_line_offset: Option<u32>,
    #[serde(default)]
    pub end_line: Option<u32>,
    #[serde(default)]
    pub end_line_offset: Option<u32>,
    #[serde(default)]
    pub hash: Option<String>,
}

/// Secondary flow of a taint vulnerability
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FlowPayload {
    #[serde(default)]
    pub locations: Vec<LocationPayload>,
}

/// TaintVulnerabilityClosed payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TaintVulnerabilityClosedPayload {
    #[serde(default)]
    pub project_key: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

/// RuleSetChanged payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RuleSetChangedPayload {
    #[serde(default)]
    pub projects: Option<Vec<String>>,
    #[serde(default)]
    pub activated_rules: Vec<ActivatedRulePayload>,
    #[serde(default)]
    pub deactivated_rules: Vec<String>,
}

/// Rule activated in a quality profile
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ActivatedRulePayload {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub params: Vec<RuleParamPayload>,
}

/// Rule parameter override
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RuleParamPayload {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}
