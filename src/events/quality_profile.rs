//! Quality profile (rule set) change event

use serde::Serialize;

use super::common::{optional_enum, required, IssueSeverity};
use super::payloads::{ActivatedRulePayload, RuleParamPayload, RuleSetChangedPayload};
use crate::error::DecodeError;

/// Parameter override of an activated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleParam {
    pub key: String,
    pub value: String,
}

impl TryFrom<RuleParamPayload> for RuleParam {
    type Error = DecodeError;

    fn try_from(payload: RuleParamPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            key: required(payload.key, "params.key")?,
            value: required(payload.value, "params.value")?,
        })
    }
}

/// Rule newly activated (or re-configured) in a quality profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivatedRule {
    pub key: String,
    pub language: String,
    pub severity: Option<IssueSeverity>,
    pub params: Vec<RuleParam>,
}

impl TryFrom<ActivatedRulePayload> for ActivatedRule {
    type Error = DecodeError;

    fn try_from(payload: ActivatedRulePayload) -> Result<Self, Self::Error> {
        Ok(Self {
            key: required(payload.key, "activatedRules.key")?,
            language: required(payload.language, "activatedRules.language")?,
            severity: optional_enum(payload.severity, "activatedRules.severity")?,
            params: payload
                .params
                .into_iter()
                .map(RuleParam::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

/// The quality profile bound to one or more projects changed.
///
/// Bound to the `RuleSetChanged` wire type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityProfileChangedEvent {
    projects: Vec<String>,
    activated_rules: Vec<ActivatedRule>,
    deactivated_rules: Vec<String>,
}

impl QualityProfileChangedEvent {
    pub fn new(projects: Vec<String>) -> Self {
        Self {
            projects,
            activated_rules: Vec::new(),
            deactivated_rules: Vec::new(),
        }
    }

    /// Project keys whose profile changed.
    pub fn projects(&self) -> &[String] {
        &self.projects
    }

    pub fn activated_rules(&self) -> &[ActivatedRule] {
        &self.activated_rules
    }

    pub fn deactivated_rules(&self) -> &[String] {
        &self.deactivated_rules
    }
}

impl TryFrom<RuleSetChangedPayload> for QualityProfileChangedEvent {
    type Error = DecodeError;

    fn try_from(payload: RuleSetChangedPayload) -> Result<Self, Self::Error> {
        let projects = required(payload.projects, "projects")?;
        let activated_rules = payload
            .activated_rules
            .into_iter()
            .map(ActivatedRule::try_from)
            .collect::<Result<Vec<_>, DecodeError>>()
            .map_err(|err| err.in_project(projects.first().map(String::as_str)))?;

        Ok(Self {
            projects,
            activated_rules,
            deactivated_rules: payload.deactivated_rules,
        })
    }
}
