//! Wire fixtures for the push event stream.

#![allow(dead_code)]

/// One SSE block: `event:` line, `data:` line, blank terminator.
pub fn block(event_type: &str, data: &str) -> Vec<String> {
    vec![
        format!("event: {}", event_type),
        format!("data: {}", data),
        String::new(),
    ]
}

/// Render lines as an SSE body (`\n`-terminated).
pub fn body(lines: &[String]) -> String {
    lines.iter().map(|line| format!("{}\n", line)).collect()
}

pub const ISSUE_CHANGED: &str = r#"{"projectKey":"projectKey1","issues":[{"issueKey":"key1","branchName":"master"}],"resolved":"true"}"#;

pub const ISSUE_CHANGED_NO_BRANCH: &str =
    r#"{"projectKey":"projectKey1","issues":[{"issueKey":"key1"}],"resolved":"true"}"#;

pub const TAINT_CLOSED: &str = r#"{"projectKey":"projectKey1","key":"taintKey"}"#;

pub const RULE_SET_CHANGED: &str = r#"{"projects":["projectKey1","projectKey2"],"deactivatedRules":["java:S0001"]}"#;

/// A session mixing valid, unknown and malformed events.
///
/// Decodes to exactly three events: IssueChanged, TaintVulnerabilityClosed,
/// RuleSetChanged (in that order).
pub fn mixed_session() -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(": keep-alive".to_string());
    lines.extend(block("IssueChanged", ISSUE_CHANGED));
    lines.extend(block("SecurityHotspotChanged", "{}"));
    lines.extend(block("IssueChanged", ISSUE_CHANGED_NO_BRANCH));
    lines.push("id: 7".to_string());
    lines.extend(block("TaintVulnerabilityClosed", TAINT_CLOSED));
    lines.extend(block("TaintVulnerabilityRaised", "{not json"));
    lines.extend(block("RuleSetChanged", RULE_SET_CHANGED));
    lines.push("event: IssueChanged".to_string());
    lines.push(format!("data: {}", ISSUE_CHANGED));
    lines
}
