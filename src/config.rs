//! Push connection configuration.

use std::time::Duration;

use crate::stream::DEFAULT_EVENT_BUFFER;

/// Default push server used when none is configured.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:9000";

/// Path of the server's event stream endpoint.
pub const EVENTS_PATH: &str = "/api/push/events";

/// Configuration for opening a push connection.
///
/// # Example
///
/// ```ignore
/// use pushstream::PushConfig;
///
/// let config = PushConfig::new()
///     .with_server_url("https://sonar.example.com")
///     .with_project_keys(["projectKey1", "projectKey2"])
///     .with_languages(["java", "js"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushConfig {
    /// Base URL of the server (default: http://localhost:9000)
    pub server_url: String,
    /// Projects to subscribe to
    pub project_keys: Vec<String>,
    /// Languages to subscribe to
    pub languages: Vec<String>,
    /// Capacity of the decoded event queue
    pub event_buffer: usize,
    /// Timeout for establishing the connection
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            project_keys: Vec::new(),
            languages: Vec::new(),
            event_buffer: DEFAULT_EVENT_BUFFER,
            connect_timeout: Duration::from_secs(30),
            user_agent: format!("pushstream/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl PushConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    pub fn with_project_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.project_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_languages<I, L>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Set the decoded event queue capacity (at least 1).
    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity.max(1);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Full URL of the event stream endpoint, with subscription parameters.
    pub fn events_url(&self) -> String {
        let mut url = format!("{}{}", self.server_url.trim_end_matches('/'), EVENTS_PATH);

        let params: Vec<String> = [
            ("projectKeys", &self.project_keys),
            ("languages", &self.languages),
        ]
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(name, values)| format!("{}={}", name, encode_list(values)))
        .collect();

        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }
        url
    }
}

fn encode_list(values: &[String]) -> String {
    values
        .iter()
        .map(|value| urlencoding::encode(value).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}
