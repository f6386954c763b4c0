//! Client configuration with validation.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::time::Duration;

use super::request::DEFAULT_USER_AGENT;
use crate::error::ClientError;

/// Separator between the path segments of a test runner label.
const RUNNER_LABEL_SEPARATOR: &str = "::";

/// Test case name sent as `X-Test-Case` so server logs can be correlated
/// with the scenario that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestCaseTag(String);

impl TestCaseTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Keeps only the last segment of a runner label such as
    /// `"suite::module::test_name"`.
    pub fn from_runner_label(label: &str) -> Self {
        let name = label
            .rsplit(RUNNER_LABEL_SEPARATOR)
            .next()
            .unwrap_or(label);
        Self(name.to_string())
    }

    /// Derives the tag from the current thread name.
    ///
    /// The libtest harness names each test thread after the test path, so this
    /// yields the test function name under `cargo test`. Returns `None` on
    /// unnamed threads and on the main thread.
    pub fn from_current_thread() -> Option<Self> {
        let thread = std::thread::current();
        match thread.name() {
            Some("main") | None => None,
            Some(label) => Some(Self::from_runner_label(label)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestCaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Name attached to every log record of this client
    pub name: String,
    /// Base URL of the miniwallet server
    pub server_url: String,
    /// Treat a missing events endpoint as expected (suppresses error logs)
    pub events_api_is_optional: bool,
    /// Sent as `X-Test-Case` when set
    pub test_case: Option<TestCaseTag>,
    pub user_agent: String,
    /// Lower-case the full request URL before dispatch
    pub lowercase_urls: bool,
    /// Per-request timeout handed to the transport (none by default)
    pub request_timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: "miniwallet-client".to_string(),
            server_url: "http://localhost:8888".to_string(),
            events_api_is_optional: false,
            test_case: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            lowercase_urls: true,
            request_timeout_ms: None,
        }
    }
}

impl ClientConfig {
    pub fn new(name: impl Into<String>, server_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            server_url: server_url.into(),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MINIWALLET_CLIENT_NAME`: Client name (default: miniwallet-client)
    /// - `MINIWALLET_SERVER_URL`: Server base URL (default: http://localhost:8888)
    /// - `MINIWALLET_EVENTS_API_OPTIONAL`: Events endpoint optional (default: false)
    /// - `MINIWALLET_TEST_CASE`: Runner label used for `X-Test-Case` (default: unset)
    /// - `MINIWALLET_REQUEST_TIMEOUT_MS`: Request timeout (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            name: env::var("MINIWALLET_CLIENT_NAME").unwrap_or(defaults.name),

            server_url: env::var("MINIWALLET_SERVER_URL").unwrap_or(defaults.server_url),

            events_api_is_optional: env::var("MINIWALLET_EVENTS_API_OPTIONAL")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),

            test_case: env::var("MINIWALLET_TEST_CASE")
                .ok()
                .filter(|v| !v.is_empty())
                .map(|v| TestCaseTag::from_runner_label(&v)),

            user_agent: defaults.user_agent,

            lowercase_urls: defaults.lowercase_urls,

            request_timeout_ms: env::var("MINIWALLET_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_events_api_optional(mut self, optional: bool) -> Self {
        self.events_api_is_optional = optional;
        self
    }

    pub fn with_test_case(mut self, test_case: TestCaseTag) -> Self {
        self.test_case = Some(test_case);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn with_lowercase_urls(mut self, lowercase: bool) -> Self {
        self.lowercase_urls = lowercase;
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.server_url.trim().is_empty() {
            return Err(ClientError::InvalidConfig(
                "server_url cannot be empty".into(),
            ));
        }

        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(ClientError::InvalidConfig(format!(
                "server_url must be an http(s) URL, got {}",
                self.server_url
            )));
        }

        if self.user_agent.is_empty() {
            return Err(ClientError::InvalidConfig(
                "user_agent cannot be empty".into(),
            ));
        }

        if self.request_timeout_ms == Some(0) {
            return Err(ClientError::InvalidConfig(
                "request_timeout_ms cannot be 0".into(),
            ));
        }

        Ok(())
    }
}
