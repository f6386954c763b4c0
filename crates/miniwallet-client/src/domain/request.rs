//! Request/response values exchanged with the session port.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const USER_AGENT_HEADER: &str = "User-Agent";
pub const TEST_CASE_HEADER: &str = "X-Test-Case";

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("miniwallet-client-rust/", env!("CARGO_PKG_VERSION"));

/// Path suffix of the (optional) account events endpoint.
pub const EVENTS_PATH_SUFFIX: &str = "/events";

/// HTTP methods used by the miniwallet endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully prepared request: absolute URL, headers and serialized body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value with the given (case-insensitive) name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status code and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Anything at or above 300 is a failed exchange.
    pub fn is_success(&self) -> bool {
        self.status < 300
    }
}

/// Joins the base URL and a path with exactly one `/` between them.
///
/// With `lowercase` set the whole URL is lower-cased: the miniwallet server
/// matches paths case-insensitively, but any case-sensitive segment or query
/// value would be corrupted by it.
pub fn join_url(base: &str, path: &str, lowercase: bool) -> String {
    let url = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    if lowercase {
        url.to_lowercase()
    } else {
        url
    }
}

/// Whether the path targets an account events collection.
pub fn is_events_path(path: &str) -> bool {
    path.ends_with(EVENTS_PATH_SUFFIX)
}
