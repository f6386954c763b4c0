//! Error types for the miniwallet client

use thiserror::Error;

use crate::domain::HttpMethod;

/// Status codes a server answers with when it does not implement an endpoint.
const UNIMPLEMENTED_STATUSES: [u16; 3] = [404, 405, 501];

/// Errors surfaced by the transport contract and the resources built on it.
///
/// `Network`, `Status` and `Decode` are transport-class failures: every one of
/// them carries the method and path of the call so a failed exchange can be
/// reproduced by hand.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The request never produced a response (connect, TLS, timeout, ...).
    #[error("{method} {path} failed: {message}")]
    Network {
        method: HttpMethod,
        path: String,
        message: String,
    },

    /// The server answered with a status code >= 300.
    #[error("{method} {path} returned {status}\n{body}")]
    Status {
        method: HttpMethod,
        path: String,
        status: u16,
        body: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("{method} {path}: failed to decode response ({message})\n{body}")]
    Decode {
        method: HttpMethod,
        path: String,
        body: String,
        message: String,
    },

    /// A request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// HTTP status of the failed exchange, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body attached to the failure.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } | Self::Decode { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn method(&self) -> Option<HttpMethod> {
        match self {
            Self::Network { method, .. }
            | Self::Status { method, .. }
            | Self::Decode { method, .. } => Some(*method),
            _ => None,
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Network { path, .. } | Self::Status { path, .. } | Self::Decode { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }

    /// True for failures of the exchange itself (network, status, decode).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Status { .. } | Self::Decode { .. }
        )
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// A status failure meaning the server has no such endpoint.
    pub fn is_endpoint_unimplemented(&self) -> bool {
        self.status()
            .is_some_and(|status| UNIMPLEMENTED_STATUSES.contains(&status))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(err.to_string())
    }
}
