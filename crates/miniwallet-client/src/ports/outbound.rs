//! Outbound Ports (Driven Ports)
//!
//! The transport contract opens one session per call through a
//! `SessionFactory` and drops it when the call ends, on success and on
//! failure alike. Implementations must not reuse connections across sessions.

use async_trait::async_trait;

use crate::domain::{HttpRequest, HttpResponse};
use crate::error::ClientError;

/// A short-lived HTTP session owning its own connection(s).
#[async_trait]
pub trait HttpSession: Send + Sync {
    /// Perform one exchange. Statuses >= 300 are NOT errors at this level; only
    /// failures to obtain a response are.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError>;
}

/// Creates a fresh session for every call.
pub trait SessionFactory: Send + Sync {
    fn open(&self) -> Result<Box<dyn HttpSession>, ClientError>;
}
