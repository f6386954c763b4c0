//! In-memory sessions answering from a fixed route table.
//!
//! Used to drive the client without a server: every request is recorded, and
//! open/closed session counts let callers check that each call released its
//! session.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{HttpMethod, HttpRequest, HttpResponse};
use crate::error::ClientError;
use crate::ports::{HttpSession, SessionFactory};

/// What a route answers with.
#[derive(Debug, Clone)]
pub enum CannedReply {
    Response(HttpResponse),
    /// The exchange fails before any response arrives.
    NetworkFailure(String),
}

#[derive(Default)]
struct Shared {
    routes: Mutex<HashMap<(HttpMethod, String), CannedReply>>,
    requests: Mutex<Vec<HttpRequest>>,
    open_failure: Mutex<Option<String>>,
    opened: AtomicUsize,
    closed: AtomicUsize,
}

/// Session factory whose sessions answer from a shared route table.
/// Unknown routes answer `404`.
#[derive(Clone, Default)]
pub struct CannedSessionFactory {
    shared: Arc<Shared>,
}

impl CannedSessionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with `status` and `body`.
    pub fn route(
        self,
        method: HttpMethod,
        path: &str,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        self.reply(method, path, CannedReply::Response(HttpResponse::new(status, body)))
    }

    pub fn reply(self, method: HttpMethod, path: &str, reply: CannedReply) -> Self {
        self.shared
            .routes
            .lock()
            .insert((method, path.to_lowercase()), reply);
        self
    }

    /// Every later `open` fails with `message` and no session is created.
    pub fn fail_open(self, message: impl Into<String>) -> Self {
        *self.shared.open_failure.lock() = Some(message.into());
        self
    }

    /// Requests seen so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.shared.requests.lock().clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.shared.requests.lock().last().cloned()
    }

    pub fn sessions_opened(&self) -> usize {
        self.shared.opened.load(Ordering::SeqCst)
    }

    pub fn sessions_closed(&self) -> usize {
        self.shared.closed.load(Ordering::SeqCst)
    }
}

impl SessionFactory for CannedSessionFactory {
    fn open(&self) -> Result<Box<dyn HttpSession>, ClientError> {
        if let Some(message) = self.shared.open_failure.lock().clone() {
            return Err(ClientError::InvalidConfig(message));
        }
        self.shared.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CannedSession {
            shared: Arc::clone(&self.shared),
        }))
    }
}

struct CannedSession {
    shared: Arc<Shared>,
}

impl Drop for CannedSession {
    fn drop(&mut self) {
        self.shared.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Path component of an absolute URL (`http://host:1/a/b` -> `/a/b`).
fn url_path(url: &str) -> &str {
    let after_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    after_scheme
        .find('/')
        .map_or("/", |index| &after_scheme[index..])
}

#[async_trait]
impl HttpSession for CannedSession {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let key = (request.method, url_path(&request.url).to_lowercase());
        self.shared.requests.lock().push(request.clone());

        let reply = self.shared.routes.lock().get(&key).cloned();
        match reply {
            Some(CannedReply::Response(response)) => Ok(response),
            Some(CannedReply::NetworkFailure(message)) => Err(ClientError::Network {
                method: request.method,
                path: request.url,
                message,
            }),
            None => Ok(HttpResponse::new(404, "404: Not Found")),
        }
    }
}
