//! reqwest-backed sessions.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::{HttpMethod, HttpRequest, HttpResponse};
use crate::error::ClientError;
use crate::ports::{HttpSession, SessionFactory};

/// Opens a dedicated `reqwest::Client` per session. Idle connections are not
/// kept, so dropping the session releases everything it opened.
#[derive(Debug, Clone, Default)]
pub struct ReqwestSessionFactory {
    timeout: Option<Duration>,
}

impl ReqwestSessionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl SessionFactory for ReqwestSessionFactory {
    fn open(&self) -> Result<Box<dyn HttpSession>, ClientError> {
        let mut builder = Client::builder().pool_max_idle_per_host(0);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Box::new(ReqwestSession { client }))
    }
}

struct ReqwestSession {
    client: Client,
}

fn network_error(request: &HttpRequest, err: reqwest::Error) -> ClientError {
    let message = if err.is_connect() {
        format!("Cannot connect to {}: {}", request.url, err)
    } else if err.is_timeout() {
        format!("Request to {} timed out", request.url)
    } else {
        err.to_string()
    };

    ClientError::Network {
        method: request.method,
        path: request.url.clone(),
        message,
    }
}

#[async_trait]
impl HttpSession for ReqwestSession {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| network_error(&request, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| network_error(&request, e))?;

        Ok(HttpResponse { status, body })
    }
}
