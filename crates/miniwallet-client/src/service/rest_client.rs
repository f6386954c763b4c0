//! Transport contract and client root.
//!
//! Every remote call goes through `RestClient::exchange`: one session, one
//! request, one classified response.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, Level};

use super::account::AccountResource;
use crate::adapters::ReqwestSessionFactory;
use crate::domain::entities::{CreatedResource, KycSample, NewAccount};
use crate::domain::request::{
    is_events_path, CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE, TEST_CASE_HEADER, USER_AGENT_HEADER,
};
use crate::domain::{join_url, render_body, ClientConfig, HttpMethod, HttpRequest};
use crate::error::ClientError;
use crate::ports::SessionFactory;

pub const ACCOUNTS_PATH: &str = "/accounts";
pub const KYC_SAMPLE_PATH: &str = "/kyc_sample";

/// Emit a record at a level chosen at runtime.
macro_rules! log_at {
    ($level:expr, $($arg:tt)+) => {{
        let level = $level;
        if level == Level::ERROR {
            tracing::error!($($arg)+)
        } else if level == Level::WARN {
            tracing::warn!($($arg)+)
        } else if level == Level::INFO {
            tracing::info!($($arg)+)
        } else if level == Level::DEBUG {
            tracing::debug!($($arg)+)
        } else {
            tracing::trace!($($arg)+)
        }
    }};
}

/// Level for the records describing a response (or its absence).
///
/// Failures log at ERROR, except on the events endpoint when it is declared
/// optional: servers that do not implement it would otherwise flood the logs.
pub fn response_log_level(status: Option<u16>, path: &str, events_api_is_optional: bool) -> Level {
    if events_api_is_optional && is_events_path(path) {
        return Level::DEBUG;
    }
    match status {
        Some(status) if status < 300 => Level::DEBUG,
        _ => Level::ERROR,
    }
}

/// Client for one miniwallet server.
///
/// Cheap to clone; clones share configuration and session factory. Account
/// resources keep a clone and never reconfigure it.
#[derive(Clone)]
pub struct RestClient {
    config: Arc<ClientConfig>,
    sessions: Arc<dyn SessionFactory>,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("name", &self.config.name)
            .field("server_url", &self.config.server_url)
            .finish()
    }
}

impl RestClient {
    /// Create a client talking HTTP through reqwest.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let sessions = ReqwestSessionFactory::with_timeout(config.request_timeout());
        Self::with_sessions(config, Arc::new(sessions))
    }

    /// Create a client with a custom session factory.
    pub fn with_sessions(
        config: ClientConfig,
        sessions: Arc<dyn SessionFactory>,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            sessions,
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // =========================================================================
    // Client root
    // =========================================================================

    /// `POST /accounts` with the non-empty fields of `new_account`.
    pub async fn create_account(
        &self,
        new_account: NewAccount,
    ) -> Result<AccountResource, ClientError> {
        let created: CreatedResource = self.create(ACCOUNTS_PATH, &new_account).await?;
        Ok(AccountResource::bind(
            self.clone(),
            created.id,
            new_account.kyc_data,
        ))
    }

    /// Identifier of a throwaway account, for tests that only need a valid
    /// payee.
    pub async fn random_account_identifier(&self) -> Result<String, ClientError> {
        let account = self.create_account(NewAccount::default()).await?;
        account.generate_account_identifier().await
    }

    pub async fn get_kyc_sample(&self) -> Result<KycSample, ClientError> {
        self.get(KYC_SAMPLE_PATH).await
    }

    // =========================================================================
    // Transport contract
    // =========================================================================

    /// POST `fields` as a JSON object and decode the response.
    ///
    /// Fields skipped by their `Serialize` impl are not sent; when nothing is
    /// left the request has no body.
    pub async fn create<B, T>(&self, path: &str, fields: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode_fields(fields)?;
        let text = self.exchange(HttpMethod::Post, path, body).await?;
        decode(HttpMethod::Post, path, &text)
    }

    /// GET and decode the response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let text = self.exchange(HttpMethod::Get, path, None).await?;
        decode(HttpMethod::Get, path, &text)
    }

    /// One exchange returning the decoded JSON body.
    pub async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ClientError> {
        let text = self.send_text(method, path, body).await?;
        decode(method, path, &text)
    }

    /// One exchange returning the raw body text.
    pub async fn send_text(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<String, ClientError> {
        let body = body.map(Value::to_string);
        self.exchange(method, path, body).await
    }

    async fn exchange(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<String, ClientError> {
        let name = self.config.name.as_str();
        let logged_body = body.as_deref().unwrap_or("");
        debug!(client = %name, "{} {}: {}", method, path, logged_body);

        let request = HttpRequest {
            method,
            url: join_url(&self.config.server_url, path, self.config.lowercase_urls),
            headers: self.headers(),
            body: body.clone(),
        };

        // The session lives for this block only, whatever the outcome.
        let outcome = match self.sessions.open() {
            Ok(session) => session.execute(request).await,
            Err(err) => Err(session_unavailable(err, method, path)),
        };

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                let err = relabel(err, method, path);
                let level = response_log_level(None, path, self.config.events_api_is_optional);
                log_at!(level, client = %name, "{} {}: {} - {}", method, path, logged_body, err);
                return Err(err);
            }
        };

        let level = response_log_level(
            Some(response.status),
            path,
            self.config.events_api_is_optional,
        );
        log_at!(
            level,
            client = %name,
            status = response.status,
            "{} {}: {} - {}",
            method,
            path,
            logged_body,
            response.status
        );
        log_at!(level, client = %name, "response body: \n{}", render_body(&response.body));

        if !response.is_success() {
            return Err(ClientError::Status {
                method,
                path: path.to_string(),
                status: response.status,
                body: response.body,
            });
        }

        Ok(response.body)
    }

    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            (CONTENT_TYPE_HEADER.to_string(), JSON_CONTENT_TYPE.to_string()),
            (USER_AGENT_HEADER.to_string(), self.config.user_agent.clone()),
        ];
        if let Some(test_case) = &self.config.test_case {
            headers.push((TEST_CASE_HEADER.to_string(), test_case.to_string()));
        }
        headers
    }
}

/// Serialized request body, or `None` for an empty object.
fn encode_fields<B: Serialize + ?Sized>(fields: &B) -> Result<Option<String>, ClientError> {
    let value = serde_json::to_value(fields)?;
    Ok(match &value {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        _ => Some(value.to_string()),
    })
}

fn decode<T: DeserializeOwned>(method: HttpMethod, path: &str, text: &str) -> Result<T, ClientError> {
    serde_json::from_str(text).map_err(|e| ClientError::Decode {
        method,
        path: path.to_string(),
        body: text.to_string(),
        message: e.to_string(),
    })
}

/// Sessions only know the URL; report the logical path like every other
/// failure.
/// A session that cannot be opened fails the call like a broken connection.
fn session_unavailable(err: ClientError, method: HttpMethod, path: &str) -> ClientError {
    match err {
        ClientError::Network { .. } => err,
        other => ClientError::Network {
            method,
            path: path.to_string(),
            message: format!("cannot open session: {}", other),
        },
    }
}

fn relabel(err: ClientError, method: HttpMethod, path: &str) -> ClientError {
    match err {
        ClientError::Network { message, .. } => ClientError::Network {
            method,
            path: path.to_string(),
            message,
        },
        other => other,
    }
}
