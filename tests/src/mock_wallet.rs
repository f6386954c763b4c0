//! # In-process MiniWallet Server
//!
//! A small axum implementation of the miniwallet endpoints the client uses,
//! bound to `127.0.0.1:0`. Accounts, balances, identifiers and events live in
//! memory; every request is recorded with its diagnostic headers.
//!
//! The events endpoint can be left out to emulate servers that do not
//! implement it.

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

/// Which optional capabilities the mock exposes.
#[derive(Debug, Clone, Copy)]
pub struct MockWalletOptions {
    pub events_api: bool,
}

impl Default for MockWalletOptions {
    fn default() -> Self {
        Self { events_api: true }
    }
}

/// A request as the server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub test_case: Option<String>,
    pub user_agent: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone)]
struct StoredEvent {
    event_type: String,
    data: String,
    timestamp: u64,
}

#[derive(Debug, Default)]
struct Account {
    balances: BTreeMap<String, u64>,
    events: Vec<StoredEvent>,
}

#[derive(Debug, Default)]
struct WalletState {
    accounts: HashMap<String, Account>,
    /// account identifier -> account id
    identifiers: HashMap<String, String>,
    requests: Vec<RecordedRequest>,
    clock: u64,
}

impl WalletState {
    fn record_event(&mut self, account_id: &str, event_type: &str, data: Value) {
        self.clock += 1;
        let timestamp = self.clock;
        if let Some(account) = self.accounts.get_mut(account_id) {
            account.events.push(StoredEvent {
                event_type: event_type.to_string(),
                data: data.to_string(),
                timestamp,
            });
        }
    }
}

type SharedState = Arc<Mutex<WalletState>>;

/// Running mock server; stops when dropped.
pub struct MockWallet {
    addr: SocketAddr,
    state: SharedState,
    handle: JoinHandle<()>,
}

impl MockWallet {
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(MockWalletOptions::default()).await
    }

    pub async fn start_with(options: MockWalletOptions) -> anyhow::Result<Self> {
        let state = SharedState::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = router(state.clone(), options);

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "mock wallet server stopped");
            }
        });

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    pub fn account_count(&self) -> usize {
        self.state.lock().accounts.len()
    }

    /// Append an event directly, bypassing the HTTP surface.
    pub fn push_event(&self, account_id: &str, event_type: &str, data: Value) {
        self.state.lock().record_event(account_id, event_type, data);
    }
}

impl Drop for MockWallet {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn router(state: SharedState, options: MockWalletOptions) -> Router {
    let mut router = Router::new()
        .route("/accounts", post(create_account))
        .route("/kyc_sample", get(kyc_sample))
        .route("/accounts/:id/balances", get(balances))
        .route("/accounts/:id/payments", post(create_payment))
        .route(
            "/accounts/:id/account_identifiers",
            post(create_account_identifier),
        );

    if options.events_api {
        router = router.route("/accounts/:id/events", get(events));
    }

    router
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .with_state(state)
}

async fn record_request(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    // Borrows of `request` must end before the `.await`; the body is not Sync.
    let recorded = {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        RecordedRequest {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            test_case: header("x-test-case"),
            user_agent: header("user-agent"),
            content_type: header("content-type"),
        }
    };
    state.lock().requests.push(recorded);

    next.run(request).await
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Parses an optional JSON body; an empty body reads as `T::default()`.
fn parse_body<T: for<'de> Deserialize<'de> + Default>(body: &str) -> Result<T, Response> {
    if body.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(body)
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, format!("invalid body: {}", e)))
}

#[derive(Debug, Default, Deserialize)]
struct CreateAccountBody {
    #[serde(default)]
    balances: BTreeMap<String, u64>,
    #[serde(default)]
    kyc_data: Option<Value>,
    #[serde(default)]
    reject_additional_kyc_data_request: Option<bool>,
    #[serde(default)]
    disable_background_tasks: Option<bool>,
}

async fn create_account(State(state): State<SharedState>, body: String) -> Response {
    let body: CreateAccountBody = match parse_body(&body) {
        Ok(body) => body,
        Err(response) => return response,
    };

    let id = uuid::Uuid::new_v4().simple().to_string();
    let mut state = state.lock();
    state.accounts.insert(
        id.clone(),
        Account {
            balances: body.balances.clone(),
            events: Vec::new(),
        },
    );
    state.record_event(
        &id,
        "created_account",
        json!({
            "id": id,
            "balances": body.balances,
            "kyc_data": body.kyc_data,
            "reject_additional_kyc_data_request": body.reject_additional_kyc_data_request,
            "disable_background_tasks": body.disable_background_tasks,
        }),
    );

    (StatusCode::CREATED, Json(json!({ "id": id }))).into_response()
}

async fn kyc_sample() -> Json<Value> {
    let kyc = |given_name: &str| {
        json!({"type": "individual", "payload_version": 1, "given_name": given_name}).to_string()
    };
    Json(json!({
        "minimum": kyc("minimum"),
        "reject": kyc("reject"),
        "soft_match": kyc("soft_match"),
        "soft_reject": kyc("soft_reject"),
    }))
}

async fn balances(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    match state.lock().accounts.get(&id) {
        Some(account) => Json(json!(account.balances)).into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("account {} not found", id)),
    }
}

#[derive(Debug, Default, Deserialize)]
struct PaymentBody {
    payee: String,
    currency: String,
    amount: u64,
}

async fn create_payment(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: String,
) -> Response {
    let payment: PaymentBody = match parse_body(&body) {
        Ok(payment) => payment,
        Err(response) => return response,
    };

    let mut state = state.lock();
    let Some(payee_account) = state.identifiers.get(&payment.payee).cloned() else {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("unknown payee {}", payment.payee),
        );
    };

    let Some(sender) = state.accounts.get_mut(&id) else {
        return error_response(StatusCode::NOT_FOUND, format!("account {} not found", id));
    };
    let available = sender.balances.get(&payment.currency).copied().unwrap_or(0);
    if available < payment.amount {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("insufficient {} balance", payment.currency),
        );
    }
    sender
        .balances
        .insert(payment.currency.clone(), available - payment.amount);

    if let Some(receiver) = state.accounts.get_mut(&payee_account) {
        *receiver.balances.entry(payment.currency.clone()).or_insert(0) += payment.amount;
    }

    let payment_id = uuid::Uuid::new_v4().to_string();
    let record = json!({
        "id": payment_id,
        "account_id": id,
        "payee": payment.payee,
        "currency": payment.currency,
        "amount": payment.amount,
    });
    state.record_event(&id, "created_payment", record.clone());
    state.record_event(&payee_account, "created_transaction", record);

    (StatusCode::CREATED, Json(json!({ "id": payment_id }))).into_response()
}

async fn create_account_identifier(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Response {
    let mut state = state.lock();
    if !state.accounts.contains_key(&id) {
        return error_response(StatusCode::NOT_FOUND, format!("account {} not found", id));
    }

    let identifier = format!("dm1p{}", uuid::Uuid::new_v4().simple());
    state.identifiers.insert(identifier.clone(), id);

    Json(json!({ "account_identifier": identifier })).into_response()
}

async fn events(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let state = state.lock();
    let Some(account) = state.accounts.get(&id) else {
        return error_response(StatusCode::NOT_FOUND, format!("account {} not found", id));
    };

    let events: Vec<Value> = account
        .events
        .iter()
        .map(|event| {
            json!({
                "account_id": id,
                "type": event.event_type,
                "data": event.data,
                "timestamp": event.timestamp,
            })
        })
        .collect();

    Json(Value::Array(events)).into_response()
}
