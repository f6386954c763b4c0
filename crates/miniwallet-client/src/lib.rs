//! # MiniWallet Client
//!
//! Test-harness client for the miniwallet HTTP service: create accounts, move
//! funds and poll account events through typed resources.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): configuration, resources, subset matching,
//!   log rendering. No I/O.
//! - **Ports Layer** (`ports/`): `SessionFactory` / `HttpSession`
//! - **Adapters Layer** (`adapters/`): `ReqwestSessionFactory`,
//!   `CannedSessionFactory`
//! - **Service Layer** (`service/`): `RestClient`, `AccountResource`
//!
//! ```text
//! RestClient::create_account ──→ AccountResource
//!                                      │
//!                    balances / payments / identifiers / events
//!                                      │
//!                              RestClient::exchange
//!                                      │
//!                       SessionFactory::open (one per call)
//!                                      │
//!                               miniwallet server
//! ```
//!
//! ## Failures
//!
//! Every exchange failure is returned as a `ClientError` carrying method, path,
//! status and raw body. Event fetches choose a `FailurePolicy`: `events` and
//! `find_event` propagate, `dump_events` and `log_events` absorb.
//!
//! ## Usage Example
//!
//! ```ignore
//! use miniwallet_client::{ClientConfig, NewAccount, RestClient, match_fields};
//! use serde_json::json;
//!
//! let client = RestClient::new(ClientConfig::new("sender", "http://localhost:8888"))?;
//! let account = client.create_account(NewAccount::new().balances([("XUS", 100)])).await?;
//! let payee = client.random_account_identifier().await?;
//!
//! account.send_payment("XUS", 10, &payee).await?;
//! let event = account
//!     .find_event("created_transaction", 0, &match_fields(json!({"amount": 10})))
//!     .await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;
pub mod telemetry;

pub use adapters::{CannedReply, CannedSessionFactory, ReqwestSessionFactory};
pub use domain::{
    match_fields, Balances, ClientConfig, Event, HttpMethod, KycDataObject, KycSample,
    MatchFields, NewAccount, Payment, TestCaseTag,
};
pub use error::ClientError;
pub use ports::{HttpSession, SessionFactory};
pub use service::{AccountResource, FailurePolicy, RestClient};
pub use telemetry::{init_logging, LogConfig};
