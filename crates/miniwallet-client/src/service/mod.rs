//! Service Layer
//!
//! - `RestClient`: transport contract and client root (account creation, KYC sample)
//! - `AccountResource`: balances, payments, identifiers and events of one account

pub mod account;
pub mod rest_client;

pub use account::{AccountResource, FailurePolicy};
pub use rest_client::{response_log_level, RestClient, ACCOUNTS_PATH, KYC_SAMPLE_PATH};
