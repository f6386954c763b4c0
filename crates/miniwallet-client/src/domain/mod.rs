//! Domain Layer - Pure client logic
//!
//! This layer contains:
//! - Client configuration
//! - Miniwallet resources (payments, events, KYC payloads)
//! - Request/response values and URL construction
//! - Subset matching of event payloads
//! - Body and event rendering for logs
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod config;
pub mod entities;
pub mod matching;
pub mod render;
pub mod request;

pub use config::{ClientConfig, TestCaseTag};
pub use entities::{Balances, Event, KycDataObject, KycSample, NewAccount, Payment};
pub use matching::{event_matches, is_subset_match, match_fields, MatchFields};
pub use render::{dump_events, event_as_value, render_body};
pub use request::{join_url, HttpMethod, HttpRequest, HttpResponse};
