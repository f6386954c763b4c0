//! Adapters Layer (Driven Adapters)
//!
//! Implementations of the session port.
//!
//! ## Adapters
//!
//! - `ReqwestSessionFactory` - real HTTP through reqwest, one client per session
//! - `CannedSessionFactory` - in-memory route table for offline tests

pub mod canned;
pub mod reqwest_session;

pub use canned::{CannedReply, CannedSessionFactory};
pub use reqwest_session::ReqwestSessionFactory;
