//! Ports Layer
//!
//! Defines the driven ports the client depends on: acquiring a session and
//! performing one HTTP exchange on it.

pub mod outbound;

pub use outbound::{HttpSession, SessionFactory};
