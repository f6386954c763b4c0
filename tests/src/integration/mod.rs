//! End-to-end tests against the in-process mock server.
