//! Shared utilities for the toride workspace.
//!
//! Time helpers and logger setup used by both the server and the client.

pub mod logger;
pub mod time;
