//! CLI client for the toride bastion tracker.
//!
//! Joins a bastion room over WebSocket, mirrors the shared document locally
//! and lets the player edit fields from an interactive prompt.

mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use error::ClientError;
pub use runner::{ClientConfig, run_client};
