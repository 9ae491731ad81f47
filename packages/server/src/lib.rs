//! Realtime shared-state server for the toride bastion tracker.
//!
//! Clients join a room identified by a 6-character code and receive live
//! updates to a shared document as any participant edits it. Merges are
//! last-write-wins; the in-memory registry is authoritative while the
//! process is alive and a SQLite cache mirrors every change.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
