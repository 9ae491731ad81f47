//! Infrastructure 層
//!
//! Domain 層の trait（Registry / Store / Pusher）の具体的な実装と、
//! プロトコルごとの DTO を提供します。

pub mod dto;
pub mod pusher;
pub mod registry;
pub mod store;
