//! WebSocket/HTTP サーバの UI 層

mod handler;
mod server;
mod signal;
mod state;

pub use server::Server;
