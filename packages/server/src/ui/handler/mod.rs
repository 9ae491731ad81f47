//! HTTP / WebSocket のリクエストハンドラ

mod http;
mod websocket;

pub use http::{create_bastion, get_bastion, get_bastions, health_check};
pub use websocket::websocket_handler;
