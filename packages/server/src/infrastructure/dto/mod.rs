//! Data Transfer Objects (DTOs)
//!
//! プロトコルごとに整理:
//! - `websocket`: WebSocket イベントの DTO（`type` フィールドでタグ付け）
//! - `http`: HTTP API レスポンスの DTO

pub mod conversion;
pub mod http;
pub mod websocket;
