//! WebSocket を使った EventPusher 実装
//!
//! ## 責務
//!
//! - WebSocket の `UnboundedSender` を接続 ID ごとに管理
//! - クライアントへのイベント送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、イベント送信に
//! 使用します。これにより「接続の受付」と「イベントの送信」が分離されます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, EventPushError, EventPusher, PusherChannel};

/// WebSocket を使った EventPusher 実装
///
/// ## フィールド
///
/// - `connections`: 接続中のクライアントと対応する sender のマップ
#[derive(Default)]
pub struct WebSocketEventPusher {
    /// 接続 ID → イベント送信チャンネル
    connections: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketEventPusher {
    /// 新しい WebSocketEventPusher を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventPusher for WebSocketEventPusher {
    async fn register(&self, connection: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        connections.insert(connection.clone(), sender);
        tracing::debug!("Connection '{}' registered to EventPusher", connection);
    }

    async fn unregister(&self, connection: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.remove(connection);
        tracing::debug!("Connection '{}' unregistered from EventPusher", connection);
    }

    async fn push_to(
        &self,
        connection: &ConnectionId,
        content: &str,
    ) -> Result<(), EventPushError> {
        let connections = self.connections.lock().await;

        if let Some(sender) = connections.get(connection) {
            sender
                .send(content.to_string())
                .map_err(|e| EventPushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed event to connection '{}'", connection);
            Ok(())
        } else {
            Err(EventPushError::ConnectionNotFound(connection.to_string()))
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), EventPushError> {
        let connections = self.connections.lock().await;

        for target in targets {
            if let Some(sender) = connections.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(content.to_string()) {
                    tracing::warn!("Failed to push event to connection '{}': {}", target, e);
                } else {
                    tracing::debug!("Broadcasted event to connection '{}'", target);
                }
            } else {
                tracing::warn!("Connection '{}' not found during broadcast, skipping", target);
            }
        }

        Ok(())
    }
}
