//! EventPusher trait 定義
//!
//! 接続中のクライアントへのイベント送信の抽象化。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use super::value_object::ConnectionId;

/// クライアントへイベント（JSON 文字列）を送るためのチャンネル
pub type PusherChannel = UnboundedSender<String>;

/// イベント送信のエラー
#[derive(Debug, Error)]
pub enum EventPushError {
    /// 接続が登録されていない
    #[error("Connection '{0}' not found")]
    ConnectionNotFound(String),

    /// 送信の失敗（チャンネルが閉じているなど）
    #[error("Failed to push event: {0}")]
    PushFailed(String),
}

/// Event Pusher trait
///
/// WebSocket の生成は UI 層で行われ、この trait は生成された
/// `UnboundedSender` の管理とイベント送信だけを担います。
#[async_trait]
pub trait EventPusher: Send + Sync {
    /// 接続を登録
    async fn register(&self, connection: ConnectionId, sender: PusherChannel);

    /// 接続を登録解除
    async fn unregister(&self, connection: &ConnectionId);

    /// 特定の接続にイベントを送信
    async fn push_to(&self, connection: &ConnectionId, content: &str)
    -> Result<(), EventPushError>;

    /// 複数の接続にイベントをブロードキャスト
    ///
    /// 一部の接続への送信失敗は許容される（ログに記録してスキップ）。
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), EventPushError>;
}
