//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加者の追加（ID 採番、join 順、派生リスト更新）とストアからの復元
//!
//! ### なぜこのテストが必要か
//! - 参加は Registry・逆引きインデックス・派生リスト・永続化ミラーの
//!   4つを同時に正しく更新する必要がある
//! - 二重参加の拒否とブロードキャスト対象の選定を保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：稼働中ルームへの参加、保存済みルームへのコールド参加
//! - 異常系：存在しないコード、既に参加済みの接続
//! - エッジケース：最初の参加者（ブロードキャスト対象なし）

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DisplayName, DocumentStore, EventPusher, Participant, PersistedRoom, Room,
    RoomCode, RoomRegistry,
};

use super::error::JoinRoomError;

/// 参加成功時の結果
///
/// ハンドラがブロードキャストを組み立てるために必要なスナップショット一式。
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    /// 採番された参加者
    pub participant: Participant,
    /// 参加後のルームのスナップショット（初期同期用の全ドキュメントを含む）
    pub room: Room,
    /// 参加者本人を除く、ルーム内の既存接続
    pub others: Vec<ConnectionId>,
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Registry（正となるインメモリ状態の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// DocumentStore（永続化ミラーの抽象化）
    store: Arc<dyn DocumentStore>,
    /// EventPusher（イベント通知の抽象化）
    pusher: Arc<dyn EventPusher>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        store: Arc<dyn DocumentStore>,
        pusher: Arc<dyn EventPusher>,
    ) -> Self {
        Self {
            registry,
            store,
            pusher,
        }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `code` - 参加先のルームコード（正規化済み）
    /// * `name` - プレイヤー名
    /// * `connection` - 参加者の WebSocket 接続 ID
    ///
    /// # Returns
    ///
    /// * `Ok(JoinOutcome)` - 参加成功
    /// * `Err(JoinRoomError)` - ルーム未検出、または二重参加
    pub async fn execute(
        &self,
        code: &RoomCode,
        name: DisplayName,
        connection: ConnectionId,
    ) -> Result<JoinOutcome, JoinRoomError> {
        // 1. 二重参加チェック（逆引きインデックスは接続ごとに 1ルームまで）
        if self.registry.room_of(&connection).await.is_some() {
            return Err(JoinRoomError::AlreadyJoined);
        }

        // 2. Registry に無ければ永続化ストアから復元
        if !self.registry.contains(code).await {
            match self.store.load(code).await {
                Ok(Some(record)) => {
                    let room = Room::hydrate(record.room_code, record.document, record.created_at);
                    self.registry.insert(room).await;
                    tracing::info!("Bastion '{}' hydrated from store for join", code);
                }
                Ok(None) => {
                    return Err(JoinRoomError::RoomNotFound(code.as_str().to_string()));
                }
                Err(e) => {
                    tracing::warn!("Store lookup failed for bastion '{}': {}", code, e);
                    return Err(JoinRoomError::RoomNotFound(code.as_str().to_string()));
                }
            }
        }

        // 3. 参加者を採番して追加（派生リストの再計算は Registry 内で完了）
        let participant = Participant::new(name, connection.clone());
        let room = self
            .registry
            .add_participant(code, participant.clone())
            .await
            .map_err(|_| JoinRoomError::RoomNotFound(code.as_str().to_string()))?;

        // 4. 永続化ミラーへ write-through（失敗してもメモリ上は有効）
        if let Err(e) = self.store.save(&PersistedRoom::from_room(&room)).await {
            tracing::warn!("Failed to mirror bastion '{}' after join: {}", code, e);
        }

        // 5. ブロードキャスト対象（参加者本人以外）を列挙
        let others = self
            .registry
            .connections_in(code)
            .await
            .into_iter()
            .filter(|c| c != &connection)
            .collect();

        Ok(JoinOutcome {
            participant,
            room,
            others,
        })
    }

    /// 参加者本人に現在の全ドキュメントを送信
    pub async fn push_state(
        &self,
        connection: &ConnectionId,
        message: &str,
    ) -> Result<(), String> {
        self.pusher
            .push_to(connection, message)
            .await
            .map_err(|e| e.to_string())
    }

    /// 既存の参加者へ参加通知をブロードキャスト
    pub async fn broadcast_joined(
        &self,
        targets: Vec<ConnectionId>,
        message: &str,
    ) -> Result<(), String> {
        self.pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }
}
