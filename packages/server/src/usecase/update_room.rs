//! UseCase: ドキュメント更新処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdateRoomUseCase::execute() メソッド
//! - シャローマージ（last-write-wins）と派生リストの再計算順序
//!
//! ### なぜこのテストが必要か
//! - 「マージ → 再計算」の順序が崩れるとクライアントの送ってきた
//!   connectedPlayers で参加者リストが壊れる
//! - 未参加の接続からの更新が拒否されることを保証
//! - write-before-broadcast の耐障害性（ストア失敗でも更新は生きる）
//!
//! ### どのような状況を想定しているか
//! - 正常系：フィールドの上書き、全参加者への配信対象列挙
//! - 異常系：未参加の接続からの更新、ストア書き込み失敗
//! - エッジケース：同一フィールドへの連続更新（後勝ち）

use std::sync::Arc;

use crate::domain::{
    ConnectionId, Document, DocumentStore, EventPusher, PersistedRoom, Room, RoomRegistry,
};

use super::error::UpdateRoomError;

/// 更新成功時の結果
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    /// マージ後のルームのスナップショット
    pub room: Room,
    /// 配信対象（送信者本人を含むルーム内の全接続）
    pub targets: Vec<ConnectionId>,
}

/// ドキュメント更新のユースケース
pub struct UpdateRoomUseCase {
    /// Registry（正となるインメモリ状態の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// DocumentStore（永続化ミラーの抽象化）
    store: Arc<dyn DocumentStore>,
    /// EventPusher（イベント通知の抽象化）
    pusher: Arc<dyn EventPusher>,
}

impl UpdateRoomUseCase {
    /// 新しい UpdateRoomUseCase を作成
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

    /// ドキュメント更新を実行
    ///
    /// 永続化の書き込みはブロードキャストの前に await される
    /// （write-before-broadcast）。書き込み失敗はログに記録され、
    /// インメモリ状態が引き続き正となる。
    ///
    /// # Arguments
    ///
    /// * `connection` - 送信者の接続 ID（逆引きインデックスでルームを特定）
    /// * `partial` - マージする部分ドキュメント
    ///
    /// # Returns
    ///
    /// * `Ok(UpdateOutcome)` - マージ後の状態と配信対象
    /// * `Err(UpdateRoomError)` - 接続がどのルームにも参加していない
    pub async fn execute(
        &self,
        connection: &ConnectionId,
        partial: Document,
    ) -> Result<UpdateOutcome, UpdateRoomError> {
        // 1. 逆引きインデックスでルームを特定し、同一ロック内で
        //    マージ + 派生リスト再計算
        let room = self
            .registry
            .merge_document(connection, partial)
            .await
            .map_err(|_| UpdateRoomError::NotInRoom)?;

        // 2. ブロードキャストの前に永続化を await（失敗しても配信は行う）
        if let Err(e) = self.store.save(&PersistedRoom::from_room(&room)).await {
            tracing::warn!(
                "Failed to mirror bastion '{}' after update, memory stays authoritative: {}",
                room.code,
                e
            );
        }

        // 3. 配信対象（送信者を含む全接続）を列挙
        let targets = self.registry.connections_in(&room.code).await;

        Ok(UpdateOutcome { room, targets })
    }

    /// マージ後の全ドキュメントをルーム内の全接続へブロードキャスト
    pub async fn broadcast_state(
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
