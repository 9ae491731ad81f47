//! UseCase: ルーム退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - 切断時の参加者削除（逆引きインデックス経由、全ルーム走査なし）
//!
//! ### なぜこのテストが必要か
//! - 切断は参加者リスト・派生リスト・逆引きインデックス・Pusher 登録の
//!   すべてを後始末する必要がある
//! - どのルームにも属さない接続の切断が no-op であることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加中の接続の切断と残りメンバーへの通知対象列挙
//! - エッジケース：最後の参加者の切断（通知対象なし）
//! - 異常系：未参加の接続の切断（no-op）

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DocumentStore, EventPusher, Participant, PersistedRoom, Room, RoomRegistry,
};

/// 退出時の結果
#[derive(Debug, Clone)]
pub struct LeaveOutcome {
    /// 削除された参加者
    pub participant: Participant,
    /// 削除後のルームのスナップショット
    pub room: Room,
    /// 通知対象（ルームに残っている接続）
    pub remaining: Vec<ConnectionId>,
}

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    /// Registry（正となるインメモリ状態の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// DocumentStore（永続化ミラーの抽象化）
    store: Arc<dyn DocumentStore>,
    /// EventPusher（イベント通知の抽象化）
    pusher: Arc<dyn EventPusher>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
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

    /// ルーム退出を実行
    ///
    /// # Arguments
    ///
    /// * `connection` - 切断された接続の ID
    ///
    /// # Returns
    ///
    /// * `Some(LeaveOutcome)` - 参加者が削除された
    /// * `None` - 接続はどのルームにも属していなかった（no-op）
    pub async fn execute(&self, connection: &ConnectionId) -> Option<LeaveOutcome> {
        // 1. Pusher から接続を登録解除（以降この接続へは送信しない）
        self.pusher.unregister(connection).await;

        // 2. 逆引きインデックス経由で参加者を削除（派生リストも再計算される）
        let (room, participant) = self.registry.remove_connection(connection).await?;

        // 3. 永続化ミラーへ write-through（失敗してもメモリ上は有効）
        if let Err(e) = self.store.save(&PersistedRoom::from_room(&room)).await {
            tracing::warn!(
                "Failed to mirror bastion '{}' after leave: {}",
                room.code,
                e
            );
        }

        // 4. 残りメンバーを通知対象として列挙
        let remaining = self.registry.connections_in(&room.code).await;

        Some(LeaveOutcome {
            participant,
            room,
            remaining,
        })
    }

    /// 残りメンバーへ退出通知をブロードキャスト
    pub async fn broadcast_left(
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
