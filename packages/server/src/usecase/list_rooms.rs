//! UseCase: ルーム一覧取得処理

use std::sync::Arc;

use crate::domain::{Room, RoomRegistry};

/// 稼働中ルームの一覧取得のユースケース
///
/// Registry に載っているルームのみを返します（永続化済みで未ロードの
/// ルームは含まれない）。
pub struct ListRoomsUseCase {
    /// Registry（正となるインメモリ状態の抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl ListRoomsUseCase {
    /// 新しい ListRoomsUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 稼働中ルームのスナップショット一覧を取得
    pub async fn execute(&self) -> Vec<Room> {
        self.registry.list().await
    }
}
