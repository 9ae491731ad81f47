//! UseCase: ルーム作成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateRoomUseCase::execute() メソッド
//! - 一意なルームコードの割り当て（衝突リトライ）と初期ドキュメントの設定
//!
//! ### なぜこのテストが必要か
//! - コードの形式（6文字・大文字英数字）と一意性はシステム全体の前提
//! - 永続化ストアへの write-through が失敗してもルームが使えることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ルームの作成と永続化
//! - 異常系：永続化ストアの書き込み失敗（メモリのみで継続）
//! - エッジケース：大量のルーム作成でもコードが衝突しない

use std::sync::Arc;

use toride_shared::time::Clock;

use crate::domain::{
    Document, DocumentStore, PersistedRoom, Room, RoomCodeFactory, RoomRegistry, Timestamp,
};

use super::error::CreateRoomError;

/// コード割り当てのリトライ上限
const MAX_CODE_ATTEMPTS: u32 = 64;

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    /// Registry（正となるインメモリ状態の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// DocumentStore（永続化ミラーの抽象化）
    store: Arc<dyn DocumentStore>,
    /// Clock（作成時刻の取得、テスト時は固定時刻）
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    /// 新しい CreateRoomUseCase を作成
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            store,
            clock,
        }
    }

    /// ルーム作成を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Room)` - 作成されたルームのスナップショット
    /// * `Err(CreateRoomError)` - コード割り当ての失敗（実質到達不能）
    pub async fn execute(&self) -> Result<Room, CreateRoomError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            // 1. コードを生成し、稼働中のルームと衝突していないか確認
            let code = RoomCodeFactory::generate();
            if self.registry.contains(&code).await {
                continue;
            }

            // 2. 永続化済みのルームとも衝突していないか確認
            //    ストアが読めない場合は Registry のみの一意性に縮退
            match self.store.load(&code).await {
                Ok(Some(_)) => continue,
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        "Store unavailable during code uniqueness check, \
                         degrading to registry-only uniqueness: {}",
                        e
                    );
                }
            }

            // 3. 初期ドキュメントでルームを作成し、Registry に登録
            let room = Room::new(
                code,
                Document::default_bastion(),
                Timestamp::new(self.clock.now_utc_millis()),
            );
            self.registry.insert(room.clone()).await;

            // 4. 永続化ストアへ write-through（失敗してもメモリ上は有効）
            if let Err(e) = self.store.save(&PersistedRoom::from_room(&room)).await {
                tracing::warn!(
                    "Failed to persist new bastion '{}', continuing in memory: {}",
                    room.code,
                    e
                );
            }

            return Ok(room);
        }

        Err(CreateRoomError::CodeSpaceExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldValue, StoreError, store::MockDocumentStore};
    use crate::infrastructure::{registry::InMemoryRoomRegistry, store::InMemoryDocumentStore};
    use std::collections::HashSet;
    use toride_shared::time::FixedClock;

    fn create_usecase_with_store(store: Arc<dyn DocumentStore>) -> CreateRoomUseCase {
        CreateRoomUseCase::new(
            Arc::new(InMemoryRoomRegistry::new()),
            store,
            Arc::new(FixedClock::new(1700000000000)),
        )
    }

    #[tokio::test]
    async fn test_create_room_returns_default_document() {
        // テスト項目: 作成されたルームは既定の初期ドキュメントを持つ
        // given (前提条件):
        let usecase = create_usecase_with_store(Arc::new(InMemoryDocumentStore::new()));

        // when (操作):
        let room = usecase.execute().await.unwrap();

        // then (期待する結果):
        assert_eq!(room.document.get("bastionGold"), Some(&FieldValue::Int(5000)));
        assert_eq!(room.document.get("bastionTurn"), Some(&FieldValue::Int(1)));
        assert!(room.participants.is_empty());
        assert_eq!(room.created_at.value(), 1700000000000);
    }

    #[tokio::test]
    async fn test_create_room_persists_record() {
        // テスト項目: 作成されたルームが永続化ストアに書き込まれる
        // given (前提条件):
        let store = Arc::new(InMemoryDocumentStore::new());
        let usecase = create_usecase_with_store(store.clone());

        // when (操作):
        let room = usecase.execute().await.unwrap();

        // then (期待する結果):
        let record = store.load(&room.code).await.unwrap();
        assert_eq!(record.unwrap().document, room.document);
    }

    #[tokio::test]
    async fn test_create_many_rooms_without_collision() {
        // テスト項目: 複数のルームを作成してもコードが衝突しない
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let usecase = CreateRoomUseCase::new(
            registry.clone(),
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(FixedClock::new(1700000000000)),
        );

        // when (操作):
        let mut codes = HashSet::new();
        for _ in 0..50 {
            let room = usecase.execute().await.unwrap();
            codes.insert(room.code.as_str().to_string());
        }

        // then (期待する結果):
        assert_eq!(codes.len(), 50);
        assert_eq!(registry.list().await.len(), 50);
    }

    #[tokio::test]
    async fn test_create_room_survives_store_failure() {
        // テスト項目: 永続化ストアが落ちていてもルーム作成は成功する
        // given (前提条件):
        let mut store = MockDocumentStore::new();
        store
            .expect_load()
            .returning(|_| Err(StoreError::Unavailable("db down".to_string())));
        store
            .expect_save()
            .returning(|_| Err(StoreError::Unavailable("db down".to_string())));
        let usecase = create_usecase_with_store(Arc::new(store));

        // when (操作):
        let result = usecase.execute().await;

        // then (期待する結果): メモリのみで作成が成功する
        assert!(result.is_ok());
    }
}
