//! UseCase: ルーム取得処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - GetRoomUseCase::execute() メソッド
//! - Registry 優先のルックアップと、ミス時の永続化ストアからの復元
//!
//! ### なぜこのテストが必要か
//! - 「Registry が正、ストアはミラー」という所有権モデルの検証
//! - プロセス再起動後（Registry が空）でも保存済みドキュメントが返ること
//!
//! ### どのような状況を想定しているか
//! - 正常系：稼働中ルームの取得、ストアからの遅延ロード
//! - 異常系：どこにも存在しないコード、ストア読み込み失敗

use std::sync::Arc;

use crate::domain::{Document, DocumentStore, Room, RoomCode, RoomRegistry};

use super::error::GetRoomError;

/// ルーム取得のユースケース
pub struct GetRoomUseCase {
    /// Registry（正となるインメモリ状態の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// DocumentStore（永続化ミラーの抽象化）
    store: Arc<dyn DocumentStore>,
}

impl GetRoomUseCase {
    /// 新しい GetRoomUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, store: Arc<dyn DocumentStore>) -> Self {
        Self { registry, store }
    }

    /// ルーム取得を実行
    ///
    /// # Arguments
    ///
    /// * `code` - ルームコード（正規化済み）
    ///
    /// # Returns
    ///
    /// * `Ok(Document)` - 現在のドキュメントのスナップショット
    /// * `Err(GetRoomError)` - ルームが存在しない
    pub async fn execute(&self, code: &RoomCode) -> Result<Document, GetRoomError> {
        // 1. Registry を先に確認（プロセス生存中はこちらが正）
        if let Some(room) = self.registry.get(code).await {
            return Ok(room.document);
        }

        // 2. ミス時は永続化ストアから read-through
        match self.store.load(code).await {
            Ok(Some(record)) => {
                // 3. 参加者ゼロで Registry に復元（派生リストは空に再計算される）
                let room = Room::hydrate(record.room_code, record.document, record.created_at);
                let document = room.document.clone();
                self.registry.insert(room).await;
                tracing::info!("Bastion '{}' hydrated from store", code);
                Ok(document)
            }
            Ok(None) => Err(GetRoomError::RoomNotFound(code.as_str().to_string())),
            Err(e) => {
                // ストアが読めない場合はメモリのみの動作に縮退し、未検出として扱う
                tracing::warn!("Store lookup failed for bastion '{}': {}", code, e);
                Err(GetRoomError::RoomNotFound(code.as_str().to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CONNECTED_PLAYERS_FIELD, FieldValue, PersistedRoom, RoomCodeFactory, StoreError, Timestamp,
        store::MockDocumentStore,
    };
    use crate::infrastructure::{registry::InMemoryRoomRegistry, store::InMemoryDocumentStore};

    #[tokio::test]
    async fn test_get_room_from_registry() {
        // テスト項目: Registry にあるルームのドキュメントが返される
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let room = Room::new(
            RoomCodeFactory::generate(),
            Document::default_bastion(),
            Timestamp::new(1700000000000),
        );
        registry.insert(room.clone()).await;
        let usecase = GetRoomUseCase::new(registry, Arc::new(InMemoryDocumentStore::new()));

        // when (操作):
        let document = usecase.execute(&room.code).await.unwrap();

        // then (期待する結果):
        assert_eq!(document, room.document);
    }

    #[tokio::test]
    async fn test_get_room_hydrates_from_store_on_registry_miss() {
        // テスト項目: Registry ミス時にストアから復元され、Registry に登録される
        // given (前提条件): ストアにだけ存在するルーム（プロセス再起動を模す）
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let store = Arc::new(InMemoryDocumentStore::new());
        let code = RoomCodeFactory::generate();
        let mut document = Document::default_bastion();
        document.insert("bastionGold", FieldValue::Int(8200));
        store
            .save(&PersistedRoom {
                room_code: code.clone(),
                document,
                created_at: Timestamp::new(1700000000000),
            })
            .await
            .unwrap();
        let usecase = GetRoomUseCase::new(registry.clone(), store);

        // when (操作):
        let result = usecase.execute(&code).await.unwrap();

        // then (期待する結果): 保存されていた値が返り、Registry に載っている
        assert_eq!(result.get("bastionGold"), Some(&FieldValue::Int(8200)));
        assert!(registry.contains(&code).await);
        // 復元されたルームの参加者はゼロ人
        let hydrated = registry.get(&code).await.unwrap();
        assert!(hydrated.participants.is_empty());
    }

    #[tokio::test]
    async fn test_get_room_hydration_resets_stale_player_list() {
        // テスト項目: 保存済みドキュメントに古い connectedPlayers が残っていても
        //             復元時に空リストへ再計算される
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let store = Arc::new(InMemoryDocumentStore::new());
        let code = RoomCodeFactory::generate();
        let mut stale = Document::default_bastion();
        stale.insert(
            CONNECTED_PLAYERS_FIELD,
            FieldValue::List(vec![FieldValue::String("ghost".to_string())]),
        );
        store
            .save(&PersistedRoom {
                room_code: code.clone(),
                document: stale,
                created_at: Timestamp::new(1700000000000),
            })
            .await
            .unwrap();
        let usecase = GetRoomUseCase::new(registry, store);

        // when (操作):
        let result = usecase.execute(&code).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            result.get(CONNECTED_PLAYERS_FIELD),
            Some(&FieldValue::List(vec![]))
        );
    }

    #[tokio::test]
    async fn test_get_unknown_room_fails_with_not_found() {
        // テスト項目: どこにも存在しないコードは RoomNotFound になる
        // given (前提条件):
        let usecase = GetRoomUseCase::new(
            Arc::new(InMemoryRoomRegistry::new()),
            Arc::new(InMemoryDocumentStore::new()),
        );
        let code = RoomCode::parse("ZZZZZZ").unwrap();

        // when (操作):
        let result = usecase.execute(&code).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(GetRoomError::RoomNotFound("ZZZZZZ".to_string()))
        );
    }

    #[tokio::test]
    async fn test_get_room_store_failure_reported_as_not_found() {
        // テスト項目: ストア読み込み失敗は未検出として扱われる（縮退動作）
        // given (前提条件):
        let mut store = MockDocumentStore::new();
        store
            .expect_load()
            .returning(|_| Err(StoreError::Unavailable("db down".to_string())));
        let usecase = GetRoomUseCase::new(Arc::new(InMemoryRoomRegistry::new()), Arc::new(store));
        let code = RoomCode::parse("AAAAAA").unwrap();

        // when (操作):
        let result = usecase.execute(&code).await;

        // then (期待する結果):
        assert!(matches!(result, Err(GetRoomError::RoomNotFound(_))));
    }
}
