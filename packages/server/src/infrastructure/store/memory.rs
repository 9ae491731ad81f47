//! インメモリ Document Store 実装
//!
//! 永続化はされません。SQLite が開けない場合の縮退動作
//! （メモリのみのモード）と、テストで使用します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DocumentStore, PersistedRoom, RoomCode, StoreError};

/// インメモリ Document Store 実装
#[derive(Default)]
pub struct InMemoryDocumentStore {
    records: Mutex<HashMap<RoomCode, PersistedRoom>>,
}

impl InMemoryDocumentStore {
    /// 新しい InMemoryDocumentStore を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn save(&self, record: &PersistedRoom) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        records.insert(record.room_code.clone(), record.clone());
        Ok(())
    }

    async fn load(&self, code: &RoomCode) -> Result<Option<PersistedRoom>, StoreError> {
        let records = self.records.lock().await;
        Ok(records.get(code).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Document, FieldValue, RoomCodeFactory, Timestamp};

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        // テスト項目: 保存したレコードがそのまま読み出せる
        // given (前提条件):
        let store = InMemoryDocumentStore::new();
        let code = RoomCodeFactory::generate();
        let record = PersistedRoom {
            room_code: code.clone(),
            document: Document::default_bastion(),
            created_at: Timestamp::new(1700000000000),
        };

        // when (操作):
        store.save(&record).await.unwrap();
        let loaded = store.load(&code).await.unwrap();

        // then (期待する結果):
        assert_eq!(loaded, Some(record));
    }

    #[tokio::test]
    async fn test_save_is_upsert() {
        // テスト項目: 同じコードへの保存は上書きになる
        // given (前提条件):
        let store = InMemoryDocumentStore::new();
        let code = RoomCodeFactory::generate();
        let mut record = PersistedRoom {
            room_code: code.clone(),
            document: Document::default_bastion(),
            created_at: Timestamp::new(1700000000000),
        };
        store.save(&record).await.unwrap();

        // when (操作):
        record.document.insert("bastionGold", FieldValue::Int(1));
        store.save(&record).await.unwrap();

        // then (期待する結果):
        let loaded = store.load(&code).await.unwrap().unwrap();
        assert_eq!(loaded.document.get("bastionGold"), Some(&FieldValue::Int(1)));
    }

    #[tokio::test]
    async fn test_load_unknown_code_is_none() {
        // テスト項目: 存在しないコードの読み込みは Ok(None)
        // given (前提条件):
        let store = InMemoryDocumentStore::new();

        // when (操作):
        let loaded = store.load(&RoomCodeFactory::generate()).await.unwrap();

        // then (期待する結果):
        assert!(loaded.is_none());
    }
}
