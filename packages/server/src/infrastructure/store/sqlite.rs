//! SQLite Document Store 実装
//!
//! 1ルーム = 1行のキーバリューテーブル（`bastions`）として永続化します。
//! スキーマはオープン時に作成し、保存は upsert、ジャーナルは WAL。
//!
//! ## 並行性
//!
//! `rusqlite::Connection` は `!Sync` のため `std::sync::Mutex` で包み、
//! ブロッキングする SQL の実行は `tokio::task::spawn_blocking` 上で
//! 行います。

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};

use crate::domain::{Document, DocumentStore, PersistedRoom, RoomCode, StoreError, Timestamp};

/// SQLite Document Store 実装
pub struct SqliteDocumentStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDocumentStore {
    /// データベースファイルを開き（無ければ作成し）、スキーマを初期化
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS bastions (
                room_code  TEXT PRIMARY KEY,
                document   TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            [],
        )
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn save(&self, record: &PersistedRoom) -> Result<(), StoreError> {
        let conn = self.conn.clone();
        let code = record.room_code.as_str().to_string();
        let created_at = record.created_at.value();
        let document = serde_json::to_string(&record.document)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|e| StoreError::Unavailable(e.to_string()))?;
            conn.execute(
                "INSERT INTO bastions (room_code, document, created_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(room_code) DO UPDATE SET document = excluded.document",
                params![code, document, created_at],
            )
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?
    }

    async fn load(&self, code: &RoomCode) -> Result<Option<PersistedRoom>, StoreError> {
        let conn = self.conn.clone();
        let room_code = code.clone();
        let code_str = code.as_str().to_string();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|e| StoreError::Unavailable(e.to_string()))?;
            let row: Option<(String, i64)> = conn
                .query_row(
                    "SELECT document, created_at FROM bastions WHERE room_code = ?1",
                    params![code_str],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;

            match row {
                Some((document_json, created_at)) => {
                    let document: Document = serde_json::from_str(&document_json)
                        .map_err(|e| StoreError::Serialization(e.to_string()))?;
                    Ok(Some(PersistedRoom {
                        room_code,
                        document,
                        created_at: Timestamp::new(created_at),
                    }))
                }
                None => Ok(None),
            }
        })
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldValue, RoomCodeFactory};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - SqliteDocumentStore のスキーマ初期化と save/load の往復
    // - upsert（同一コードへの再保存が上書きになること）
    // - 別のストアインスタンスで同じファイルを開いたときの読み出し
    //   （プロセス再起動の模擬）
    //
    // 【なぜこのテストが必要か】
    // - ストアはプロセス再起動をまたぐ唯一の状態であり、
    //   ドキュメントの JSON 表現が正確に往復することを保証する
    // ========================================

    fn create_test_record() -> PersistedRoom {
        PersistedRoom {
            room_code: RoomCodeFactory::generate(),
            document: Document::default_bastion(),
            created_at: Timestamp::new(1700000000000),
        }
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        // テスト項目: 保存したレコードがそのまま読み出せる
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteDocumentStore::open(dir.path().join("toride.db")).unwrap();
        let record = create_test_record();

        // when (操作):
        store.save(&record).await.unwrap();
        let loaded = store.load(&record.room_code).await.unwrap();

        // then (期待する結果):
        assert_eq!(loaded, Some(record));
    }

    #[tokio::test]
    async fn test_save_is_upsert() {
        // テスト項目: 同じコードへの再保存は上書きになり、行は増えない
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteDocumentStore::open(dir.path().join("toride.db")).unwrap();
        let mut record = create_test_record();
        store.save(&record).await.unwrap();

        // when (操作):
        record.document.insert("bastionGold", FieldValue::Int(7000));
        store.save(&record).await.unwrap();

        // then (期待する結果):
        let loaded = store.load(&record.room_code).await.unwrap().unwrap();
        assert_eq!(
            loaded.document.get("bastionGold"),
            Some(&FieldValue::Int(7000))
        );
    }

    #[tokio::test]
    async fn test_reopen_reads_persisted_record() {
        // テスト項目: 別のインスタンスで同じファイルを開いても読み出せる
        //             （プロセス再起動の模擬）
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("toride.db");
        let record = create_test_record();
        {
            let store = SqliteDocumentStore::open(&db_path).unwrap();
            store.save(&record).await.unwrap();
        }

        // when (操作):
        let reopened = SqliteDocumentStore::open(&db_path).unwrap();
        let loaded = reopened.load(&record.room_code).await.unwrap();

        // then (期待する結果):
        assert_eq!(loaded, Some(record));
    }

    #[tokio::test]
    async fn test_load_unknown_code_is_none() {
        // テスト項目: 存在しないコードの読み込みは Ok(None)
        // given (前提条件):
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteDocumentStore::open(dir.path().join("toride.db")).unwrap();

        // when (操作):
        let loaded = store.load(&RoomCodeFactory::generate()).await.unwrap();

        // then (期待する結果):
        assert!(loaded.is_none());
    }

    #[test]
    fn test_open_invalid_path_fails() {
        // テスト項目: 開けないパスでは Unavailable エラーになる
        // given (前提条件):
        let path = "/nonexistent-dir/toride.db";

        // when (操作):
        let result = SqliteDocumentStore::open(path);

        // then (期待する結果):
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
