//! DocumentStore trait 定義
//!
//! ルームドキュメントの永続化ミラーへのインターフェース。
//! プロセス生存中は Registry が正であり、ストアはコールドスタート時の
//! 読み込みと write-through の書き込みにのみ使われます。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use thiserror::Error;

use super::document::Document;
use super::entity::Room;
use super::value_object::{RoomCode, Timestamp};

/// 永続化される 1ルーム分のレコード
///
/// `room_code` をキーとして一意。
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedRoom {
    pub room_code: RoomCode,
    pub document: Document,
    pub created_at: Timestamp,
}

impl PersistedRoom {
    /// ルームのスナップショットから永続化レコードを作成
    pub fn from_room(room: &Room) -> Self {
        Self {
            room_code: room.code.clone(),
            document: room.document.clone(),
            created_at: room.created_at,
        }
    }
}

/// ストア操作のエラー
///
/// いずれも致命的ではなく、呼び出し側はログに記録してメモリのみの
/// 動作に縮退します（リトライはしない）。
#[derive(Debug, Error)]
pub enum StoreError {
    /// ストアへの接続・読み書きの失敗
    #[error("Persistence unavailable: {0}")]
    Unavailable(String),

    /// ドキュメントのシリアライズ・デシリアライズの失敗
    #[error("Persistence serialization error: {0}")]
    Serialization(String),
}

/// Document Store trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// レコードを保存（既存なら上書き = upsert）
    async fn save(&self, record: &PersistedRoom) -> Result<(), StoreError>;

    /// コードでレコードを読み込み（存在しなければ `Ok(None)`）
    async fn load(&self, code: &RoomCode) -> Result<Option<PersistedRoom>, StoreError>;
}
