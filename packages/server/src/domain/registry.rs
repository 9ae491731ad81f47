//! RoomRegistry trait 定義
//!
//! プロセス内で正となるルーム状態へのインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 依存性の逆転（DIP）
//!
//! - ドメイン層が必要とするインターフェースをドメイン層自身が定義
//! - Infrastructure 層がドメイン層のインターフェースに依存
//! - ドメイン層は Infrastructure 層に依存しない

use async_trait::async_trait;
use thiserror::Error;

use super::document::Document;
use super::entity::{Participant, Room};
use super::value_object::{ConnectionId, RoomCode};

/// Registry 操作のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// 指定されたコードのルームが存在しない
    #[error("Room '{0}' not found in registry")]
    RoomNotFound(String),

    /// 接続がどのルームにも属していない
    #[error("Connection is not in any room")]
    ConnectionNotInRoom,
}

/// Room Registry trait
///
/// ルームへのすべての変更はこの trait を通して行われ、実装は
/// 1回のロックの中で「変更 + 派生リストの再計算」を完了させる
/// 責務を持ちます。接続 → ルームの逆引きインデックスも実装側で
/// join/leave のたびに増分更新されます（全ルーム走査はしない）。
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// ルームを登録（既存なら置き換え）
    async fn insert(&self, room: Room);

    /// 指定コードのルームが存在するか
    async fn contains(&self, code: &RoomCode) -> bool;

    /// ルームのスナップショットを取得
    async fn get(&self, code: &RoomCode) -> Option<Room>;

    /// 登録済みルームのスナップショット一覧を取得
    async fn list(&self) -> Vec<Room>;

    /// 参加者を追加し、逆引きインデックスに接続を登録
    ///
    /// 成功時は追加後のルームのスナップショットを返す。
    async fn add_participant(
        &self,
        code: &RoomCode,
        participant: Participant,
    ) -> Result<Room, RegistryError>;

    /// 接続の属するルームに部分ドキュメントをマージ
    ///
    /// マージと派生リストの再計算は同一ロック内で行われる。
    /// 成功時はマージ後のルームのスナップショットを返す。
    async fn merge_document(
        &self,
        connection: &ConnectionId,
        partial: Document,
    ) -> Result<Room, RegistryError>;

    /// 接続を逆引きインデックスから外し、参加者を削除
    ///
    /// どのルームにも属していなければ `None`（no-op）。
    async fn remove_connection(&self, connection: &ConnectionId) -> Option<(Room, Participant)>;

    /// 接続が属するルームのコードを取得（逆引きインデックス）
    async fn room_of(&self, connection: &ConnectionId) -> Option<RoomCode>;

    /// ルーム内の全接続 ID を取得（ブロードキャスト対象の列挙用）
    async fn connections_in(&self, code: &RoomCode) -> Vec<ConnectionId>;
}
