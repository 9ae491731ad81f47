//! UseCase 層のエラー定義

use thiserror::Error;

/// ルーム作成のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CreateRoomError {
    /// 一意なルームコードを割り当てられなかった
    ///
    /// コード空間は 36^6 なので、リトライ上限に達するのは実質的に
    /// ありえない。
    #[error("Could not allocate a unique room code")]
    CodeSpaceExhausted,
}

/// ルーム取得のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GetRoomError {
    /// Registry にも永続化ストアにもルームが存在しない
    #[error("Bastion '{0}' not found")]
    RoomNotFound(String),
}

/// ルーム参加のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JoinRoomError {
    /// Registry にも永続化ストアにもルームが存在しない
    #[error("Bastion '{0}' not found")]
    RoomNotFound(String),

    /// この接続は既に別のルームに参加している
    #[error("Connection has already joined a bastion")]
    AlreadyJoined,
}

/// ドキュメント更新のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpdateRoomError {
    /// 接続がどのルームにも参加していない
    #[error("Player not in any bastion")]
    NotInRoom,
}
