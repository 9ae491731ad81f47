//! Domain 層のエラー定義

use thiserror::Error;

/// 値オブジェクトの検証エラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// ルームコードの形式が不正（6文字の大文字英数字でない）
    #[error("Invalid room code: '{0}'")]
    InvalidRoomCode(String),

    /// プレイヤー名が不正（空、または長すぎる）
    #[error("Invalid player name: '{0}'")]
    InvalidDisplayName(String),
}
