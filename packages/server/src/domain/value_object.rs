//! 値オブジェクト定義
//!
//! ルームコード・参加者 ID・接続 ID・プレイヤー名・タイムスタンプ。
//! いずれも生成時に検証し、不変（immutable）として扱います。

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::DomainError;

/// ルームコードの文字数
pub const ROOM_CODE_LEN: usize = 6;

/// ルームコードに使用する文字（大文字英字 + 数字）
const ROOM_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// プレイヤー名の最大文字数
const DISPLAY_NAME_MAX_LEN: usize = 64;

/// ルームコード（6文字・大文字英数字）
///
/// ルックアップは大文字・小文字を区別しないため、`parse` は入力を
/// 大文字に正規化してから検証します。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// 入力を大文字に正規化して検証し、RoomCode を生成
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let normalized = input.trim().to_ascii_uppercase();
        if normalized.len() != ROOM_CODE_LEN
            || !normalized
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(DomainError::InvalidRoomCode(input.to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// ルームコードのファクトリ
///
/// 一様ランダムな 6文字コードを生成します。一意性の保証（衝突リトライ）は
/// UseCase 層の責務です。
pub struct RoomCodeFactory;

impl RoomCodeFactory {
    /// 新しいランダムなルームコードを生成
    pub fn generate() -> RoomCode {
        let mut rng = rand::thread_rng();
        let code: String = (0..ROOM_CODE_LEN)
            .map(|_| ROOM_CODE_CHARSET[rng.gen_range(0..ROOM_CODE_CHARSET.len())] as char)
            .collect();
        RoomCode(code)
    }
}

/// 参加者 ID（join 時に生成される安定した識別子）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(Uuid);

impl ParticipantId {
    /// 新しい参加者 ID を生成（UUIDv4）
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// 接続 ID（WebSocket 接続ごとに生成される一時的な識別子）
///
/// 参加者 ID と異なり、接続が切れると失効します。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// 新しい接続 ID を生成（UUIDv4）
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// プレイヤー名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// プレイヤー名を検証して生成（空・64文字超は不可）
    pub fn new(name: String) -> Result<Self, DomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.chars().count() > DISPLAY_NAME_MAX_LEN {
            return Err(DomainError::InvalidDisplayName(name));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// タイムスタンプ（UTC ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
