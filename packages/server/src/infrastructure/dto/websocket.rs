//! WebSocket イベントの DTO
//!
//! すべてのフレームは `type` フィールドでタグ付けされた JSON テキストです。
//! `updateBastion` / `bastionState` はドキュメントのフィールドをタグの
//! 横に平坦化して運びます（部分ドキュメント・全ドキュメントとも同じ形）。

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::FieldValue;

/// クライアント → サーバのイベント
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// ルームへの参加要求
    #[serde(rename = "joinBastion")]
    JoinBastion {
        #[serde(rename = "roomCode")]
        room_code: String,
        #[serde(rename = "playerName")]
        player_name: String,
    },

    /// 部分ドキュメントの更新要求（フィールドはタグの横に平坦化）
    #[serde(rename = "updateBastion")]
    UpdateBastion {
        #[serde(flatten)]
        fields: IndexMap<String, FieldValue>,
    },
}

/// サーバ → クライアントのイベント
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// 接続直後の挨拶
    #[serde(rename = "connect_status")]
    ConnectStatus { status: String },

    /// 全ドキュメントのスナップショット（初期同期・更新配信とも）
    #[serde(rename = "bastionState")]
    BastionState {
        #[serde(flatten)]
        fields: IndexMap<String, FieldValue>,
    },

    /// プレイヤーの参加通知
    #[serde(rename = "playerJoined")]
    PlayerJoined { id: String, name: String },

    /// プレイヤーの退出通知
    #[serde(rename = "playerLeft")]
    PlayerLeft { id: String, name: String },

    /// 接続中プレイヤーリストの更新
    #[serde(rename = "connectedPlayersUpdate")]
    ConnectedPlayersUpdate { players: Vec<PlayerDto> },

    /// 要求元の接続だけに返されるエラー
    #[serde(rename = "error")]
    Error { message: String },
}

/// 接続中プレイヤー 1人分の DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDto {
    pub id: String,
    pub name: String,
}
