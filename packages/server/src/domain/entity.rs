//! エンティティ定義
//!
//! Room は共有ドキュメントと参加者リストを保持する集約ルートです。
//! 不変条件: ドキュメントの `connectedPlayers` フィールドは常に
//! `participants` から導出され、メンバーシップまたはドキュメントの
//! 変更のたびに再計算されます（独立した正とはしない）。

use serde::{Deserialize, Serialize};

use super::document::{CONNECTED_PLAYERS_FIELD, Document, FieldValue};
use super::value_object::{ConnectionId, DisplayName, ParticipantId, RoomCode, Timestamp};

/// ルームに参加中のプレイヤー
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// join 時に生成される安定した ID
    pub id: ParticipantId,
    /// プレイヤー名
    pub name: DisplayName,
    /// 紐づく WebSocket 接続の一時的な ID
    pub connection: ConnectionId,
}

impl Participant {
    /// 新しい参加者を作成（ID はここで採番）
    pub fn new(name: DisplayName, connection: ConnectionId) -> Self {
        Self {
            id: ParticipantId::generate(),
            name,
            connection,
        }
    }
}

/// 共有セッション（バスティオン）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// 6文字のルームコード
    pub code: RoomCode,
    /// join 順の参加者リスト
    pub participants: Vec<Participant>,
    /// 共有ドキュメント
    pub document: Document,
    /// 作成時刻（UTC ミリ秒）
    pub created_at: Timestamp,
}

impl Room {
    /// 新しいルームを作成
    pub fn new(code: RoomCode, document: Document, created_at: Timestamp) -> Self {
        let mut room = Self {
            code,
            participants: Vec::new(),
            document,
            created_at,
        };
        room.sync_connected_players();
        room
    }

    /// 永続化ストアのレコードからルームを復元
    ///
    /// 復元直後の参加者はゼロ人なので、保存されていた `connectedPlayers` は
    /// 空リストに再計算されます（古いリストをそのまま配信しない）。
    pub fn hydrate(code: RoomCode, document: Document, created_at: Timestamp) -> Self {
        // new と同じだが、意図（復元）を呼び出し側で区別できるようにする
        Self::new(code, document, created_at)
    }

    /// 参加者を末尾に追加し、派生リストを再計算
    pub fn add_participant(&mut self, participant: Participant) {
        self.participants.push(participant);
        self.sync_connected_players();
    }

    /// 接続 ID に一致する参加者を削除し、派生リストを再計算
    ///
    /// 一致しない場合は何もしない（冪等）。
    pub fn remove_connection(&mut self, connection: &ConnectionId) -> Option<Participant> {
        let index = self
            .participants
            .iter()
            .position(|p| &p.connection == connection)?;
        let removed = self.participants.remove(index);
        self.sync_connected_players();
        Some(removed)
    }

    /// 部分ドキュメントをマージし、その後に派生リストを再計算
    ///
    /// 再計算はマージの後に必ず実行されるため、クライアントが
    /// `connectedPlayers` を送ってきてもサーバ側の再計算が勝ちます。
    pub fn merge_document(&mut self, partial: Document) {
        self.document.merge(partial);
        self.sync_connected_players();
    }

    /// `connectedPlayers` を participants から再計算
    fn sync_connected_players(&mut self) {
        let players: Vec<FieldValue> = self
            .participants
            .iter()
            .map(|p| {
                let mut entry = indexmap::IndexMap::new();
                entry.insert("id".to_string(), FieldValue::String(p.id.to_string()));
                entry.insert(
                    "name".to_string(),
                    FieldValue::String(p.name.as_str().to_string()),
                );
                FieldValue::Map(entry)
            })
            .collect();
        self.document
            .insert(CONNECTED_PLAYERS_FIELD, FieldValue::List(players));
    }
}
