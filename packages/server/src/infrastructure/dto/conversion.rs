//! DTO とドメインエンティティの変換ロジック

use toride_shared::time::timestamp_to_utc_rfc3339;

use crate::domain::{Participant, Room};
use crate::infrastructure::dto::http::BastionSummaryDto;
use crate::infrastructure::dto::websocket::{PlayerDto, ServerEvent};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Participant> for PlayerDto {
    fn from(participant: &Participant) -> Self {
        Self {
            id: participant.id.to_string(),
            name: participant.name.as_str().to_string(),
        }
    }
}

impl From<&Room> for BastionSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            room_code: room.code.as_str().to_string(),
            player_count: room.participants.len(),
            created_at: timestamp_to_utc_rfc3339(room.created_at.value()),
        }
    }
}

/// ルームのドキュメントから bastionState イベントを組み立てる
pub fn bastion_state_event(room: &Room) -> ServerEvent {
    ServerEvent::BastionState {
        fields: room.document.clone().into_fields(),
    }
}

/// ルームの参加者リストから connectedPlayersUpdate イベントを組み立てる
pub fn players_update_event(room: &Room) -> ServerEvent {
    ServerEvent::ConnectedPlayersUpdate {
        players: room.participants.iter().map(PlayerDto::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ConnectionId, DisplayName, Document, FieldValue, RoomCodeFactory, Timestamp,
    };

    fn create_test_room_with_player() -> Room {
        let mut room = Room::new(
            RoomCodeFactory::generate(),
            Document::default_bastion(),
            Timestamp::new(1700000000000),
        );
        room.add_participant(Participant::new(
            DisplayName::new("Alice".to_string()).unwrap(),
            ConnectionId::generate(),
        ));
        room
    }

    #[test]
    fn test_participant_to_player_dto() {
        // テスト項目: Participant が id/name の DTO に変換される
        // given (前提条件):
        let participant = Participant::new(
            DisplayName::new("Alice".to_string()).unwrap(),
            ConnectionId::generate(),
        );

        // when (操作):
        let dto = PlayerDto::from(&participant);

        // then (期待する結果):
        assert_eq!(dto.id, participant.id.to_string());
        assert_eq!(dto.name, "Alice");
    }

    #[test]
    fn test_room_to_summary_dto() {
        // テスト項目: Room がサマリ DTO（コード・人数・RFC 3339 時刻）に変換される
        // given (前提条件):
        let room = create_test_room_with_player();

        // when (操作):
        let dto = BastionSummaryDto::from(&room);

        // then (期待する結果):
        assert_eq!(dto.room_code, room.code.as_str());
        assert_eq!(dto.player_count, 1);
        assert!(dto.created_at.starts_with("2023-11-14T"));
    }

    #[test]
    fn test_bastion_state_event_carries_document_fields() {
        // テスト項目: bastionState イベントにドキュメントの全フィールドが入る
        // given (前提条件):
        let room = create_test_room_with_player();

        // when (操作):
        let event = bastion_state_event(&room);

        // then (期待する結果):
        match event {
            ServerEvent::BastionState { fields } => {
                assert_eq!(fields.get("bastionGold"), Some(&FieldValue::Int(5000)));
                assert!(fields.contains_key("connectedPlayers"));
            }
            other => panic!("Expected BastionState, got {other:?}"),
        }
    }

    #[test]
    fn test_players_update_event_lists_participants() {
        // テスト項目: connectedPlayersUpdate イベントに参加者が join 順で入る
        // given (前提条件):
        let room = create_test_room_with_player();

        // when (操作):
        let event = players_update_event(&room);

        // then (期待する結果):
        match event {
            ServerEvent::ConnectedPlayersUpdate { players } => {
                assert_eq!(players.len(), 1);
                assert_eq!(players[0].name, "Alice");
            }
            other => panic!("Expected ConnectedPlayersUpdate, got {other:?}"),
        }
    }
}
