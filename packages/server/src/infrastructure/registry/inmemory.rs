//! InMemory Room Registry 実装
//!
//! ドメイン層が定義する RoomRegistry trait の具体的な実装。
//! 単一の Mutex で「ルームのマップ」と「接続 → ルームコードの
//! 逆引きインデックス」をまとめて保護します。
//!
//! ## 並行性モデル
//!
//! すべての変更操作は 1回のロック取得の中で完結します（変更 +
//! 派生リストの再計算 + 逆引きインデックスの増分更新）。ロックを
//! 保持したまま await しないため、操作同士が途中で交錯することは
//! ありません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Document, Participant, RegistryError, Room, RoomCode, RoomRegistry,
};

/// ロック内で保護される状態
#[derive(Default)]
struct RegistryState {
    /// ルームコード → ルーム
    rooms: HashMap<RoomCode, Room>,
    /// 接続 ID → ルームコード（逆引きインデックス）
    ///
    /// join で登録、leave で削除。全ルーム走査の代わりに使う。
    connections: HashMap<ConnectionId, RoomCode>,
}

/// インメモリ Room Registry 実装
#[derive(Default)]
pub struct InMemoryRoomRegistry {
    state: Mutex<RegistryState>,
}

impl InMemoryRoomRegistry {
    /// 新しい InMemoryRoomRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn insert(&self, room: Room) {
        let mut state = self.state.lock().await;
        state.rooms.insert(room.code.clone(), room);
    }

    async fn contains(&self, code: &RoomCode) -> bool {
        let state = self.state.lock().await;
        state.rooms.contains_key(code)
    }

    async fn get(&self, code: &RoomCode) -> Option<Room> {
        let state = self.state.lock().await;
        state.rooms.get(code).cloned()
    }

    async fn list(&self) -> Vec<Room> {
        let state = self.state.lock().await;
        state.rooms.values().cloned().collect()
    }

    async fn add_participant(
        &self,
        code: &RoomCode,
        participant: Participant,
    ) -> Result<Room, RegistryError> {
        let mut state = self.state.lock().await;
        let connection = participant.connection.clone();
        let room = state
            .rooms
            .get_mut(code)
            .ok_or_else(|| RegistryError::RoomNotFound(code.as_str().to_string()))?;
        room.add_participant(participant);
        let snapshot = room.clone();
        state.connections.insert(connection, code.clone());
        Ok(snapshot)
    }

    async fn merge_document(
        &self,
        connection: &ConnectionId,
        partial: Document,
    ) -> Result<Room, RegistryError> {
        let mut state = self.state.lock().await;
        let code = state
            .connections
            .get(connection)
            .cloned()
            .ok_or(RegistryError::ConnectionNotInRoom)?;
        let room = state
            .rooms
            .get_mut(&code)
            .ok_or_else(|| RegistryError::RoomNotFound(code.as_str().to_string()))?;
        room.merge_document(partial);
        Ok(room.clone())
    }

    async fn remove_connection(&self, connection: &ConnectionId) -> Option<(Room, Participant)> {
        let mut state = self.state.lock().await;
        let code = state.connections.remove(connection)?;
        let room = state.rooms.get_mut(&code)?;
        let participant = room.remove_connection(connection)?;
        Some((room.clone(), participant))
    }

    async fn room_of(&self, connection: &ConnectionId) -> Option<RoomCode> {
        let state = self.state.lock().await;
        state.connections.get(connection).cloned()
    }

    async fn connections_in(&self, code: &RoomCode) -> Vec<ConnectionId> {
        let state = self.state.lock().await;
        state
            .rooms
            .get(code)
            .map(|room| {
                room.participants
                    .iter()
                    .map(|p| p.connection.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, FieldValue, RoomCodeFactory, Timestamp};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryRoomRegistry の基本的な CRUD 操作
    // - 逆引きインデックスが join/leave で増分更新されること
    // - マージと派生リスト再計算が 1回のロック内で完結すること
    //
    // 【なぜこのテストが必要か】
    // - Registry はプロセス内で正となる状態の中核
    // - 逆引きインデックスとルームの participants がずれると
    //   更新の宛先解決やブロードキャスト対象が壊れる
    //
    // 【どのようなシナリオをテストするか】
    // 1. 参加者追加と逆引きインデックスの登録
    // 2. 接続削除とインデックスの解除
    // 3. 未参加の接続からのマージ（エラーケース)
    // 4. ルーム内の接続列挙
    // ========================================

    fn create_test_room() -> Room {
        Room::new(
            RoomCodeFactory::generate(),
            Document::default_bastion(),
            Timestamp::new(1700000000000),
        )
    }

    fn create_participant(name: &str) -> Participant {
        Participant::new(
            DisplayName::new(name.to_string()).unwrap(),
            ConnectionId::generate(),
        )
    }

    #[tokio::test]
    async fn test_add_participant_registers_reverse_index() {
        // テスト項目: 参加者追加で逆引きインデックスに接続が登録される
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let room = create_test_room();
        let code = room.code.clone();
        registry.insert(room).await;
        let participant = create_participant("alice");
        let conn = participant.connection.clone();

        // when (操作):
        let result = registry.add_participant(&code, participant).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(registry.room_of(&conn).await, Some(code.clone()));
        assert_eq!(registry.connections_in(&code).await, vec![conn]);
    }

    #[tokio::test]
    async fn test_add_participant_to_unknown_room_fails() {
        // テスト項目: 存在しないルームへの参加者追加はエラーになる
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let code = RoomCodeFactory::generate();

        // when (操作):
        let result = registry
            .add_participant(&code, create_participant("alice"))
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(RegistryError::RoomNotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_connection_clears_reverse_index() {
        // テスト項目: 接続削除で逆引きインデックスからも外れる
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let room = create_test_room();
        let code = room.code.clone();
        registry.insert(room).await;
        let participant = create_participant("alice");
        let conn = participant.connection.clone();
        registry.add_participant(&code, participant).await.unwrap();

        // when (操作):
        let removed = registry.remove_connection(&conn).await;

        // then (期待する結果):
        let (room, participant) = removed.unwrap();
        assert_eq!(participant.name.as_str(), "alice");
        assert!(room.participants.is_empty());
        assert_eq!(registry.room_of(&conn).await, None);
    }

    #[tokio::test]
    async fn test_remove_unknown_connection_is_none() {
        // テスト項目: 未登録の接続の削除は None（no-op）
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();

        // when (操作):
        let result = registry.remove_connection(&ConnectionId::generate()).await;

        // then (期待する結果):
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_merge_document_via_reverse_index() {
        // テスト項目: 接続 ID から逆引きでルームを特定してマージできる
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let room = create_test_room();
        let code = room.code.clone();
        registry.insert(room).await;
        let participant = create_participant("alice");
        let conn = participant.connection.clone();
        registry.add_participant(&code, participant).await.unwrap();

        let mut partial = Document::new();
        partial.insert("bastionGold", FieldValue::Int(7000));

        // when (操作):
        let merged = registry.merge_document(&conn, partial).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            merged.document.get("bastionGold"),
            Some(&FieldValue::Int(7000))
        );
        // Registry 本体にも反映されている
        let stored = registry.get(&code).await.unwrap();
        assert_eq!(
            stored.document.get("bastionGold"),
            Some(&FieldValue::Int(7000))
        );
    }

    #[tokio::test]
    async fn test_merge_document_without_room_fails() {
        // テスト項目: どのルームにも属さない接続からのマージはエラーになる
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();

        // when (操作):
        let result = registry
            .merge_document(&ConnectionId::generate(), Document::new())
            .await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), RegistryError::ConnectionNotInRoom);
    }

    #[tokio::test]
    async fn test_connections_in_lists_all_room_connections() {
        // テスト項目: ルーム内の全接続が join 順で列挙される
        // given (前提条件):
        let registry = InMemoryRoomRegistry::new();
        let room = create_test_room();
        let code = room.code.clone();
        registry.insert(room).await;
        let alice = create_participant("alice");
        let bob = create_participant("bob");
        let alice_conn = alice.connection.clone();
        let bob_conn = bob.connection.clone();
        registry.add_participant(&code, alice).await.unwrap();
        registry.add_participant(&code, bob).await.unwrap();

        // when (操作):
        let connections = registry.connections_in(&code).await;

        // then (期待する結果):
        assert_eq!(connections, vec![alice_conn, bob_conn]);
    }
}
