//! Server state and connection management.

use std::sync::Arc;

use crate::domain::EventPusher;
use crate::usecase::{
    CreateRoomUseCase, GetRoomUseCase, JoinRoomUseCase, LeaveRoomUseCase, ListRoomsUseCase,
    UpdateRoomUseCase,
};

/// Shared application state
pub struct AppState {
    /// CreateRoomUseCase（ルーム作成のユースケース）
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    /// GetRoomUseCase（ルーム取得のユースケース）
    pub get_room_usecase: Arc<GetRoomUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// UpdateRoomUseCase（ドキュメント更新のユースケース）
    pub update_room_usecase: Arc<UpdateRoomUseCase>,
    /// LeaveRoomUseCase（ルーム退出のユースケース）
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// ListRoomsUseCase（ルーム一覧取得のユースケース）
    pub list_rooms_usecase: Arc<ListRoomsUseCase>,
    /// EventPusher（接続ライフサイクルの登録・解除と error イベント送信用）
    pub pusher: Arc<dyn EventPusher>,
}
