//! UseCase 層
//!
//! 1操作 = 1構造体。各 UseCase は Domain 層の trait（Registry / Store /
//! Pusher）にのみ依存し、Infrastructure 層の具体的な実装には依存しません。

pub mod create_room;
pub mod error;
pub mod get_room;
pub mod join_room;
pub mod leave_room;
pub mod list_rooms;
pub mod update_room;

pub use create_room::CreateRoomUseCase;
pub use error::{CreateRoomError, GetRoomError, JoinRoomError, UpdateRoomError};
pub use get_room::GetRoomUseCase;
pub use join_room::{JoinOutcome, JoinRoomUseCase};
pub use leave_room::{LeaveOutcome, LeaveRoomUseCase};
pub use list_rooms::ListRoomsUseCase;
pub use update_room::{UpdateOutcome, UpdateRoomUseCase};
