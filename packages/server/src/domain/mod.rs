//! Domain 層
//!
//! バスティオン（Room）のエンティティ・値オブジェクトと、
//! UseCase 層が依存するインターフェース（Registry / Store / Pusher）を定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

pub mod document;
pub mod entity;
pub mod error;
pub mod pusher;
pub mod registry;
pub mod store;
pub mod value_object;

pub use document::{CONNECTED_PLAYERS_FIELD, Document, FieldValue};
pub use entity::{Participant, Room};
pub use error::DomainError;
pub use pusher::{EventPushError, EventPusher, PusherChannel};
pub use registry::{RegistryError, RoomRegistry};
pub use store::{DocumentStore, PersistedRoom, StoreError};
pub use value_object::{
    ConnectionId, DisplayName, ParticipantId, RoomCode, RoomCodeFactory, Timestamp,
};
