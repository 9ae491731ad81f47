//! Room Registry の実装
//!
//! ## 実装
//!
//! - `inmemory`: 単一プロセス用のインメモリ実装（本番・テスト共用）

pub mod inmemory;

pub use inmemory::InMemoryRoomRegistry;
