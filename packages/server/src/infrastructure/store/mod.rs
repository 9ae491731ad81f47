//! Document Store の実装
//!
//! ## 実装
//!
//! - `sqlite`: SQLite（WAL）を使った永続化実装。本番の既定。
//! - `memory`: インメモリ実装。DB が開けないときの縮退動作とテスト用。

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryDocumentStore;
pub use sqlite::SqliteDocumentStore;
