//! Realtime bastion sync server.
//!
//! Hosts bastion rooms over WebSocket and mirrors every document change into
//! a SQLite file so rooms survive restarts.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin toride-server
//! cargo run --bin toride-server -- --host 0.0.0.0 --port 3000 --db-path toride.db
//! ```

use std::sync::Arc;

use clap::Parser;

use toride_server::{
    domain::DocumentStore,
    infrastructure::{
        pusher::WebSocketEventPusher,
        registry::InMemoryRoomRegistry,
        store::{InMemoryDocumentStore, SqliteDocumentStore},
    },
    ui::Server,
    usecase::{
        CreateRoomUseCase, GetRoomUseCase, JoinRoomUseCase, LeaveRoomUseCase, ListRoomsUseCase,
        UpdateRoomUseCase,
    },
};
use toride_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "toride-server")]
#[command(about = "Realtime bastion sync server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Path to the SQLite database file
    #[arg(long, default_value = "toride.db")]
    db_path: String,

    /// Keep documents in memory only (no persistence across restarts)
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. DocumentStore
    // 2. Registry
    // 3. EventPusher
    // 4. UseCases
    // 5. Server

    // 1. Create DocumentStore (SQLite mirror, or in-memory when asked / on failure)
    let store: Arc<dyn DocumentStore> = if args.in_memory {
        tracing::info!("Persistence disabled, documents are kept in memory only");
        Arc::new(InMemoryDocumentStore::new())
    } else {
        match SqliteDocumentStore::open(&args.db_path) {
            Ok(store) => {
                tracing::info!("Mirroring bastion documents to '{}'", args.db_path);
                Arc::new(store)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to open SQLite store at '{}', running without persistence: {}",
                    args.db_path,
                    e
                );
                Arc::new(InMemoryDocumentStore::new())
            }
        }
    };

    // 2. Create Registry (in-memory source of truth)
    let registry = Arc::new(InMemoryRoomRegistry::new());

    // 3. Create EventPusher (WebSocket implementation)
    let pusher = Arc::new(WebSocketEventPusher::new());

    // 4. Create UseCases
    let create_room_usecase = Arc::new(CreateRoomUseCase::new(
        registry.clone(),
        store.clone(),
        Arc::new(SystemClock),
    ));
    let get_room_usecase = Arc::new(GetRoomUseCase::new(registry.clone(), store.clone()));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        registry.clone(),
        store.clone(),
        pusher.clone(),
    ));
    let update_room_usecase = Arc::new(UpdateRoomUseCase::new(
        registry.clone(),
        store.clone(),
        pusher.clone(),
    ));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
        registry.clone(),
        store.clone(),
        pusher.clone(),
    ));
    let list_rooms_usecase = Arc::new(ListRoomsUseCase::new(registry.clone()));

    // 5. Create and run the server
    let server = Server::new(
        create_room_usecase,
        get_room_usecase,
        join_room_usecase,
        update_room_usecase,
        leave_room_usecase,
        list_rooms_usecase,
        pusher,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
