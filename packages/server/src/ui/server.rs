//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::domain::EventPusher;
use crate::usecase::{
    CreateRoomUseCase, GetRoomUseCase, JoinRoomUseCase, LeaveRoomUseCase, ListRoomsUseCase,
    UpdateRoomUseCase,
};

use super::{
    handler::{create_bastion, get_bastion, get_bastions, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Realtime bastion sync server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     create_room_usecase,
///     get_room_usecase,
///     join_room_usecase,
///     update_room_usecase,
///     leave_room_usecase,
///     list_rooms_usecase,
///     pusher,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// CreateRoomUseCase（ルーム作成のユースケース）
    create_room_usecase: Arc<CreateRoomUseCase>,
    /// GetRoomUseCase（ルーム取得のユースケース）
    get_room_usecase: Arc<GetRoomUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    join_room_usecase: Arc<JoinRoomUseCase>,
    /// UpdateRoomUseCase（ドキュメント更新のユースケース）
    update_room_usecase: Arc<UpdateRoomUseCase>,
    /// LeaveRoomUseCase（ルーム退出のユースケース）
    leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// ListRoomsUseCase（ルーム一覧取得のユースケース）
    list_rooms_usecase: Arc<ListRoomsUseCase>,
    /// EventPusher（WebSocket 接続の登録・解除用）
    pusher: Arc<dyn EventPusher>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `create_room_usecase` - UseCase for creating a bastion room
    /// * `get_room_usecase` - UseCase for fetching a bastion document
    /// * `join_room_usecase` - UseCase for joining a room over WebSocket
    /// * `update_room_usecase` - UseCase for merging document updates
    /// * `leave_room_usecase` - UseCase for leaving a room on disconnect
    /// * `list_rooms_usecase` - UseCase for listing active rooms
    /// * `pusher` - EventPusher used to register per-connection channels
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        create_room_usecase: Arc<CreateRoomUseCase>,
        get_room_usecase: Arc<GetRoomUseCase>,
        join_room_usecase: Arc<JoinRoomUseCase>,
        update_room_usecase: Arc<UpdateRoomUseCase>,
        leave_room_usecase: Arc<LeaveRoomUseCase>,
        list_rooms_usecase: Arc<ListRoomsUseCase>,
        pusher: Arc<dyn EventPusher>,
    ) -> Self {
        Self {
            create_room_usecase,
            get_room_usecase,
            join_room_usecase,
            update_room_usecase,
            leave_room_usecase,
            list_rooms_usecase,
            pusher,
        }
    }

    /// Build the axum router for this server.
    ///
    /// Exposed separately from [`Server::run`] so integration tests can serve
    /// the router on an ephemeral port.
    pub fn router(self) -> Router {
        let app_state = Arc::new(AppState {
            create_room_usecase: self.create_room_usecase,
            get_room_usecase: self.get_room_usecase,
            join_room_usecase: self.join_room_usecase,
            update_room_usecase: self.update_room_usecase,
            leave_room_usecase: self.leave_room_usecase,
            list_rooms_usecase: self.list_rooms_usecase,
            pusher: self.pusher,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/bastion/create", post(create_bastion))
            .route("/api/bastion/{room_code}", get(get_bastion))
            .route("/api/bastions", get(get_bastions))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(app_state)
    }

    /// Run the bastion sync server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "Bastion sync server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
