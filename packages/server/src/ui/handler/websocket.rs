//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, DisplayName, Document, RoomCode},
    infrastructure::dto::{
        conversion::{bastion_state_event, players_update_event},
        websocket::{ClientEvent, ServerEvent},
    },
    ui::state::AppState,
    usecase::{JoinRoomError, UpdateRoomError},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Serialize a server event to its JSON wire form.
///
/// Serialization of these DTOs cannot fail for well-formed field values; if it
/// ever does, a generic error frame is substituted so the connection stays
/// protocol-valid.
fn encode(event: &ServerEvent) -> String {
    serde_json::to_string(event).unwrap_or_else(|e| {
        tracing::error!("Failed to serialize server event: {}", e);
        r#"{"type":"error","message":"Internal server error"}"#.to_string()
    })
}

/// Send an error event to the originating connection only.
async fn push_error(state: &AppState, connection: &ConnectionId, message: &str) {
    let error_json = encode(&ServerEvent::Error {
        message: message.to_string(),
    });
    if let Err(e) = state.pusher.push_to(connection, &error_json).await {
        tracing::warn!("Failed to push error to '{}': {}", connection, e);
    }
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: events addressed to this
/// connection (via rx channel) are sent to its WebSocket.
///
/// # Arguments
///
/// * `rx` - Channel receiver for events addressed to this connection
/// * `sender` - WebSocket sink to send events to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the event to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // Each socket gets a server-assigned connection ID for its whole lifetime
    let connection = ConnectionId::generate();
    tracing::info!("Connection '{}' opened", connection);

    // Create a channel for this connection and register it with the pusher
    let (tx, rx) = mpsc::unbounded_channel();
    state.pusher.register(connection.clone(), tx).await;

    let (mut sender, mut receiver) = socket.split();

    // Greet the client before any room interaction
    {
        let greeting = encode(&ServerEvent::ConnectStatus {
            status: "connected".to_string(),
        });
        if let Err(e) = sender.send(Message::Text(greeting.into())).await {
            tracing::error!("Failed to greet connection '{}': {}", connection, e);
            state.pusher.unregister(&connection).await;
            return;
        }
    }

    let connection_clone = connection.clone();
    let state_clone = state.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_event(&state_clone, &connection_clone, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to forward events addressed to this connection
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Remove the participant from its room (no-op if it never joined)
    match state.leave_room_usecase.execute(&connection).await {
        Some(outcome) => {
            tracing::info!(
                "Player '{}' left bastion '{}'",
                outcome.participant.name,
                outcome.room.code
            );

            // Notify the remaining players
            let left_json = encode(&ServerEvent::PlayerLeft {
                id: outcome.participant.id.to_string(),
                name: outcome.participant.name.as_str().to_string(),
            });
            if let Err(e) = state
                .leave_room_usecase
                .broadcast_left(outcome.remaining.clone(), &left_json)
                .await
            {
                tracing::warn!("Failed to broadcast player-left: {}", e);
            }

            let players_json = encode(&players_update_event(&outcome.room));
            if let Err(e) = state
                .leave_room_usecase
                .broadcast_left(outcome.remaining, &players_json)
                .await
            {
                tracing::warn!("Failed to broadcast players update: {}", e);
            }
        }
        None => {
            tracing::info!("Connection '{}' closed without joining a bastion", connection);
        }
    }
}

/// Dispatch one inbound text frame to the matching UseCase.
async fn handle_event(state: &AppState, connection: &ConnectionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Failed to parse event from '{}': {}", connection, e);
            push_error(state, connection, "Invalid event").await;
            return;
        }
    };

    match event {
        ClientEvent::JoinBastion {
            room_code,
            player_name,
        } => {
            handle_join(state, connection, room_code, player_name).await;
        }
        ClientEvent::UpdateBastion { fields } => {
            handle_update(state, connection, Document::from(fields)).await;
        }
    }
}

async fn handle_join(
    state: &AppState,
    connection: &ConnectionId,
    room_code: String,
    player_name: String,
) {
    // Convert String -> Domain Models
    let code = match RoomCode::parse(&room_code) {
        Ok(code) => code,
        Err(_) => {
            tracing::warn!("Invalid room code format: '{}'", room_code);
            // Malformed codes get the same answer as unknown ones
            push_error(state, connection, "Bastion not found").await;
            return;
        }
    };
    let name = match DisplayName::new(player_name.clone()) {
        Ok(name) => name,
        Err(_) => {
            tracing::warn!("Invalid player name: '{}'", player_name);
            push_error(state, connection, "Invalid player name").await;
            return;
        }
    };

    match state
        .join_room_usecase
        .execute(&code, name, connection.clone())
        .await
    {
        Ok(outcome) => {
            tracing::info!(
                "Player '{}' joined bastion '{}'",
                outcome.participant.name,
                outcome.room.code
            );

            // 1. Send the full document snapshot to the joiner
            let state_json = encode(&bastion_state_event(&outcome.room));
            if let Err(e) = state.join_room_usecase.push_state(connection, &state_json).await {
                tracing::warn!("Failed to push initial state to '{}': {}", connection, e);
            }

            // 2. Announce the join to the players that were already present
            let joined_json = encode(&ServerEvent::PlayerJoined {
                id: outcome.participant.id.to_string(),
                name: outcome.participant.name.as_str().to_string(),
            });
            if let Err(e) = state
                .join_room_usecase
                .broadcast_joined(outcome.others.clone(), &joined_json)
                .await
            {
                tracing::warn!("Failed to broadcast player-joined: {}", e);
            }

            // 3. Refresh the player list for the whole room, joiner included
            let mut everyone = outcome.others;
            everyone.push(connection.clone());
            let players_json = encode(&players_update_event(&outcome.room));
            if let Err(e) = state
                .join_room_usecase
                .broadcast_joined(everyone, &players_json)
                .await
            {
                tracing::warn!("Failed to broadcast players update: {}", e);
            }
        }
        Err(JoinRoomError::RoomNotFound(code)) => {
            tracing::warn!("Join rejected, bastion '{}' not found", code);
            push_error(state, connection, "Bastion not found").await;
        }
        Err(JoinRoomError::AlreadyJoined) => {
            tracing::warn!("Connection '{}' attempted a second join", connection);
            push_error(state, connection, "Already joined a bastion").await;
        }
    }
}

async fn handle_update(state: &AppState, connection: &ConnectionId, partial: Document) {
    match state.update_room_usecase.execute(connection, partial).await {
        Ok(outcome) => {
            tracing::debug!(
                "Bastion '{}' updated by '{}', notifying {} connection(s)",
                outcome.room.code,
                connection,
                outcome.targets.len()
            );

            // Broadcast the merged document to every player, sender included
            let state_json = encode(&bastion_state_event(&outcome.room));
            if let Err(e) = state
                .update_room_usecase
                .broadcast_state(outcome.targets, &state_json)
                .await
            {
                tracing::warn!("Failed to broadcast bastion state: {}", e);
            }
        }
        Err(UpdateRoomError::NotInRoom) => {
            tracing::warn!("Update from '{}' which is not in any bastion", connection);
            push_error(state, connection, "Player not in any bastion").await;
        }
    }
}
