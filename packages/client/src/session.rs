//! WebSocket client session management.

use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, StreamExt};
use indexmap::IndexMap;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use toride_server::domain::FieldValue;
use toride_server::infrastructure::dto::websocket::{ClientEvent, PlayerDto, ServerEvent};

use super::{error::ClientError, formatter::EventFormatter, ui::redisplay_prompt};

/// Local mirror of the bastion as last reported by the server
#[derive(Default)]
struct LocalState {
    fields: IndexMap<String, FieldValue>,
    players: Vec<PlayerDto>,
}

/// Run one WebSocket client session
///
/// Connects, joins the bastion and serves the interactive prompt until the
/// player quits or the connection drops.
pub async fn run_client_session(
    ws_url: &str,
    room_code: &str,
    player_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (ws_stream, _response) = connect_async(ws_url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to bastion server");
    println!(
        "\nYou are '{}'. Joining bastion '{}'...\n\
         Commands: set <field> <value>, show, players, quit\n",
        player_name, room_code
    );

    let (mut write, mut read) = ws_stream.split();

    // Join the room before anything else
    let join = ClientEvent::JoinBastion {
        room_code: room_code.to_string(),
        player_name: player_name.to_string(),
    };
    let join_json = serde_json::to_string(&join)?;
    write
        .send(Message::Text(join_json.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    let state = Arc::new(Mutex::new(LocalState::default()));

    // Clones for the read task
    let state_for_read = state.clone();
    let room_code_for_read = room_code.to_string();
    let player_name_for_read = player_name.to_string();

    // Spawn a task to handle incoming events
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(ServerEvent::ConnectStatus { status }) => {
                            tracing::info!("Server connection status: {}", status);
                        }
                        Ok(ServerEvent::BastionState { fields }) => {
                            let formatted = EventFormatter::format_bastion_state(
                                &room_code_for_read,
                                &fields,
                            );
                            state_for_read.lock().expect("state lock poisoned").fields = fields;
                            print!("{}", formatted);
                            redisplay_prompt(&player_name_for_read);
                        }
                        Ok(ServerEvent::PlayerJoined { name, .. }) => {
                            print!("{}", EventFormatter::format_player_joined(&name));
                            redisplay_prompt(&player_name_for_read);
                        }
                        Ok(ServerEvent::PlayerLeft { name, .. }) => {
                            print!("{}", EventFormatter::format_player_left(&name));
                            redisplay_prompt(&player_name_for_read);
                        }
                        Ok(ServerEvent::ConnectedPlayersUpdate { players }) => {
                            let formatted =
                                EventFormatter::format_players(&players, &player_name_for_read);
                            state_for_read.lock().expect("state lock poisoned").players = players;
                            print!("{}", formatted);
                            redisplay_prompt(&player_name_for_read);
                        }
                        Ok(ServerEvent::Error { message }) => {
                            print!("{}", EventFormatter::format_error(&message));
                            redisplay_prompt(&player_name_for_read);
                            // An unknown room is fatal, there is nothing to retry
                            if message == "Bastion not found" {
                                return Some(ClientError::RoomNotFound(
                                    room_code_for_read.clone(),
                                ));
                            }
                        }
                        Err(_) => {
                            print!("{}", EventFormatter::format_raw(&text));
                            redisplay_prompt(&player_name_for_read);
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    return Some(ClientError::ConnectionError(
                        "Server closed the connection".to_string(),
                    ));
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Some(ClientError::ConnectionError(e.to_string()));
                }
                _ => {}
            }
        }

        Some(ClientError::ConnectionError("Connection lost".to_string()))
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let prompt_name = player_name.to_string();
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", prompt_name);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to turn prompt commands into events
    let state_for_write = state.clone();
    let room_code_for_write = room_code.to_string();
    let player_name_for_write = player_name.to_string();
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            if line == "quit" || line == "exit" {
                break;
            }

            if line == "show" {
                let fields = state_for_write
                    .lock()
                    .expect("state lock poisoned")
                    .fields
                    .clone();
                print!(
                    "{}",
                    EventFormatter::format_bastion_state(&room_code_for_write, &fields)
                );
                redisplay_prompt(&player_name_for_write);
                continue;
            }

            if line == "players" {
                let players = state_for_write
                    .lock()
                    .expect("state lock poisoned")
                    .players
                    .clone();
                print!(
                    "{}",
                    EventFormatter::format_players(&players, &player_name_for_write)
                );
                redisplay_prompt(&player_name_for_write);
                continue;
            }

            if let Some(rest) = line.strip_prefix("set ") {
                match rest.split_once(char::is_whitespace) {
                    Some((field, raw_value)) => {
                        // Values parse as JSON first, then fall back to a bare string
                        let value = serde_json::from_str::<FieldValue>(raw_value.trim())
                            .unwrap_or_else(|_| FieldValue::String(raw_value.trim().to_string()));

                        let mut fields = IndexMap::new();
                        fields.insert(field.to_string(), value);
                        let event = ClientEvent::UpdateBastion { fields };

                        let json = match serde_json::to_string(&event) {
                            Ok(json) => json,
                            Err(e) => {
                                tracing::error!("Failed to serialize update: {}", e);
                                continue;
                            }
                        };

                        if let Err(e) = write.send(Message::Text(json.into())).await {
                            tracing::warn!("Failed to send update: {}", e);
                            write_error = true;
                            break;
                        }
                    }
                    None => {
                        println!("Usage: set <field> <value>");
                        redisplay_prompt(&player_name_for_write);
                    }
                }
                continue;
            }

            println!("Unknown command. Commands: set <field> <value>, show, players, quit");
            redisplay_prompt(&player_name_for_write);
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            if let Ok(Some(err)) = read_result {
                return Err(Box::new(err));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            let write_error = write_result.unwrap_or(false);
            if write_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
    }

    Ok(())
}
