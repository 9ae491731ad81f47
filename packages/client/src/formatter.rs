//! Event formatting utilities for client display.

use indexmap::IndexMap;

use toride_server::domain::FieldValue;
use toride_server::infrastructure::dto::websocket::PlayerDto;

/// Render a single field value as compact JSON
fn render_value(value: &FieldValue) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Event formatter for client display
pub struct EventFormatter;

impl EventFormatter {
    /// Format the full bastion document as a field table
    ///
    /// # Arguments
    ///
    /// * `room_code` - The code of the joined bastion
    /// * `fields` - The current document fields in server order
    ///
    /// # Returns
    ///
    /// A formatted string with one line per field
    pub fn format_bastion_state(room_code: &str, fields: &IndexMap<String, FieldValue>) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str(&format!("Bastion {}:\n", room_code));

        if fields.is_empty() {
            output.push_str("(empty document)\n");
        } else {
            for (name, value) in fields {
                output.push_str(&format!("  {}: {}\n", name, render_value(value)));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a player-joined notification
    pub fn format_player_joined(name: &str) -> String {
        format!("\n+ {} joined the bastion\n", name)
    }

    /// Format a player-left notification
    pub fn format_player_left(name: &str) -> String {
        format!("\n- {} left the bastion\n", name)
    }

    /// Format the connected player list
    ///
    /// # Arguments
    ///
    /// * `players` - Connected players in join order
    /// * `current_player_name` - The local player's name (to mark as "me")
    pub fn format_players(players: &[PlayerDto], current_player_name: &str) -> String {
        let mut output = String::new();
        output.push_str("\nConnected players:\n");

        if players.is_empty() {
            output.push_str("(no players)\n");
        } else {
            for player in players {
                let me_suffix = if player.name == current_player_name {
                    " (me)"
                } else {
                    ""
                };
                output.push_str(&format!("  {}{}\n", player.name, me_suffix));
            }
        }

        output
    }

    /// Format an error event from the server
    pub fn format_error(message: &str) -> String {
        format!("\n! Server error: {}\n", message)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
