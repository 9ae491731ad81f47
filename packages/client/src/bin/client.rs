//! CLI client for the toride bastion tracker.
//!
//! Creates or joins a bastion room and mirrors the shared document live.
//! Edits from any player appear on every connected client.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin toride-client -- --create --name Alice
//! cargo run --bin toride-client -- --room-code AB12CD --name Bob
//! ```

use clap::Parser;

use toride_client::{ClientConfig, run_client};
use toride_server::infrastructure::dto::http::CreateBastionResponse;
use toride_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "toride-client")]
#[command(about = "CLI client for the toride bastion tracker", long_about = None)]
struct Args {
    /// Player name shown to the other players
    #[arg(short = 'n', long)]
    name: String,

    /// Base HTTP URL of the bastion server
    #[arg(short = 's', long, default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Code of the bastion to join
    #[arg(short = 'r', long, required_unless_present = "create")]
    room_code: Option<String>,

    /// Create a new bastion and join it
    #[arg(long, conflicts_with = "room_code")]
    create: bool,
}

/// Create a new bastion room over the HTTP API and return its code.
async fn create_bastion(server: &str) -> Result<String, Box<dyn std::error::Error>> {
    let url = format!("{}/api/bastion/create", server);
    let response = reqwest::Client::new()
        .post(&url)
        .send()
        .await?
        .error_for_status()?
        .json::<CreateBastionResponse>()
        .await?;
    Ok(response.room_code)
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Resolve the room code, creating a fresh bastion when asked
    let room_code = if args.create {
        match create_bastion(&args.server).await {
            Ok(code) => {
                println!("Created bastion '{}'. Share this code with your party.", code);
                code
            }
            Err(e) => {
                tracing::error!("Failed to create bastion: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        // clap guarantees room_code is present when --create is absent
        args.room_code.unwrap_or_default()
    };

    // Derive the WebSocket endpoint from the HTTP base URL
    let ws_url = format!("{}/ws", args.server.replacen("http", "ws", 1));

    let config = ClientConfig {
        ws_url,
        room_code,
        player_name: args.name,
    };

    // Run the client
    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
