//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::{Document, RoomCode},
    infrastructure::dto::http::{BastionSummaryDto, CreateBastionResponse, ErrorResponse},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Create a new bastion room with a fresh code and the default document
pub async fn create_bastion(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CreateBastionResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.create_room_usecase.execute().await {
        Ok(room) => {
            tracing::info!("Created bastion '{}'", room.code);

            // Domain Model から DTO への変換
            let response = CreateBastionResponse {
                room_code: room.code.as_str().to_string(),
                bastion_data: room.document.into_fields(),
            };
            Ok(Json(response))
        }
        Err(e) => {
            tracing::error!("Failed to create bastion: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create bastion".to_string(),
                }),
            ))
        }
    }
}

/// Get the current document of a bastion by room code
///
/// Unknown codes and malformed codes both answer 404 so the response does not
/// leak which codes exist.
pub async fn get_bastion(
    State(state): State<Arc<AppState>>,
    Path(room_code): Path<String>,
) -> Result<Json<Document>, (StatusCode, Json<ErrorResponse>)> {
    let not_found = || {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Bastion not found".to_string(),
            }),
        )
    };

    let code = match RoomCode::parse(&room_code) {
        Ok(code) => code,
        Err(_) => {
            tracing::warn!("Invalid room code format: '{}'", room_code);
            return Err(not_found());
        }
    };

    match state.get_room_usecase.execute(&code).await {
        Ok(document) => Ok(Json(document)),
        Err(crate::usecase::GetRoomError::RoomNotFound(_)) => Err(not_found()),
    }
}

/// Get list of active bastions
pub async fn get_bastions(State(state): State<Arc<AppState>>) -> Json<Vec<BastionSummaryDto>> {
    let rooms = state.list_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let summaries: Vec<BastionSummaryDto> = rooms.iter().map(BastionSummaryDto::from).collect();

    Json(summaries)
}
