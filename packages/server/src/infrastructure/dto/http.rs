//! HTTP API レスポンスの DTO

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::FieldValue;

/// `POST /api/bastion/create` のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBastionResponse {
    #[serde(rename = "roomCode")]
    pub room_code: String,
    #[serde(rename = "bastionData")]
    pub bastion_data: IndexMap<String, FieldValue>,
}

/// 404 などのエラーレスポンスボディ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `GET /api/bastions` の 1ルーム分のサマリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BastionSummaryDto {
    #[serde(rename = "roomCode")]
    pub room_code: String,
    #[serde(rename = "playerCount")]
    pub player_count: usize,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}
