//! HTTP API request/response DTOs.
//!
//! Field names follow the external API surface (camelCase where the
//! surface defines multi-word names).

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/pixels`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlacePixelRequestDto {
    pub x: u32,
    pub y: u32,
    pub color: u8,
}

/// Response body for a committed placement
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlacePixelResponseDto {
    pub x: u32,
    pub y: u32,
    pub color: u8,
}

/// Structured rejection body for `POST /api/pixels`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacePixelErrorDto {
    pub message: String,
    /// Present only for cooldown rejections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<u64>,
}

/// Response body for `GET /api/canvas`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasStateDto {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// One entry in the `GET /api/leaderboard` response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntryDto {
    pub id: String,
    pub username: String,
    pub pixel_count: u64,
    pub waiting_time_seconds: u64,
}
