//! Conversion logic between DTOs and domain entities.

use crate::{
    domain::{CanvasSnapshot, PlacementEvent},
    usecase::LeaderboardEntry,
};

use super::{
    http::{CanvasStateDto, LeaderboardEntryDto, PlacePixelResponseDto},
    websocket::{MessageType, PixelUpdateMessage, PixelUpdatePayload},
};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<PlacementEvent> for PixelUpdateMessage {
    fn from(event: PlacementEvent) -> Self {
        Self {
            r#type: MessageType::PixelUpdate,
            payload: PixelUpdatePayload {
                x: event.x,
                y: event.y,
                color: event.color.value(),
            },
        }
    }
}

impl From<PlacementEvent> for PlacePixelResponseDto {
    fn from(event: PlacementEvent) -> Self {
        Self {
            x: event.x,
            y: event.y,
            color: event.color.value(),
        }
    }
}

impl From<CanvasSnapshot> for CanvasStateDto {
    fn from(snapshot: CanvasSnapshot) -> Self {
        Self {
            width: snapshot.width,
            height: snapshot.height,
            pixels: snapshot.pixels,
        }
    }
}

impl From<LeaderboardEntry> for LeaderboardEntryDto {
    fn from(entry: LeaderboardEntry) -> Self {
        Self {
            id: entry.user_id.into_string(),
            username: entry.username.into_string(),
            pixel_count: entry.placement_count,
            waiting_time_seconds: entry.waiting_time_seconds,
        }
    }
}
