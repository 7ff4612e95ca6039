//! HTTP API endpoint handlers.
//!
//! Write-side authorization happens here, before the commit pipeline:
//! the bearer token on the request is resolved to a user via the
//! token-verifier collaborator.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
};

use crate::{
    infrastructure::dto::http::{
        CanvasStateDto, LeaderboardEntryDto, PlacePixelErrorDto, PlacePixelRequestDto,
        PlacePixelResponseDto,
    },
    usecase::PlacePixelError,
};

use super::super::state::AppState;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the full canvas state
pub async fn get_canvas_state(State(state): State<Arc<AppState>>) -> Json<CanvasStateDto> {
    let snapshot = state.get_canvas_state_usecase.execute().await;
    Json(CanvasStateDto::from(snapshot))
}

/// Get the top-10 leaderboard
pub async fn get_leaderboard(State(state): State<Arc<AppState>>) -> Json<Vec<LeaderboardEntryDto>> {
    let entries = state.get_leaderboard_usecase.execute().await;
    Json(entries.into_iter().map(LeaderboardEntryDto::from).collect())
}

/// Place one pixel
pub async fn place_pixel(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<PlacePixelRequestDto>,
) -> Result<Json<PlacePixelResponseDto>, (StatusCode, Json<PlacePixelErrorDto>)> {
    // Resolve the requesting user before touching the commit pipeline
    let token = bearer_token(&headers).ok_or_else(|| unauthorized("Missing bearer token"))?;
    let claims = state
        .token_verifier
        .verify(token)
        .await
        .map_err(|_| unauthorized("Invalid token"))?;

    match state
        .place_pixel_usecase
        .execute(claims.user_id, request.x, request.y, request.color)
        .await
    {
        Ok(event) => Ok(Json(PlacePixelResponseDto::from(event))),
        Err(e @ (PlacePixelError::OutOfBounds { .. } | PlacePixelError::InvalidColor { .. })) => {
            Err(rejection(StatusCode::BAD_REQUEST, e.to_string(), None))
        }
        Err(e @ PlacePixelError::Cooldown { remaining_seconds }) => Err(rejection(
            StatusCode::TOO_MANY_REQUESTS,
            e.to_string(),
            Some(remaining_seconds),
        )),
        Err(PlacePixelError::UserNotFound(_)) => Err(unauthorized("Unknown user")),
    }
}

/// Extract the bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn unauthorized(message: &str) -> (StatusCode, Json<PlacePixelErrorDto>) {
    rejection(StatusCode::UNAUTHORIZED, message.to_string(), None)
}

fn rejection(
    status: StatusCode,
    message: String,
    remaining_seconds: Option<u64>,
) -> (StatusCode, Json<PlacePixelErrorDto>) {
    (
        status,
        Json(PlacePixelErrorDto {
            message,
            remaining_seconds,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extracted() {
        // テスト項目: Authorization ヘッダからトークンが取り出される
        // given (前提条件):
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer tok-123".parse().unwrap());

        // when (操作):
        let token = bearer_token(&headers);

        // then (期待する結果):
        assert_eq!(token, Some("tok-123"));
    }

    #[test]
    fn test_bearer_token_missing_or_malformed() {
        // テスト項目: ヘッダが無い・形式が違う場合は None になる
        // given (前提条件):
        let empty = HeaderMap::new();
        let mut basic = HeaderMap::new();
        basic.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());

        // when (操作) / then (期待する結果):
        assert_eq!(bearer_token(&empty), None);
        assert_eq!(bearer_token(&basic), None);
    }
}
