//! WebSocket message DTOs for the viewer ⇄ hub duplex channel.
//!
//! Every message is a JSON object carrying a `type` tag:
//! - Viewer → hub: `{"type": "AUTH", "token": "..."}`
//! - Hub → viewer: `AUTH_SUCCESS`, `AUTH_ERROR`, `PIXEL_UPDATE`

use serde::{Deserialize, Serialize};

/// Message type tag on the duplex channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    #[serde(rename = "AUTH")]
    Auth,
    #[serde(rename = "AUTH_SUCCESS")]
    AuthSuccess,
    #[serde(rename = "AUTH_ERROR")]
    AuthError,
    #[serde(rename = "PIXEL_UPDATE")]
    PixelUpdate,
}

/// Viewer → hub: identity declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthMessage {
    pub r#type: MessageType,
    pub token: String,
}

impl AuthMessage {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            r#type: MessageType::Auth,
            token: token.into(),
        }
    }
}

/// Hub → viewer: identity declaration accepted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSuccessMessage {
    pub r#type: MessageType,
    pub payload: AuthSuccessPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSuccessPayload {
    pub username: String,
}

impl AuthSuccessMessage {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            r#type: MessageType::AuthSuccess,
            payload: AuthSuccessPayload {
                username: username.into(),
            },
        }
    }
}

/// Hub → viewer: identity declaration rejected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthErrorMessage {
    pub r#type: MessageType,
    pub payload: AuthErrorPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthErrorPayload {
    pub message: String,
}

impl AuthErrorMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            r#type: MessageType::AuthError,
            payload: AuthErrorPayload {
                message: message.into(),
            },
        }
    }
}

/// Hub → viewer (broadcast): one committed placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixelUpdateMessage {
    pub r#type: MessageType,
    pub payload: PixelUpdatePayload,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PixelUpdatePayload {
    pub x: u32,
    pub y: u32,
    pub color: u8,
}
