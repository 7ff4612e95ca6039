//! One WebSocket session against the canvas hub.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::{
    net::TcpStream,
    sync::{Mutex, watch},
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, tungstenite::protocol::Message,
};

use crate::infrastructure::dto::websocket::{
    AuthErrorMessage, AuthMessage, AuthSuccessMessage, MessageType, PixelUpdateMessage,
};

use super::{error::ClientError, local::LocalCanvas};

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Shutdown was requested; do not reconnect
    Shutdown,
    /// The connection dropped or errored; reconnect
    ConnectionLost,
}

/// Tag-only view of an incoming message, used to pick the full parse
#[derive(Deserialize)]
struct Envelope {
    r#type: MessageType,
}

/// Run one session on an established WebSocket connection.
///
/// Declares identity with the provided token, then applies broadcast
/// updates to the local mirror until the connection drops or shutdown
/// is requested.
pub async fn run_client_session(
    ws_stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    token: &str,
    canvas: Arc<Mutex<LocalCanvas>>,
    shutdown: &mut watch::Receiver<bool>,
) -> Result<SessionEnd, ClientError> {
    let (mut write, mut read) = ws_stream.split();

    // Declare identity first thing on the wire
    let auth = AuthMessage::new(token);
    let json = serde_json::to_string(&auth)
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    if let Err(e) = write.send(Message::Text(json.into())).await {
        return Err(ClientError::ConnectionError(e.to_string()));
    }

    loop {
        tokio::select! {
            message = read.next() => {
                match message {
                    Some(Ok(Message::Text(text))) => {
                        handle_text(&text, &canvas).await;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if write.send(Message::Pong(data)).await.is_err() {
                            return Ok(SessionEnd::ConnectionLost);
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("Server closed the connection");
                        return Ok(SessionEnd::ConnectionLost);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket read error: {}", e);
                        return Ok(SessionEnd::ConnectionLost);
                    }
                    None => return Ok(SessionEnd::ConnectionLost),
                }
            }
            _ = shutdown.changed() => {
                // Best effort close; the server also handles abrupt drops
                let _ = write.send(Message::Close(None)).await;
                return Ok(SessionEnd::Shutdown);
            }
        }
    }
}

async fn handle_text(text: &str, canvas: &Arc<Mutex<LocalCanvas>>) {
    let envelope = match serde_json::from_str::<Envelope>(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!("Ignoring unparseable message: {}", e);
            return;
        }
    };

    match envelope.r#type {
        MessageType::PixelUpdate => match serde_json::from_str::<PixelUpdateMessage>(text) {
            Ok(update) => {
                let applied = canvas.lock().await.apply(&update.payload);
                if applied {
                    tracing::debug!(
                        "Applied update: ({}, {}) -> color {}",
                        update.payload.x,
                        update.payload.y,
                        update.payload.color
                    );
                } else {
                    tracing::warn!(
                        "Discarded out-of-range update: ({}, {}) color {}",
                        update.payload.x,
                        update.payload.y,
                        update.payload.color
                    );
                }
            }
            Err(e) => tracing::warn!("Ignoring malformed PIXEL_UPDATE: {}", e),
        },
        MessageType::AuthSuccess => {
            if let Ok(success) = serde_json::from_str::<AuthSuccessMessage>(text) {
                tracing::info!("Authenticated as '{}'", success.payload.username);
            }
        }
        MessageType::AuthError => {
            // Viewing continues without an identity; only placement needs one
            if let Ok(error) = serde_json::from_str::<AuthErrorMessage>(text) {
                tracing::warn!("Identity rejected: {}", error.payload.message);
            }
        }
        MessageType::Auth => {
            tracing::warn!("Ignoring unexpected AUTH message from server");
        }
    }
}
