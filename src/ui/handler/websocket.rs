//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::infrastructure::dto::websocket::{
    AuthErrorMessage, AuthMessage, AuthSuccessMessage, MessageType,
};

use super::super::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // Viewing requires no authentication; every upgrade is accepted and
    // registered with the hub.
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them
/// to the WebSocket sender.
///
/// This is the outbound half of one connection: broadcasts and auth replies
/// arrive on the channel and are written to the socket in order.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

pub async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create the channel the hub uses to reach this connection
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.connect_viewer_usecase.execute(tx.clone()).await;

    let mut send_task = pusher_loop(rx, sender);

    let state_for_recv = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on connection '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    // The only inbound message with meaning is the identity
                    // declaration; everything else is logged and dropped.
                    match serde_json::from_str::<AuthMessage>(&text) {
                        Ok(auth) if auth.r#type == MessageType::Auth => {
                            let reply = match state_for_recv
                                .authenticate_connection_usecase
                                .execute(&connection_id, &auth.token)
                                .await
                            {
                                Ok(username) => serde_json::to_string(&AuthSuccessMessage::new(
                                    username.as_str(),
                                )),
                                Err(e) => {
                                    tracing::warn!(
                                        "Identity declaration failed on '{}': {}",
                                        connection_id,
                                        e
                                    );
                                    serde_json::to_string(&AuthErrorMessage::new("Invalid token"))
                                }
                            };

                            match reply {
                                Ok(json) => {
                                    if tx.send(json).is_err() {
                                        break;
                                    }
                                }
                                Err(e) => {
                                    tracing::error!("Failed to serialize auth reply: {}", e);
                                }
                            }
                        }
                        _ => {
                            tracing::warn!(
                                "Ignoring malformed message from connection '{}'",
                                connection_id
                            );
                        }
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Channel closed or errored: remove the connection from the registry
    state.disconnect_viewer_usecase.execute(&connection_id).await;
}
