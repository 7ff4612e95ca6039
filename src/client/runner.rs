//! Client execution logic with reconnection support.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio_tungstenite::connect_async;

use super::{
    local::LocalCanvas,
    reconnect::ReconnectController,
    session::{SessionEnd, run_client_session},
};

/// Run the viewer client until shutdown is requested.
///
/// Keeps a local canvas mirror alive across sessions and reconnects on
/// every connection loss with bounded exponential backoff.
pub async fn run_client(
    url: String,
    token: String,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let canvas = Arc::new(Mutex::new(LocalCanvas::new()));
    let mut controller = ReconnectController::new();

    loop {
        if *shutdown.borrow() {
            break;
        }

        let Some(generation) = controller.begin_connect() else {
            break;
        };

        tracing::info!("Attempting to connect to {}", url);

        let connect_result = tokio::select! {
            result = connect_async(&url) => result,
            _ = shutdown.changed() => {
                controller.shutdown();
                break;
            }
        };

        match connect_result {
            Ok((ws_stream, _response)) => {
                if !controller.on_connected(generation) {
                    break;
                }
                tracing::info!("Connected to canvas server");

                match run_client_session(ws_stream, &token, canvas.clone(), &mut shutdown).await {
                    Ok(SessionEnd::Shutdown) => {
                        controller.shutdown();
                        break;
                    }
                    Ok(SessionEnd::ConnectionLost) | Err(_) => {
                        let Some(delay) = controller.on_failure(generation) else {
                            break;
                        };
                        tracing::warn!("Connection lost, reconnecting in {:?}", delay);
                        tokio::select! {
                            _ = tokio::time::sleep(delay) => {}
                            _ = shutdown.changed() => {
                                controller.shutdown();
                                break;
                            }
                        }
                    }
                }
            }
            Err(e) => {
                let Some(delay) = controller.on_failure(generation) else {
                    break;
                };
                tracing::warn!("Connection failed: {}, retrying in {:?}", e, delay);
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = shutdown.changed() => {
                        controller.shutdown();
                        break;
                    }
                }
            }
        }
    }

    tracing::info!("Client stopped");
    Ok(())
}
