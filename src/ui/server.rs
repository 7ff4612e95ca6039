//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    domain::TokenVerifier,
    usecase::{
        AuthenticateConnectionUseCase, ConnectViewerUseCase, DisconnectViewerUseCase,
        GetCanvasStateUseCase, GetLeaderboardUseCase, PlacePixelUseCase,
    },
};

use super::{
    handler::{
        http::{get_canvas_state, get_leaderboard, health_check, place_pixel},
        websocket::websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Build the application router
///
/// Exposed separately from [`Server::run`] so tests can mount the same
/// routes on an in-process listener.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/pixels", post(place_pixel))
        .route("/api/canvas", get(get_canvas_state))
        .route("/api/leaderboard", get(get_leaderboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Collaborative pixel canvas server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     place_pixel_usecase,
///     connect_viewer_usecase,
///     authenticate_connection_usecase,
///     disconnect_viewer_usecase,
///     get_canvas_state_usecase,
///     get_leaderboard_usecase,
///     token_verifier,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// PlacePixelUseCase（配置コミットのユースケース）
    place_pixel_usecase: Arc<PlacePixelUseCase>,
    /// ConnectViewerUseCase（ビューア接続のユースケース）
    connect_viewer_usecase: Arc<ConnectViewerUseCase>,
    /// AuthenticateConnectionUseCase（identity 宣言のユースケース）
    authenticate_connection_usecase: Arc<AuthenticateConnectionUseCase>,
    /// DisconnectViewerUseCase（ビューア切断のユースケース）
    disconnect_viewer_usecase: Arc<DisconnectViewerUseCase>,
    /// GetCanvasStateUseCase（キャンバス状態取得のユースケース）
    get_canvas_state_usecase: Arc<GetCanvasStateUseCase>,
    /// GetLeaderboardUseCase（リーダーボード取得のユースケース）
    get_leaderboard_usecase: Arc<GetLeaderboardUseCase>,
    /// リクエスト認証コラボレータ
    token_verifier: Arc<dyn TokenVerifier>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `place_pixel_usecase` - UseCase for committing pixel placements
    /// * `connect_viewer_usecase` - UseCase for viewer connection
    /// * `authenticate_connection_usecase` - UseCase for identity declaration
    /// * `disconnect_viewer_usecase` - UseCase for viewer disconnection
    /// * `get_canvas_state_usecase` - UseCase for reading the canvas snapshot
    /// * `get_leaderboard_usecase` - UseCase for the placement leaderboard
    /// * `token_verifier` - Collaborator resolving bearer tokens to users
    pub fn new(
        place_pixel_usecase: Arc<PlacePixelUseCase>,
        connect_viewer_usecase: Arc<ConnectViewerUseCase>,
        authenticate_connection_usecase: Arc<AuthenticateConnectionUseCase>,
        disconnect_viewer_usecase: Arc<DisconnectViewerUseCase>,
        get_canvas_state_usecase: Arc<GetCanvasStateUseCase>,
        get_leaderboard_usecase: Arc<GetLeaderboardUseCase>,
        token_verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        Self {
            place_pixel_usecase,
            connect_viewer_usecase,
            authenticate_connection_usecase,
            disconnect_viewer_usecase,
            get_canvas_state_usecase,
            get_leaderboard_usecase,
            token_verifier,
        }
    }

    /// Run the pixel canvas server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            place_pixel_usecase: self.place_pixel_usecase,
            connect_viewer_usecase: self.connect_viewer_usecase,
            authenticate_connection_usecase: self.authenticate_connection_usecase,
            disconnect_viewer_usecase: self.disconnect_viewer_usecase,
            get_canvas_state_usecase: self.get_canvas_state_usecase,
            get_leaderboard_usecase: self.get_leaderboard_usecase,
            token_verifier: self.token_verifier,
        });

        let app = router(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "Pixel canvas server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
