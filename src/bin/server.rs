//! Collaborative pixel canvas server.
//!
//! Serves the shared 150x150 canvas over HTTP (placement, state,
//! leaderboard) and fans committed placements out to every WebSocket
//! viewer.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server -- --user tok-alice:alice:Alice --user tok-root:root:Root:admin
//! cargo run --bin server -- --host 0.0.0.0 --port 3000 --user tok-alice:alice:Alice
//! ```

use std::sync::Arc;

use clap::Parser;

use pixelgrid::{
    common::{logger::setup_logger, time::SystemClock},
    domain::{Canvas, CanvasStore, TokenClaims, User, UserId, Username, store::assemble_canvas},
    infrastructure::{
        repository::{InMemoryCanvasRepository, InMemoryUserRepository},
        store::InMemoryCanvasStore,
        token::StaticTokenVerifier,
        update_pusher::WebSocketUpdatePusher,
    },
    ui::Server,
    usecase::{
        AuthenticateConnectionUseCase, ConnectViewerUseCase, DisconnectViewerUseCase,
        GetCanvasStateUseCase, GetLeaderboardUseCase, PlacePixelUseCase,
    },
};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Collaborative pixel canvas server with WebSocket fanout", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Known user as `token:user_id:username[:admin]` (repeatable)
    #[arg(short = 'u', long = "user")]
    users: Vec<String>,
}

/// Parse one `token:user_id:username[:admin]` argument
fn parse_user_spec(spec: &str) -> Result<(String, User), String> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() < 3 || parts.len() > 4 {
        return Err(format!(
            "Invalid user spec '{}': expected token:user_id:username[:admin]",
            spec
        ));
    }
    let is_admin = match parts.get(3) {
        None => false,
        Some(&"admin") => true,
        Some(other) => {
            return Err(format!(
                "Invalid user spec '{}': unknown flag '{}'",
                spec, other
            ));
        }
    };

    let user_id = UserId::new(parts[1].to_string()).map_err(|e| e.to_string())?;
    let username = Username::new(parts[2].to_string()).map_err(|e| e.to_string())?;
    Ok((
        parts[0].to_string(),
        User::new(user_id, username, is_admin),
    ))
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. CanvasStore (persistence) and authoritative canvas
    // 2. Repositories and token verifier
    // 3. UpdatePusher
    // 4. UseCases
    // 5. Server

    // 1. Restore the canvas from stored chunks, or start blank
    let store = Arc::new(InMemoryCanvasStore::new());
    let canvas = match store.load_chunks().await {
        Ok(chunks) if !chunks.is_empty() => match assemble_canvas(chunks) {
            Ok(canvas) => {
                tracing::info!("Canvas restored from stored chunks");
                canvas
            }
            Err(e) => {
                tracing::warn!("Stored chunks unusable ({}), starting blank", e);
                Canvas::new()
            }
        },
        _ => Canvas::new(),
    };
    let canvas_repository = Arc::new(InMemoryCanvasRepository::new(canvas));

    // 2. Register the known users and their tokens
    let mut verifier = StaticTokenVerifier::new();
    let mut users = Vec::new();
    for spec in &args.users {
        match parse_user_spec(spec) {
            Ok((token, user)) => {
                verifier = verifier.with_token(
                    token,
                    TokenClaims {
                        user_id: user.id.clone(),
                        username: user.username.clone(),
                    },
                );
                tracing::info!(
                    "Registered user '{}'{}",
                    user.username,
                    if user.is_admin { " (admin)" } else { "" }
                );
                users.push(user);
            }
            Err(e) => {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        }
    }
    let user_repository = Arc::new(InMemoryUserRepository::with_users(users));
    let token_verifier = Arc::new(verifier);

    // 3. Create UpdatePusher (WebSocket implementation)
    let pusher = Arc::new(WebSocketUpdatePusher::new());

    let clock = Arc::new(SystemClock);

    // 4. Create UseCases
    let place_pixel_usecase = Arc::new(PlacePixelUseCase::new(
        canvas_repository.clone(),
        user_repository.clone(),
        pusher.clone(),
        store.clone(),
        clock.clone(),
    ));
    let connect_viewer_usecase = Arc::new(ConnectViewerUseCase::new(pusher.clone()));
    let authenticate_connection_usecase = Arc::new(AuthenticateConnectionUseCase::new(
        token_verifier.clone(),
        pusher.clone(),
    ));
    let disconnect_viewer_usecase = Arc::new(DisconnectViewerUseCase::new(pusher.clone()));
    let get_canvas_state_usecase = Arc::new(GetCanvasStateUseCase::new(canvas_repository.clone()));
    let get_leaderboard_usecase = Arc::new(GetLeaderboardUseCase::new(
        user_repository.clone(),
        clock.clone(),
    ));

    // 5. Create and run the server
    let server = Server::new(
        place_pixel_usecase,
        connect_viewer_usecase,
        authenticate_connection_usecase,
        disconnect_viewer_usecase,
        get_canvas_state_usecase,
        get_leaderboard_usecase,
        token_verifier,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
