//! Pixel canvas viewer client with automatic reconnection.
//!
//! Connects to a canvas server, declares identity with a bearer token,
//! and mirrors every broadcast placement locally. Reconnects on
//! disconnection with exponential backoff (1s doubling up to 30s).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin client -- --token tok-alice
//! cargo run --bin client -- -t tok-alice -u ws://127.0.0.1:8080/ws
//! ```

use clap::Parser;
use tokio::sync::watch;

use pixelgrid::common::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "Pixel canvas viewer client with automatic reconnection", long_about = None)]
struct Args {
    /// Bearer token identifying this user
    #[arg(short = 't', long)]
    token: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Ctrl+C flips the shutdown flag; the client loop observes it
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            let _ = shutdown_tx.send(true);
        }
    });

    // Run the client
    if let Err(e) = pixelgrid::client::run_client(args.url, args.token, shutdown_rx).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
