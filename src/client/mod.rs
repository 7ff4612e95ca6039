//! Pixel canvas viewer client implementation.

mod error;
mod local;
mod reconnect;
mod runner;
mod session;

pub use error::ClientError;
pub use local::LocalCanvas;
pub use reconnect::{ReconnectController, ReconnectState, backoff_delay};
pub use runner::run_client;
pub use session::{SessionEnd, run_client_session};
