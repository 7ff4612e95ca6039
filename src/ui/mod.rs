//! Pixel canvas server implementation (HTTP + WebSocket).

pub mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, router};
