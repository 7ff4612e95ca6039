//! UpdatePusher implementations.

mod websocket;

pub use websocket::WebSocketUpdatePusher;
