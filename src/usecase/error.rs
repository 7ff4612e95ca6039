//! Error types for the UseCase layer.
//!
//! Every rejection is a structured result surfaced to the caller; nothing
//! here terminates the process or unwinds past the commit boundary.

use thiserror::Error;

use crate::domain::CanvasError;

/// Rejection reasons for a pixel placement request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacePixelError {
    /// Coordinate outside the fixed grid; no mutation, no broadcast
    #[error("coordinate ({x}, {y}) is outside the canvas")]
    OutOfBounds { x: u32, y: u32 },

    /// Color index outside the palette; no mutation
    #[error("color index {value} is outside the palette range")]
    InvalidColor { value: u8 },

    /// Non-admin user still inside the cooldown window; no mutation
    #[error("cooldown active, {remaining_seconds}s remaining")]
    Cooldown { remaining_seconds: u64 },

    /// The authenticated user has no account record
    #[error("user '{0}' not found")]
    UserNotFound(String),
}

impl From<CanvasError> for PlacePixelError {
    fn from(error: CanvasError) -> Self {
        match error {
            CanvasError::OutOfBounds { x, y } => Self::OutOfBounds { x, y },
            CanvasError::InvalidColor { value } => Self::InvalidColor { value },
        }
    }
}

/// Rejection reasons for an identity declaration on a connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthenticateError {
    /// Token verification failed; the connection stays registered
    #[error("invalid token")]
    InvalidToken,

    /// The connection left the registry before the declaration landed
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),
}
