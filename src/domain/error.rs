//! Error types for the domain layer.

use thiserror::Error;

/// Errors raised by canvas mutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    /// Coordinate outside the fixed grid dimensions
    #[error("coordinate ({x}, {y}) is outside the canvas")]
    OutOfBounds { x: u32, y: u32 },

    /// Color index outside the palette range
    #[error("color index {value} is outside the palette range")]
    InvalidColor { value: u8 },
}

/// Errors raised by value object construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// User ID must not be empty
    #[error("user id must not be empty")]
    EmptyUserId,

    /// Username must not be empty
    #[error("username must not be empty")]
    EmptyUsername,
}

/// Errors raised by repository operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// No user record for the given ID
    #[error("user '{0}' not found")]
    UserNotFound(String),
}

/// Errors raised by the update pusher
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PushError {
    /// No registered connection for the given ID
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),
}

/// Errors raised by token verification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Token could not be verified
    #[error("invalid token")]
    Invalid,
}

/// Errors raised by the chunked canvas store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Chunk index outside the expected range
    #[error("chunk index {0} is out of range")]
    InvalidChunkIndex(u32),

    /// Chunk payload has the wrong length
    #[error("chunk {index} has invalid size {len}")]
    InvalidChunkSize { index: u32, len: usize },

    /// The loaded chunk set does not cover the whole canvas
    #[error("loaded chunks do not cover the whole canvas")]
    MissingChunks,
}
