//! Repository implementations.

mod inmemory;

pub use inmemory::{InMemoryCanvasRepository, InMemoryUserRepository};
