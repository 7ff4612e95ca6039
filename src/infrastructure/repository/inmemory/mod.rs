//! In-memory repository implementations.

mod canvas;
mod user;

pub use canvas::InMemoryCanvasRepository;
pub use user::InMemoryUserRepository;
