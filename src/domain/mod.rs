//! Domain layer: entities, value objects, policies and the interfaces
//! (repository, pusher, token verifier, store) that the outer layers implement.

pub mod admission;
pub mod entity;
pub mod error;
pub mod pusher;
pub mod repository;
pub mod store;
pub mod token;
pub mod value_object;

pub use admission::{AdmissionVerdict, COOLDOWN_MILLIS, evaluate_admission, remaining_cooldown_seconds};
pub use entity::{CANVAS_HEIGHT, CANVAS_WIDTH, Canvas, CanvasSnapshot, PlacementEvent, User};
pub use error::{CanvasError, PushError, RepositoryError, StoreError, TokenError, ValueError};
pub use pusher::{PusherChannel, UpdatePusher};
pub use repository::{CanvasRepository, UserRepository};
pub use store::{CHUNK_COUNT, CHUNK_ROWS, CanvasChunk, CanvasStore};
pub use token::{TokenClaims, TokenVerifier};
pub use value_object::{Color, ConnectionId, MAX_COLOR_INDEX, Timestamp, UserId, Username};
