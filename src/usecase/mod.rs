//! UseCase layer: one application operation per module, composing the
//! domain traits provided by the infrastructure layer.

mod authenticate_connection;
mod connect_viewer;
mod disconnect_viewer;
mod error;
mod get_canvas_state;
mod get_leaderboard;
mod place_pixel;

pub use authenticate_connection::AuthenticateConnectionUseCase;
pub use connect_viewer::ConnectViewerUseCase;
pub use disconnect_viewer::DisconnectViewerUseCase;
pub use error::{AuthenticateError, PlacePixelError};
pub use get_canvas_state::GetCanvasStateUseCase;
pub use get_leaderboard::{GetLeaderboardUseCase, LeaderboardEntry};
pub use place_pixel::PlacePixelUseCase;
