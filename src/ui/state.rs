//! Server state shared across handlers.

use std::sync::Arc;

use crate::{
    domain::TokenVerifier,
    usecase::{
        AuthenticateConnectionUseCase, ConnectViewerUseCase, DisconnectViewerUseCase,
        GetCanvasStateUseCase, GetLeaderboardUseCase, PlacePixelUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// PlacePixelUseCase（配置コミットのユースケース）
    pub place_pixel_usecase: Arc<PlacePixelUseCase>,
    /// ConnectViewerUseCase（ビューア接続のユースケース）
    pub connect_viewer_usecase: Arc<ConnectViewerUseCase>,
    /// AuthenticateConnectionUseCase（identity 宣言のユースケース）
    pub authenticate_connection_usecase: Arc<AuthenticateConnectionUseCase>,
    /// DisconnectViewerUseCase（ビューア切断のユースケース）
    pub disconnect_viewer_usecase: Arc<DisconnectViewerUseCase>,
    /// GetCanvasStateUseCase（キャンバス状態取得のユースケース）
    pub get_canvas_state_usecase: Arc<GetCanvasStateUseCase>,
    /// GetLeaderboardUseCase（リーダーボード取得のユースケース）
    pub get_leaderboard_usecase: Arc<GetLeaderboardUseCase>,
    /// リクエスト認証コラボレータ（HTTP の書き込み経路で使用）
    pub token_verifier: Arc<dyn TokenVerifier>,
}
