//! UseCase: ビューア接続処理
//!
//! 新しく開いたチャンネルをハブに登録する。閲覧に認証は不要。

use std::sync::Arc;

use crate::domain::{ConnectionId, PusherChannel, UpdatePusher};

/// ビューア接続のユースケース
pub struct ConnectViewerUseCase {
    /// UpdatePusher（接続レジストリの所有者）
    pusher: Arc<dyn UpdatePusher>,
}

impl ConnectViewerUseCase {
    /// 新しい ConnectViewerUseCase を作成
    pub fn new(pusher: Arc<dyn UpdatePusher>) -> Self {
        Self { pusher }
    }

    /// 接続を登録し、割り当てられた接続 ID を返す
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = self.pusher.register(sender).await;
        tracing::info!("Viewer connection '{}' registered", connection_id);
        connection_id
    }
}
