//! UseCase: ビューア切断処理
//!
//! チャンネルの close / エラー時にレジストリから接続を取り除く（冪等）。

use std::sync::Arc;

use crate::domain::{ConnectionId, UpdatePusher};

/// ビューア切断のユースケース
pub struct DisconnectViewerUseCase {
    /// UpdatePusher（接続レジストリの所有者）
    pusher: Arc<dyn UpdatePusher>,
}

impl DisconnectViewerUseCase {
    /// 新しい DisconnectViewerUseCase を作成
    pub fn new(pusher: Arc<dyn UpdatePusher>) -> Self {
        Self { pusher }
    }

    /// 接続をレジストリから削除
    pub async fn execute(&self, connection_id: &ConnectionId) {
        self.pusher.unregister(connection_id).await;
        tracing::info!("Viewer connection '{}' unregistered", connection_id);
    }
}
