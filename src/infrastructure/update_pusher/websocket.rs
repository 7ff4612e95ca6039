//! WebSocket を使った UpdatePusher 実装（BroadcastHub）
//!
//! ## 責務
//!
//! - 接続レジストリ（connection_id → sender + identity タグ）の管理
//! - コミット済み配置イベントの全接続へのファンアウト
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は接続ごとの `UnboundedSender` を受け取り、配信に使用します。
//! sender が unbounded であるため、遅い接続や死んだ接続への送信が
//! 他の接続への配信をブロックすることはありません。送信に失敗した
//! 接続はその場でレジストリから取り除かれます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{
        ConnectionId, PlacementEvent, PushError, PusherChannel, UpdatePusher, UserId, Username,
    },
    infrastructure::dto::websocket::PixelUpdateMessage,
};

/// レジストリに登録された 1 接続分の状態
struct ConnectionEntry {
    /// 接続への送信チャンネル
    sender: PusherChannel,
    /// identity 宣言に成功した場合のユーザー ID
    user_id: Option<UserId>,
    /// identity 宣言に成功した場合の表示名
    username: Option<Username>,
    /// identity 宣言に成功したかどうか
    authenticated: bool,
}

/// WebSocket を使った UpdatePusher 実装
pub struct WebSocketUpdatePusher {
    /// 接続中のビューアのレジストリ
    ///
    /// Key: ConnectionId
    /// Value: ConnectionEntry
    connections: Mutex<HashMap<ConnectionId, ConnectionEntry>>,
}

impl WebSocketUpdatePusher {
    /// 新しい WebSocketUpdatePusher を作成
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// 登録中の接続数を取得
    pub async fn connection_count(&self) -> usize {
        self.connections.lock().await.len()
    }

    /// 接続の認証状態を取得（存在しない場合は None）
    pub async fn is_authenticated(&self, id: &ConnectionId) -> Option<bool> {
        let connections = self.connections.lock().await;
        connections.get(id).map(|entry| entry.authenticated)
    }

    /// 接続にタグ付けされた identity を取得（未認証なら None）
    pub async fn identity_of(&self, id: &ConnectionId) -> Option<(UserId, Username)> {
        let connections = self.connections.lock().await;
        let entry = connections.get(id)?;
        match (&entry.user_id, &entry.username) {
            (Some(user_id), Some(username)) => Some((user_id.clone(), username.clone())),
            _ => None,
        }
    }
}

impl Default for WebSocketUpdatePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpdatePusher for WebSocketUpdatePusher {
    async fn register(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        let mut connections = self.connections.lock().await;
        connections.insert(
            connection_id,
            ConnectionEntry {
                sender,
                user_id: None,
                username: None,
                authenticated: false,
            },
        );
        tracing::debug!("Connection '{}' registered to UpdatePusher", connection_id);
        connection_id
    }

    async fn set_identity(
        &self,
        id: &ConnectionId,
        user_id: UserId,
        username: Username,
    ) -> Result<(), PushError> {
        let mut connections = self.connections.lock().await;
        let entry = connections
            .get_mut(id)
            .ok_or_else(|| PushError::ConnectionNotFound(id.to_string()))?;

        // 再宣言は最後に成功したものが勝つ
        entry.user_id = Some(user_id);
        entry.username = Some(username);
        entry.authenticated = true;
        tracing::debug!("Connection '{}' tagged with identity", id);
        Ok(())
    }

    async fn unregister(&self, id: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.remove(id);
        tracing::debug!("Connection '{}' unregistered from UpdatePusher", id);
    }

    async fn broadcast_event(&self, event: &PlacementEvent) -> usize {
        let message = PixelUpdateMessage::from(*event);
        let json = match serde_json::to_string(&message) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize placement event: {}", e);
                return 0;
            }
        };

        let mut connections = self.connections.lock().await;
        let mut delivered = 0;

        // 送信に失敗した接続（受信側が drop 済み）はここで取り除く
        connections.retain(|id, entry| {
            if entry.sender.send(json.clone()).is_ok() {
                delivered += 1;
                true
            } else {
                tracing::warn!("Dropping dead connection '{}' during broadcast", id);
                false
            }
        });

        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Color;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - WebSocketUpdatePusher の接続レジストリとファンアウト
    // - broadcast_event: 認証の有無を問わない全接続への配信
    // - エラーハンドリング（死んだ接続、存在しない接続）
    //
    // 【なぜこのテストが必要か】
    // - ファンアウトは同期エンジンの読み取り側の中核
    // - 一部の接続の失敗が他の接続への配信を妨げないことを保証する
    //
    // 【どのようなシナリオをテストするか】
    // 1. 登録 → 配信 → 全員が受信
    // 2. 未認証の接続も配信対象になる
    // 3. 死んだ接続が配信中に取り除かれる
    // 4. unregister の冪等性
    // ========================================

    fn test_event() -> PlacementEvent {
        PlacementEvent {
            x: 10,
            y: 20,
            color: Color::new(5).unwrap(),
        }
    }

    fn test_identity() -> (UserId, Username) {
        (
            UserId::new("u1".to_string()).unwrap(),
            Username::new("alice".to_string()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_connections() {
        // テスト項目: 登録中の全接続にイベントが配信される
        // given (前提条件):
        let pusher = WebSocketUpdatePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register(tx1).await;
        pusher.register(tx2).await;

        // when (操作):
        let delivered = pusher.broadcast_event(&test_event()).await;

        // then (期待する結果):
        assert_eq!(delivered, 2);
        let msg1 = rx1.recv().await.unwrap();
        let msg2 = rx2.recv().await.unwrap();
        assert!(msg1.contains("PIXEL_UPDATE"));
        assert_eq!(msg1, msg2);
    }

    #[tokio::test]
    async fn test_broadcast_includes_unauthenticated_connections() {
        // テスト項目: 未認証の接続もブロードキャスト対象になる
        // given (前提条件): 認証済み 1、未認証 1
        let pusher = WebSocketUpdatePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let authed = pusher.register(tx1).await;
        pusher.register(tx2).await;
        let (user_id, username) = test_identity();
        pusher.set_identity(&authed, user_id, username).await.unwrap();

        // when (操作):
        let delivered = pusher.broadcast_event(&test_event()).await;

        // then (期待する結果):
        assert_eq!(delivered, 2);
        assert!(rx1.recv().await.is_some());
        assert!(rx2.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_dead_connection_removed_during_broadcast() {
        // テスト項目: 死んだ接続が配信中に取り除かれ、他の配信は継続する
        // given (前提条件): 片方の受信側を drop する
        let pusher = WebSocketUpdatePusher::new();
        let (tx1, rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register(tx1).await;
        pusher.register(tx2).await;
        drop(rx1);

        // when (操作):
        let delivered = pusher.broadcast_event(&test_event()).await;

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert!(rx2.recv().await.is_some());
        assert_eq!(pusher.connection_count().await, 1);
    }

    #[tokio::test]
    async fn test_set_identity_on_unknown_connection_fails() {
        // テスト項目: 存在しない接続への identity タグ付けがエラーになる
        // given (前提条件):
        let pusher = WebSocketUpdatePusher::new();
        let (user_id, username) = test_identity();

        // when (操作):
        let result = pusher
            .set_identity(&ConnectionId::generate(), user_id, username)
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(PushError::ConnectionNotFound(_))));
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        // テスト項目: unregister を繰り返し呼んでも安全である
        // given (前提条件):
        let pusher = WebSocketUpdatePusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = pusher.register(tx).await;

        // when (操作):
        pusher.unregister(&id).await;
        pusher.unregister(&id).await;

        // then (期待する結果):
        assert_eq!(pusher.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_identity_tag_stored_on_connection() {
        // テスト項目: identity 宣言後に表示名が接続にタグ付けされる
        // given (前提条件):
        let pusher = WebSocketUpdatePusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = pusher.register(tx).await;
        let (user_id, username) = test_identity();

        // when (操作):
        pusher.set_identity(&id, user_id, username).await.unwrap();

        // then (期待する結果):
        assert_eq!(pusher.is_authenticated(&id).await, Some(true));
        let (user_id, username) = pusher.identity_of(&id).await.unwrap();
        assert_eq!(user_id.as_str(), "u1");
        assert_eq!(username.as_str(), "alice");
    }
}
