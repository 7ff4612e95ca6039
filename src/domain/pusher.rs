//! UpdatePusher trait 定義
//!
//! コミット済みの配置イベントを全ての接続中ビューアへ配信するための
//! インターフェース。具体的な実装（WebSocket）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    entity::PlacementEvent,
    error::PushError,
    value_object::{ConnectionId, UserId, Username},
};

/// 接続ごとの送信チャンネル
///
/// unbounded チャンネルを使うことで、遅いコネクションへの送信が
/// 他のコネクションへの配信をブロックしない。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// UpdatePusher trait（BroadcastHub）
///
/// 接続レジストリを所有し、コミット済みイベントのファンアウトを行う。
/// 認証は閲覧には不要で、identity は接続にタグ付けされるだけ。
#[async_trait]
pub trait UpdatePusher: Send + Sync {
    /// 新しく開いたチャンネルをレジストリに登録し、接続 ID を返す
    async fn register(&self, sender: PusherChannel) -> ConnectionId;

    /// 接続に identity をタグ付けし、authenticated 状態にする
    ///
    /// 再宣言は許容され、最後に成功した宣言が勝つ。
    async fn set_identity(
        &self,
        id: &ConnectionId,
        user_id: UserId,
        username: Username,
    ) -> Result<(), PushError>;

    /// 接続をレジストリから削除（冪等）
    async fn unregister(&self, id: &ConnectionId);

    /// 登録中の全ての接続（認証の有無を問わない）へイベントを配信し、
    /// 配信に成功した接続数を返す
    ///
    /// 一部の接続への送信失敗は他の接続への配信を妨げない。
    async fn broadcast_event(&self, event: &PlacementEvent) -> usize;
}
