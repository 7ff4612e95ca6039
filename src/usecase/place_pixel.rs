//! UseCase: ピクセル配置処理（コミットパイプライン）
//!
//! validate → admission → mutate → broadcast を 1 つのアトミックな
//! コミット単位として実行する。admission の判定とクールダウン記録の
//! 更新は同一のコミットロック下で行われ、check-then-act 競合を閉じる。
//!
//! 永続化（チャンク書き込み）はコミットのレイテンシパスから外れた
//! fire-and-forget であり、ブロードキャストの前提条件ではない。

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    common::time::Clock,
    domain::{
        AdmissionVerdict, Canvas, CanvasRepository, CanvasStore, Color, PlacementEvent, Timestamp,
        UpdatePusher, UserId, UserRepository, evaluate_admission,
        store::{chunk_index_for_row, extract_chunk},
    },
};

use super::error::PlacePixelError;

/// ピクセル配置のユースケース
pub struct PlacePixelUseCase {
    /// Canvas Repository（権威あるキャンバス状態）
    canvas: Arc<dyn CanvasRepository>,
    /// User Repository(クールダウン記録の唯一の書き手)
    users: Arc<dyn UserRepository>,
    /// UpdatePusher（コミット済みイベントのファンアウト）
    pusher: Arc<dyn UpdatePusher>,
    /// CanvasStore（チャンク単位の fire-and-forget 永続化）
    store: Arc<dyn CanvasStore>,
    /// Clock（サーバ到着時刻の供給源）
    clock: Arc<dyn Clock>,
    /// コミットロック
    ///
    /// 同一ユーザーの evaluate + record が stale な last_placement_at を
    /// 観測しないよう、コミット単位全体を直列化する。
    commit_lock: Mutex<()>,
}

impl PlacePixelUseCase {
    /// 新しい PlacePixelUseCase を作成
    pub fn new(
        canvas: Arc<dyn CanvasRepository>,
        users: Arc<dyn UserRepository>,
        pusher: Arc<dyn UpdatePusher>,
        store: Arc<dyn CanvasStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            canvas,
            users,
            pusher,
            store,
            clock,
            commit_lock: Mutex::new(()),
        }
    }

    /// ピクセル配置を実行
    ///
    /// # Arguments
    ///
    /// * `user_id` - リクエスト認証コラボレータが確立したユーザー ID
    /// * `x`, `y` - 配置先の座標
    /// * `color_value` - パレットの色インデックス
    ///
    /// # Returns
    ///
    /// * `Ok(PlacementEvent)` - コミット成功（イベントは全接続へ配信済み）
    /// * `Err(PlacePixelError)` - 拒否（状態変更もブロードキャストもなし）
    pub async fn execute(
        &self,
        user_id: UserId,
        x: u32,
        y: u32,
        color_value: u8,
    ) -> Result<PlacementEvent, PlacePixelError> {
        // 1. 境界と色の検証（状態に依存しないため、ロック外で行う）
        Canvas::validate_coords(x, y)?;
        let color = Color::new(color_value)?;

        let event = {
            let _guard = self.commit_lock.lock().await;

            // 2. Admission 判定（サーバ到着時刻で評価）
            let now = Timestamp::new(self.clock.now_millis());
            let user = self
                .users
                .get_user(&user_id)
                .await
                .map_err(|_| PlacePixelError::UserNotFound(user_id.as_str().to_string()))?;

            if let AdmissionVerdict::Deny { remaining_seconds } = evaluate_admission(&user, now) {
                return Err(PlacePixelError::Cooldown { remaining_seconds });
            }

            // 3. キャンバスを更新
            self.canvas.set_pixel(x, y, color).await?;

            // 4. クールダウン記録を更新（管理者は記録対象外）
            if !user.is_admin {
                self.users
                    .record_placement(&user_id, now)
                    .await
                    .map_err(|_| PlacePixelError::UserNotFound(user_id.as_str().to_string()))?;
            }

            // 5. コミット単位の一部としてブロードキャストを enqueue
            let event = PlacementEvent { x, y, color };
            let delivered = self.pusher.broadcast_event(&event).await;
            tracing::debug!(
                "Placement ({}, {}) color {} by '{}' broadcast to {} connections",
                x,
                y,
                color.value(),
                user_id,
                delivered
            );

            event
        };

        // 6. 影響を受けたチャンクをレイテンシパス外で永続化
        self.schedule_chunk_persistence(y);

        Ok(event)
    }

    /// 指定した行を含むチャンクの保存タスクを起動
    fn schedule_chunk_persistence(&self, y: u32) {
        let canvas = self.canvas.clone();
        let store = self.store.clone();
        let index = chunk_index_for_row(y);

        tokio::spawn(async move {
            let snapshot = canvas.snapshot().await;
            let chunk = match extract_chunk(&snapshot, index) {
                Ok(chunk) => chunk,
                Err(e) => {
                    tracing::error!("Failed to extract chunk {}: {}", index, e);
                    return;
                }
            };
            if let Err(e) = store.save_chunk(chunk).await {
                tracing::warn!("Failed to persist chunk {}: {}", index, e);
            }
        });
    }
}
