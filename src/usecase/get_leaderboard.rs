//! UseCase: リーダーボード取得処理
//!
//! 配置数の上位 10 ユーザーを返す。`waiting_time_seconds` は
//! クエリ時点での残りクールダウン秒数（管理者と配置可能なユーザーは 0）。

use std::sync::Arc;

use crate::{
    common::time::Clock,
    domain::{Timestamp, UserId, UserRepository, Username, remaining_cooldown_seconds},
};

/// リーダーボードの最大エントリ数
pub const LEADERBOARD_SIZE: usize = 10;

/// リーダーボードの 1 エントリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub username: Username,
    pub placement_count: u64,
    pub waiting_time_seconds: u64,
}

/// リーダーボード取得のユースケース
pub struct GetLeaderboardUseCase {
    /// User Repository
    users: Arc<dyn UserRepository>,
    /// Clock（残りクールダウンの評価時刻）
    clock: Arc<dyn Clock>,
}

impl GetLeaderboardUseCase {
    /// 新しい GetLeaderboardUseCase を作成
    pub fn new(users: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }

    /// 配置数の降順で上位エントリを取得
    pub async fn execute(&self) -> Vec<LeaderboardEntry> {
        let now = Timestamp::new(self.clock.now_millis());
        self.users
            .top_by_placements(LEADERBOARD_SIZE)
            .await
            .into_iter()
            .map(|user| {
                let waiting_time_seconds = remaining_cooldown_seconds(&user, now);
                LeaderboardEntry {
                    user_id: user.id,
                    username: user.username,
                    placement_count: user.placement_count,
                    waiting_time_seconds,
                }
            })
            .collect()
    }
}
