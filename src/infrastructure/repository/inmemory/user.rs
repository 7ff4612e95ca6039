//! InMemory User Repository 実装
//!
//! ユーザーレコードは外部の identity / ストレージコラボレータが所有するが、
//! クールダウン関連フィールドの書き込みはこの Repository 経由でのみ行われる。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RepositoryError, Timestamp, User, UserId, UserRepository};

/// インメモリ User Repository 実装
pub struct InMemoryUserRepository {
    /// Key: user_id, Value: ユーザーレコード
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    /// 空の Repository を作成
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    /// 初期ユーザーを投入した Repository を作成（起動時のロードに相当）
    pub fn with_users(users: Vec<User>) -> Self {
        let map = users
            .into_iter()
            .map(|user| (user.id.as_str().to_string(), user))
            .collect();
        Self {
            users: Mutex::new(map),
        }
    }

    /// ユーザーレコードを追加または上書き
    pub async fn upsert(&self, user: User) {
        let mut users = self.users.lock().await;
        users.insert(user.id.as_str().to_string(), user);
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_user(&self, id: &UserId) -> Result<User, RepositoryError> {
        let users = self.users.lock().await;
        users
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| RepositoryError::UserNotFound(id.as_str().to_string()))
    }

    async fn record_placement(&self, id: &UserId, now: Timestamp) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(id.as_str())
            .ok_or_else(|| RepositoryError::UserNotFound(id.as_str().to_string()))?;
        user.record_placement(now);
        Ok(())
    }

    async fn top_by_placements(&self, limit: usize) -> Vec<User> {
        let users = self.users.lock().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        // Sort by placement count descending, then username for a stable order
        all.sort_by(|a, b| {
            b.placement_count
                .cmp(&a.placement_count)
                .then_with(|| a.username.as_str().cmp(b.username.as_str()))
        });
        all.truncate(limit);
        all
    }
}
