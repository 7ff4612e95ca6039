//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    entity::{CanvasSnapshot, User},
    error::{CanvasError, RepositoryError},
    value_object::{Color, Timestamp, UserId},
};

/// Canvas Repository trait
///
/// ドメイン層が必要とするキャンバス状態へのインターフェース。
/// 実装は全ての変更を直列化し、snapshot が部分的な書き込みを
/// 観測しないことを保証する。
#[async_trait]
pub trait CanvasRepository: Send + Sync {
    /// 1 ピクセルを更新し、直前の色を返す
    async fn set_pixel(&self, x: u32, y: u32, color: Color) -> Result<Color, CanvasError>;

    /// キャンバス全体の一貫したコピーを取得
    async fn snapshot(&self) -> CanvasSnapshot;
}

/// User Repository trait
///
/// クールダウン関連フィールド（last_placement_at / placement_count）は
/// コミット済みの配置の一部としてのみ更新される。
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーを取得
    async fn get_user(&self, id: &UserId) -> Result<User, RepositoryError>;

    /// コミット済みの配置を記録（最終配置時刻の更新と配置数のインクリメント）
    async fn record_placement(&self, id: &UserId, now: Timestamp) -> Result<(), RepositoryError>;

    /// 配置数の降順で上位 limit 件のユーザーを取得
    async fn top_by_placements(&self, limit: usize) -> Vec<User>;
}
