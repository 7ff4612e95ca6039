//! UseCase: キャンバス状態取得処理

use std::sync::Arc;

use crate::domain::{CanvasRepository, CanvasSnapshot};

/// キャンバス状態取得のユースケース
pub struct GetCanvasStateUseCase {
    /// Canvas Repository（権威あるキャンバス状態）
    canvas: Arc<dyn CanvasRepository>,
}

impl GetCanvasStateUseCase {
    /// 新しい GetCanvasStateUseCase を作成
    pub fn new(canvas: Arc<dyn CanvasRepository>) -> Self {
        Self { canvas }
    }

    /// キャンバス全体の一貫したスナップショットを取得
    pub async fn execute(&self) -> CanvasSnapshot {
        self.canvas.snapshot().await
    }
}
