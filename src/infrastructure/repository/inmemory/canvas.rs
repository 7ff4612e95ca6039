//! InMemory Canvas Repository 実装
//!
//! ドメイン層が定義する CanvasRepository trait の具体的な実装。
//! Canvas ドメインモデルを Mutex で保護し、全ての変更を直列化します。
//! snapshot はロック下で完全なコピーを取るため、部分的な書き込みを
//! 観測することはありません。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Canvas, CanvasError, CanvasRepository, CanvasSnapshot, Color};

/// インメモリ Canvas Repository 実装
pub struct InMemoryCanvasRepository {
    /// Canvas ドメインモデル（排他アクセスで保護）
    canvas: Mutex<Canvas>,
}

impl InMemoryCanvasRepository {
    /// 新しい InMemoryCanvasRepository を作成
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas: Mutex::new(canvas),
        }
    }
}

#[async_trait]
impl CanvasRepository for InMemoryCanvasRepository {
    async fn set_pixel(&self, x: u32, y: u32, color: Color) -> Result<Color, CanvasError> {
        let mut canvas = self.canvas.lock().await;
        canvas.set_pixel(x, y, color)
    }

    async fn snapshot(&self) -> CanvasSnapshot {
        let canvas = self.canvas.lock().await;
        canvas.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_set_pixel_returns_previous_color() {
        // テスト項目: set_pixel が直前の色を返し、状態が更新される
        // given (前提条件):
        let repo = InMemoryCanvasRepository::new(Canvas::new());

        // when (操作):
        let first = repo.set_pixel(0, 0, Color::new(5).unwrap()).await.unwrap();
        let second = repo.set_pixel(0, 0, Color::new(9).unwrap()).await.unwrap();

        // then (期待する結果):
        assert_eq!(first.value(), 0);
        assert_eq!(second.value(), 5);
        assert_eq!(repo.snapshot().await.pixels[0], 9);
    }

    #[tokio::test]
    async fn test_out_of_bounds_rejected() {
        // テスト項目: 範囲外の座標への書き込みが拒否される
        // given (前提条件):
        let repo = InMemoryCanvasRepository::new(Canvas::new());

        // when (操作):
        let result = repo.set_pixel(0, 150, Color::new(1).unwrap()).await;

        // then (期待する結果):
        assert_eq!(result, Err(CanvasError::OutOfBounds { x: 0, y: 150 }));
    }

    #[tokio::test]
    async fn test_concurrent_writes_to_distinct_cells() {
        // テスト項目: 別々のセルへの並行書き込みで状態が壊れない
        // given (前提条件):
        let repo = Arc::new(InMemoryCanvasRepository::new(Canvas::new()));

        // when (操作): 100 セルへ並行に書き込む
        let mut handles = Vec::new();
        for i in 0..100u32 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.set_pixel(i, 0, Color::new(7).unwrap()).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        let snapshot = repo.snapshot().await;
        for i in 0..100usize {
            assert_eq!(snapshot.pixels[i], 7);
        }
    }
}
