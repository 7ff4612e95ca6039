//! InMemory CanvasStore 実装
//!
//! 耐久ストレージは外部コラボレータ（get/set スタイルでアクセス）であり、
//! この実装は同じチャンク形状を持つインメモリのスタンドイン。
//! 書き込みはコミットのレイテンシパス外で fire-and-forget に行われる。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{CanvasChunk, CanvasStore, StoreError, store::CHUNK_COUNT};

/// インメモリ CanvasStore 実装
pub struct InMemoryCanvasStore {
    /// Key: チャンクインデックス, Value: チャンクのピクセル列
    chunks: Mutex<HashMap<u32, Vec<u8>>>,
}

impl InMemoryCanvasStore {
    /// 空のストアを作成
    pub fn new() -> Self {
        Self {
            chunks: Mutex::new(HashMap::new()),
        }
    }

    /// 既存のチャンク集合からストアを作成
    pub fn with_chunks(chunks: Vec<CanvasChunk>) -> Self {
        let map = chunks.into_iter().map(|c| (c.index, c.pixels)).collect();
        Self {
            chunks: Mutex::new(map),
        }
    }
}

impl Default for InMemoryCanvasStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CanvasStore for InMemoryCanvasStore {
    async fn load_chunks(&self) -> Result<Vec<CanvasChunk>, StoreError> {
        let chunks = self.chunks.lock().await;
        let mut loaded: Vec<CanvasChunk> = chunks
            .iter()
            .map(|(&index, pixels)| CanvasChunk {
                index,
                pixels: pixels.clone(),
            })
            .collect();
        loaded.sort_by_key(|c| c.index);
        Ok(loaded)
    }

    async fn save_chunk(&self, chunk: CanvasChunk) -> Result<(), StoreError> {
        if chunk.index >= CHUNK_COUNT {
            return Err(StoreError::InvalidChunkIndex(chunk.index));
        }
        let mut chunks = self.chunks.lock().await;
        chunks.insert(chunk.index, chunk.pixels);
        Ok(())
    }
}
