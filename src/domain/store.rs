//! Chunked canvas persistence seam.
//!
//! The durable backing store keeps the canvas as fixed-size row chunks.
//! It is loaded once at startup and written fire-and-forget after commits;
//! persistence is never a precondition for broadcasting.

use async_trait::async_trait;

use super::{
    entity::{CANVAS_HEIGHT, CANVAS_WIDTH, Canvas, CanvasSnapshot},
    error::StoreError,
};

/// Number of canvas rows per chunk
pub const CHUNK_ROWS: u32 = 10;
/// Total number of chunks covering the canvas
pub const CHUNK_COUNT: u32 = CANVAS_HEIGHT / CHUNK_ROWS;

/// One fixed run of canvas rows, as persisted in the backing store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasChunk {
    /// Chunk position, `0..CHUNK_COUNT`
    pub index: u32,
    /// Row-major pixels for `CHUNK_ROWS` rows
    pub pixels: Vec<u8>,
}

/// Chunk index covering the given canvas row
pub fn chunk_index_for_row(y: u32) -> u32 {
    y / CHUNK_ROWS
}

/// Extract one chunk from a canvas snapshot
pub fn extract_chunk(snapshot: &CanvasSnapshot, index: u32) -> Result<CanvasChunk, StoreError> {
    if index >= CHUNK_COUNT {
        return Err(StoreError::InvalidChunkIndex(index));
    }
    let row_len = CANVAS_WIDTH as usize;
    let start = (index * CHUNK_ROWS) as usize * row_len;
    let end = start + (CHUNK_ROWS as usize * row_len);
    Ok(CanvasChunk {
        index,
        pixels: snapshot.pixels[start..end].to_vec(),
    })
}

/// Reassemble a canvas from a full set of chunks.
///
/// Every chunk index in `0..CHUNK_COUNT` must be present exactly once and
/// carry `CHUNK_ROWS * CANVAS_WIDTH` pixels.
pub fn assemble_canvas(mut chunks: Vec<CanvasChunk>) -> Result<Canvas, StoreError> {
    if chunks.len() != CHUNK_COUNT as usize {
        return Err(StoreError::MissingChunks);
    }
    chunks.sort_by_key(|c| c.index);

    let chunk_len = (CHUNK_ROWS * CANVAS_WIDTH) as usize;
    let mut pixels = Vec::with_capacity((CANVAS_WIDTH * CANVAS_HEIGHT) as usize);
    for (expected_index, chunk) in chunks.into_iter().enumerate() {
        if chunk.index != expected_index as u32 {
            return Err(StoreError::MissingChunks);
        }
        if chunk.pixels.len() != chunk_len {
            return Err(StoreError::InvalidChunkSize {
                index: chunk.index,
                len: chunk.pixels.len(),
            });
        }
        pixels.extend_from_slice(&chunk.pixels);
    }

    Canvas::from_pixels(pixels).map_err(|_| StoreError::MissingChunks)
}

/// Durable backing store for the canvas, accessed via get/set operations
#[async_trait]
pub trait CanvasStore: Send + Sync {
    /// Load all persisted chunks; an empty result means a fresh canvas
    async fn load_chunks(&self) -> Result<Vec<CanvasChunk>, StoreError>;

    /// Persist one chunk, overwriting any previous version
    async fn save_chunk(&self, chunk: CanvasChunk) -> Result<(), StoreError>;
}
