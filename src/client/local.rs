//! Local canvas mirror maintained by the viewer client.

use crate::{
    domain::{CANVAS_HEIGHT, CANVAS_WIDTH, MAX_COLOR_INDEX},
    infrastructure::dto::websocket::PixelUpdatePayload,
};

/// Client-side mirror of the shared canvas.
///
/// Updates are applied strictly in receipt order; because the hub
/// serializes broadcasts through each connection's queue, receipt order
/// equals commit order and the mirror converges to the server state.
#[derive(Debug, Clone)]
pub struct LocalCanvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl LocalCanvas {
    /// Create a mirror initialized to color index 0
    pub fn new() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            pixels: vec![0; (CANVAS_WIDTH * CANVAS_HEIGHT) as usize],
        }
    }

    /// Replace the whole mirror with a server snapshot.
    ///
    /// Returns `false` (leaving the mirror untouched) if the snapshot
    /// dimensions do not match.
    pub fn reset(&mut self, width: u32, height: u32, pixels: Vec<u8>) -> bool {
        if width != self.width || height != self.height {
            return false;
        }
        if pixels.len() != (width * height) as usize {
            return false;
        }
        self.pixels = pixels;
        true
    }

    /// Apply one broadcast update.
    ///
    /// Returns `false` if the update is outside the grid or carries an
    /// invalid color; the mirror is left unchanged in that case.
    pub fn apply(&mut self, update: &PixelUpdatePayload) -> bool {
        if update.x >= self.width || update.y >= self.height {
            return false;
        }
        if update.color > MAX_COLOR_INDEX {
            return false;
        }
        self.pixels[(update.y * self.width + update.x) as usize] = update.color;
        true
    }

    /// Color index at the given cell, or `None` if out of range
    pub fn pixel_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }
}

impl Default for LocalCanvas {
    fn default() -> Self {
        Self::new()
    }
}
