//! Domain entities: the authoritative canvas, user accounts and
//! committed placement events.

use serde::{Deserialize, Serialize};

use super::{
    error::CanvasError,
    value_object::{Color, Timestamp, UserId, Username},
};

/// Fixed canvas width in pixels
pub const CANVAS_WIDTH: u32 = 150;
/// Fixed canvas height in pixels
pub const CANVAS_HEIGHT: u32 = 150;

/// The authoritative W×H matrix of palette color indices.
///
/// Mutated only through [`Canvas::set_pixel`] while the owner holds
/// exclusive access; readers take full copies via [`Canvas::snapshot`]
/// so they never observe a partially written row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    /// Row-major pixel buffer, `height * width` entries
    pixels: Vec<u8>,
}

impl Canvas {
    /// Create a blank canvas (all pixels set to palette index 0)
    pub fn new() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            pixels: vec![0; (CANVAS_WIDTH * CANVAS_HEIGHT) as usize],
        }
    }

    /// Reconstruct a canvas from a previously persisted pixel buffer.
    ///
    /// The buffer must hold exactly `width * height` entries, all within
    /// the palette range.
    pub fn from_pixels(pixels: Vec<u8>) -> Result<Self, CanvasError> {
        if pixels.len() != (CANVAS_WIDTH * CANVAS_HEIGHT) as usize {
            // Treat a wrong-sized buffer as a bounds violation at the far edge
            return Err(CanvasError::OutOfBounds {
                x: CANVAS_WIDTH,
                y: CANVAS_HEIGHT,
            });
        }
        if let Some(&value) = pixels.iter().find(|&&p| p > super::value_object::MAX_COLOR_INDEX) {
            return Err(CanvasError::InvalidColor { value });
        }
        Ok(Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            pixels,
        })
    }

    /// Check a coordinate against the fixed canvas dimensions
    pub fn validate_coords(x: u32, y: u32) -> Result<(), CanvasError> {
        if x >= CANVAS_WIDTH || y >= CANVAS_HEIGHT {
            return Err(CanvasError::OutOfBounds { x, y });
        }
        Ok(())
    }

    /// Set one pixel and return its previous color
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) -> Result<Color, CanvasError> {
        Self::validate_coords(x, y)?;
        let index = (y * self.width + x) as usize;
        let previous = self.pixels[index];
        self.pixels[index] = color.value();
        // Stored values always pass through Color, so this cannot fail
        Ok(Color::new(previous)?)
    }

    /// Read one pixel
    pub fn pixel_at(&self, x: u32, y: u32) -> Result<u8, CanvasError> {
        Self::validate_coords(x, y)?;
        Ok(self.pixels[(y * self.width + x) as usize])
    }

    /// Take a point-in-time copy of the whole canvas
    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

/// Consistent point-in-time copy of the canvas, safe to read without locks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasSnapshot {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// A user account with the cooldown-relevant bookkeeping fields.
///
/// The account itself is owned by the external identity collaborator;
/// `last_placement_at` and `placement_count` are mutated only as part of
/// a committed placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub last_placement_at: Option<Timestamp>,
    pub placement_count: u64,
    pub is_admin: bool,
}

impl User {
    /// Create a fresh account with no placement history
    pub fn new(id: UserId, username: Username, is_admin: bool) -> Self {
        Self {
            id,
            username,
            last_placement_at: None,
            placement_count: 0,
            is_admin,
        }
    }

    /// Record an accepted placement at the given server arrival time
    pub fn record_placement(&mut self, now: Timestamp) {
        self.last_placement_at = Some(now);
        self.placement_count += 1;
    }
}

/// The durable fact broadcast to viewers after a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementEvent {
    pub x: u32,
    pub y: u32,
    pub color: Color,
}
