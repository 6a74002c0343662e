//! # Tile Surfaces
//!
//! The rendering sink the generator writes autotile variants into.

use crate::bitmask::TileVariant;

/// Receives one variant (or nothing) per cell.
pub trait TileSurface {
    /// Sets or clears the variant drawn at a cell.
    fn set_tile_at(&mut self, x: u32, y: u32, variant: Option<TileVariant>);

    /// Clears every cell.
    fn clear_all(&mut self);
}

/// In-memory square surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileLayer {
    size: u32,
    tiles: Vec<Option<TileVariant>>,
    writes: usize,
}

impl TileLayer {
    /// Creates an empty layer.
    #[must_use]
    pub fn new(size: u32) -> Self {
        Self {
            size,
            tiles: vec![None; size as usize * size as usize],
            writes: 0,
        }
    }

    /// Side length.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Returns the variant at a cell, `None` when empty or out of range.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<TileVariant> {
        if x < self.size && y < self.size {
            self.tiles[y as usize * self.size as usize + x as usize]
        } else {
            None
        }
    }

    /// Returns true if a variant is drawn at `(x, y)`. Negative or
    /// out-of-range coordinates are empty.
    #[must_use]
    pub fn is_drawn(&self, x: i32, y: i32) -> bool {
        match (u32::try_from(x), u32::try_from(y)) {
            (Ok(x), Ok(y)) => self.get(x, y).is_some(),
            _ => false,
        }
    }

    /// Number of `set_tile_at` calls since creation.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }

    /// Row-major cells from `y = 0`.
    #[must_use]
    pub fn tiles(&self) -> &[Option<TileVariant>] {
        &self.tiles
    }
}

impl TileSurface for TileLayer {
    fn set_tile_at(&mut self, x: u32, y: u32, variant: Option<TileVariant>) {
        self.writes += 1;
        if x < self.size && y < self.size {
            self.tiles[y as usize * self.size as usize + x as usize] = variant;
        }
    }

    fn clear_all(&mut self) {
        self.tiles.fill(None);
    }
}
