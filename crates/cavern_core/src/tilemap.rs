//! # In-Memory Tile Map
//!
//! A rectangular [`GridStore`] holding one [`TileKind`] and one optional
//! [`TileReceiver`] per cell.
//!
//! ## Bounds
//!
//! Writes outside `[0, width) x [0, height)` are ignored. Reads outside the
//! map return [`TileKind::Bedrock`] so the world edge is solid to queries.
//!
//! ## Notifications
//!
//! When a cell with a registered receiver is written, the receiver is sent a
//! [`TileEvent::TileUpdated`]. [`TileMap::crumble`] sends
//! [`TileEvent::CrumbleNotified`].
//!
//! ## Dirty cells
//!
//! Writes with `update_visuals` mark their cell in a bitset, one bit per
//! cell, so the dirty set never outgrows the map however often a cell is
//! rewritten. [`TileMap::take_dirty`] drains it in row-major order.

use crate::coord::GridPos;
use crate::events::{EventSender, TileEvent};
use crate::grid::GridStore;
use crate::receiver::TileReceiver;
use crate::tile::{TileKind, TileUpdateReason};

/// Rectangular in-memory grid store.
#[derive(Clone, Debug)]
pub struct TileMap {
    width: u32,
    height: u32,
    /// Tiles indexed as `[y * width + x]`.
    tiles: Vec<TileKind>,
    receivers: Vec<Option<TileReceiver>>,
    /// Bitset: 1 = written with `update_visuals` since the last
    /// `take_dirty`. 64 cells per word.
    dirty: Vec<u64>,
    dirty_count: usize,
    events: Option<EventSender>,
}

impl TileMap {
    /// Creates a map filled with air.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let cells = width as usize * height as usize;
        Self {
            width,
            height,
            tiles: vec![TileKind::Air; cells],
            receivers: vec![None; cells],
            dirty: vec![0; cells.div_ceil(64)],
            dirty_count: 0,
            events: None,
        }
    }

    /// Attaches the channel receivers are notified on.
    #[must_use]
    pub fn with_events(mut self, sender: EventSender) -> Self {
        self.events = Some(sender);
        self
    }

    /// Map width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Map height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns true if the cell lies inside the map.
    #[inline]
    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Notifies the receiver at `(x, y)` that its cell is crumbling.
    ///
    /// Returns `true` if a receiver was registered there.
    pub fn crumble(&mut self, x: i32, y: i32) -> bool {
        let Some(receiver) = self.receiver_at(x, y) else {
            return false;
        };
        self.notify(TileEvent::CrumbleNotified {
            receiver,
            pos: GridPos::new(x, y),
        });
        true
    }

    /// Number of distinct dirty cells.
    #[inline]
    #[must_use]
    pub const fn dirty_count(&self) -> usize {
        self.dirty_count
    }

    /// Returns and clears the cells written with `update_visuals` set,
    /// each once, row-major from `y = 0`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn take_dirty(&mut self) -> Vec<GridPos> {
        let width = self.width as usize;
        let mut cells = Vec::with_capacity(self.dirty_count);
        for (word_index, word) in self.dirty.iter_mut().enumerate() {
            let mut bits = std::mem::take(word);
            while bits != 0 {
                let index = word_index * 64 + bits.trailing_zeros() as usize;
                bits &= bits - 1;
                cells.push(GridPos::new((index % width) as i32, (index / width) as i32));
            }
        }
        self.dirty_count = 0;
        cells
    }

    #[inline]
    fn mark_dirty(&mut self, index: usize) {
        let mask = 1u64 << (index % 64);
        let word = &mut self.dirty[index / 64];
        if *word & mask == 0 {
            *word |= mask;
            self.dirty_count += 1;
        }
    }

    /// Raw tile bytes, row-major from `y = 0`.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tiles)
    }

    /// Counts cells of a given kind.
    #[must_use]
    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|&&t| t == kind).count()
    }

    fn notify(&self, event: TileEvent) {
        if let Some(sender) = &self.events {
            sender.send(event);
        }
    }
}

impl GridStore for TileMap {
    fn set_tile(
        &mut self,
        x: i32,
        y: i32,
        tile: TileKind,
        reason: TileUpdateReason,
        update_visuals: bool,
    ) {
        let Some(index) = self.index(x, y) else {
            tracing::trace!(x, y, ?reason, "rejected out-of-bounds tile write");
            return;
        };
        self.tiles[index] = tile;
        if update_visuals {
            self.mark_dirty(index);
        }
        if let Some(receiver) = self.receivers[index] {
            self.notify(TileEvent::TileUpdated {
                receiver,
                pos: GridPos::new(x, y),
                reason,
            });
        }
    }

    fn get_tile(&self, x: i32, y: i32) -> TileKind {
        self.index(x, y)
            .map_or(TileKind::Bedrock, |index| self.tiles[index])
    }

    fn set_receiver(&mut self, x: i32, y: i32, receiver: Option<TileReceiver>) {
        match self.index(x, y) {
            Some(index) => self.receivers[index] = receiver,
            None => tracing::trace!(x, y, "rejected out-of-bounds receiver write"),
        }
    }

    fn receiver_at(&self, x: i32, y: i32) -> Option<TileReceiver> {
        self.index(x, y).and_then(|index| self.receivers[index])
    }
}
