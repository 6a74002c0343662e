//! # Grid Store Capability
//!
//! Generation and occupancy both write through [`GridStore`]. They reach the
//! store through a [`GridHandle`] handed to them at construction, which may
//! be empty until the world finishes loading.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::coord::GridPos;
use crate::receiver::TileReceiver;
use crate::tile::{TileKind, TileUpdateReason};

/// The persistent grid of tile kinds and per-cell receivers.
///
/// Implementations own their bounds: out-of-range coordinates must be
/// rejected (writes) or answered with a fixed value (reads) by the store.
pub trait GridStore {
    /// Writes a tile.
    fn set_tile(
        &mut self,
        x: i32,
        y: i32,
        tile: TileKind,
        reason: TileUpdateReason,
        update_visuals: bool,
    );

    /// Reads a tile.
    fn get_tile(&self, x: i32, y: i32) -> TileKind;

    /// Registers (or with `None`, clears) the receiver of a cell.
    fn set_receiver(&mut self, x: i32, y: i32, receiver: Option<TileReceiver>);

    /// Returns the receiver registered at a cell.
    fn receiver_at(&self, x: i32, y: i32) -> Option<TileReceiver>;

    /// Returns true if the cell blocks movement.
    fn is_block(&self, x: i32, y: i32) -> bool {
        self.get_tile(x, y).is_block()
    }

    /// Returns true if the cell is empty.
    fn is_air(&self, x: i32, y: i32) -> bool {
        self.get_tile(x, y).is_air()
    }

    /// Reads a tile by position.
    fn tile_at(&self, pos: GridPos) -> TileKind {
        self.get_tile(pos.x, pos.y)
    }
}

/// Shared, possibly-uninitialized handle to a grid store.
///
/// Cloning the handle shares the store. Every [`GridHandle::with_store`] call
/// holds the lock for its whole closure, so a caller can make a multi-cell
/// change (vacate + claim) atomic with respect to other handle holders.
pub struct GridHandle<G> {
    inner: Arc<Mutex<Option<G>>>,
}

impl<G> GridHandle<G> {
    /// Creates a handle around a ready store.
    #[must_use]
    pub fn new(store: G) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(store))),
        }
    }

    /// Creates a handle whose store is not available yet.
    #[must_use]
    pub fn uninitialized() -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
        }
    }

    /// Installs (or replaces) the store, returning the previous one.
    pub fn install(&self, store: G) -> Option<G> {
        self.inner.lock().replace(store)
    }

    /// Removes the store, leaving the handle uninitialized.
    pub fn take(&self) -> Option<G> {
        self.inner.lock().take()
    }

    /// Returns true if a store is installed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.inner.lock().is_some()
    }

    /// Runs `f` against the store under the lock.
    ///
    /// Returns `None` without calling `f` when no store is installed.
    pub fn with_store<R>(&self, f: impl FnOnce(&mut G) -> R) -> Option<R> {
        self.inner.lock().as_mut().map(f)
    }
}

impl<G> Clone for GridHandle<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G> Default for GridHandle<G> {
    fn default() -> Self {
        Self::uninitialized()
    }
}

impl<G> fmt::Debug for GridHandle<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridHandle")
            .field("ready", &self.is_ready())
            .finish()
    }
}
