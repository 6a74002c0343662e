//! # Tile Occupancy
//!
//! Keeps the cells an entity claims in sync with where the entity is.
//!
//! ## Protocol
//!
//! ```text
//! position + carving_offset ──floor──> anchor
//!
//! position not finite -> no writes
//! anchor == applied   -> no writes
//! anchor != applied   -> lock store
//!                          vacate applied (Air, receiver cleared)
//!                          claim anchor   (footprint kinds, receiver set)
//!                        unlock, applied = anchor
//! release()           -> vacate applied once, then never claim again
//! ```
//!
//! Vacate and claim happen under one [`GridHandle`] lock, so no other
//! handle holder observes a half-moved footprint. The controller never
//! writes the entity's own cells while they are claimed by it, so its
//! receiver is not notified of its own carve and uncarve writes.

use std::sync::Arc;

use cavern_core::{
    EntityId, GridHandle, GridPos, GridStore, ReceiverBehavior, TileKind, TileReceiver,
    TileUpdateReason,
};

use crate::footprint::CarveFootprint;
use crate::hook::{ItemGrant, ReleaseHook};

/// Result of an occupancy update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarveOutcome {
    /// The anchor did not change (or nothing was applied); no writes.
    Unchanged,
    /// First claim at `anchor`.
    Applied {
        /// The claimed anchor.
        anchor: GridPos,
    },
    /// The footprint moved.
    Moved {
        /// Previous anchor, now vacated.
        from: GridPos,
        /// New anchor, now claimed.
        to: GridPos,
    },
    /// The footprint at `anchor` was vacated by a release.
    Vacated {
        /// The vacated anchor.
        anchor: GridPos,
    },
    /// The grid store was not initialized; nothing changed and the update
    /// can be retried.
    GridUnavailable,
    /// The controller was released earlier; nothing changed.
    AlreadyReleased,
    /// The position (plus carving offset) was not finite; nothing changed.
    InvalidPosition,
}

impl CarveOutcome {
    /// Returns true if this update wrote to the grid.
    #[inline]
    #[must_use]
    pub const fn wrote(self) -> bool {
        matches!(
            self,
            Self::Applied { .. } | Self::Moved { .. } | Self::Vacated { .. }
        )
    }
}

/// Result of [`TileOccupancyController::release`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReleaseOutcome {
    /// What the vacate did.
    pub outcome: CarveOutcome,
    /// The release hook's grant, only on the first successful release.
    pub grant: Option<ItemGrant>,
}

/// Per-entity footprint controller.
#[derive(Debug)]
pub struct TileOccupancyController<G> {
    entity: EntityId,
    footprint: Arc<CarveFootprint>,
    carving_offset: [f32; 2],
    behavior: ReceiverBehavior,
    release_hook: ReleaseHook,
    grid: GridHandle<G>,
    /// Anchor whose cells are currently claimed.
    applied: Option<GridPos>,
    released: bool,
}

impl<G: GridStore> TileOccupancyController<G> {
    /// Creates a controller with no claimed cells.
    #[must_use]
    pub fn new(entity: EntityId, footprint: Arc<CarveFootprint>, grid: GridHandle<G>) -> Self {
        Self {
            entity,
            footprint,
            carving_offset: [0.0, 0.0],
            behavior: ReceiverBehavior::Inert,
            release_hook: ReleaseHook::None,
            grid,
            applied: None,
            released: false,
        }
    }

    /// Sets the offset added to the world position before flooring.
    #[must_use]
    pub const fn with_carving_offset(mut self, offset: [f32; 2]) -> Self {
        self.carving_offset = offset;
        self
    }

    /// Sets how the registered receiver reacts to cell events.
    #[must_use]
    pub const fn with_behavior(mut self, behavior: ReceiverBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Sets the release hook.
    #[must_use]
    pub const fn with_release_hook(mut self, hook: ReleaseHook) -> Self {
        self.release_hook = hook;
        self
    }

    /// The owning entity.
    #[inline]
    #[must_use]
    pub const fn entity(&self) -> EntityId {
        self.entity
    }

    /// The footprint.
    #[must_use]
    pub fn footprint(&self) -> &CarveFootprint {
        &self.footprint
    }

    /// The receiver registered on every claimed cell.
    #[inline]
    #[must_use]
    pub const fn receiver(&self) -> TileReceiver {
        TileReceiver::new(self.entity, self.behavior)
    }

    /// The release hook.
    #[inline]
    #[must_use]
    pub const fn release_hook(&self) -> ReleaseHook {
        self.release_hook
    }

    /// Anchor of the currently claimed cells, `None` if nothing is claimed.
    #[inline]
    #[must_use]
    pub const fn applied_anchor(&self) -> Option<GridPos> {
        self.applied
    }

    /// Returns true once [`Self::release`] has succeeded.
    #[inline]
    #[must_use]
    pub const fn is_released(&self) -> bool {
        self.released
    }

    /// Absolute cells currently claimed.
    #[must_use]
    pub fn claimed_cells(&self) -> Vec<GridPos> {
        self.applied.map_or_else(Vec::new, |anchor| {
            self.footprint.cells_at(anchor).map(|(pos, _)| pos).collect()
        })
    }

    /// The anchor for a world position: `floor(position + carving_offset)`.
    #[inline]
    #[must_use]
    pub fn anchor_for(&self, position: [f32; 2]) -> GridPos {
        GridPos::from_world([
            position[0] + self.carving_offset[0],
            position[1] + self.carving_offset[1],
        ])
    }

    /// Moves the footprint if the anchor for `position` changed.
    ///
    /// A non-finite position leaves the claimed cells where they are.
    pub fn update_if_necessary(&mut self, position: [f32; 2]) -> CarveOutcome {
        if self.released {
            return CarveOutcome::AlreadyReleased;
        }
        let shifted = [
            position[0] + self.carving_offset[0],
            position[1] + self.carving_offset[1],
        ];
        if !shifted.iter().all(|v| v.is_finite()) {
            tracing::warn!(entity = ?self.entity, ?position, "non-finite position, carve skipped");
            return CarveOutcome::InvalidPosition;
        }
        let anchor = GridPos::from_world(shifted);
        let previous = self.applied;
        if previous == Some(anchor) {
            return CarveOutcome::Unchanged;
        }

        let footprint = &self.footprint;
        let receiver = self.receiver();
        let written = self.grid.with_store(|store| {
            if let Some(previous) = previous {
                vacate(store, footprint, previous);
            }
            claim(store, footprint, anchor, receiver);
        });
        if written.is_none() {
            tracing::warn!(entity = ?self.entity, ?anchor, "grid store unavailable, carve skipped");
            return CarveOutcome::GridUnavailable;
        }

        self.applied = Some(anchor);
        tracing::debug!(entity = ?self.entity, ?previous, ?anchor, "footprint carved");
        match previous {
            Some(from) => CarveOutcome::Moved { from, to: anchor },
            None => CarveOutcome::Applied { anchor },
        }
    }

    /// Vacates the footprint for good.
    ///
    /// Safe to call repeatedly: only the first successful call vacates and
    /// yields the release hook's grant. If the store is unavailable nothing
    /// changes and the release can be retried.
    pub fn release(&mut self) -> ReleaseOutcome {
        if self.released {
            return ReleaseOutcome {
                outcome: CarveOutcome::AlreadyReleased,
                grant: None,
            };
        }

        let outcome = match self.applied {
            None => CarveOutcome::Unchanged,
            Some(anchor) => {
                let footprint = &self.footprint;
                if self
                    .grid
                    .with_store(|store| vacate(store, footprint, anchor))
                    .is_none()
                {
                    tracing::warn!(entity = ?self.entity, ?anchor, "grid store unavailable, release skipped");
                    return ReleaseOutcome {
                        outcome: CarveOutcome::GridUnavailable,
                        grant: None,
                    };
                }
                tracing::debug!(entity = ?self.entity, ?anchor, "footprint vacated");
                CarveOutcome::Vacated { anchor }
            }
        };

        self.applied = None;
        self.released = true;
        ReleaseOutcome {
            outcome,
            grant: self.release_hook.grant_for(self.entity),
        }
    }
}

fn claim<G: GridStore + ?Sized>(
    store: &mut G,
    footprint: &CarveFootprint,
    anchor: GridPos,
    receiver: TileReceiver,
) {
    for (pos, kind) in footprint.cells_at(anchor) {
        store.set_tile(pos.x, pos.y, kind, TileUpdateReason::Carve, true);
        store.set_receiver(pos.x, pos.y, Some(receiver));
    }
}

fn vacate<G: GridStore + ?Sized>(store: &mut G, footprint: &CarveFootprint, anchor: GridPos) {
    for (pos, _) in footprint.cells_at(anchor) {
        store.set_receiver(pos.x, pos.y, None);
        store.set_tile(pos.x, pos.y, TileKind::Air, TileUpdateReason::Uncarve, true);
    }
}
