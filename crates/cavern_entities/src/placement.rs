//! # Placement Rules
//!
//! Whether an item may be placed at a cell, queried by item previews before
//! spawning the entity. Rules only read the grid store.

use serde::{Deserialize, Serialize};

use cavern_core::{GridPos, GridStore};

/// Default air column a ladder needs above its target cell.
pub const DEFAULT_LADDER_AIR: u32 = 6;

/// Upper bound on how far [`air_tile_count_above`] scans.
pub const MAX_AIR_SCAN: u32 = 4096;

/// Placement constraint of an archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlacementRule {
    /// Stands on a block with a clear column above.
    Ladder {
        /// Consecutive air cells required, counting the target.
        #[serde(default = "default_ladder_air")]
        min_air_above: u32,
    },
    /// Hangs from the underside of a block.
    Rope,
}

const fn default_ladder_air() -> u32 {
    DEFAULT_LADDER_AIR
}

impl PlacementRule {
    /// A ladder needing the default air column.
    #[must_use]
    pub const fn ladder() -> Self {
        Self::Ladder {
            min_air_above: DEFAULT_LADDER_AIR,
        }
    }

    /// Returns true if the rule allows placement at `pos`.
    ///
    /// - Ladder: the cell below is a block and at least `min_air_above`
    ///   consecutive air cells start at `pos`.
    /// - Rope: `pos` is a block and the cell below it is air.
    ///
    /// A cell with no representable cell below is never placeable.
    #[must_use]
    pub fn can_place<G: GridStore + ?Sized>(&self, store: &G, pos: GridPos) -> bool {
        let Some(below) = pos.down() else {
            return false;
        };
        match *self {
            Self::Ladder { min_air_above } => {
                store.is_block(below.x, below.y)
                    && air_tile_count_above(store, pos, true) >= min_air_above
            }
            Self::Rope => store.is_block(pos.x, pos.y) && store.is_air(below.x, below.y),
        }
    }

    /// [`Self::can_place`] at the cell containing a world point. A
    /// non-finite point is never placeable.
    #[must_use]
    pub fn can_place_at<G: GridStore + ?Sized>(&self, store: &G, point: [f32; 2]) -> bool {
        point.iter().all(|v| v.is_finite()) && self.can_place(store, GridPos::from_world(point))
    }
}

/// Where a preview snaps for a world point: the bottom-center of its cell.
#[inline]
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn place_position(point: [f32; 2]) -> [f32; 2] {
    let cell = GridPos::from_world(point);
    [cell.x as f32 + 0.5, cell.y as f32]
}

/// Counts consecutive air cells going up from `pos`, stopping at the first
/// non-air cell or the top of the coordinate range. `include_start`
/// decides whether `pos` itself is counted.
#[must_use]
pub fn air_tile_count_above<G: GridStore + ?Sized>(
    store: &G,
    pos: GridPos,
    include_start: bool,
) -> u32 {
    let mut cell = if include_start { Some(pos) } else { pos.up() };
    let mut count = 0;
    while let Some(current) = cell {
        if count >= MAX_AIR_SCAN || !store.is_air(current.x, current.y) {
            break;
        }
        count += 1;
        cell = current.up();
    }
    count
}
