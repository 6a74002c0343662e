//! # Tile Kinds
//!
//! The persistent state of one grid cell.

use bytemuck::NoUninit;
use serde::{Deserialize, Serialize};

/// What occupies a grid cell.
///
/// Stored as one byte so the whole grid can be snapshotted with `bytemuck`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, NoUninit, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TileKind {
    /// Empty space.
    #[default]
    Air = 0,
    /// Generated cave rock.
    Stone = 1,
    /// Solid block placed by an entity (platforms, crates).
    Solid = 2,
    /// Block belonging to an entity that collapses when its support crumbles.
    CollapsableEntity = 3,
    /// Unbreakable rock. Also what the store reports outside its bounds.
    Bedrock = 4,
}

impl TileKind {
    /// Returns true if this is empty space.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        matches!(self, Self::Air)
    }

    /// Returns true if this cell blocks movement.
    #[inline]
    #[must_use]
    pub const fn is_block(self) -> bool {
        !self.is_air()
    }
}

/// Why a cell was written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileUpdateReason {
    /// Initial world generation.
    Generate,
    /// An entity claimed the cell.
    Carve,
    /// An entity vacated the cell.
    Uncarve,
    /// The cell was broken (mined) by someone other than its claimant.
    Break,
}
