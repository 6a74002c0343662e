//! # Carve Footprints
//!
//! The cells an entity claims while it is placed in the world, as offsets
//! from its anchor cell. A footprint is built once per archetype and shared
//! (behind an `Arc`) by every entity of that archetype.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use cavern_core::{GridPos, TileKind};

use crate::error::{EntityError, EntityResult};

/// One claimed cell: an offset from the anchor and the tile written there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FootprintCell {
    /// Offset x from the anchor.
    pub x: i32,
    /// Offset y from the anchor (up is positive).
    pub y: i32,
    /// Tile written while the cell is claimed.
    pub kind: TileKind,
}

impl FootprintCell {
    /// Creates a cell.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, kind: TileKind) -> Self {
        Self { x, y, kind }
    }

    /// The offset as a grid position.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> GridPos {
        GridPos::new(self.x, self.y)
    }
}

/// A named, ordered set of claimed cells. Immutable after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CarveFootprint {
    name: String,
    cells: Vec<FootprintCell>,
}

impl CarveFootprint {
    /// Creates a footprint, keeping the given cell order.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::DuplicateOffset`] if two cells share an offset,
    /// or [`EntityError::InvalidConfig`] if `cells` is empty.
    pub fn new(name: impl Into<String>, cells: Vec<FootprintCell>) -> EntityResult<Self> {
        let name = name.into();
        if cells.is_empty() {
            return Err(EntityError::InvalidConfig(format!(
                "footprint '{name}' must claim at least one cell"
            )));
        }

        let mut seen = HashSet::with_capacity(cells.len());
        for cell in &cells {
            if !seen.insert(cell.offset()) {
                return Err(EntityError::DuplicateOffset {
                    footprint: name,
                    x: cell.x,
                    y: cell.y,
                });
            }
        }

        Ok(Self { name, cells })
    }

    /// A footprint claiming only the anchor cell.
    #[must_use]
    pub fn single(name: impl Into<String>, kind: TileKind) -> Self {
        Self {
            name: name.into(),
            cells: vec![FootprintCell::new(0, 0, kind)],
        }
    }

    /// A `width x height` rectangle with the anchor at its bottom-left cell.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::InvalidConfig`] if either side is zero.
    pub fn rect(
        name: impl Into<String>,
        width: u8,
        height: u8,
        kind: TileKind,
    ) -> EntityResult<Self> {
        let cells = (0..i32::from(height))
            .flat_map(|y| (0..i32::from(width)).map(move |x| FootprintCell::new(x, y, kind)))
            .collect();
        Self::new(name, cells)
    }

    /// Footprint name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cells in declaration order.
    #[must_use]
    pub fn cells(&self) -> &[FootprintCell] {
        &self.cells
    }

    /// Number of claimed cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false; footprints claim at least one cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Absolute cells claimed when anchored at `anchor`.
    ///
    /// Cells whose coordinates overflow `i32` are unreachable and skipped.
    pub fn cells_at(&self, anchor: GridPos) -> impl Iterator<Item = (GridPos, TileKind)> + '_ {
        self.cells
            .iter()
            .filter_map(move |cell| Some((anchor.checked_add(cell.offset())?, cell.kind)))
    }
}
