//! # Grid Coordinates
//!
//! Cells are addressed by integer `(x, y)` with `y` growing upward:
//! the cell "above" `(x, y)` is `(x, y + 1)`.

use serde::{Deserialize, Serialize};

/// A cell coordinate in the world grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    /// X coordinate (columns, grows to the right).
    pub x: i32,
    /// Y coordinate (rows, grows upward).
    pub y: i32,
}

impl GridPos {
    /// Creates a new grid position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Converts a continuous world position to the cell containing it.
    ///
    /// Uses `floor`, so `-0.5` maps to cell `-1`.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_world(position: [f32; 2]) -> Self {
        Self {
            x: position[0].floor() as i32,
            y: position[1].floor() as i32,
        }
    }

    /// Returns `self + offset`, or `None` if either axis leaves the `i32`
    /// range.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, offset: Self) -> Option<Self> {
        match (self.x.checked_add(offset.x), self.y.checked_add(offset.y)) {
            (Some(x), Some(y)) => Some(Self::new(x, y)),
            _ => None,
        }
    }

    /// Returns the cell directly above, `None` at the top of the `i32` range.
    #[inline]
    #[must_use]
    pub const fn up(self) -> Option<Self> {
        self.checked_add(Self::new(0, 1))
    }

    /// Returns the cell directly below, `None` at the bottom of the `i32`
    /// range.
    #[inline]
    #[must_use]
    pub const fn down(self) -> Option<Self> {
        self.checked_add(Self::new(0, -1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_world_floors() {
        assert_eq!(GridPos::from_world([0.0, 0.0]), GridPos::new(0, 0));
        assert_eq!(GridPos::from_world([3.99, 4.01]), GridPos::new(3, 4));
        assert_eq!(GridPos::from_world([-0.5, -1.0]), GridPos::new(-1, -1));
        assert_eq!(GridPos::from_world([-1.01, 2.5]), GridPos::new(-2, 2));
    }

    #[test]
    fn test_offsets() {
        let pos = GridPos::new(3, 4);
        assert_eq!(pos.checked_add(GridPos::new(1, 0)), Some(GridPos::new(4, 4)));
        assert_eq!(pos.up(), Some(GridPos::new(3, 5)));
        assert_eq!(pos.down(), Some(GridPos::new(3, 3)));
    }

    #[test]
    fn test_offsets_at_range_limits() {
        let top = GridPos::new(0, i32::MAX);
        let bottom = GridPos::new(0, i32::MIN);
        assert_eq!(top.up(), None);
        assert_eq!(top.down(), Some(GridPos::new(0, i32::MAX - 1)));
        assert_eq!(bottom.down(), None);
        assert_eq!(bottom.up(), Some(GridPos::new(0, i32::MIN + 1)));
        assert_eq!(GridPos::new(i32::MAX, 0).checked_add(GridPos::new(1, 0)), None);
        assert_eq!(GridPos::new(i32::MIN, 0).checked_add(GridPos::new(-1, 0)), None);

        // Huge world positions saturate instead of wrapping.
        assert_eq!(GridPos::from_world([3.0e9, -3.0e9]), GridPos::new(i32::MAX, i32::MIN));
    }
}
