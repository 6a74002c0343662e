//! # Cellular Automaton
//!
//! A square boolean grid seeded at random and smoothed by a neighbor-count
//! rule. Cells are stored row-major as `[y * size + x]` with `y` growing up.

use rand::Rng;

use crate::bitmask::Neighbors;
use crate::config::GenerationConfig;

/// How a neighbor lookup treats coordinates outside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgePolicy {
    /// Off-grid neighbors count as alive. Used by the automaton step so the
    /// border is pushed toward solid and the cave is sealed.
    OffGridAlive,
    /// Off-grid neighbors count as empty. Used by rendering so no variant
    /// references a cell outside the map.
    OffGridEmpty,
}

impl EdgePolicy {
    #[inline]
    const fn off_grid(self) -> bool {
        matches!(self, Self::OffGridAlive)
    }
}

/// Alive/dead matrix for one generation run.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WorkingGrid {
    size: u32,
    cells: Vec<bool>,
}

impl WorkingGrid {
    /// Creates an all-dead grid.
    #[must_use]
    pub fn new(size: u32) -> Self {
        Self {
            size,
            cells: vec![false; size as usize * size as usize],
        }
    }

    /// Seeds a grid: cell `(x, y)` is alive iff
    /// `height_curve(y / size) * roll < initial_alive_chance`.
    ///
    /// Draws one `f32` per cell, x-major then y, so a fixed rng state always
    /// yields the same grid.
    #[allow(clippy::cast_precision_loss)]
    pub fn populate<R: Rng + ?Sized>(config: &GenerationConfig, rng: &mut R) -> Self {
        let mut grid = Self::new(config.size);
        let size = config.size as f32;
        for x in 0..config.size {
            for y in 0..config.size {
                let bias = config.height_curve.evaluate(y as f32 / size);
                let alive = bias * rng.gen::<f32>() < config.initial_alive_chance;
                grid.set(x, y, alive);
            }
        }
        grid
    }

    /// Side length.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.size as usize + x as usize
    }

    /// Returns whether an in-grid cell is alive.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the grid.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, x: u32, y: u32) -> bool {
        assert!(x < self.size && y < self.size, "({x}, {y}) outside grid");
        self.cells[self.index(x, y)]
    }

    /// Sets an in-grid cell.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the grid.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, alive: bool) {
        assert!(x < self.size && y < self.size, "({x}, {y}) outside grid");
        let index = self.index(x, y);
        self.cells[index] = alive;
    }

    /// Reads any coordinate, resolving off-grid ones through `policy`.
    #[inline]
    #[must_use]
    pub fn occupied(&self, x: i32, y: i32, policy: EdgePolicy) -> bool {
        match (u32::try_from(x), u32::try_from(y)) {
            (Ok(x), Ok(y)) if x < self.size && y < self.size => self.cells[self.index(x, y)],
            _ => policy.off_grid(),
        }
    }

    /// Samples the 8 neighbors of an in-grid cell.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn neighbors(&self, x: u32, y: u32, policy: EdgePolicy) -> Neighbors {
        Neighbors::sample(x as i32, y as i32, |nx, ny| self.occupied(nx, ny, policy))
    }

    /// Counts alive neighbors of an in-grid cell.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn alive_neighbor_count(&self, x: u32, y: u32, policy: EdgePolicy) -> u8 {
        let (cx, cy) = (x as i32, y as i32);
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if (dx != 0 || dy != 0) && self.occupied(cx + dx, cy + dy, policy) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Runs one smoothing step and returns the next grid.
    ///
    /// Every cell reads the current grid only; off-grid neighbors count as
    /// alive. An alive cell survives iff its count exceeds `death_limit`; a
    /// dead cell is born iff its count exceeds `birth_limit`.
    #[must_use]
    pub fn step(&self, death_limit: u8, birth_limit: u8) -> Self {
        let mut next = Self::new(self.size);
        for y in 0..self.size {
            for x in 0..self.size {
                let count = self.alive_neighbor_count(x, y, EdgePolicy::OffGridAlive);
                let alive = if self.is_alive(x, y) {
                    count > death_limit
                } else {
                    count > birth_limit
                };
                next.set(x, y, alive);
            }
        }
        next
    }

    /// Number of alive cells.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Row-major cells from `y = 0`.
    #[must_use]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }
}
