//! # Cave Generator
//!
//! Runs the whole pipeline once: validate, populate, smooth, render.
//!
//! The generator owns a [`TileSurface`] for the autotile variants and a
//! [`GridHandle`] to the world's grid store, which receives `Stone` for alive
//! cells and `Air` for dead ones.

use std::time::{Duration, Instant};

use cavern_core::{GridHandle, GridStore, TileKind, TileUpdateReason};

use crate::automaton::{EdgePolicy, WorkingGrid};
use crate::bitmask::resolve_cell;
use crate::config::GenerationConfig;
use crate::error::GenerationResult;
use crate::seed::WorldSeed;
use crate::surface::TileSurface;

/// Summary of one generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationReport {
    /// Seed actually used (drawn from entropy when the config had none).
    pub seed: WorldSeed,
    /// Grid side length.
    pub size: u32,
    /// Automaton steps run.
    pub steps: u32,
    /// Alive cells after the last step.
    pub alive_cells: usize,
    /// Whether the grid store was available and written.
    pub store_written: bool,
    /// Wall time of the whole run.
    pub elapsed: Duration,
}

/// Cellular-automaton cave generator.
pub struct CaveGenerator<G, S> {
    grid: GridHandle<G>,
    surface: S,
}

impl<G: GridStore, S: TileSurface> CaveGenerator<G, S> {
    /// Creates a generator writing to `grid` and `surface`.
    #[must_use]
    pub fn new(grid: GridHandle<G>, surface: S) -> Self {
        Self { grid, surface }
    }

    /// The rendering surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Consumes the generator, returning the rendering surface.
    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// The grid store handle.
    #[must_use]
    pub fn grid(&self) -> &GridHandle<G> {
        &self.grid
    }

    /// Runs populate, `automaton_steps` smoothing steps and render.
    ///
    /// # Errors
    ///
    /// Returns the validation error of an invalid config; nothing is
    /// allocated or written in that case.
    pub fn generate(&mut self, config: &GenerationConfig) -> GenerationResult<GenerationReport> {
        config.validate()?;
        let start = Instant::now();

        let seed = config.seed.unwrap_or_else(WorldSeed::from_entropy);
        let grid = run_automaton(config, seed);

        render(&grid, &mut self.surface);
        let store_written = self
            .grid
            .with_store(|store| write_to_store(&grid, store))
            .is_some();
        if !store_written {
            tracing::warn!("grid store not initialized, generated cave only rendered");
        }

        let report = GenerationReport {
            seed,
            size: config.size,
            steps: config.automaton_steps,
            alive_cells: grid.alive_count(),
            store_written,
            elapsed: start.elapsed(),
        };
        tracing::info!(
            seed = seed.value(),
            size = report.size,
            steps = report.steps,
            alive = report.alive_cells,
            elapsed = ?report.elapsed,
            "cave generated"
        );
        Ok(report)
    }
}

/// Populates and smooths a grid without rendering it.
///
/// # Errors
///
/// Returns the validation error of an invalid config.
pub fn generate_grid(config: &GenerationConfig) -> GenerationResult<WorkingGrid> {
    config.validate()?;
    let seed = config.seed.unwrap_or_else(WorldSeed::from_entropy);
    Ok(run_automaton(config, seed))
}

fn run_automaton(config: &GenerationConfig, seed: WorldSeed) -> WorkingGrid {
    let mut rng = seed.rng();
    let mut grid = WorkingGrid::populate(config, &mut rng);
    for _ in 0..config.automaton_steps {
        grid = grid.step(config.death_limit, config.birth_limit);
    }
    grid
}

/// Clears `surface` and draws every alive cell's autotile variant.
///
/// Off-grid neighbors count as empty here.
pub fn render<S: TileSurface + ?Sized>(grid: &WorkingGrid, surface: &mut S) {
    surface.clear_all();
    for y in 0..grid.size() {
        for x in 0..grid.size() {
            let neighbors = grid.neighbors(x, y, EdgePolicy::OffGridEmpty);
            surface.set_tile_at(x, y, resolve_cell(grid.is_alive(x, y), neighbors));
        }
    }
}

/// Writes `Stone`/`Air` for every cell with reason `Generate`.
#[allow(clippy::cast_possible_wrap)]
pub fn write_to_store<G: GridStore + ?Sized>(grid: &WorkingGrid, store: &mut G) {
    for y in 0..grid.size() {
        for x in 0..grid.size() {
            let tile = if grid.is_alive(x, y) {
                TileKind::Stone
            } else {
                TileKind::Air
            };
            store.set_tile(x as i32, y as i32, tile, TileUpdateReason::Generate, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmask::TileVariant;
    use crate::error::GenerationError;
    use crate::surface::TileLayer;
    use cavern_core::TileMap;

    fn generator(size: u32) -> CaveGenerator<TileMap, TileLayer> {
        CaveGenerator::new(GridHandle::new(TileMap::new(size, size)), TileLayer::new(size))
    }

    #[test]
    fn test_full_grid_renders_enclosed_interior() {
        let config = GenerationConfig::default()
            .with_seed(7)
            .with_size(10)
            .with_alive_chance(1.0)
            .with_limits(0, 8)
            .with_steps(0);
        let mut gen = generator(10);
        let report = gen.generate(&config).unwrap();
        assert_eq!(report.alive_cells, 100);
        assert!(report.store_written);

        let layer = gen.surface();
        for y in 1..9 {
            for x in 1..9 {
                assert_eq!(layer.get(x, y), Some(TileVariant::ENCLOSED), "({x}, {y})");
            }
        }
        // Corners only see their in-grid neighbors: (0, 0) has N, E, NE.
        assert_eq!(layer.get(0, 0).map(TileVariant::index), Some(7));
        // Top-right corner has S, W, SW: mask 8 | 64 | 32 = 104.
        assert_eq!(layer.get(9, 9).map(TileVariant::index), Some(26));
    }

    #[test]
    fn test_store_receives_stone_and_air() {
        let config = GenerationConfig::default().with_seed(3).with_size(16);
        let mut gen = generator(16);
        let report = gen.generate(&config).unwrap();

        let stone = gen.grid().with_store(|s| s.count(TileKind::Stone)).unwrap();
        let air = gen.grid().with_store(|s| s.count(TileKind::Air)).unwrap();
        assert_eq!(stone, report.alive_cells);
        assert_eq!(stone + air, 256);
    }

    #[test]
    fn test_invalid_config_touches_nothing() {
        let mut gen = generator(4);
        let result = gen.generate(&GenerationConfig::default().with_size(4).with_limits(10, 2));
        assert!(matches!(result, Err(GenerationError::InvalidThreshold { .. })));
        assert_eq!(gen.surface().writes(), 0);
    }

    #[test]
    fn test_missing_store_still_renders() {
        let mut gen: CaveGenerator<TileMap, TileLayer> =
            CaveGenerator::new(GridHandle::uninitialized(), TileLayer::new(8));
        let report = gen
            .generate(&GenerationConfig::default().with_seed(1).with_size(8))
            .unwrap();
        assert!(!report.store_written);
        assert_eq!(gen.surface().writes(), 64);
    }

    #[test]
    fn test_ambient_seed_is_reported() {
        let config = GenerationConfig::default().with_size(8);
        let mut gen = generator(8);
        let report = gen.generate(&config).unwrap();

        // Replaying the reported seed reproduces the run.
        let replay = generate_grid(&config.with_seed(report.seed.value())).unwrap();
        assert_eq!(replay.alive_count(), report.alive_cells);
    }
}
