//! # Cave Property Tests
//!
//! End-to-end checks of the generation pipeline: determinism, sealed
//! borders, and autotile consistency between the grid and the surface.

use cavern_core::{GridHandle, TileMap};
use cavern_procedural::{
    generate_grid, render, resolve, CaveGenerator, EdgePolicy, GenerationConfig, Neighbors,
    TileLayer, TileVariant,
};

fn generate(config: &GenerationConfig) -> (TileLayer, Vec<u8>) {
    let grid = GridHandle::new(TileMap::new(config.size, config.size));
    let mut generator = CaveGenerator::new(grid.clone(), TileLayer::new(config.size));
    generator.generate(config).expect("valid config");
    let bytes = grid
        .with_store(|store| store.as_bytes().to_vec())
        .expect("store installed");
    (generator.surface().clone(), bytes)
}

/// Test: Same seed, same cave, same surface, same store bytes.
#[test]
fn test_fixed_seed_is_deterministic() {
    let config = GenerationConfig::default().with_seed(0xC0FFEE).with_size(48);

    let grid_a = generate_grid(&config).unwrap();
    let grid_b = generate_grid(&config).unwrap();
    assert_eq!(grid_a, grid_b, "working grids should be identical");

    let (layer_a, bytes_a) = generate(&config);
    let (layer_b, bytes_b) = generate(&config);
    assert_eq!(layer_a, layer_b, "surface writes should be identical");
    assert_eq!(bytes_a, bytes_b, "store bytes should be identical");
}

/// Test: Different seeds give different caves.
#[test]
fn test_different_seeds_differ() {
    let a = generate_grid(&GenerationConfig::default().with_seed(1).with_size(48)).unwrap();
    let b = generate_grid(&GenerationConfig::default().with_seed(2).with_size(48)).unwrap();
    assert_ne!(a, b);
}

/// Test: Limits under 3 make every border cell solid after one step, since
/// each border cell sees at least 3 off-grid (alive) neighbors.
#[test]
fn test_border_is_sealed() {
    for seed in 0..8 {
        let config = GenerationConfig::default()
            .with_seed(seed)
            .with_size(24)
            .with_alive_chance(0.3)
            .with_limits(2, 2)
            .with_steps(1);
        let grid = generate_grid(&config).unwrap();
        let last = config.size - 1;
        for i in 0..config.size {
            assert!(grid.is_alive(i, 0), "seed {seed}: bottom ({i}, 0) open");
            assert!(grid.is_alive(i, last), "seed {seed}: top ({i}, {last}) open");
            assert!(grid.is_alive(0, i), "seed {seed}: left (0, {i}) open");
            assert!(grid.is_alive(last, i), "seed {seed}: right ({last}, {i}) open");
        }
    }
}

/// Test: Re-deriving each drawn cell's neighbors from the surface itself
/// reproduces the variant drawn there.
#[test]
fn test_render_round_trip() {
    let config = GenerationConfig::default().with_seed(77).with_size(40);
    let grid = generate_grid(&config).unwrap();
    let mut layer = TileLayer::new(config.size);
    render(&grid, &mut layer);

    let mut drawn = 0;
    for y in 0..config.size {
        for x in 0..config.size {
            let Some(variant) = layer.get(x, y) else {
                assert!(!grid.is_alive(x, y));
                continue;
            };
            drawn += 1;
            let (ix, iy) = (i32::try_from(x).unwrap(), i32::try_from(y).unwrap());
            let from_surface = Neighbors::sample(ix, iy, |nx, ny| layer.is_drawn(nx, ny));
            let from_grid = grid.neighbors(x, y, EdgePolicy::OffGridEmpty);
            assert_eq!(from_surface.mask(), from_grid.mask(), "({x}, {y})");
            assert_eq!(resolve(from_surface), variant, "({x}, {y})");
        }
    }
    assert_eq!(drawn, grid.alive_count());
}

/// Test: A fully alive 10x10 map draws the enclosed variant everywhere
/// inside the one-cell border.
#[test]
fn test_all_alive_example() {
    let config = GenerationConfig::default()
        .with_size(10)
        .with_alive_chance(1.0)
        .with_limits(0, 8)
        .with_steps(0);
    let (layer, bytes) = generate(&config);

    assert!(bytes.iter().all(|&b| b != 0), "every cell should be stone");
    for y in 1..9 {
        for x in 1..9 {
            assert_eq!(layer.get(x, y), Some(TileVariant::ENCLOSED));
        }
    }
    // Left edge: N, E, S plus the supported NE and SE diagonals, mask 214.
    assert_eq!(layer.get(0, 5).map(TileVariant::index), Some(36));
}

/// Test: Typical settings produce a cave, not a solid block or void.
#[test]
fn test_default_settings_make_caves() {
    let config = GenerationConfig::default().with_seed(2024).with_size(64);
    let grid = generate_grid(&config).unwrap();
    let alive = grid.alive_count();
    let total = 64 * 64;
    println!("alive: {alive} / {total}");
    assert!(alive > total / 5, "too open: {alive}");
    assert!(alive < total * 9 / 10, "too solid: {alive}");
}
