//! # CAVERN Procedural Generation
//!
//! Deterministic cave generation for a square, fully-resident grid.
//!
//! ## Pipeline
//!
//! ```text
//! GenerationConfig ──validate──> populate ──step x N──> render
//!                                  (rng)    (automaton)   (bitmask autotile)
//!                                                             │
//!                                           TileSurface <─────┤
//!                                           GridStore   <─────┘
//! ```
//!
//! ## Edge Policies
//!
//! The automaton step counts off-grid neighbors as **alive**, which seals the
//! cave behind solid walls. Rendering treats off-grid neighbors as **empty**,
//! so no tile variant references a cell outside the map. Both are carried as
//! an explicit [`EdgePolicy`] at each call site.
//!
//! ## Example
//!
//! ```rust,ignore
//! use cavern_core::{GridHandle, TileMap};
//! use cavern_procedural::{CaveGenerator, GenerationConfig, TileLayer};
//!
//! let config = GenerationConfig::from_toml_str(include_str!("../../../data/cave.toml"))?;
//! let grid = GridHandle::new(TileMap::new(config.size, config.size));
//! let mut generator = CaveGenerator::new(grid, TileLayer::new(config.size));
//! let report = generator.generate(&config)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod automaton;
pub mod bitmask;
pub mod config;
pub mod error;
pub mod generator;
pub mod seed;
pub mod surface;

pub use automaton::{EdgePolicy, WorkingGrid};
pub use bitmask::{resolve, resolve_cell, variant_for_mask, Neighbors, TileVariant};
pub use config::{GenerationConfig, HeightCurve};
pub use error::{GenerationError, GenerationResult};
pub use generator::{generate_grid, render, write_to_store, CaveGenerator, GenerationReport};
pub use seed::WorldSeed;
pub use surface::{TileLayer, TileSurface};
