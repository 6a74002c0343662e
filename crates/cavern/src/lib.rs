//! # CAVERN
//!
//! Procedural caves with world-attached entities, integrating all units.
//!
//! ```text
//! ┌──────────────────┐   GridHandle   ┌──────────────────┐
//! │ cavern_procedural│───────────────>│   cavern_core    │
//! │  CaveGenerator   │  Stone / Air   │  TileMap, events │
//! └──────────────────┘                └────────▲─────────┘
//!                                              │ carve / uncarve
//!                                     ┌────────┴─────────┐
//!                                     │ cavern_entities  │
//!                                     │ occupancy, hooks │
//!                                     └──────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `world`: [`CaveWorld`], the wiring of all three units
//! - `error`: [`WorldError`]

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod world;

// Re-export the units
pub use cavern_core as core;
pub use cavern_entities as entities;
pub use cavern_procedural as procedural;

pub use error::{WorldError, WorldResult};
pub use world::CaveWorld;
