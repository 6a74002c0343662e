//! # CAVERN Entities
//!
//! World-attached entities that claim grid cells with their own shape.
//!
//! ## Occupancy
//!
//! An entity's [`CarveFootprint`] is a set of `(offset, tile kind)` cells
//! relative to its anchor. Its [`TileOccupancyController`] recomputes the
//! anchor from the entity position and, when it changes, vacates the old
//! cells and claims the new ones in one locked step, registering the entity
//! as each claimed cell's receiver.
//!
//! ## Invariants
//!
//! - Claimed cells are exactly the last-applied anchor's offsets, or none
//! - A missing grid store leaves the controller untouched (retryable)
//! - `release()` vacates at most once and yields its hook grant at most once
//!
//! ## Example
//!
//! ```rust,ignore
//! use cavern_core::{EntityId, GridHandle, TileMap};
//! use cavern_entities::ArchetypeCatalog;
//!
//! let catalog = ArchetypeCatalog::from_toml_str(include_str!("../../../data/archetypes.toml"))?;
//! let grid = GridHandle::new(TileMap::new(64, 64));
//! let mut platform = catalog.get("platform")?.controller(EntityId::new(0, 0), grid);
//! platform.update_if_necessary([3.0, 4.0]);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod archetype;
pub mod error;
pub mod footprint;
pub mod hook;
pub mod occupancy;
pub mod placement;

pub use archetype::{Archetype, ArchetypeCatalog};
pub use error::{EntityError, EntityResult};
pub use footprint::{CarveFootprint, FootprintCell};
pub use hook::{ItemGrant, ReleaseHook};
pub use occupancy::{CarveOutcome, ReleaseOutcome, TileOccupancyController};
pub use placement::{air_tile_count_above, place_position, PlacementRule};
