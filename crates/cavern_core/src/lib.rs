//! # CAVERN Core
//!
//! The grid contract shared by world generation and world-attached entities.
//!
//! ## Design Principles
//!
//! 1. **Explicit store**: Every writer receives a [`GridHandle`]; there is no
//!    global map instance
//! 2. **Uniform receivers**: Cells notify a [`TileReceiver`] through one call,
//!    its behavior is a tagged enum
//! 3. **Store owns bounds**: Out-of-bounds coordinates are rejected by the
//!    store, never by callers
//!
//! ## Example
//!
//! ```rust,ignore
//! use cavern_core::{GridHandle, GridStore, TileKind, TileMap, TileUpdateReason};
//!
//! let grid = GridHandle::new(TileMap::new(64, 64));
//! grid.with_store(|store| {
//!     store.set_tile(3, 4, TileKind::Stone, TileUpdateReason::Generate, false);
//! });
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod coord;
pub mod entity;
pub mod events;
pub mod grid;
pub mod receiver;
pub mod tile;
pub mod tilemap;

pub use coord::GridPos;
pub use entity::{EntityAllocator, EntityId};
pub use events::{EventBus, EventReceiver, EventSender, TileEvent};
pub use grid::{GridHandle, GridStore};
pub use receiver::{ReceiverBehavior, ReceiverReaction, TileReceiver};
pub use tile::{TileKind, TileUpdateReason};
pub use tilemap::TileMap;
