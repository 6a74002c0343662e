//! # World Error Types

use thiserror::Error;

use cavern_core::EntityId;
use cavern_entities::EntityError;
use cavern_procedural::GenerationError;

/// Errors surfaced by [`crate::CaveWorld`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorldError {
    /// Generation config rejected.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Archetype lookup or footprint error.
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// No live entity with this id.
    #[error("unknown entity: {0:?}")]
    UnknownEntity(EntityId),

    /// The archetype's placement rule rejected the cell.
    #[error("cannot place '{archetype}' at ({x}, {y})")]
    PlacementRejected {
        /// Archetype name.
        archetype: String,
        /// Target cell x.
        x: i32,
        /// Target cell y.
        y: i32,
    },

    /// The archetype has a placement rule but no cave exists to check it
    /// against.
    #[error("cannot check placement of '{0}': no cave generated")]
    GridUnavailable(String),
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;
