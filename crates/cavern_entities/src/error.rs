//! # Entity Error Types
//!
//! All errors that can occur while configuring entities.
//!
//! A missing grid store is not an error: carve and uncarve report it as
//! [`crate::CarveOutcome::GridUnavailable`].

use thiserror::Error;

/// Errors that can occur while building footprints and archetypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntityError {
    /// Two footprint cells share an offset.
    #[error("footprint '{footprint}' claims offset ({x}, {y}) twice")]
    DuplicateOffset {
        /// Footprint name.
        footprint: String,
        /// Offset x.
        x: i32,
        /// Offset y.
        y: i32,
    },

    /// Archetype not found in the catalog.
    #[error("unknown archetype: {0}")]
    UnknownArchetype(String),

    /// An archetype name was registered twice.
    #[error("archetype '{0}' already exists")]
    DuplicateArchetype(String),

    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for entity operations.
pub type EntityResult<T> = Result<T, EntityError>;
