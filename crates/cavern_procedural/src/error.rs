//! # Generation Error Types

use thiserror::Error;

/// Errors raised before generation starts.
///
/// Generation itself is infallible once a configuration validates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Grid size must be positive.
    #[error("invalid grid size: {0} (must be > 0)")]
    InvalidSize(u32),

    /// Grid size exceeds the supported maximum.
    #[error("grid size {size} exceeds maximum {max}")]
    SizeTooLarge {
        /// Requested size.
        size: u32,
        /// Largest accepted size.
        max: u32,
    },

    /// Initial alive chance outside `[0, 1]` (or NaN).
    #[error("initial alive chance {0} outside [0, 1]")]
    InvalidProbability(f32),

    /// A neighbor threshold outside `[0, 9]`.
    #[error("{name} {value} outside [0, 9]")]
    InvalidThreshold {
        /// Which threshold.
        name: &'static str,
        /// The rejected value.
        value: u8,
    },

    /// Height curve keys unsorted or non-finite.
    #[error("invalid height curve: {0}")]
    InvalidHeightCurve(String),

    /// Configuration file could not be read or parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;
