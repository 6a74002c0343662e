//! # Generation Configuration
//!
//! An immutable description of one generation run, loaded from TOML:
//!
//! ```toml
//! seed = 1337                 # omit for ambient randomness
//! size = 64
//! initial_alive_chance = 0.45
//! death_limit = 3
//! birth_limit = 4
//! automaton_steps = 4
//! height_curve = [[0.0, 1.4], [1.0, 0.8]]
//! ```
//!
//! Every value is range-checked by [`GenerationConfig::validate`] before any
//! grid is allocated.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, GenerationResult};
use crate::seed::WorldSeed;

/// Piecewise-linear curve over normalized height `[0, 1]`.
///
/// Multiplies the random roll during population, biasing alive probability
/// by row. Keys are `[time, value]` pairs with strictly ascending times;
/// evaluation clamps outside the first and last key. An empty curve is the
/// constant `1.0`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeightCurve {
    keys: Vec<[f32; 2]>,
}

impl HeightCurve {
    /// Creates a curve from `[time, value]` keys.
    #[must_use]
    pub fn new(keys: Vec<[f32; 2]>) -> Self {
        Self { keys }
    }

    /// The constant curve `value`.
    #[must_use]
    pub fn constant(value: f32) -> Self {
        Self {
            keys: vec![[0.0, value]],
        }
    }

    /// Returns the keys.
    #[must_use]
    pub fn keys(&self) -> &[[f32; 2]] {
        &self.keys
    }

    /// Evaluates the curve at `t`.
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 1.0;
        };
        if t <= first[0] {
            return first[1];
        }
        if t >= last[0] {
            return last[1];
        }
        for pair in self.keys.windows(2) {
            let ([t0, v0], [t1, v1]) = (pair[0], pair[1]);
            if t <= t1 {
                let f = (t - t0) / (t1 - t0);
                return v0 + (v1 - v0) * f;
            }
        }
        last[1]
    }

    /// Checks keys are finite and strictly ascending in time.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidHeightCurve`] otherwise.
    pub fn validate(&self) -> GenerationResult<()> {
        if let Some(key) = self.keys.iter().find(|k| !k[0].is_finite() || !k[1].is_finite()) {
            return Err(GenerationError::InvalidHeightCurve(format!(
                "non-finite key {key:?}"
            )));
        }
        if let Some(pair) = self.keys.windows(2).find(|p| p[1][0] <= p[0][0]) {
            return Err(GenerationError::InvalidHeightCurve(format!(
                "key times not ascending: {} then {}",
                pair[0][0], pair[1][0]
            )));
        }
        Ok(())
    }
}

/// Parameters of one cave generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Fixed seed, or `None` for ambient randomness.
    pub seed: Option<WorldSeed>,
    /// Width and height of the square grid.
    pub size: u32,
    /// Probability threshold for a cell to start alive.
    pub initial_alive_chance: f32,
    /// An alive cell survives iff its alive-neighbor count exceeds this.
    pub death_limit: u8,
    /// A dead cell is born iff its alive-neighbor count exceeds this.
    pub birth_limit: u8,
    /// Number of smoothing steps.
    pub automaton_steps: u32,
    /// Height bias applied to the population roll.
    pub height_curve: HeightCurve,
}

impl GenerationConfig {
    /// Largest accepted grid size.
    pub const MAX_SIZE: u32 = 4096;

    /// Largest accepted neighbor threshold.
    pub const MAX_THRESHOLD: u8 = 9;

    /// Sets a fixed seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(WorldSeed::new(seed));
        self
    }

    /// Sets the grid size.
    #[must_use]
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Sets the initial alive chance.
    #[must_use]
    pub fn with_alive_chance(mut self, chance: f32) -> Self {
        self.initial_alive_chance = chance;
        self
    }

    /// Sets the death and birth limits.
    #[must_use]
    pub fn with_limits(mut self, death_limit: u8, birth_limit: u8) -> Self {
        self.death_limit = death_limit;
        self.birth_limit = birth_limit;
        self
    }

    /// Sets the number of automaton steps.
    #[must_use]
    pub fn with_steps(mut self, steps: u32) -> Self {
        self.automaton_steps = steps;
        self
    }

    /// Sets the height curve.
    #[must_use]
    pub fn with_height_curve(mut self, curve: HeightCurve) -> Self {
        self.height_curve = curve;
        self
    }

    /// Checks every parameter is inside its valid range.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> GenerationResult<()> {
        if self.size == 0 {
            return Err(GenerationError::InvalidSize(self.size));
        }
        if self.size > Self::MAX_SIZE {
            return Err(GenerationError::SizeTooLarge {
                size: self.size,
                max: Self::MAX_SIZE,
            });
        }
        if !(0.0..=1.0).contains(&self.initial_alive_chance) {
            return Err(GenerationError::InvalidProbability(self.initial_alive_chance));
        }
        for (name, value) in [
            ("death_limit", self.death_limit),
            ("birth_limit", self.birth_limit),
        ] {
            if value > Self::MAX_THRESHOLD {
                return Err(GenerationError::InvalidThreshold { name, value });
            }
        }
        self.height_curve.validate()
    }

    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfig`] on parse failure, or the
    /// validation error.
    pub fn from_toml_str(source: &str) -> GenerationResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| GenerationError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfig`] if the file cannot be read
    /// or parsed, or the validation error.
    pub fn from_toml_file(path: &Path) -> GenerationResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            GenerationError::InvalidConfig(format!("{}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            size: 64,
            initial_alive_chance: 0.45,
            death_limit: 3,
            birth_limit: 4,
            automaton_steps: 4,
            height_curve: HeightCurve::default(),
        }
    }
}
