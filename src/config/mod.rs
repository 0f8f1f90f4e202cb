//! Tunable parameter set for the controller.
//!
//! The parameter set is a pure data contract authored by the game: the
//! controller never mutates it, and any number of characters can share one
//! copy. Parameters are grouped the way they are tuned - run feel, jump feel,
//! gravity shaping.

mod gravity;
mod jumping;
mod run;

pub use gravity::GravityConfig;
pub use jumping::JumpConfig;
pub use run::RunConfig;

use bevy::prelude::*;
use thiserror::Error;

/// Full tunable parameter set for one character archetype.
///
/// Immutable during play by convention. Attach it to the character entity
/// alongside [`PlatformerController`](crate::state::PlatformerController).
///
/// Malformed values don't fail at runtime - every operation stays a total
/// function - but [`MovementConfig::validate`] flags them when the component
/// is added so authoring mistakes surface at setup, not mid-jump.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementConfig {
    /// Horizontal run movement parameters.
    pub run: RunConfig,
    /// Jump impulse and grace-timer parameters.
    pub jump: JumpConfig,
    /// Gravity scale and per-regime multipliers.
    pub gravity: GravityConfig,
}

impl MovementConfig {
    /// Check the parameter set for values that produce degenerate behavior.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("jump.coyote_time", self.jump.coyote_time),
            ("jump.buffer_time", self.jump.buffer_time),
            ("jump.hang_threshold", self.jump.hang_threshold),
            ("gravity.max_fall_speed", self.gravity.max_fall_speed),
            ("gravity.max_fast_fall_speed", self.gravity.max_fast_fall_speed),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if self.run.max_speed <= 0.0 {
            return Err(ConfigError::NonPositiveMaxSpeed(self.run.max_speed));
        }
        if !(0.0..=1.0).contains(&self.run.lerp_amount) {
            return Err(ConfigError::LerpOutOfRange(self.run.lerp_amount));
        }
        Ok(())
    }
}

/// A parameter value that would produce degenerate controller behavior.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// A duration or speed cap is negative.
    #[error("{field} must not be negative (got {value})")]
    Negative {
        /// Dotted path of the offending field.
        field: &'static str,
        /// The authored value.
        value: f32,
    },
    /// The maximum run speed is zero or negative.
    #[error("run.max_speed must be positive (got {0})")]
    NonPositiveMaxSpeed(f32),
    /// The run lerp factor falls outside the unit interval.
    #[error("run.lerp_amount must lie in [0, 1] (got {0})")]
    LerpOutOfRange(f32),
}
