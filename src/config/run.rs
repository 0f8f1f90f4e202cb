//! Configuration for horizontal run movement.

use bevy::prelude::*;

/// Configuration for horizontal run movement.
#[derive(Reflect, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunConfig {
    /// Smoothing factor toward the target speed (0.0-1.0, 1.0 = hard snap).
    pub lerp_amount: f32,

    /// Maximum horizontal run speed (units/second).
    pub max_speed: f32,

    /// Acceleration rate toward a non-zero target speed.
    pub accel_rate: f32,

    /// Deceleration rate toward a zero target speed.
    pub deccel_rate: f32,

    /// Multiplier on the acceleration rate while airborne (0.0-1.0).
    pub air_accel_mult: f32,

    /// Multiplier on the deceleration rate while airborne (0.0-1.0).
    pub air_deccel_mult: f32,

    /// Whether airborne drift faster than the target speed is left alone
    /// instead of being decelerated toward the smaller target.
    pub conserve_momentum: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            lerp_amount: 1.0,
            max_speed: 150.0,
            accel_rate: 8.0,
            deccel_rate: 10.0,
            air_accel_mult: 0.65,
            air_deccel_mult: 0.65,
            conserve_momentum: true,
        }
    }
}
