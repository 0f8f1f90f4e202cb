//! Configuration for gravity shaping.

use bevy::prelude::*;

/// Configuration for gravity shaping.
///
/// The controller never applies gravity itself; it multiplies the rigid
/// body's gravity scale by the multiplier of the active regime and clamps the
/// descent speed where the regime caps it.
#[derive(Reflect, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GravityConfig {
    /// Baseline gravity scale while grounded or ascending normally.
    pub base_scale: f32,

    /// Gravity multiplier while fast-falling (holding down during descent).
    pub fast_fall_mult: f32,

    /// Gravity multiplier after the jump button is released mid-ascent.
    pub jump_cut_mult: f32,

    /// Gravity multiplier near the jump apex (the "float" window).
    pub hang_mult: f32,

    /// Gravity multiplier during a normal descent.
    pub fall_mult: f32,

    /// Maximum descent speed for the cut and fall regimes.
    pub max_fall_speed: f32,

    /// Maximum descent speed while fast-falling.
    pub max_fast_fall_speed: f32,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            base_scale: 1.0,
            fast_fall_mult: 2.0,
            jump_cut_mult: 2.0,
            hang_mult: 0.5,
            fall_mult: 1.5,
            max_fall_speed: 400.0,
            max_fast_fall_speed: 600.0,
        }
    }
}
