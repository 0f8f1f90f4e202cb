//! Configuration for core jump mechanics.

use bevy::prelude::*;

/// Configuration for core jump mechanics.
#[derive(Reflect, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JumpConfig {
    /// Jump impulse strength. Any downward velocity at the moment of jump is
    /// compensated so buffered jumps reach a consistent height.
    pub force: f32,

    /// Coyote time duration in seconds.
    pub coyote_time: f32,

    /// Jump buffer duration in seconds.
    pub buffer_time: f32,

    /// Vertical speed below which hang-time gravity applies near the apex.
    pub hang_threshold: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            force: 320.0,
            coyote_time: 0.15,
            buffer_time: 0.1,
            hang_threshold: 40.0,
        }
    }
}
