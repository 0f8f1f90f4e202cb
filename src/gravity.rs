//! Gravity regime selection.
//!
//! Exactly one regime is active per frame. Selection is a pure function of
//! (jump phase, vertical velocity, vertical input), evaluated in strict
//! priority order with the first match winning. The order intentionally puts
//! fast-fall and jump-cut above hang-time floating - changing it changes game
//! feel, not correctness.

use crate::config::GravityConfig;
use crate::state::JumpPhase;

/// The gravity regime driving this frame's gravity scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GravityRegime {
    /// Descending while holding down: much higher gravity, higher speed cap.
    FastFall,
    /// The jump was cut: higher gravity until landing.
    JumpCut,
    /// Near the jump apex: reduced gravity, no speed cap.
    Hang,
    /// Plain descent: higher gravity than ascent.
    Fall,
    /// Grounded or ascending normally: baseline gravity.
    Default,
}

/// Select the gravity regime for one frame.
///
/// `vertical_input` is the raw vertical axis in [-1, 1]; holding down while
/// descending requests a fast fall regardless of the jump phase.
pub fn select_regime(
    phase: JumpPhase,
    vertical_velocity: f32,
    vertical_input: f32,
    hang_threshold: f32,
) -> GravityRegime {
    if vertical_velocity < 0.0 && vertical_input < 0.0 {
        GravityRegime::FastFall
    } else if phase.is_cut() {
        GravityRegime::JumpCut
    } else if phase.in_jump_arc() && vertical_velocity.abs() < hang_threshold {
        GravityRegime::Hang
    } else if vertical_velocity < 0.0 {
        GravityRegime::Fall
    } else {
        GravityRegime::Default
    }
}

impl GravityRegime {
    /// The gravity scale to write to the rigid body for this regime.
    pub fn scale(self, config: &GravityConfig) -> f32 {
        let mult = match self {
            Self::FastFall => config.fast_fall_mult,
            Self::JumpCut => config.jump_cut_mult,
            Self::Hang => config.hang_mult,
            Self::Fall => config.fall_mult,
            Self::Default => return config.base_scale,
        };
        config.base_scale * mult
    }

    /// The maximum descent speed for this regime, if it caps one.
    ///
    /// Hang and default regimes never clamp - the hang window is exactly the
    /// "float at the apex" feel and must not fight the velocity.
    pub fn fall_speed_cap(self, config: &GravityConfig) -> Option<f32> {
        match self {
            Self::FastFall => Some(config.max_fast_fall_speed),
            Self::JumpCut | Self::Fall => Some(config.max_fall_speed),
            Self::Hang | Self::Default => None,
        }
    }
}
