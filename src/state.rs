//! Controller state: jump phase, facing, grace timers.
//!
//! All mutable per-character state lives in [`PlatformerController`]. The
//! systems mutate it every frame; nothing else touches it, so no locking is
//! needed - Bevy's schedules never overlap the `Update` and `FixedUpdate`
//! passes of one world.

use bevy::prelude::*;

/// Where the character is in its jump lifecycle.
///
/// This replaces the classic trio of independent `jumping` / `jumpCut` /
/// `jumpFalling` booleans with one variant, so the gravity-regime selection in
/// [`crate::gravity::select_regime`] is a pure function of the phase instead of
/// an implicit priority over flags.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpPhase {
    /// Not in a jump arc. Also covers walking off a ledge without jumping.
    #[default]
    Grounded,
    /// Ascending from a jump, button still held.
    Ascending,
    /// Ascending, but the button was released - the jump is being cut.
    CutAscending,
    /// Descending after an uncut jump.
    Falling,
    /// Descending after a cut jump; cut gravity still applies.
    CutFalling,
}

impl JumpPhase {
    /// True from jump initiation until the apex (upward velocity spent).
    #[inline]
    pub fn is_jumping(self) -> bool {
        matches!(self, Self::Ascending | Self::CutAscending)
    }

    /// True once the jump button was released mid-ascent, until landing.
    #[inline]
    pub fn is_cut(self) -> bool {
        matches!(self, Self::CutAscending | Self::CutFalling)
    }

    /// True while airborne inside an uncut jump arc (ascent or descent).
    /// This is the window where hang-time gravity may apply.
    #[inline]
    pub fn in_jump_arc(self) -> bool {
        matches!(self, Self::Ascending | Self::Falling)
    }
}

/// Mutable controller state, one instance per character.
///
/// Created at spawn, mutated every frame and physics step, discarded at
/// despawn. The grace timers count down every frame and may go negative; only
/// their sign is meaningful. A positive `last_on_ground_time` means "grounded
/// within coyote tolerance", a positive `last_pressed_jump_time` means "jump
/// requested within buffer tolerance".
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct PlatformerController {
    /// Current jump lifecycle phase.
    pub phase: JumpPhase,
    /// Which way the character faces. Flips only when horizontal input
    /// disagrees with the current facing.
    pub facing_right: bool,
    /// Countdown since the last ground contact; reset to the coyote time on
    /// contact, zeroed when a jump consumes the ground grace.
    pub last_on_ground_time: f32,
    /// Countdown since the last jump press; reset to the buffer time on press,
    /// zeroed when a jump consumes the buffer.
    pub last_pressed_jump_time: f32,
    /// Raw result of this frame's ground overlap query.
    pub ground_contact: bool,

    /// Forces accumulated during the current physics step.
    pub(crate) accumulated_force: Vec2,
    /// Forces handed to the physics engine last step, subtracted again during
    /// preparation so external forces on the body are preserved.
    pub(crate) applied_force: Vec2,
}

impl Default for PlatformerController {
    fn default() -> Self {
        Self {
            phase: JumpPhase::Grounded,
            facing_right: true,
            last_on_ground_time: 0.0,
            last_pressed_jump_time: 0.0,
            ground_contact: false,
            accumulated_force: Vec2::ZERO,
            applied_force: Vec2::ZERO,
        }
    }
}

impl PlatformerController {
    /// Create a new controller, facing right.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decay both grace timers. Timers may go negative; downstream checks only
    /// look at the sign.
    pub fn tick_timers(&mut self, delta: f32) {
        self.last_on_ground_time -= delta;
        self.last_pressed_jump_time -= delta;
    }

    /// Record a jump press, arming the jump buffer.
    pub fn on_jump_pressed(&mut self, buffer_time: f32) {
        self.last_pressed_jump_time = buffer_time;
    }

    /// Record a jump release. Cuts the jump when still ascending.
    pub fn on_jump_released(&mut self, vertical_velocity: f32) {
        if self.phase.is_jumping() && vertical_velocity > 0.0 {
            self.phase = JumpPhase::CutAscending;
        }
    }

    /// Record a ground overlap, refreshing the coyote grace window.
    pub fn mark_ground_contact(&mut self, coyote_time: f32) {
        self.last_on_ground_time = coyote_time;
    }

    /// Whether the character was grounded recently enough to jump from.
    #[inline]
    pub fn grounded_within_coyote(&self) -> bool {
        self.last_on_ground_time > 0.0
    }

    /// Whether a jump may initiate right now: grounded within tolerance and
    /// not already mid-jump.
    pub fn can_jump(&self) -> bool {
        self.grounded_within_coyote() && !self.phase.is_jumping()
    }

    /// Start a jump if one may initiate and a buffered press is pending.
    ///
    /// Consumes both the ground grace and the jump buffer. Returns `true` when
    /// the jump started; the caller applies the impulse.
    pub fn try_initiate_jump(&mut self) -> bool {
        if self.can_jump() && self.last_pressed_jump_time > 0.0 {
            self.phase = JumpPhase::Ascending;
            self.last_pressed_jump_time = 0.0;
            self.last_on_ground_time = 0.0;
            true
        } else {
            false
        }
    }

    /// Impulse magnitude for a jump starting at the given vertical velocity.
    ///
    /// Downward velocity at the moment of jump is added back so a buffered
    /// jump out of a fall reaches the same height as a standing jump.
    pub fn jump_impulse(force: f32, vertical_velocity: f32) -> f32 {
        if vertical_velocity < 0.0 {
            force - vertical_velocity
        } else {
            force
        }
    }

    /// Apex detection: once upward velocity is spent, ascent becomes descent.
    pub fn settle_apex(&mut self, vertical_velocity: f32) {
        if vertical_velocity <= 0.0 {
            self.phase = match self.phase {
                JumpPhase::Ascending => JumpPhase::Falling,
                JumpPhase::CutAscending => JumpPhase::CutFalling,
                other => other,
            };
        }
    }

    /// Ground recovery: back on the ground and past the jump arc, the cut and
    /// falling state clears so the character can re-jump cleanly.
    ///
    /// Returns `true` when a jump arc actually ended here.
    pub fn recover_on_ground(&mut self) -> bool {
        if self.grounded_within_coyote()
            && !self.phase.is_jumping()
            && self.phase != JumpPhase::Grounded
        {
            self.phase = JumpPhase::Grounded;
            true
        } else {
            false
        }
    }

    /// Flip facing when horizontal input disagrees with it.
    ///
    /// Returns `true` when the facing flipped, so the caller can mirror the
    /// transform. Zero input never flips.
    pub fn face_toward(&mut self, horizontal_input: f32) -> bool {
        if horizontal_input != 0.0 {
            let moving_right = horizontal_input > 0.0;
            if moving_right != self.facing_right {
                self.facing_right = moving_right;
                return true;
            }
        }
        false
    }

    // Force accumulation bookkeeping, used by the backend.

    pub(crate) fn add_force(&mut self, force: Vec2) {
        self.accumulated_force += force;
    }

    /// Start a new physics step: returns the force applied last step so the
    /// backend can subtract it, and clears both accumulators.
    pub(crate) fn prepare_new_step(&mut self) -> Vec2 {
        let applied = self.applied_force;
        self.applied_force = Vec2::ZERO;
        self.accumulated_force = Vec2::ZERO;
        applied
    }

    /// Finish the physics step: moves the accumulated force into the applied
    /// slot and returns it for the backend to add.
    pub(crate) fn finalize_step(&mut self) -> Vec2 {
        self.applied_force = self.accumulated_force;
        self.accumulated_force = Vec2::ZERO;
        self.applied_force
    }
}

/// Marker component: the ground sensor overlapped ground this frame.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component: the ground sensor found no ground this frame.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;

/// Message fired the frame a jump initiates.
#[derive(Message, Debug, Clone, Copy)]
pub struct Jumped {
    /// The character that jumped.
    pub entity: Entity,
}

/// Message fired the frame a jump arc ends back on the ground.
///
/// Walking off a ledge and landing again never fires this; only jumps do.
#[derive(Message, Debug, Clone, Copy)]
pub struct Landed {
    /// The character that landed.
    pub entity: Entity,
}
