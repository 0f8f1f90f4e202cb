//! Movement intent components.
//!
//! Intents represent the desired movement from player input or AI. The
//! controller never touches the input devices themselves: the host samples
//! its input layer every frame, writes the axis values here and forwards the
//! discrete jump pressed/released edges. Edge detection is the input layer's
//! job - the controller only consumes events.

use bevy::prelude::*;

/// Desired movement for one character, refreshed every frame by the host.
///
/// # Example
///
/// ```rust
/// use tight_platformer_controller::prelude::*;
///
/// let mut intent = MovementIntent::new();
///
/// // Run right, hold down for a fast fall
/// intent.set_axis(1.0, -1.0);
/// assert!(intent.is_moving());
///
/// // A fresh jump key-down event
/// intent.press_jump();
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct MovementIntent {
    /// Horizontal/vertical axis values, each clamped to [-1, 1].
    pub axis: Vec2,
    /// Pending jump key-down edge, consumed by the controller this frame.
    jump_pressed: bool,
    /// Pending jump key-up edge, consumed by the controller this frame.
    jump_released: bool,
}

impl MovementIntent {
    /// Create a new empty intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both axis values, clamped to [-1, 1].
    pub fn set_axis(&mut self, horizontal: f32, vertical: f32) {
        self.axis = Vec2::new(horizontal.clamp(-1.0, 1.0), vertical.clamp(-1.0, 1.0));
    }

    /// Set the horizontal axis value, clamped to [-1, 1].
    pub fn set_horizontal(&mut self, value: f32) {
        self.axis.x = value.clamp(-1.0, 1.0);
    }

    /// Set the vertical axis value, clamped to [-1, 1].
    pub fn set_vertical(&mut self, value: f32) {
        self.axis.y = value.clamp(-1.0, 1.0);
    }

    /// Record a jump key-down edge.
    pub fn press_jump(&mut self) {
        self.jump_pressed = true;
    }

    /// Record a jump key-up edge.
    pub fn release_jump(&mut self) {
        self.jump_released = true;
    }

    /// Whether any horizontal movement is requested.
    pub fn is_moving(&self) -> bool {
        self.axis.x != 0.0
    }

    /// Clear the axes and any pending jump edges.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Take the pending jump key-down edge, if any.
    pub(crate) fn take_jump_pressed(&mut self) -> bool {
        std::mem::take(&mut self.jump_pressed)
    }

    /// Take the pending jump key-up edge, if any.
    pub(crate) fn take_jump_released(&mut self) -> bool {
        std::mem::take(&mut self.jump_released)
    }
}
