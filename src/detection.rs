//! Ground sensor configuration.
//!
//! The controller decides "am I on the ground" with a single axis-aligned box
//! overlap query anchored at the character's feet. The box geometry is
//! authored per character; the query itself is performed by the active physics
//! backend's sensor system.

use bevy::prelude::*;

/// Axis-aligned ground overlap sensor, anchored relative to the character.
///
/// The sensor box should sit flush with the bottom of the collider: a thin,
/// slightly-narrower-than-the-body box keeps wall brushes from registering as
/// ground contact.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct GroundSensor {
    /// Offset of the box center from the entity origin (the foot anchor).
    pub offset: Vec2,
    /// Full width and height of the overlap box.
    pub size: Vec2,
}

impl Default for GroundSensor {
    fn default() -> Self {
        // Sized for the canonical 8x16 capsule character.
        Self {
            offset: Vec2::new(0.0, -8.0),
            size: Vec2::new(7.0, 2.0),
        }
    }
}

impl GroundSensor {
    /// Create a sensor with an explicit anchor offset and box size.
    pub fn new(offset: Vec2, size: Vec2) -> Self {
        Self { offset, size }
    }

    /// Create a default-width sensor at the feet of a collider with the given
    /// distance from entity origin to collider bottom.
    pub fn at_feet(bottom_offset: f32) -> Self {
        Self {
            offset: Vec2::new(0.0, -bottom_offset),
            ..Self::default()
        }
    }

    /// World-space center of the sensor box for a character at `position`.
    pub fn center(&self, position: Vec2) -> Vec2 {
        position + self.offset
    }
}
