//! Physics backend abstraction.
//!
//! This module defines the trait that physics backends must implement to work
//! with the controller. The controller only needs a small capability set -
//! velocity access, impulses, forces and a gravity scale - so the movement
//! logic stays testable without a physics engine.

use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// Implement this trait to integrate a physics engine with the controller.
/// For an example implementation, see the `avian` module's `Avian2dBackend`
/// which implements this trait for Avian2D.
pub trait CharacterPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend, including its ground
    /// sensor system.
    fn plugin() -> impl Plugin;

    /// Get the current linear velocity of an entity.
    fn get_velocity(world: &World, entity: Entity) -> Vec2;

    /// Set the linear velocity of an entity.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2);

    /// Apply an impulse to an entity.
    ///
    /// Impulse is an instantaneous change in momentum (velocity).
    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec2);

    /// Apply a force to an entity.
    ///
    /// Force is applied over the physics timestep.
    fn apply_force(world: &mut World, entity: Entity, force: Vec2);

    /// Set the gravity scale of an entity.
    ///
    /// The controller writes this every frame from the active gravity regime.
    fn set_gravity_scale(world: &mut World, entity: Entity, scale: f32);

    /// Get the mass of an entity. Returns 0.0 when unknown.
    fn get_mass(world: &World, entity: Entity) -> f32;
}
