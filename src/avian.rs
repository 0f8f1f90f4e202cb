//! Avian2D physics backend implementation.
//!
//! This module provides the physics backend for Avian2D (bevy_avian2d).
//! Enable with the `avian2d` feature.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::PlatformerSet;
use crate::backend::CharacterPhysicsBackend;
use crate::config::MovementConfig;
use crate::detection::GroundSensor;
use crate::state::PlatformerController;

/// Avian2D physics backend for the platformer controller.
///
/// This backend uses `avian2d` for velocity manipulation, impulses and the
/// gravity scale. Ground overlap detection is handled by a dedicated Avian
/// system that uses `SpatialQuery` as a system parameter.
pub struct Avian2dBackend;

impl CharacterPhysicsBackend for Avian2dBackend {
    fn plugin() -> impl Plugin {
        Avian2dBackendPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<LinearVelocity>(entity)
            .map(|v| v.0)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2) {
        if let Some(mut vel) = world.get_mut::<LinearVelocity>(entity) {
            vel.0 = velocity;
        }
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec2) {
        // In Avian 0.4, impulses are applied directly to velocity.
        // Impulse = mass * delta_v, so delta_v = impulse / mass.
        // Mass can be unresolved before the first physics step; treat it as
        // unit mass so a spawn-frame jump still works.
        let mass = Self::get_mass(world, entity);
        let delta_v = if mass > 0.0 { impulse / mass } else { impulse };
        if let Some(mut vel) = world.get_mut::<LinearVelocity>(entity) {
            vel.0 += delta_v;
        }
    }

    fn apply_force(world: &mut World, entity: Entity, force: Vec2) {
        // Accumulate into the controller instead of directly modifying forces.
        // Forces are applied at the end of the step by apply_controller_forces.
        if let Some(mut controller) = world.get_mut::<PlatformerController>(entity) {
            controller.add_force(force);
        }
    }

    fn set_gravity_scale(world: &mut World, entity: Entity, scale: f32) {
        if let Some(mut gravity_scale) = world.get_mut::<GravityScale>(entity) {
            gravity_scale.0 = scale;
        }
    }

    fn get_mass(world: &World, entity: Entity) -> f32 {
        let Some(computed_mass) = world.get::<ComputedMass>(entity) else {
            return 0.0;
        };
        let mass = computed_mass.value();
        if mass <= 0.0 || !mass.is_finite() {
            return 0.0;
        }
        mass
    }
}

/// Plugin that sets up Avian2D-specific systems for the controller.
pub struct Avian2dBackendPlugin;

impl Plugin for Avian2dBackendPlugin {
    fn build(&self, app: &mut App) {
        // Frame phase: ground overlap detection feeding the coyote timer.
        app.add_systems(
            Update,
            avian_ground_overlap.in_set(PlatformerSet::Sensors),
        );

        // Physics step phases: isolate controller forces from external ones.
        app.add_systems(
            FixedUpdate,
            clear_controller_forces.in_set(PlatformerSet::Preparation),
        );
        app.add_systems(
            FixedUpdate,
            apply_controller_forces.in_set(PlatformerSet::ForceApplication),
        );
    }
}

/// Physics components for an Avian-backed platformer character.
///
/// Spawn alongside [`PlatformerController`], [`MovementConfig`],
/// [`crate::intent::MovementIntent`], a [`GroundSensor`] and a `Collider`.
#[derive(Bundle)]
pub struct AvianCharacterBundle {
    /// Dynamic body driven by forces and impulses.
    pub rigid_body: RigidBody,
    /// Linear velocity, read and clamped by the controller.
    pub velocity: LinearVelocity,
    /// Persistent force slot the controller accumulates into.
    pub force: ConstantForce,
    /// Gravity scale, rewritten every frame by the gravity regime.
    pub gravity_scale: GravityScale,
    /// Rotation lock; platformer characters never tumble.
    pub locked_axes: LockedAxes,
}

impl AvianCharacterBundle {
    /// A dynamic, rotation-locked body with baseline gravity.
    pub fn rotation_locked() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            velocity: LinearVelocity::default(),
            force: ConstantForce::default(),
            gravity_scale: GravityScale(1.0),
            locked_axes: LockedAxes::ROTATION_LOCKED,
        }
    }
}

impl Default for AvianCharacterBundle {
    fn default() -> Self {
        Self::rotation_locked()
    }
}

/// Ground overlap detection using an AABB intersection query.
///
/// The overlap box is authored on the [`GroundSensor`] and anchored at the
/// character's feet. A hit refreshes the coyote timer - the sole reset path
/// for `last_on_ground_time` besides its per-frame decay.
///
/// The query excludes the character's own collider; when the character has
/// `CollisionLayers`, its filters double as the ground mask.
fn avian_ground_overlap(
    spatial_query: SpatialQuery,
    mut q_controllers: Query<(
        Entity,
        &GlobalTransform,
        &GroundSensor,
        &MovementConfig,
        &mut PlatformerController,
        Option<&CollisionLayers>,
    )>,
) {
    for (entity, transform, sensor, config, mut controller, collision_layers) in &mut q_controllers
    {
        let origin = sensor.center(transform.translation().xy());
        let shape = Collider::rectangle(sensor.size.x, sensor.size.y);

        let filter = match collision_layers {
            Some(layers) => SpatialQueryFilter::from_mask(layers.filters)
                .with_excluded_entities([entity]),
            None => SpatialQueryFilter::default().with_excluded_entities([entity]),
        };

        let contact = !spatial_query
            .shape_intersections(&shape, origin, 0.0, &filter)
            .is_empty();

        controller.ground_contact = contact;
        if contact {
            controller.mark_ground_contact(config.jump.coyote_time);
        }
    }
}

/// Clear controller forces at the start of each physics step.
///
/// This system runs BEFORE the propulsion system. It subtracts the force
/// applied last step from `ConstantForce` and clears the accumulators, so
/// external user forces on the body are preserved while controller forces
/// stay isolated between steps.
pub fn clear_controller_forces(
    mut q_controllers: Query<(&mut PlatformerController, Option<&mut ConstantForce>)>,
) {
    for (mut controller, constant_force) in &mut q_controllers {
        let force_to_subtract = controller.prepare_new_step();
        if let Some(mut force) = constant_force {
            force.0 -= force_to_subtract;
        }
    }
}

/// Apply controller forces at the end of each physics step.
///
/// This system runs AFTER the propulsion system. It adds the accumulated
/// force to `ConstantForce` and remembers it for next step's subtraction, so
/// the force is integrated by Avian's physics step.
pub fn apply_controller_forces(
    mut q_controllers: Query<(&mut PlatformerController, Option<&mut ConstantForce>)>,
) {
    for (mut controller, constant_force) in &mut q_controllers {
        let force_to_apply = controller.finalize_step();
        if let Some(mut force) = constant_force {
            force.0 += force_to_apply;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(bevy::transform::TransformPlugin);
        // Insert SceneSpawner resource required by Avian's ColliderHierarchyPlugin
        app.insert_resource(bevy::scene::SceneSpawner::default());
        app.add_plugins(PhysicsPlugins::default());
        app.insert_resource(Time::<Fixed>::from_hz(60.0));
        app.finish();
        app.cleanup();
        app
    }

    #[test]
    fn avian_backend_velocity() {
        let mut app = create_test_app();

        let entity = app
            .world_mut()
            .spawn((
                Transform::default(),
                RigidBody::Dynamic,
                LinearVelocity(Vec2::new(50.0, 30.0)),
            ))
            .id();

        app.update();

        let vel = Avian2dBackend::get_velocity(app.world(), entity);
        assert!((vel.x - 50.0).abs() < 0.01);
        assert!((vel.y - 30.0).abs() < 0.01);

        Avian2dBackend::set_velocity(app.world_mut(), entity, Vec2::new(100.0, 0.0));

        let vel = Avian2dBackend::get_velocity(app.world(), entity);
        assert!((vel.x - 100.0).abs() < 0.01);
        assert!(vel.y.abs() < 0.01);
    }

    #[test]
    fn avian_backend_gravity_scale() {
        let mut app = create_test_app();

        let entity = app
            .world_mut()
            .spawn((Transform::default(), RigidBody::Dynamic, GravityScale(1.0)))
            .id();

        Avian2dBackend::set_gravity_scale(app.world_mut(), entity, 2.5);

        let scale = app.world().get::<GravityScale>(entity).unwrap().0;
        assert!((scale - 2.5).abs() < f32::EPSILON);
    }

    #[test]
    fn avian_backend_force_accumulates_into_controller() {
        let mut app = create_test_app();

        let entity = app
            .world_mut()
            .spawn((
                Transform::default(),
                PlatformerController::new(),
                AvianCharacterBundle::rotation_locked(),
            ))
            .id();

        Avian2dBackend::apply_force(app.world_mut(), entity, Vec2::new(40.0, 0.0));

        let controller = app.world().get::<PlatformerController>(entity).unwrap();
        assert_eq!(controller.accumulated_force, Vec2::new(40.0, 0.0));
    }
}
