//! Core controller systems.
//!
//! Systems that touch velocity or forces are generic over the physics backend
//! and run as exclusive systems: they collect the per-entity inputs first,
//! then go through the backend with full world access.

use bevy::prelude::*;

use crate::backend::CharacterPhysicsBackend;
use crate::config::{MovementConfig, RunConfig};
use crate::gravity::select_regime;
use crate::intent::MovementIntent;
use crate::state::{Airborne, Grounded, JumpPhase, Jumped, Landed, PlatformerController};

/// Flag authoring mistakes when a config lands on an entity.
///
/// Runtime behavior stays total either way; this only makes the mistake
/// visible at setup instead of as silently wrong game feel.
pub(crate) fn report_invalid_configs(
    q_configs: Query<(Entity, &MovementConfig), Added<MovementConfig>>,
) {
    for (entity, config) in &q_configs {
        if let Err(err) = config.validate() {
            warn!("movement config on {entity} is degenerate: {err}");
        }
    }
}

/// Decay the coyote and jump-buffer timers by the frame delta.
pub(crate) fn tick_timers(time: Res<Time>, mut q_controllers: Query<&mut PlatformerController>) {
    let delta = time.delta_secs();
    for mut controller in &mut q_controllers {
        controller.tick_timers(delta);
    }
}

/// Flip facing when horizontal input disagrees with it.
///
/// The mirror is purely cosmetic: the transform's horizontal scale is negated
/// so sprites and child anchors flip, with no effect on physics.
pub(crate) fn update_facing(
    mut q_controllers: Query<(&MovementIntent, &mut PlatformerController, &mut Transform)>,
) {
    for (intent, mut controller, mut transform) in &mut q_controllers {
        if controller.face_toward(intent.axis.x) {
            transform.scale.x = -transform.scale.x;
        }
    }
}

/// Consume the intent's jump pressed/released edges.
///
/// A press arms the jump buffer; a release cuts the jump when the character is
/// still ascending.
pub(crate) fn process_jump_input<B: CharacterPhysicsBackend>(world: &mut World) {
    let edges: Vec<(Entity, bool, bool, f32)> = world
        .query::<(Entity, &mut MovementIntent, &MovementConfig)>()
        .iter_mut(world)
        .map(|(entity, mut intent, config)| {
            (
                entity,
                intent.take_jump_pressed(),
                intent.take_jump_released(),
                config.jump.buffer_time,
            )
        })
        .collect();

    for (entity, pressed, released, buffer_time) in edges {
        if pressed {
            if let Some(mut controller) = world.get_mut::<PlatformerController>(entity) {
                controller.on_jump_pressed(buffer_time);
            }
        }
        if released {
            let vertical_velocity = B::get_velocity(world, entity).y;
            if let Some(mut controller) = world.get_mut::<PlatformerController>(entity) {
                controller.on_jump_released(vertical_velocity);
            }
        }
    }
}

/// Start a jump for every character whose grace timers line up.
///
/// Initiation consumes both the ground grace and the jump buffer, then applies
/// an upward impulse. Downward velocity at the moment of jump is compensated
/// so a buffered jump out of a fall reaches full height.
pub(crate) fn initiate_jump<B: CharacterPhysicsBackend>(world: &mut World) {
    let candidates: Vec<(Entity, f32)> = world
        .query::<(Entity, &MovementConfig, &PlatformerController)>()
        .iter(world)
        .filter(|(_, _, controller)| {
            controller.can_jump() && controller.last_pressed_jump_time > 0.0
        })
        .map(|(entity, config, _)| (entity, config.jump.force))
        .collect();

    for (entity, force) in candidates {
        let vertical_velocity = B::get_velocity(world, entity).y;
        let Some(mut controller) = world.get_mut::<PlatformerController>(entity) else {
            continue;
        };
        if !controller.try_initiate_jump() {
            continue;
        }

        let impulse = PlatformerController::jump_impulse(force, vertical_velocity);
        B::apply_impulse(world, entity, Vec2::Y * impulse);
        world.write_message(Jumped { entity });
    }
}

/// Detect the jump apex: ascent turns into descent once upward velocity is
/// spent, keeping any cut in effect.
pub(crate) fn settle_jump_apex<B: CharacterPhysicsBackend>(world: &mut World) {
    let jumping: Vec<Entity> = world
        .query::<(Entity, &PlatformerController)>()
        .iter(world)
        .filter(|(_, controller)| controller.phase.is_jumping())
        .map(|(entity, _)| entity)
        .collect();

    for entity in jumping {
        let vertical_velocity = B::get_velocity(world, entity).y;
        if let Some(mut controller) = world.get_mut::<PlatformerController>(entity) {
            controller.settle_apex(vertical_velocity);
        }
    }
}

/// Clear the cut/falling state once the character is back on the ground.
pub(crate) fn recover_on_ground(
    mut landed: MessageWriter<Landed>,
    mut q_controllers: Query<(Entity, &mut PlatformerController)>,
) {
    for (entity, mut controller) in &mut q_controllers {
        if controller.recover_on_ground() {
            landed.write(Landed { entity });
        }
    }
}

/// Select this frame's gravity regime, write the gravity scale and cap the
/// descent speed where the regime demands it.
pub(crate) fn apply_gravity_scale<B: CharacterPhysicsBackend>(world: &mut World) {
    let entries: Vec<(Entity, MovementConfig, f32, JumpPhase)> = world
        .query::<(
            Entity,
            &MovementConfig,
            Option<&MovementIntent>,
            &PlatformerController,
        )>()
        .iter(world)
        .map(|(entity, config, intent, controller)| {
            (
                entity,
                *config,
                intent.map(|i| i.axis.y).unwrap_or(0.0),
                controller.phase,
            )
        })
        .collect();

    for (entity, config, vertical_input, phase) in entries {
        let velocity = B::get_velocity(world, entity);
        let regime = select_regime(
            phase,
            velocity.y,
            vertical_input,
            config.jump.hang_threshold,
        );

        B::set_gravity_scale(world, entity, regime.scale(&config.gravity));

        if let Some(cap) = regime.fall_speed_cap(&config.gravity) {
            if velocity.y < -cap {
                B::set_velocity(world, entity, Vec2::new(velocity.x, -cap));
            }
        }
    }
}

/// Sync `Grounded`/`Airborne` marker components from this frame's sensor
/// result, for animation and VFX consumers.
pub(crate) fn sync_contact_markers(
    mut commands: Commands,
    q_controllers: Query<(Entity, &PlatformerController, Has<Grounded>, Has<Airborne>)>,
) {
    for (entity, controller, has_grounded, has_airborne) in &q_controllers {
        if controller.ground_contact && !has_grounded {
            commands.entity(entity).insert(Grounded).remove::<Airborne>();
        } else if !controller.ground_contact && !has_airborne {
            commands.entity(entity).insert(Airborne).remove::<Grounded>();
        }
    }
}

/// Compute and accumulate the horizontal run force at the physics cadence.
pub(crate) fn apply_run<B: CharacterPhysicsBackend>(world: &mut World) {
    let entries: Vec<(Entity, RunConfig, f32, f32)> = world
        .query::<(
            Entity,
            &MovementConfig,
            Option<&MovementIntent>,
            &PlatformerController,
        )>()
        .iter(world)
        .map(|(entity, config, intent, controller)| {
            (
                entity,
                config.run,
                intent.map(|i| i.axis.x).unwrap_or(0.0),
                controller.last_on_ground_time,
            )
        })
        .collect();

    for (entity, run, horizontal_input, last_on_ground_time) in entries {
        let velocity_x = B::get_velocity(world, entity).x;
        let force = run_force(velocity_x, horizontal_input, last_on_ground_time, &run);
        B::apply_force(world, entity, Vec2::X * force);
    }
}

/// Horizontal propulsion force for one physics step.
///
/// The target speed is low-pass smoothed toward the current velocity, the
/// accel rate depends on grounded state and whether the target is zero, and
/// momentum conservation can zero the rate entirely so airborne drift keeps
/// its speed.
fn run_force(velocity_x: f32, horizontal_input: f32, last_on_ground_time: f32, run: &RunConfig) -> f32 {
    let target = horizontal_input * run.max_speed;
    let target = velocity_x + (target - velocity_x) * run.lerp_amount;

    let mut accel_rate = if last_on_ground_time > 0.0 {
        if target.abs() > 0.0 {
            run.accel_rate
        } else {
            run.deccel_rate
        }
    } else if target.abs() > 0.0 {
        run.accel_rate * run.air_accel_mult
    } else {
        run.deccel_rate * run.air_deccel_mult
    };

    if run.conserve_momentum
        && velocity_x.abs() > target.abs()
        && velocity_x.signum() == target.signum()
        && target.abs() > 0.01
        && last_on_ground_time < 0.0
    {
        accel_rate = 0.0;
    }

    (target - velocity_x) * accel_rate
}
