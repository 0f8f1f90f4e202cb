//! Integration tests for the platformer controller with the Avian2D backend.
//!
//! These tests drive the full plugin schedule against real physics components.
//! Assertions check state transitions, gravity scales and velocity clamps
//! rather than integrated positions, so they hold regardless of wall-clock
//! pacing between updates.

#![cfg(feature = "avian2d")]

use avian2d::prelude::*;
use bevy::prelude::*;
use tight_platformer_controller::prelude::*;

const FIXED_UPDATE_HZ: f64 = 60.0;
const PIXELS_PER_METER: f32 = 10.0;

/// Create a minimal test app with physics and the platformer controller.
fn create_test_app() -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins);
    app.add_plugins(TransformPlugin);
    // Insert SceneSpawner resource to satisfy Avian's ColliderHierarchyPlugin
    app.insert_resource(bevy::scene::SceneSpawner::default());
    app.add_plugins(PhysicsPlugins::default().with_length_unit(PIXELS_PER_METER));
    app.add_plugins(PlatformerControllerPlugin::<Avian2dBackend>::default());
    app.insert_resource(Time::<Fixed>::from_hz(FIXED_UPDATE_HZ));
    // Advance virtual time by exactly one fixed timestep per `app.update()` so
    // the physics step (and its spatial query pipeline) runs every frame.
    app.insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(
        std::time::Duration::from_secs_f64(1.0 / FIXED_UPDATE_HZ),
    ));
    // Assertions check controller state and gravity scales, not integrated
    // positions; zero global gravity keeps set-up velocities exact between
    // the physics step and the controller's read.
    app.insert_resource(Gravity(Vec2::ZERO));

    app.finish();
    app.cleanup();
    // Warm-up frame: the first update only initializes the clock (zero delta),
    // so run it here to make every update in the tests advance a full step.
    app.update();
    app
}

/// Spawn a static ground collider.
fn spawn_ground(app: &mut App, position: Vec2, half_size: Vec2) -> Entity {
    let transform = Transform::from_translation(position.extend(0.0));
    app.world_mut()
        .spawn((
            transform,
            GlobalTransform::from(transform),
            RigidBody::Static,
            Collider::rectangle(half_size.x * 2.0, half_size.y * 2.0),
        ))
        .id()
}

/// Spawn a platformer character with default config.
///
/// The capsule is 8x16; the default ground sensor sits flush with its bottom.
fn spawn_character(app: &mut App, position: Vec2) -> Entity {
    let transform = Transform::from_translation(position.extend(0.0));
    app.world_mut()
        .spawn((
            transform,
            GlobalTransform::from(transform),
            PlatformerController::new(),
            MovementConfig::default(),
            MovementIntent::new(),
            GroundSensor::default(),
            AvianCharacterBundle::rotation_locked(),
            Collider::capsule(4.0, 8.0),
        ))
        .id()
}

/// A character standing on ground: capsule bottom flush with the ground top.
fn spawn_grounded_character(app: &mut App) -> Entity {
    spawn_ground(app, Vec2::ZERO, Vec2::new(50.0, 5.0));
    spawn_character(app, Vec2::new(0.0, 13.0))
}

fn controller(app: &App, entity: Entity) -> &PlatformerController {
    app.world().get::<PlatformerController>(entity).unwrap()
}

#[test]
fn ground_contact_refreshes_coyote_timer() {
    let mut app = create_test_app();
    let character = spawn_grounded_character(&mut app);

    app.update();

    let state = controller(&app, character);
    assert!(state.ground_contact);
    assert!(state.last_on_ground_time > 0.1);
    assert!(app.world().get::<Grounded>(character).is_some());
    assert!(app.world().get::<Airborne>(character).is_none());
}

#[test]
fn no_ground_means_airborne() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app, Vec2::new(0.0, 100.0));

    app.update();

    let state = controller(&app, character);
    assert!(!state.ground_contact);
    assert!(state.last_on_ground_time <= 0.0);
    assert!(app.world().get::<Airborne>(character).is_some());
}

#[test]
fn grounded_jump_press_initiates_same_frame() {
    let mut app = create_test_app();
    let character = spawn_grounded_character(&mut app);

    // Establish ground contact first.
    app.update();

    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .press_jump();
    app.update();

    let state = controller(&app, character);
    assert_eq!(state.phase, JumpPhase::Ascending);
    // The buffer was consumed by the initiation.
    assert!(state.last_pressed_jump_time <= 0.0);

    let velocity = app.world().get::<LinearVelocity>(character).unwrap();
    assert!(velocity.y > 0.0);

    let jumped = app.world().resource::<Messages<Jumped>>();
    assert!(jumped.len() >= 1);
}

#[test]
fn midair_press_stays_buffered_without_initiating() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app, Vec2::new(0.0, 100.0));

    app.update();
    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .press_jump();
    app.update();

    let state = controller(&app, character);
    assert_eq!(state.phase, JumpPhase::Grounded);
    // Not within coyote tolerance, so the request keeps waiting.
    assert!(state.last_pressed_jump_time > 0.0);
}

#[test]
fn buffered_press_fires_once_ground_arrives() {
    let mut app = create_test_app();
    let character = spawn_grounded_character(&mut app);

    // Simulate a press that happened just before this frame: buffer armed,
    // ground not yet registered.
    app.world_mut()
        .get_mut::<PlatformerController>(character)
        .unwrap()
        .on_jump_pressed(0.05);

    // Frame 1: no coyote grace yet, the sensor registers ground afterwards.
    app.update();
    assert_eq!(controller(&app, character).phase, JumpPhase::Grounded);

    // Frame 2: both timers positive, the jump initiates.
    app.update();
    assert_eq!(controller(&app, character).phase, JumpPhase::Ascending);
}

#[test]
fn release_mid_ascent_cuts_and_raises_gravity() {
    let mut app = create_test_app();
    let character = spawn_grounded_character(&mut app);

    app.update();
    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .press_jump();
    app.update();
    assert_eq!(controller(&app, character).phase, JumpPhase::Ascending);

    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .release_jump();
    app.update();

    let state = controller(&app, character);
    assert_eq!(state.phase, JumpPhase::CutAscending);

    let config = app.world().get::<MovementConfig>(character).unwrap().gravity;
    let scale = app.world().get::<GravityScale>(character).unwrap().0;
    assert!((scale - config.base_scale * config.jump_cut_mult).abs() < 1e-5);
}

#[test]
fn plain_descent_selects_fall_gravity_and_clamps() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app, Vec2::new(0.0, 100.0));
    app.world_mut()
        .get_mut::<LinearVelocity>(character)
        .unwrap()
        .0 = Vec2::new(0.0, -1000.0);

    app.update();

    let config = app.world().get::<MovementConfig>(character).unwrap().gravity;
    let scale = app.world().get::<GravityScale>(character).unwrap().0;
    assert!((scale - config.base_scale * config.fall_mult).abs() < 1e-5);

    let velocity = app.world().get::<LinearVelocity>(character).unwrap();
    assert!((velocity.y + config.max_fall_speed).abs() < 0.01);
}

#[test]
fn holding_down_fast_falls_with_higher_cap() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app, Vec2::new(0.0, 100.0));
    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .set_axis(0.0, -1.0);
    app.world_mut()
        .get_mut::<LinearVelocity>(character)
        .unwrap()
        .0 = Vec2::new(0.0, -1000.0);

    app.update();

    let config = app.world().get::<MovementConfig>(character).unwrap().gravity;
    let scale = app.world().get::<GravityScale>(character).unwrap().0;
    assert!((scale - config.base_scale * config.fast_fall_mult).abs() < 1e-5);

    let velocity = app.world().get::<LinearVelocity>(character).unwrap();
    assert!((velocity.y + config.max_fast_fall_speed).abs() < 0.01);
}

#[test]
fn slow_jump_descent_hangs_without_clamping() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app, Vec2::new(0.0, 100.0));
    {
        let mut state = app
            .world_mut()
            .get_mut::<PlatformerController>(character)
            .unwrap();
        state.phase = JumpPhase::Falling;
    }
    app.world_mut()
        .get_mut::<LinearVelocity>(character)
        .unwrap()
        .0 = Vec2::new(0.0, -10.0);

    app.update();

    let config = app.world().get::<MovementConfig>(character).unwrap().gravity;
    let scale = app.world().get::<GravityScale>(character).unwrap().0;
    assert!((scale - config.base_scale * config.hang_mult).abs() < 1e-5);

    // No clamp in the hang window.
    let velocity = app.world().get::<LinearVelocity>(character).unwrap();
    assert!((velocity.y + 10.0).abs() < 0.01);
}

#[test]
fn cut_descent_keeps_cut_gravity() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app, Vec2::new(0.0, 100.0));
    {
        let mut state = app
            .world_mut()
            .get_mut::<PlatformerController>(character)
            .unwrap();
        state.phase = JumpPhase::CutAscending;
    }
    app.world_mut()
        .get_mut::<LinearVelocity>(character)
        .unwrap()
        .0 = Vec2::new(0.0, -50.0);

    app.update();

    let state = controller(&app, character);
    // The apex passed, the cut persists into the descent.
    assert_eq!(state.phase, JumpPhase::CutFalling);

    let config = app.world().get::<MovementConfig>(character).unwrap().gravity;
    let scale = app.world().get::<GravityScale>(character).unwrap().0;
    assert!((scale - config.base_scale * config.jump_cut_mult).abs() < 1e-5);
}

#[test]
fn facing_mirrors_the_transform_once() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app, Vec2::new(0.0, 100.0));

    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .set_horizontal(-1.0);
    app.update();

    let state = controller(&app, character);
    assert!(!state.facing_right);
    let scale_x = app.world().get::<Transform>(character).unwrap().scale.x;
    assert!((scale_x + 1.0).abs() < f32::EPSILON);

    // Same-direction input must not flip again.
    app.update();
    let scale_x = app.world().get::<Transform>(character).unwrap().scale.x;
    assert!((scale_x + 1.0).abs() < f32::EPSILON);

    // Opposite input flips back.
    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .set_horizontal(1.0);
    app.update();
    assert!(controller(&app, character).facing_right);
    let scale_x = app.world().get::<Transform>(character).unwrap().scale.x;
    assert!((scale_x - 1.0).abs() < f32::EPSILON);
}

#[test]
fn run_force_reaches_the_rigid_body() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app, Vec2::new(0.0, 100.0));

    {
        let mut state = app
            .world_mut()
            .get_mut::<PlatformerController>(character)
            .unwrap();
        state.last_on_ground_time = 0.2;
    }
    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .set_horizontal(1.0);

    // Drive the fixed-rate phases directly: clear, propel, apply.
    app.world_mut().run_schedule(FixedUpdate);

    let config = app.world().get::<MovementConfig>(character).unwrap().run;
    let expected = config.max_speed * config.accel_rate;
    let force = app.world().get::<ConstantForce>(character).unwrap().0;
    assert!((force.x - expected).abs() < 0.01);
    assert!(force.y.abs() < f32::EPSILON);

    // A second step subtracts last step's force before re-adding it, so
    // controller forces never stack up in the ConstantForce slot.
    app.world_mut().run_schedule(FixedUpdate);
    let force = app.world().get::<ConstantForce>(character).unwrap().0;
    assert!((force.x - expected).abs() < 0.01);
}
