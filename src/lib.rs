//! # `tight_platformer_controller`
//!
//! A "tight"-feel 2D platformer character controller with physics backend abstraction.
//!
//! This crate provides the classic run-and-jump feel toolkit:
//! - Coyote time: jumps are still accepted for a grace period after leaving ground
//! - Jump buffering: an early jump press is honored when the ground arrives
//! - Jump cutting: releasing the button mid-ascent shortens the jump
//! - Hang time: reduced gravity near the jump apex for a floaty peak
//! - Gravity shaping: distinct gravity multipliers for fast-fall, cut, hang and fall
//! - Momentum conservation: airborne drift speed is preserved instead of decelerated
//! - Abstracts the physics backend for easy swapping (Avian2D included)
//!
//! ## Architecture
//!
//! The controller modulates a dynamic rigid body rather than integrating motion
//! itself:
//! 1. An AABB overlap sensor at the character's feet detects ground contact
//! 2. Grace timers track "recently grounded" and "recently pressed jump"
//! 3. A jump phase state machine drives gravity-regime selection
//! 4. The selected regime writes the body's gravity scale and caps fall speed
//! 5. Horizontal propulsion is applied as a continuous force at the fixed timestep
//!
//! ## System order
//!
//! Variable-rate logic runs in `Update`, mirroring the original per-frame contract,
//! as chained [`PlatformerSet`] phases:
//!
//! 1. **Timers** - decay the coyote and jump-buffer timers
//! 2. **Input** - facing flips and jump pressed/released edges
//! 3. **JumpState** - jump initiation, apex detection, ground recovery
//! 4. **Sensors** - ground overlap query (resets the coyote timer)
//! 5. **Gravity** - regime selection, gravity scale and fall-speed caps
//! 6. **StateSync** - `Grounded`/`Airborne` marker components
//!
//! Fixed-rate propulsion runs in `FixedUpdate`:
//!
//! 1. **Preparation** - clear forces applied in the previous step
//! 2. **Propulsion** - compute and accumulate the horizontal run force
//! 3. **ForceApplication** - hand accumulated forces to the physics engine
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use tight_platformer_controller::prelude::*;
//!
//! // Components for a controllable character
//! let controller = PlatformerController::new();
//! let config = MovementConfig::default();
//! let intent = MovementIntent::new();
//! let sensor = GroundSensor::default();
//!
//! // These are spawned as a bundle together with physics components
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod config;
pub mod detection;
pub mod gravity;
pub mod intent;
pub mod state;

// Systems are internal - they're added automatically by the plugin
pub(crate) mod systems;

#[cfg(feature = "avian2d")]
pub mod avian;

/// System sets for the controller phases.
///
/// The first six sets run chained in `Update` (variable rate, once per rendered
/// frame); the last three run chained in `FixedUpdate` (physics cadence). The
/// in-frame order matters: ground recovery must see the previous frame's
/// coyote timer before the sensor refreshes it, and gravity selection must run
/// after the jump state machine has settled.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformerSet {
    /// Decay the coyote and jump-buffer countdown timers.
    Timers,
    /// Sample movement intent: facing flips and jump input edges.
    Input,
    /// Jump initiation, apex detection and ground recovery.
    JumpState,
    /// Ground overlap detection (backend-specific systems live here).
    Sensors,
    /// Gravity regime selection and fall-speed clamping.
    Gravity,
    /// Sync `Grounded`/`Airborne` marker components for outside consumers.
    StateSync,
    /// Clear forces applied in the previous physics step.
    Preparation,
    /// Compute and accumulate the horizontal run force.
    Propulsion,
    /// Apply accumulated forces to the physics engine.
    ForceApplication,
}

pub mod prelude {
    //! Convenient re-exports for common usage.
    //!
    //! ```rust,no_run
    //! use bevy::prelude::*;
    //! use tight_platformer_controller::prelude::*;
    //!
    //! # #[cfg(feature = "avian2d")]
    //! fn spawn_character(mut commands: Commands) {
    //!     use avian2d::prelude::*;
    //!     use tight_platformer_controller::avian::AvianCharacterBundle;
    //!
    //!     commands.spawn((
    //!         Transform::from_xyz(0.0, 100.0, 0.0),
    //!         PlatformerController::new(),
    //!         MovementConfig::default(),
    //!         MovementIntent::new(),
    //!         GroundSensor::default(),
    //!         AvianCharacterBundle::rotation_locked(),
    //!         Collider::capsule(4.0, 8.0),
    //!     ));
    //! }
    //! ```

    pub use crate::PlatformerControllerPlugin;
    pub use crate::PlatformerSet;
    pub use crate::backend::CharacterPhysicsBackend;
    pub use crate::config::{ConfigError, GravityConfig, JumpConfig, MovementConfig, RunConfig};
    pub use crate::detection::GroundSensor;
    pub use crate::gravity::{GravityRegime, select_regime};
    pub use crate::intent::MovementIntent;
    pub use crate::state::{Airborne, Grounded, JumpPhase, Jumped, Landed, PlatformerController};

    #[cfg(feature = "avian2d")]
    pub use crate::avian::{Avian2dBackend, AvianCharacterBundle};
}

/// Main plugin for the platformer controller.
///
/// The plugin is generic over a physics backend `B`, which provides the actual
/// physics operations (velocity access, impulses, forces, gravity scale).
///
/// # Type Parameters
/// - `B`: The physics backend implementation (e.g. [`avian::Avian2dBackend`])
///
/// # Examples
///
/// With the Avian2D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// # #[cfg(feature = "avian2d")]
/// # fn main() {
/// use avian2d::prelude::*;
/// use tight_platformer_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(PhysicsPlugins::default())
///     .add_plugins(PlatformerControllerPlugin::<Avian2dBackend>::default())
///     .run();
/// # }
/// # #[cfg(not(feature = "avian2d"))]
/// # fn main() {}
/// ```
pub struct PlatformerControllerPlugin<B: backend::CharacterPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::CharacterPhysicsBackend> Default for PlatformerControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::CharacterPhysicsBackend> PlatformerControllerPlugin<B> {
    /// Create a new platformer controller plugin.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: backend::CharacterPhysicsBackend> Plugin for PlatformerControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::MovementConfig>();
        app.register_type::<state::PlatformerController>();
        app.register_type::<state::JumpPhase>();
        app.register_type::<intent::MovementIntent>();
        app.register_type::<detection::GroundSensor>();

        // Messages for animation/VFX consumers
        app.add_message::<state::Jumped>();
        app.add_message::<state::Landed>();

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        // Per-frame phases. The chain reproduces the original frame order:
        // timers -> input -> jump state -> collision check -> gravity.
        app.configure_sets(
            Update,
            (
                PlatformerSet::Timers,
                PlatformerSet::Input,
                PlatformerSet::JumpState,
                PlatformerSet::Sensors,
                PlatformerSet::Gravity,
                PlatformerSet::StateSync,
            )
                .chain(),
        );

        // Fixed-rate phases for force application.
        app.configure_sets(
            FixedUpdate,
            (
                PlatformerSet::Preparation,
                PlatformerSet::Propulsion,
                PlatformerSet::ForceApplication,
            )
                .chain(),
        );

        // Configuration errors surface when the config is added, not at first use.
        app.add_systems(PreUpdate, systems::report_invalid_configs);

        app.add_systems(
            Update,
            systems::tick_timers.in_set(PlatformerSet::Timers),
        );

        // Facing must settle before jump edges are consumed; both read intent.
        app.add_systems(
            Update,
            (systems::update_facing, systems::process_jump_input::<B>)
                .chain()
                .in_set(PlatformerSet::Input),
        );

        // Initiation before apex detection: a jump started this frame has
        // positive vertical velocity, so the apex check is a no-op for it.
        app.add_systems(
            Update,
            (
                systems::initiate_jump::<B>,
                systems::settle_jump_apex::<B>,
                systems::recover_on_ground,
            )
                .chain()
                .in_set(PlatformerSet::JumpState),
        );

        app.add_systems(
            Update,
            systems::apply_gravity_scale::<B>.in_set(PlatformerSet::Gravity),
        );

        app.add_systems(
            Update,
            systems::sync_contact_markers.in_set(PlatformerSet::StateSync),
        );

        app.add_systems(
            FixedUpdate,
            systems::apply_run::<B>.in_set(PlatformerSet::Propulsion),
        );
    }
}
