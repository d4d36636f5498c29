// Character movement component
//
// Drives a dynamic capsule body: horizontal acceleration toward the input,
// jumping with an optional hold extension, launches, and ground detection.
// Gravity and collision response stay with the physics world.

use glam::Vec2;
use log::trace;
use serde::Deserialize;

use crate::core::math::{approach, clamp};
use crate::engine::physics::{CollisionGroups, HitResult, PhysicsWorld, RigidBodyHandle};

/// Ray origin sits this far above the capsule's feet so it starts inside the body
const GROUND_PROBE_SKIN: f32 = 0.1;

/// Vertical speed below which a falling character counts as touching down
const LANDING_VELOCITY_EPSILON: f32 = 0.01;

/// Tunables for [`CharacterMovement`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    /// Maximum horizontal speed from input (units/second)
    pub max_walk_speed: f32,
    /// Horizontal acceleration toward the input speed (units/second²)
    pub max_acceleration: f32,
    /// Deceleration on the ground with no input (units/second²)
    pub braking_deceleration: f32,
    /// Fraction of acceleration available in the air (0.0 = none, 1.0 = full)
    pub air_control: f32,
    /// Upward speed applied when a jump starts
    pub jump_velocity: f32,
    /// Seconds a held jump keeps applying jump velocity
    pub max_jump_hold_time: f32,
    /// Multiplier on world gravity for the character body
    pub gravity_scale: f32,
    /// How far below the feet ground still counts as ground
    pub ground_probe_distance: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            max_walk_speed: 6.0,
            max_acceleration: 40.0,
            braking_deceleration: 40.0,
            air_control: 0.8,
            jump_velocity: 10.0,
            max_jump_hold_time: 0.0,
            gravity_scale: 2.0,
            ground_probe_distance: 0.1,
        }
    }
}

/// What the movement component is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementMode {
    /// Supported by ground
    Walking,
    /// Airborne, either jumping or falling
    #[default]
    Falling,
}

/// Transitions reported by [`CharacterMovement::update`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementEvent {
    /// A falling character touched ground
    Landed(HitResult),
    /// A walking character lost its ground without jumping
    WalkedOffLedge,
}

#[derive(Debug, Clone, Copy)]
struct PendingLaunch {
    velocity: Vec2,
    x_override: bool,
    y_override: bool,
}

/// Movement component attached to a character's capsule body
#[derive(Debug)]
pub struct CharacterMovement {
    body: RigidBodyHandle,
    /// Distance from body centre to the bottom of the capsule
    half_height: f32,
    settings: MovementSettings,
    mode: MovementMode,
    /// Accumulated input for this update, consumed by `update`
    pending_input: f32,
    jump_requested: bool,
    jump_held: bool,
    jump_hold_time: f32,
    pending_launch: Option<PendingLaunch>,
    velocity: Vec2,
}

impl CharacterMovement {
    /// Create a movement component driving `body`
    ///
    /// Starts in `Falling`; the first update that finds ground reports a landing.
    pub fn new(body: RigidBodyHandle, capsule_height: f32, settings: MovementSettings) -> Self {
        Self {
            body,
            half_height: capsule_height / 2.0,
            settings,
            mode: MovementMode::Falling,
            pending_input: 0.0,
            jump_requested: false,
            jump_held: false,
            jump_hold_time: 0.0,
            pending_launch: None,
            velocity: Vec2::ZERO,
        }
    }

    /// Add input along the horizontal axis, scaled by `scale`
    ///
    /// Inputs accumulate until the next update and are clamped to [-1, 1].
    pub fn add_movement_input(&mut self, scale: f32) {
        if scale.is_finite() {
            self.pending_input += scale;
        }
    }

    /// Start a jump on the next update
    pub fn jump(&mut self) {
        self.jump_requested = true;
        self.jump_held = true;
        self.jump_hold_time = 0.0;
    }

    /// Release the jump input, ending any hold extension
    ///
    /// A jump requested earlier in the same frame still happens.
    pub fn stop_jumping(&mut self) {
        self.jump_held = false;
    }

    /// Set the character's velocity on the next update
    ///
    /// Each axis either replaces (`*_override`) or adds to the current velocity.
    /// The character is airborne after a launch; on flat ground it lands again
    /// on the following update.
    pub fn launch(&mut self, velocity: Vec2, x_override: bool, y_override: bool) {
        self.pending_launch = Some(PendingLaunch {
            velocity,
            x_override,
            y_override,
        });
    }

    /// Advance one fixed step
    pub fn update(&mut self, physics: &mut PhysicsWorld, dt: f32) -> Option<MovementEvent> {
        let mut velocity = physics.body_velocity(self.body)?;

        let mut event = None;
        let ground = self.find_ground(physics);

        // A jump this step leaves the ground, so it can't also land
        if !self.jump_requested {
            match (self.mode, ground) {
                (MovementMode::Falling, Some(hit)) if velocity.y <= LANDING_VELOCITY_EPSILON => {
                    self.mode = MovementMode::Walking;
                    self.jump_held = false;
                    event = Some(MovementEvent::Landed(hit));
                }
                (MovementMode::Walking, None) => {
                    self.mode = MovementMode::Falling;
                    event = Some(MovementEvent::WalkedOffLedge);
                }
                _ => {}
            }
        }

        velocity.x = self.integrate_horizontal(velocity.x, dt);

        if self.jump_requested {
            self.jump_requested = false;
            self.jump_hold_time = 0.0;
            self.mode = MovementMode::Falling;
            velocity.y = self.settings.jump_velocity;
            trace!("Jump started with vy={:.2}", velocity.y);
        } else if self.jump_held
            && self.mode == MovementMode::Falling
            && self.jump_hold_time < self.settings.max_jump_hold_time
        {
            self.jump_hold_time += dt;
            velocity.y = velocity.y.max(self.settings.jump_velocity);
        }

        if let Some(launch) = self.pending_launch.take() {
            velocity.x = if launch.x_override {
                launch.velocity.x
            } else {
                velocity.x + launch.velocity.x
            };
            velocity.y = if launch.y_override {
                launch.velocity.y
            } else {
                velocity.y + launch.velocity.y
            };
            self.mode = MovementMode::Falling;
        }

        physics.set_body_velocity(self.body, velocity);
        self.velocity = velocity;

        event
    }

    fn integrate_horizontal(&mut self, vx: f32, dt: f32) -> f32 {
        let input = clamp(self.pending_input, -1.0, 1.0);
        self.pending_input = 0.0;

        let target = input * self.settings.max_walk_speed;
        let has_input = input != 0.0;

        match self.mode {
            MovementMode::Walking if has_input => {
                approach(vx, target, self.settings.max_acceleration * dt)
            }
            MovementMode::Walking => approach(vx, 0.0, self.settings.braking_deceleration * dt),
            MovementMode::Falling if has_input => approach(
                vx,
                target,
                self.settings.max_acceleration * self.settings.air_control * dt,
            ),
            // No air friction: keep momentum
            MovementMode::Falling => vx,
        }
    }

    /// Probe straight down from the capsule's feet
    fn find_ground(&self, physics: &PhysicsWorld) -> Option<HitResult> {
        let position = physics.body_translation(self.body)?;
        let origin = Vec2::new(position.x, position.y - self.half_height + GROUND_PROBE_SKIN);

        physics.cast_ray(
            origin,
            Vec2::NEG_Y,
            GROUND_PROBE_SKIN + self.settings.ground_probe_distance,
            CollisionGroups::ground_query_filter().exclude_rigid_body(self.body),
        )
    }

    /// Velocity written by the last update
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    pub fn is_falling(&self) -> bool {
        self.mode == MovementMode::Falling
    }

    pub fn is_moving_on_ground(&self) -> bool {
        self.mode == MovementMode::Walking
    }

    pub fn settings(&self) -> &MovementSettings {
        &self.settings
    }

    /// Body this component drives
    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    /// Forget in-flight state after a teleport
    pub fn reset(&mut self) {
        self.mode = MovementMode::Falling;
        self.pending_input = 0.0;
        self.jump_requested = false;
        self.jump_held = false;
        self.jump_hold_time = 0.0;
        self.pending_launch = None;
        self.velocity = Vec2::ZERO;
    }
}
