// The playable character: movement, multi-jump, dash and the side-view camera

use std::sync::Arc;

use glam::Vec2;
use log::debug;

use crate::engine::camera::{Camera, SpringArm};
use crate::engine::input::{Action, InputComponent, InputEvent, TouchEvent};
use crate::engine::movement::{CharacterMovement, MovementEvent};
use crate::engine::physics::{body::presets, ColliderHandle, HitResult, PhysicsWorld, RigidBodyHandle};
use crate::engine::sprite::{Flipbook, FlipbookComponent};
use crate::engine::timer::{TimerHandle, TimerManager};
use crate::game::config::CharacterSettings;

/// Viewport the side-view camera assumes until the window reports its size
const DEFAULT_VIEWPORT: (f32, f32) = (1280.0, 720.0);

/// What the player's input asks the character to do
#[derive(Debug, Clone, PartialEq)]
pub enum CharacterCommand {
    MoveRight(f32),
    Jump,
    StopJumping,
    Dash,
    TouchStarted { finger: u64, location: Vec2 },
    TouchStopped { finger: u64, location: Vec2 },
}

/// The game's default character
///
/// The capsule collider and movement component handle collision and motion,
/// the flipbook component handles visuals. The character itself only keeps
/// the jump count and the dash cooldown.
#[derive(Debug)]
pub struct FlintCharacter {
    body: RigidBodyHandle,
    collider: ColliderHandle,
    movement: CharacterMovement,

    /// Side view camera
    side_view_camera: Camera,
    /// Camera boom positioning the camera beside the character
    camera_boom: SpringArm,

    sprite: FlipbookComponent,
    /// The animation to play while running around
    running_animation: Arc<Flipbook>,
    /// The animation to play while idle (standing still)
    idle_animation: Arc<Flipbook>,

    /// Dash speed as a multiple of the maximum walk speed
    dash_multiplier: f32,
    /// How long before dash comes off cooldown
    dash_cooldown_time: f32,
    dash_cooldown: bool,
    dash_timer: Option<TimerHandle>,

    max_jump_count: u32,
    current_jump_count: u32,
}

impl FlintCharacter {
    /// Spawn the character with its feet-centre capsule at `spawn`
    pub fn new(settings: &CharacterSettings, physics: &mut PhysicsWorld, spawn: Vec2) -> Self {
        let mut movement_settings = settings.movement.clone();
        movement_settings.max_jump_hold_time = settings.max_jump_time.max(0.0);

        let body = physics.add_rigid_body(presets::character_body(
            spawn.x,
            spawn.y,
            movement_settings.gravity_scale,
        ));
        let collider = physics.add_collider(
            presets::character_capsule(settings.capsule_width, settings.capsule_height),
            body,
        );
        let movement = CharacterMovement::new(body, settings.capsule_height, movement_settings);

        let camera_boom = SpringArm::new(&settings.camera, spawn);
        let side_view_camera = Camera::new(
            camera_boom.socket_location(),
            settings.camera.ortho_width,
            DEFAULT_VIEWPORT.0,
            DEFAULT_VIEWPORT.1,
        );

        let running_animation = Arc::new(Flipbook::from_definition(&settings.running_animation));
        let idle_animation = Arc::new(Flipbook::from_definition(&settings.idle_animation));
        let mut sprite = FlipbookComponent::new();
        sprite.set_flipbook(Arc::clone(&idle_animation));

        let mut character = Self {
            body,
            collider,
            movement,
            side_view_camera,
            camera_boom,
            sprite,
            running_animation,
            idle_animation,
            dash_multiplier: settings.dash_multiplier,
            dash_cooldown_time: settings.dash_cooldown_time,
            dash_cooldown: false,
            dash_timer: None,
            max_jump_count: 0,
            current_jump_count: 0,
        };
        character.set_max_jump_count(settings.max_jump_count);
        character.set_current_jump_count(0);
        character
    }

    /// Advance one fixed step
    pub fn tick(&mut self, dt: f32, physics: &mut PhysicsWorld) {
        if let Some(MovementEvent::Landed(hit)) = self.movement.update(physics, dt) {
            self.landed(&hit);
        }

        self.update_character();
        self.sprite.tick(dt);

        if let Some(location) = physics.body_translation(self.body) {
            let socket = self.camera_boom.update(location, dt);
            self.side_view_camera.set_position(socket);
        }
    }

    /// Jump if a jump is left. Returns whether a jump was started.
    pub fn jump(&mut self) -> bool {
        if !self.can_jump_internal() {
            return false;
        }

        self.set_current_jump_count(self.current_jump_count() + 1);
        self.movement.jump();
        debug!(
            "Jump {}/{}",
            self.current_jump_count(),
            self.max_jump_count()
        );
        true
    }

    pub fn stop_jumping(&mut self) {
        self.movement.stop_jumping();
    }

    /// Called when the character touches ground after falling
    pub fn landed(&mut self, hit: &HitResult) {
        debug!(
            "Landed at ({:.2}, {:.2}) after {} jump(s)",
            hit.point.x,
            hit.point.y,
            self.current_jump_count()
        );
        self.set_current_jump_count(0);
    }

    /// Whether another jump is allowed before landing
    pub fn can_jump_internal(&self) -> bool {
        self.current_jump_count() < self.max_jump_count()
    }

    /// Choose the correct animation based on the character's movement
    pub fn update_animation(&mut self) {
        let desired = if self.movement.velocity().x.powi(2) > 0.0 {
            &self.running_animation
        } else {
            &self.idle_animation
        };

        if self.sprite.set_flipbook(Arc::clone(desired)) {
            debug!("Animation -> {}", desired.name());
        }
    }

    /// Side to side input
    pub fn move_right(&mut self, value: f32) {
        self.movement.add_movement_input(value);
    }

    /// Launch sideways in the facing direction unless dash is cooling down
    ///
    /// Returns whether the dash happened.
    pub fn dash(&mut self, timers: &mut TimerManager) -> bool {
        if self.dash_cooldown() {
            return false;
        }

        let speed = self.movement.settings().max_walk_speed * self.dash_multiplier;
        self.movement
            .launch(Vec2::new(self.facing() * speed, 0.0), true, false);
        self.start_dash_cooldown(timers);

        debug!("Dash at {:.2} (cooldown: {})", self.facing() * speed, self.dash_cooldown);
        true
    }

    /// Handle a fired timer. Returns true if it belonged to this character.
    pub fn on_timer(&mut self, handle: TimerHandle) -> bool {
        if self.dash_timer != Some(handle) {
            return false;
        }

        self.dash_timer = None;
        self.set_dash_cooldown(false);
        debug!("Dash ready");
        true
    }

    /// Update the animation and face the sprite the way the character moves
    pub fn update_character(&mut self) {
        self.update_animation();

        let vx = self.movement.velocity().x;
        if vx < 0.0 {
            self.sprite.set_flip_horizontal(true);
        } else if vx > 0.0 {
            self.sprite.set_flip_horizontal(false);
        }
    }

    /// A finger touching the screen jumps
    pub fn touch_started(&mut self, finger: u64, location: Vec2) {
        debug!("Touch {} started at {}", finger, location);
        self.jump();
    }

    pub fn touch_stopped(&mut self, finger: u64, location: Vec2) {
        debug!("Touch {} stopped at {}", finger, location);
        self.stop_jumping();
    }

    /// Register the character's input bindings
    pub fn setup_player_input_component(input: &mut InputComponent<CharacterCommand>) {
        input.bind_action(Action::Jump, InputEvent::Pressed, CharacterCommand::Jump);
        input.bind_action(Action::Jump, InputEvent::Released, CharacterCommand::StopJumping);
        input.bind_action(Action::Dash, InputEvent::Pressed, CharacterCommand::Dash);
        input.bind_axis(Action::MoveLeft, Action::MoveRight, CharacterCommand::MoveRight);
        input.bind_touch(TouchEvent::Started, |finger, location| {
            CharacterCommand::TouchStarted { finger, location }
        });
        input.bind_touch(TouchEvent::Stopped, |finger, location| {
            CharacterCommand::TouchStopped { finger, location }
        });
    }

    /// Route a dispatched input command
    pub fn apply_command(&mut self, command: &CharacterCommand, timers: &mut TimerManager) {
        match *command {
            CharacterCommand::MoveRight(value) => self.move_right(value),
            CharacterCommand::Jump => {
                self.jump();
            }
            CharacterCommand::StopJumping => self.stop_jumping(),
            CharacterCommand::Dash => {
                self.dash(timers);
            }
            CharacterCommand::TouchStarted { finger, location } => {
                self.touch_started(finger, location)
            }
            CharacterCommand::TouchStopped { finger, location } => {
                self.touch_stopped(finger, location)
            }
        }
    }

    /// Move back to `position` at rest, keeping the dash cooldown
    pub fn respawn(&mut self, physics: &mut PhysicsWorld, position: Vec2) {
        physics.teleport_body(self.body, position);
        self.movement.reset();
        self.set_current_jump_count(0);
        self.camera_boom.snap_to(position);
        self.side_view_camera
            .set_position(self.camera_boom.socket_location());
    }

    /// +1 facing right, -1 facing left
    pub fn facing(&self) -> f32 {
        if self.sprite.is_flipped_horizontal() {
            -1.0
        } else {
            1.0
        }
    }

    pub fn position(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        physics.body_translation(self.body)
    }

    pub fn side_view_camera(&self) -> &Camera {
        &self.side_view_camera
    }

    pub fn side_view_camera_mut(&mut self) -> &mut Camera {
        &mut self.side_view_camera
    }

    pub fn camera_boom(&self) -> &SpringArm {
        &self.camera_boom
    }

    pub fn sprite(&self) -> &FlipbookComponent {
        &self.sprite
    }

    pub fn movement(&self) -> &CharacterMovement {
        &self.movement
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn collider(&self) -> ColliderHandle {
        self.collider
    }

    // Dash cooldown bookkeeping

    fn dash_cooldown(&self) -> bool {
        self.dash_cooldown
    }

    /// Schedule the timer that ends the cooldown
    ///
    /// A non-positive cooldown time schedules nothing and leaves dash ready.
    fn start_dash_cooldown(&mut self, timers: &mut TimerManager) {
        if let Some(previous) = self.dash_timer.take() {
            timers.clear_timer(previous);
        }

        self.dash_timer = timers.set_timer(self.dash_cooldown_time, false);
        self.set_dash_cooldown(self.dash_timer.is_some());
    }

    fn set_dash_cooldown(&mut self, cooldown: bool) {
        self.dash_cooldown = cooldown;
    }

    // Jump count bookkeeping

    fn set_current_jump_count(&mut self, count: u32) {
        self.current_jump_count = count.min(self.max_jump_count);
    }

    fn current_jump_count(&self) -> u32 {
        self.current_jump_count
    }

    fn set_max_jump_count(&mut self, max: u32) {
        self.max_jump_count = max;
        self.set_current_jump_count(self.current_jump_count);
    }

    fn max_jump_count(&self) -> u32 {
        self.max_jump_count
    }
}
