// Game world: level geometry, the character, timers and the physics step

use glam::Vec2;
use log::{info, trace};
use parry2d::bounding_volume::{Aabb, BoundingVolume};
use parry2d::math::Point;

use crate::engine::input::{InputComponent, PlayerInput};
use crate::engine::physics::{body::presets, PhysicsWorld, RigidBodyHandle};
use crate::engine::timer::TimerManager;
use crate::game::characters::{CharacterCommand, FlintCharacter};
use crate::game::config::{FlintConfig, PlatformSettings};

/// How far past the level's side edges the character may go before respawning
const SIDE_OUT_OF_BOUNDS_MARGIN: f32 = 30.0;

/// Everything simulated in a fixed update
pub struct GameWorld {
    physics: PhysicsWorld,
    timers: TimerManager,
    platforms: Vec<RigidBodyHandle>,
    /// Union of all platform boxes, `None` for an empty level
    level_bounds: Option<Aabb>,
    character: FlintCharacter,
    input: InputComponent<CharacterCommand>,
    spawn: Vec2,
    kill_z: f32,
    respawn_count: u32,
}

impl GameWorld {
    /// Build the level and spawn the character from `config`
    pub fn new(config: &FlintConfig) -> Self {
        let mut physics = PhysicsWorld::new();

        let platforms: Vec<RigidBodyHandle> = config
            .level
            .platforms
            .iter()
            .map(|platform| {
                let body = physics.add_rigid_body(presets::platform_body(
                    platform.position.x,
                    platform.position.y,
                ));
                physics.add_collider(
                    presets::platform_collider(platform.size.x, platform.size.y),
                    body,
                );
                body
            })
            .collect();

        let level_bounds = config
            .level
            .platforms
            .iter()
            .map(platform_aabb)
            .reduce(|bounds, aabb| bounds.merged(&aabb));

        let character = FlintCharacter::new(&config.character, &mut physics, config.level.spawn);
        let mut input = InputComponent::new();
        FlintCharacter::setup_player_input_component(&mut input);

        info!(
            "World created: {} platforms, spawn at {}",
            platforms.len(),
            config.level.spawn
        );

        Self {
            physics,
            timers: TimerManager::new(),
            platforms,
            level_bounds,
            character,
            input,
            spawn: config.level.spawn,
            kill_z: config.level.kill_z,
            respawn_count: 0,
        }
    }

    /// Advance the simulation by one fixed step
    ///
    /// Input commands apply first, then the character ticks, then physics
    /// steps, then fired timers are handed back to their owners.
    pub fn fixed_update(&mut self, dt: f32, input: &PlayerInput) {
        for command in self.input.dispatch(input) {
            self.character.apply_command(&command, &mut self.timers);
        }

        self.character.tick(dt, &mut self.physics);

        self.physics.set_timestep(dt);
        self.physics.step();

        for handle in self.timers.tick(dt) {
            if !self.character.on_timer(handle) {
                trace!("Timer {:?} fired with no owner", handle);
            }
        }

        if let Some(position) = self.character.position(&self.physics) {
            if self.is_out_of_bounds(position) {
                self.respawn_count += 1;
                info!(
                    "Character out of bounds at {}, respawning ({} so far)",
                    position, self.respawn_count
                );
                self.character.respawn(&mut self.physics, self.spawn);
            }
        }
    }

    /// Below the kill height, or well past either side of the level
    pub fn is_out_of_bounds(&self, position: Vec2) -> bool {
        if position.y < self.kill_z {
            return true;
        }

        self.level_bounds.as_ref().is_some_and(|bounds| {
            position.x < bounds.mins.x - SIDE_OUT_OF_BOUNDS_MARGIN
                || position.x > bounds.maxs.x + SIDE_OUT_OF_BOUNDS_MARGIN
        })
    }

    /// Let the side-view camera know the window size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.character.side_view_camera_mut().resize(width, height);
    }

    pub fn character(&self) -> &FlintCharacter {
        &self.character
    }

    pub fn character_position(&self) -> Option<Vec2> {
        self.character.position(&self.physics)
    }

    pub fn level_bounds(&self) -> Option<&Aabb> {
        self.level_bounds.as_ref()
    }

    pub fn num_platforms(&self) -> usize {
        self.platforms.len()
    }

    pub fn respawn_count(&self) -> u32 {
        self.respawn_count
    }
}

fn platform_aabb(platform: &PlatformSettings) -> Aabb {
    let half = platform.size / 2.0;
    Aabb::new(
        Point::new(platform.position.x - half.x, platform.position.y - half.y),
        Point::new(platform.position.x + half.x, platform.position.y + half.y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::game_loop::FIXED_TIMESTEP;
    use crate::engine::input::Action;
    use crate::game::config::{CharacterSettings, LevelSettings};

    fn config() -> FlintConfig {
        let character = CharacterSettings::default();
        FlintConfig {
            level: LevelSettings {
                spawn: Vec2::new(0.0, character.capsule_height / 2.0 + 0.5),
                kill_z: -10.0,
                platforms: vec![PlatformSettings {
                    position: Vec2::new(0.0, -0.5),
                    size: Vec2::new(20.0, 1.0),
                }],
            },
            character,
        }
    }

    fn run(world: &mut GameWorld, input: &PlayerInput, steps: usize) {
        for _ in 0..steps {
            world.fixed_update(FIXED_TIMESTEP, input);
        }
    }

    #[test]
    fn test_level_bounds_cover_platforms() {
        let mut config = config();
        config.level.platforms.push(PlatformSettings {
            position: Vec2::new(15.0, 3.0),
            size: Vec2::new(4.0, 1.0),
        });
        let world = GameWorld::new(&config);

        let bounds = world.level_bounds().unwrap();
        assert_eq!(world.num_platforms(), 2);
        assert_eq!(bounds.mins, Point::new(-10.0, -1.0));
        assert_eq!(bounds.maxs, Point::new(17.0, 3.5));
    }

    #[test]
    fn test_character_settles_on_floor() {
        let mut world = GameWorld::new(&config());
        run(&mut world, &PlayerInput::new(), 60);

        assert!(world.character().movement().is_moving_on_ground());
        let position = world.character_position().unwrap();
        assert!(position.y > 0.0 && position.y < 1.5);
    }

    #[test]
    fn test_held_move_input_moves_right() {
        let mut world = GameWorld::new(&config());
        run(&mut world, &PlayerInput::new(), 30);
        let start = world.character_position().unwrap();

        let mut input = PlayerInput::new();
        input.press(Action::MoveRight);
        run(&mut world, &input, 30);

        assert!(world.character_position().unwrap().x > start.x);
        assert!(!world.character().sprite().is_flipped_horizontal());
    }

    #[test]
    fn test_jump_input_lifts_character() {
        let mut world = GameWorld::new(&config());
        run(&mut world, &PlayerInput::new(), 30);
        let start = world.character_position().unwrap();

        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        world.fixed_update(FIXED_TIMESTEP, &input);
        input.update();
        run(&mut world, &input, 10);

        assert!(world.character_position().unwrap().y > start.y);
        assert!(world.character().movement().is_falling());
    }

    #[test]
    fn test_dash_cooldown_cleared_by_world_timers() {
        let mut config = config();
        config.character.dash_cooldown_time = 0.25;
        let mut world = GameWorld::new(&config);
        run(&mut world, &PlayerInput::new(), 10);

        let mut input = PlayerInput::new();
        input.press(Action::Dash);
        world.fixed_update(FIXED_TIMESTEP, &input);
        assert_eq!(world.timers.active_count(), 1);

        input.update();
        run(&mut world, &input, 16);
        assert_eq!(world.timers.active_count(), 0);
    }

    #[test]
    fn test_falling_out_respawns() {
        let mut world = GameWorld::new(&config());
        let body = world.character.body();
        world.physics.teleport_body(body, Vec2::new(0.0, -50.0));

        world.fixed_update(FIXED_TIMESTEP, &PlayerInput::new());
        assert_eq!(world.respawn_count(), 1);
        assert_eq!(world.character_position(), Some(config().level.spawn));
    }

    #[test]
    fn test_out_of_bounds_sides() {
        let world = GameWorld::new(&config());
        assert!(!world.is_out_of_bounds(Vec2::new(25.0, 0.0)));
        assert!(world.is_out_of_bounds(Vec2::new(45.0, 0.0)));
        assert!(world.is_out_of_bounds(Vec2::new(-45.0, 0.0)));
        assert!(world.is_out_of_bounds(Vec2::new(0.0, -11.0)));
    }

    #[test]
    fn test_empty_level_only_uses_kill_z() {
        let mut config = config();
        config.level.platforms.clear();
        let world = GameWorld::new(&config);

        assert!(world.level_bounds().is_none());
        assert!(!world.is_out_of_bounds(Vec2::new(1000.0, 0.0)));
    }
}
