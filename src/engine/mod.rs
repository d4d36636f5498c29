// Engine modules: physics, movement, camera, sprite, timers, input, game loop

pub mod camera;
pub mod game_loop;
pub mod input;
pub mod movement;
pub mod physics;
pub mod sprite;
pub mod timer;
