use anyhow::{Context, Result};
use log::{debug, info};
use winit::{
    event::{ElementState, Event, WindowEvent},
    event_loop::EventLoop,
    keyboard::PhysicalKey,
    window::WindowBuilder,
};

mod core;
mod engine;
mod game;

use engine::game_loop::GameLoop;
use engine::input::{Action, InputManager, InputSource};
use game::config::{FlintConfig, DEFAULT_CONFIG_PATH};
use game::world::GameWorld;

/// Frames between status lines in the debug log
const STATUS_LOG_INTERVAL: u64 = 600;

fn main() -> Result<()> {
    // Initialize logger (RUST_LOG overrides the default level)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting Flint...");

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = FlintConfig::load(&config_path).context("Failed to load game config")?;

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Flint")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created successfully");

    let mut world = GameWorld::new(&config);
    let size = window.inner_size();
    world.resize(size.width as f32, size.height as f32);

    let mut input = InputManager::new();
    let mut game_loop = GameLoop::new();

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!("Close requested, shutting down...");
                    elwt.exit();
                }
                WindowEvent::Resized(physical_size) => {
                    info!("Window resized to {:?}", physical_size);
                    world.resize(physical_size.width as f32, physical_size.height as f32);
                }
                WindowEvent::Focused(false) => {
                    // Keys released while unfocused never reach us
                    input.reset();
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input.process_keyboard_event(&event);

                    // Meta actions are handled here so they work while paused
                    if event.state == ElementState::Pressed && !event.repeat {
                        if let PhysicalKey::Code(code) = event.physical_key {
                            match input.config().get_action(InputSource::key(code)) {
                                Some(Action::Pause) => game_loop.toggle_pause(),
                                Some(Action::Menu) => {
                                    info!("Menu requested, shutting down...");
                                    elwt.exit();
                                }
                                _ => {}
                            }
                        }
                    }
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    input.process_mouse_button(button, state);
                }
                WindowEvent::Touch(touch) => {
                    input.process_touch_event(&touch);
                }
                WindowEvent::RedrawRequested => {
                    // Sprite frame data is ready in the world; nothing draws it yet
                }
                _ => {}
            },
            Event::AboutToWait => {
                let updates = game_loop.begin_frame();
                for step in 0..updates {
                    world.fixed_update(game_loop.fixed_timestep(), input.player());
                    // Edges belong to the first update; held state carries on
                    if step == 0 {
                        input.update();
                    }
                }

                // Don't replay presses made while paused
                if game_loop.is_paused() {
                    input.update();
                }

                if game_loop.frame_count() % STATUS_LOG_INTERVAL == 0 {
                    let character = world.character();
                    debug!(
                        "FPS: {:.1} | updates: {} | position: {:?} | camera: {} | sprite: {:?} | respawns: {}",
                        game_loop.fps(),
                        game_loop.update_count(),
                        world.character_position(),
                        character.side_view_camera().position(),
                        character.sprite().frame_data(),
                        world.respawn_count()
                    );
                }

                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
