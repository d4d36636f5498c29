// Input handling system
//
// Keyboard, mouse and touch input for the local player, with remappable
// bindings and a component that turns input into pawn commands.
//
// ## Architecture
//
// - `action`: Defines game actions and default key bindings
// - `config`: Input configuration and remapping system
// - `player`: Per-frame input state (actions, axis, touches)
// - `manager`: Feeds winit events into the player state
// - `component`: Bindings a pawn registers, dispatched into commands
//
// ## Usage Example
//
// ```rust
// use engine::input::{Action, InputComponent, InputEvent, InputManager};
//
// let mut input_manager = InputManager::new();
// let mut component = InputComponent::new();
// component.bind_action(Action::Jump, InputEvent::Pressed, Command::Jump);
//
// // In your event loop, process keyboard events
// input_manager.process_keyboard_event(&key_event);
//
// // In a fixed update, turn input into commands
// for command in component.dispatch(input_manager.player()) {
//     // apply command
// }
//
// // Once the frame's input has been consumed, start a new input frame
// input_manager.update();
// ```

pub mod action;
pub mod component;
pub mod config;
pub mod manager;
pub mod player;

// Re-export commonly used types
pub use action::{Action, InputSource};
pub use component::{InputComponent, InputEvent, TouchEvent};
pub use config::InputConfig;
pub use manager::InputManager;
pub use player::{PlayerInput, TouchPoint};
