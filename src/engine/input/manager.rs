// Input manager - turns winit events into action and touch state

use super::action::{Action, InputSource};
use super::config::InputConfig;
use super::player::PlayerInput;
use glam::Vec2;
use winit::event::{ElementState, KeyEvent, MouseButton, Touch, TouchPhase};
use winit::keyboard::PhysicalKey;

/// Main input manager for the local player
#[derive(Debug)]
pub struct InputManager {
    /// Source -> action bindings
    config: InputConfig,

    /// Input state built from this frame's events
    player: PlayerInput,
}

impl InputManager {
    /// Create an input manager with the default bindings
    pub fn new() -> Self {
        Self::with_config(InputConfig::with_defaults())
    }

    pub fn with_config(config: InputConfig) -> Self {
        Self {
            config,
            player: PlayerInput::new(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        // Only process physical key presses
        if let PhysicalKey::Code(key_code) = event.physical_key {
            // Key repeats are not new presses
            if !event.repeat {
                self.process_source(InputSource::key(key_code), event.state);
            }
        }
    }

    /// Process a mouse button event from winit
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.process_source(InputSource::mouse(button), state);
    }

    fn process_source(&mut self, source: InputSource, state: ElementState) {
        if let Some(action) = self.config.get_action(source) {
            match state {
                ElementState::Pressed => self.player.press(action),
                ElementState::Released => self.player.release(action),
            }
        }
    }

    /// Process a touch event from winit
    pub fn process_touch_event(&mut self, touch: &Touch) {
        let location = Vec2::new(touch.location.x as f32, touch.location.y as f32);
        self.process_touch(touch.id, touch.phase, location);
    }

    /// Track a finger by id; cancelled touches count as stopped
    pub fn process_touch(&mut self, finger: u64, phase: TouchPhase, location: Vec2) {
        match phase {
            TouchPhase::Started => self.player.touch_start(finger, location),
            TouchPhase::Moved => self.player.touch_move(finger, location),
            TouchPhase::Ended | TouchPhase::Cancelled => self.player.touch_end(finger, location),
        }
    }

    /// Start a new input frame
    /// Call this after the frame's input has been consumed by at least one update
    pub fn update(&mut self) {
        self.player.update();
    }

    /// Get the input state
    pub fn player(&self) -> &PlayerInput {
        &self.player
    }

    /// Get mutable input state
    pub fn player_mut(&mut self) -> &mut PlayerInput {
        &mut self.player
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Check if an action was pressed this frame
    pub fn just_pressed(&self, action: Action) -> bool {
        self.player.just_pressed(action)
    }

    /// Forget all held input, e.g. when the window loses focus
    pub fn reset(&mut self) {
        self.player.reset();
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_button_maps_to_dash() {
        let mut manager = InputManager::new();
        manager.process_mouse_button(MouseButton::Right, ElementState::Pressed);

        assert!(manager.just_pressed(Action::Dash));
        assert!(manager.player().is_pressed(Action::Dash));

        manager.process_mouse_button(MouseButton::Right, ElementState::Released);
        assert!(manager.player().just_released(Action::Dash));
    }

    #[test]
    fn test_unbound_mouse_button_ignored() {
        let mut manager = InputManager::new();
        manager.process_mouse_button(MouseButton::Middle, ElementState::Pressed);
        assert!(!manager.player().is_pressed(Action::Dash));
    }

    #[test]
    fn test_update_clears_just_pressed() {
        let mut manager = InputManager::new();
        manager.player_mut().press(Action::Jump);
        assert!(manager.just_pressed(Action::Jump));

        manager.update();
        assert!(!manager.just_pressed(Action::Jump));
        assert!(manager.player().is_pressed(Action::Jump));
    }

    #[test]
    fn test_touch_phases() {
        let mut manager = InputManager::new();
        manager.process_touch(1, TouchPhase::Started, Vec2::new(5.0, 5.0));
        assert_eq!(manager.player().touches_started().len(), 1);

        manager.update();
        manager.process_touch(1, TouchPhase::Cancelled, Vec2::new(6.0, 5.0));
        assert_eq!(manager.player().touches_stopped().len(), 1);
        assert_eq!(manager.player().active_touches(), 0);
    }

    #[test]
    fn test_reset() {
        let mut manager = InputManager::new();
        manager.player_mut().press(Action::MoveLeft);
        manager.reset();
        assert!(!manager.player().is_pressed(Action::MoveLeft));
    }

    #[test]
    fn test_custom_config() {
        let mut config = InputConfig::new();
        config.bind(InputSource::mouse(MouseButton::Left), Action::Jump);
        let mut manager = InputManager::with_config(config);

        manager.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(manager.just_pressed(Action::Jump));
        manager.process_mouse_button(MouseButton::Right, ElementState::Pressed);
        assert!(!manager.player().is_pressed(Action::Dash));
    }
}
