// Per-frame input state for the local player

use super::action::Action;
use glam::Vec2;
use std::collections::{HashMap, HashSet};

/// A finger touching the screen, in window pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub finger: u64,
    pub location: Vec2,
}

/// Input state for the local player
#[derive(Debug, Default)]
pub struct PlayerInput {
    /// Actions that are currently pressed this frame
    pressed: HashSet<Action>,

    /// Actions that were just pressed this frame (press events)
    just_pressed: HashSet<Action>,

    /// Actions that were just released this frame (release events)
    just_released: HashSet<Action>,

    /// Actions that were pressed in the previous frame
    previous_pressed: HashSet<Action>,

    /// Fingers currently on the screen
    touches: HashMap<u64, Vec2>,

    /// Touches that began this frame, in arrival order
    touches_started: Vec<TouchPoint>,

    /// Touches that ended this frame, in arrival order
    touches_stopped: Vec<TouchPoint>,
}

impl PlayerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently pressed
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this frame
    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    /// Check if an action is held (pressed for multiple frames)
    pub fn is_held(&self, action: Action) -> bool {
        self.pressed.contains(&action) && self.previous_pressed.contains(&action)
    }

    /// Register an action press
    pub(crate) fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Register an action release
    pub(crate) fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Register a finger going down
    pub(crate) fn touch_start(&mut self, finger: u64, location: Vec2) {
        self.touches.insert(finger, location);
        self.touches_started.push(TouchPoint { finger, location });
    }

    /// Track a finger moving
    pub(crate) fn touch_move(&mut self, finger: u64, location: Vec2) {
        if let Some(current) = self.touches.get_mut(&finger) {
            *current = location;
        }
    }

    /// Register a finger lifting (or the touch being cancelled)
    pub(crate) fn touch_end(&mut self, finger: u64, location: Vec2) {
        if self.touches.remove(&finger).is_some() {
            self.touches_stopped.push(TouchPoint { finger, location });
        }
    }

    /// Update input state for a new frame
    /// Call this once per frame after the frame's input has been consumed
    pub(crate) fn update(&mut self) {
        // Clear frame-specific state
        self.just_pressed.clear();
        self.just_released.clear();
        self.touches_started.clear();
        self.touches_stopped.clear();

        // Save current pressed state for next frame
        self.previous_pressed.clone_from(&self.pressed);
    }

    /// Reset all input state
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
        self.just_released.clear();
        self.previous_pressed.clear();
        self.touches.clear();
        self.touches_started.clear();
        self.touches_stopped.clear();
    }

    /// Value in [-1, 1] from a pair of opposing actions
    pub fn axis(&self, negative: Action, positive: Action) -> f32 {
        let mut value = 0.0;
        if self.is_pressed(negative) {
            value -= 1.0;
        }
        if self.is_pressed(positive) {
            value += 1.0;
        }
        value
    }

    pub fn touches_started(&self) -> &[TouchPoint] {
        &self.touches_started
    }

    pub fn touches_stopped(&self) -> &[TouchPoint] {
        &self.touches_stopped
    }

    pub fn active_touches(&self) -> usize {
        self.touches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_action() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        assert!(input.is_pressed(Action::Jump));
        assert!(input.just_pressed(Action::Jump));
    }

    #[test]
    fn test_release_action() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        input.update();
        input.release(Action::Jump);
        assert!(!input.is_pressed(Action::Jump));
        assert!(input.just_released(Action::Jump));
    }

    #[test]
    fn test_just_pressed_cleared_on_update() {
        let mut input = PlayerInput::new();
        input.press(Action::Dash);
        input.update();
        assert!(input.is_pressed(Action::Dash));
        assert!(!input.just_pressed(Action::Dash));
    }

    #[test]
    fn test_held_detection() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        assert!(!input.is_held(Action::Jump)); // Not held on first frame

        input.update();
        assert!(input.is_held(Action::Jump));
    }

    #[test]
    fn test_release_unpressed_action() {
        let mut input = PlayerInput::new();
        input.release(Action::Jump);
        assert!(!input.just_released(Action::Jump));
    }

    #[test]
    fn test_axis() {
        let mut input = PlayerInput::new();
        assert_eq!(input.axis(Action::MoveLeft, Action::MoveRight), 0.0);

        input.press(Action::MoveRight);
        assert_eq!(input.axis(Action::MoveLeft, Action::MoveRight), 1.0);

        input.press(Action::MoveLeft);
        assert_eq!(input.axis(Action::MoveLeft, Action::MoveRight), 0.0);

        input.release(Action::MoveRight);
        assert_eq!(input.axis(Action::MoveLeft, Action::MoveRight), -1.0);
    }

    #[test]
    fn test_touch_lifecycle() {
        let mut input = PlayerInput::new();
        input.touch_start(7, Vec2::new(10.0, 20.0));
        assert_eq!(input.active_touches(), 1);
        assert_eq!(input.touches_started().len(), 1);

        input.update();
        assert!(input.touches_started().is_empty());

        input.touch_move(7, Vec2::new(12.0, 20.0));
        input.touch_end(7, Vec2::new(12.0, 22.0));
        assert_eq!(input.active_touches(), 0);
        assert_eq!(
            input.touches_stopped(),
            &[TouchPoint {
                finger: 7,
                location: Vec2::new(12.0, 22.0)
            }]
        );
    }

    #[test]
    fn test_ending_unknown_touch_is_ignored() {
        let mut input = PlayerInput::new();
        input.touch_end(3, Vec2::ZERO);
        assert!(input.touches_stopped().is_empty());
    }

    #[test]
    fn test_reset() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        input.touch_start(1, Vec2::ZERO);
        input.reset();

        assert!(!input.is_pressed(Action::Jump));
        assert_eq!(input.active_touches(), 0);
    }
}
