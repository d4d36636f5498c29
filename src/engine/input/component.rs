// Input component: bindings a pawn registers, turned into commands each update

use super::action::Action;
use super::player::PlayerInput;
use glam::Vec2;

/// Edge of an action that triggers a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed,
    Released,
}

/// Edge of a touch that triggers a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEvent {
    Started,
    Stopped,
}

#[derive(Debug, Clone)]
struct ActionBinding<C> {
    action: Action,
    event: InputEvent,
    command: C,
}

#[derive(Debug, Clone)]
struct AxisBinding<C> {
    negative: Action,
    positive: Action,
    command: fn(f32) -> C,
}

#[derive(Debug, Clone)]
struct TouchBinding<C> {
    event: TouchEvent,
    command: fn(u64, Vec2) -> C,
}

/// Holds input bindings and produces the commands they map to
///
/// Dispatch order is action bindings in the order they were bound, then axes,
/// then touches. Axis bindings produce a command every update, including 0.0.
#[derive(Debug, Clone)]
pub struct InputComponent<C> {
    actions: Vec<ActionBinding<C>>,
    axes: Vec<AxisBinding<C>>,
    touches: Vec<TouchBinding<C>>,
}

impl<C> Default for InputComponent<C> {
    fn default() -> Self {
        Self {
            actions: Vec::new(),
            axes: Vec::new(),
            touches: Vec::new(),
        }
    }
}

impl<C: Clone> InputComponent<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `command` when `action` sees `event`
    pub fn bind_action(&mut self, action: Action, event: InputEvent, command: C) {
        self.actions.push(ActionBinding {
            action,
            event,
            command,
        });
    }

    /// Emit `command(value)` every update, with value in [-1, 1] from the two actions
    pub fn bind_axis(&mut self, negative: Action, positive: Action, command: fn(f32) -> C) {
        self.axes.push(AxisBinding {
            negative,
            positive,
            command,
        });
    }

    /// Emit `command(finger, location)` for each touch that sees `event`
    pub fn bind_touch(&mut self, event: TouchEvent, command: fn(u64, Vec2) -> C) {
        self.touches.push(TouchBinding { event, command });
    }

    pub fn num_bindings(&self) -> usize {
        self.actions.len() + self.axes.len() + self.touches.len()
    }

    pub fn clear_bindings(&mut self) {
        self.actions.clear();
        self.axes.clear();
        self.touches.clear();
    }

    /// Commands triggered by this frame's input
    pub fn dispatch(&self, input: &PlayerInput) -> Vec<C> {
        let mut commands = Vec::new();

        for binding in &self.actions {
            let triggered = match binding.event {
                InputEvent::Pressed => input.just_pressed(binding.action),
                InputEvent::Released => input.just_released(binding.action),
            };
            if triggered {
                commands.push(binding.command.clone());
            }
        }

        for binding in &self.axes {
            let value = input.axis(binding.negative, binding.positive);
            commands.push((binding.command)(value));
        }

        for binding in &self.touches {
            let points = match binding.event {
                TouchEvent::Started => input.touches_started(),
                TouchEvent::Stopped => input.touches_stopped(),
            };
            commands.extend(
                points
                    .iter()
                    .map(|point| (binding.command)(point.finger, point.location)),
            );
        }

        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Command {
        Jump,
        StopJumping,
        Move(f32),
        Touch(u64),
    }

    fn component() -> InputComponent<Command> {
        let mut component = InputComponent::new();
        component.bind_action(Action::Jump, InputEvent::Pressed, Command::Jump);
        component.bind_action(Action::Jump, InputEvent::Released, Command::StopJumping);
        component.bind_axis(Action::MoveLeft, Action::MoveRight, Command::Move);
        component.bind_touch(TouchEvent::Started, |finger, _| Command::Touch(finger));
        component
    }

    #[test]
    fn test_axis_always_dispatched() {
        let input = PlayerInput::new();
        assert_eq!(component().dispatch(&input), vec![Command::Move(0.0)]);
    }

    #[test]
    fn test_press_and_release_in_one_frame_keep_order() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        input.release(Action::Jump);
        input.press(Action::MoveLeft);

        assert_eq!(
            component().dispatch(&input),
            vec![Command::Jump, Command::StopJumping, Command::Move(-1.0)]
        );
    }

    #[test]
    fn test_held_action_does_not_repeat() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        input.update();

        assert_eq!(component().dispatch(&input), vec![Command::Move(0.0)]);
    }

    #[test]
    fn test_touch_binding_per_finger() {
        let mut input = PlayerInput::new();
        input.touch_start(1, Vec2::ZERO);
        input.touch_start(2, Vec2::ONE);

        let commands = component().dispatch(&input);
        assert_eq!(&commands[1..], &[Command::Touch(1), Command::Touch(2)]);
    }

    #[test]
    fn test_clear_bindings() {
        let mut component = component();
        assert_eq!(component.num_bindings(), 4);
        component.clear_bindings();
        assert!(component.dispatch(&PlayerInput::new()).is_empty());
    }
}
