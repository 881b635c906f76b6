#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Act,
    Quit,
}

const ACTION_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Act => 4,
            InputAction::Quit => 5,
        }
    }
}

/// Normalized input for one loop iteration.
///
/// Held state is level triggered; pressed state is true only on the iteration
/// the control went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    held: ActionStates,
    pressed: ActionStates,
    quit_requested: bool,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(held: ActionStates, pressed: ActionStates, quit_requested: bool) -> Self {
        Self {
            held,
            pressed,
            quit_requested,
        }
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.held.is_down(action)
    }

    pub fn just_pressed(&self, action: InputAction) -> bool {
        self.pressed.is_down(action)
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested || self.just_pressed(InputAction::Quit)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.held.set(action, is_down);
        self
    }

    pub fn with_action_pressed(mut self, action: InputAction, pressed: bool) -> Self {
        self.pressed.set(action, pressed);
        if pressed {
            self.held.set(action, true);
        }
        self
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_has_nothing_down() {
        let snapshot = InputSnapshot::empty();
        for action in [
            InputAction::MoveUp,
            InputAction::MoveDown,
            InputAction::MoveLeft,
            InputAction::MoveRight,
            InputAction::Act,
            InputAction::Quit,
        ] {
            assert!(!snapshot.is_down(action), "action={action:?}");
            assert!(!snapshot.just_pressed(action), "action={action:?}");
        }
        assert!(!snapshot.quit_requested());
    }

    #[test]
    fn pressed_implies_held() {
        let snapshot = InputSnapshot::empty().with_action_pressed(InputAction::Act, true);
        assert!(snapshot.just_pressed(InputAction::Act));
        assert!(snapshot.is_down(InputAction::Act));
    }

    #[test]
    fn quit_press_or_close_request_both_quit() {
        let pressed = InputSnapshot::empty().with_action_pressed(InputAction::Quit, true);
        let closed = InputSnapshot::empty().with_quit_requested(true);
        let held_only = InputSnapshot::empty().with_action_down(InputAction::Quit, true);

        assert!(pressed.quit_requested());
        assert!(closed.quit_requested());
        assert!(!held_only.quit_requested());
    }
}
