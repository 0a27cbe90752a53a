use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Action, Direction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Game(Action),
    Restart,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Up => Self::turn(Direction::Up),
            KeyCode::Down => Self::turn(Direction::Down),
            KeyCode::Left => Self::turn(Direction::Left),
            KeyCode::Right => Self::turn(Direction::Right),

            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'w' => Self::turn(Direction::Up),
                's' => Self::turn(Direction::Down),
                'a' => Self::turn(Direction::Left),
                'd' => Self::turn(Direction::Right),
                'p' | ' ' => KeyAction::Game(Action::TogglePause),
                'v' => KeyAction::Game(Action::Revive),
                'r' => KeyAction::Restart,
                'q' => KeyAction::Quit,
                _ => KeyAction::None,
            },

            KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }

    fn turn(direction: Direction) -> KeyAction {
        KeyAction::Game(Action::Turn(direction))
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyAction {
        InputHandler::new().handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(press(KeyCode::Up), KeyAction::Game(Action::Turn(Direction::Up)));
        assert_eq!(press(KeyCode::Down), KeyAction::Game(Action::Turn(Direction::Down)));
        assert_eq!(press(KeyCode::Left), KeyAction::Game(Action::Turn(Direction::Left)));
        assert_eq!(press(KeyCode::Right), KeyAction::Game(Action::Turn(Direction::Right)));
    }

    #[test]
    fn test_wasd_keys() {
        assert_eq!(press(KeyCode::Char('w')), KeyAction::Game(Action::Turn(Direction::Up)));
        assert_eq!(press(KeyCode::Char('a')), KeyAction::Game(Action::Turn(Direction::Left)));
        assert_eq!(press(KeyCode::Char('s')), KeyAction::Game(Action::Turn(Direction::Down)));
        assert_eq!(press(KeyCode::Char('d')), KeyAction::Game(Action::Turn(Direction::Right)));
    }

    #[test]
    fn test_wasd_uppercase() {
        let handler = InputHandler::new();

        let w_upper = KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(w_upper),
            KeyAction::Game(Action::Turn(Direction::Up))
        );
    }

    #[test]
    fn test_pause_and_revive_keys() {
        assert_eq!(press(KeyCode::Char('p')), KeyAction::Game(Action::TogglePause));
        assert_eq!(press(KeyCode::Char(' ')), KeyAction::Game(Action::TogglePause));
        assert_eq!(press(KeyCode::Char('v')), KeyAction::Game(Action::Revive));
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(press(KeyCode::Char('q')), KeyAction::Quit);
        assert_eq!(press(KeyCode::Char('Q')), KeyAction::Quit);
        assert_eq!(press(KeyCode::Esc), KeyAction::Quit);
    }

    #[test]
    fn test_restart_key() {
        assert_eq!(press(KeyCode::Char('r')), KeyAction::Restart);
        assert_eq!(press(KeyCode::Char('R')), KeyAction::Restart);
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(press(KeyCode::Char('x')), KeyAction::None);
        assert_eq!(press(KeyCode::Tab), KeyAction::None);
    }

    #[test]
    fn test_ctrl_c() {
        let handler = InputHandler::new();

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }
}
