use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::game::{Action, Direction};
use crate::render::ButtonBar;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    GameAction(Action),
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> InputAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return InputAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => InputAction::GameAction(Action::Turn(Direction::Up)),
            KeyCode::Down => InputAction::GameAction(Action::Turn(Direction::Down)),
            KeyCode::Left => InputAction::GameAction(Action::Turn(Direction::Left)),
            KeyCode::Right => InputAction::GameAction(Action::Turn(Direction::Right)),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => {
                InputAction::GameAction(Action::Turn(Direction::Up))
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                InputAction::GameAction(Action::Turn(Direction::Down))
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                InputAction::GameAction(Action::Turn(Direction::Left))
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                InputAction::GameAction(Action::Turn(Direction::Right))
            }

            // Controls
            KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => {
                InputAction::GameAction(Action::TogglePause)
            }
            KeyCode::Char('r') | KeyCode::Char('R') => InputAction::GameAction(Action::Restart),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => InputAction::Quit,

            _ => InputAction::None,
        }
    }

    /// Left clicks on a button trigger its action; everything else is ignored
    pub fn handle_mouse_event(&self, mouse: MouseEvent, buttons: &ButtonBar) -> InputAction {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => buttons
                .hit(mouse.column, mouse.row)
                .map(InputAction::GameAction)
                .unwrap_or(InputAction::None),
            _ => InputAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
