use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Move;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Move(Move),
    TogglePause,
    /// Playback speed level, 1 (slow) to 4 (very fast)
    Speed(u8),
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

        // Row 0 is drawn at the top, so "up" on screen lowers y
        match key.code {
            KeyCode::Up => KeyAction::Move(Move::Down),
            KeyCode::Down => KeyAction::Move(Move::Up),
            KeyCode::Left => KeyAction::Move(Move::Left),
            KeyCode::Right => KeyAction::Move(Move::Right),

            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Move(Move::Down),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Move(Move::Up),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Move(Move::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Move(Move::Right),

            // Controls
            KeyCode::Char(' ') => KeyAction::TogglePause,
            KeyCode::Char(c @ '1'..='4') => KeyAction::Speed(c as u8 - b'0'),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
