//! Terminal input handling
//!
//! The calculator is driven through its on-screen keypad only: mouse clicks
//! land on buttons, arrow keys move the focus and Enter/Space press the
//! focused button. Typing digits directly is not supported.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use super::keypad::FocusMove;

/// Actions produced by terminal input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Left click at terminal cell (column, row)
    Click(u16, u16),
    /// Move keypad focus
    MoveFocus(FocusMove),
    /// Press the focused button
    PressFocused,
    /// Quit the application
    Quit,
    /// No action (ignored input)
    None,
}

/// Maps crossterm events to actions
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    /// Creates a new input handler
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Maps any terminal event to an action
    #[must_use]
    pub fn handle_event(&self, event: &Event) -> KeyAction {
        match event {
            Event::Key(key) => self.handle_key(*key),
            Event::Mouse(mouse) => self.handle_mouse(*mouse),
            _ => KeyAction::None,
        }
    }

    /// Maps a key event to an action
    #[must_use]
    pub fn handle_key(&self, event: KeyEvent) -> KeyAction {
        let KeyEvent {
            code,
            modifiers,
            kind,
            ..
        } = event;

        // Windows reports releases too
        if kind == KeyEventKind::Release {
            return KeyAction::None;
        }

        if modifiers.contains(KeyModifiers::CONTROL) {
            return match code {
                KeyCode::Char('c' | 'q') => KeyAction::Quit,
                _ => KeyAction::None,
            };
        }

        match code {
            KeyCode::Up => KeyAction::MoveFocus(FocusMove::Up),
            KeyCode::Down => KeyAction::MoveFocus(FocusMove::Down),
            KeyCode::Left => KeyAction::MoveFocus(FocusMove::Left),
            KeyCode::Right => KeyAction::MoveFocus(FocusMove::Right),
            KeyCode::Enter | KeyCode::Char(' ') => KeyAction::PressFocused,
            KeyCode::Esc | KeyCode::Char('q') => KeyAction::Quit,
            _ => KeyAction::None,
        }
    }

    /// Maps a mouse event to an action; only left-button presses count
    #[must_use]
    pub fn handle_mouse(&self, event: MouseEvent) -> KeyAction {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => KeyAction::Click(event.column, event.row),
            _ => KeyAction::None,
        }
    }
}
