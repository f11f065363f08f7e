//! TUI application state

use ratatui::layout::Rect;
use tracing::debug;

use crate::core::{CalculatorEngine, CalculatorEvent, DisplayState};

use super::input::KeyAction;
use super::keypad::{FocusMove, Keypad};

/// Calculator application state
#[derive(Debug)]
pub struct CalculatorApp {
    engine: CalculatorEngine,
    keypad: Keypad,
    /// Keyboard-focused button index
    focus: usize,
    /// Where the keypad was last drawn, for mouse hit testing
    keypad_area: Option<Rect>,
    should_quit: bool,
}

impl Default for CalculatorApp {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorApp {
    /// Creates a new app around a fresh engine
    #[must_use]
    pub fn new() -> Self {
        Self::with_engine(CalculatorEngine::new())
    }

    /// Creates an app around an existing engine
    #[must_use]
    pub fn with_engine(engine: CalculatorEngine) -> Self {
        let keypad = Keypad::new();
        let focus = keypad.find_button_by_event(CalculatorEvent::Digit(7)).unwrap_or(0);
        Self {
            engine,
            keypad,
            focus,
            keypad_area: None,
            should_quit: false,
        }
    }

    /// Returns the engine
    #[must_use]
    pub fn engine(&self) -> &CalculatorEngine {
        &self.engine
    }

    /// Returns the current display state
    #[must_use]
    pub fn display(&self) -> &DisplayState {
        self.engine.state()
    }

    /// Returns the keypad
    #[must_use]
    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// Returns the focused button index
    #[must_use]
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Returns whether the app should quit
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Sets the quit flag
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Records where the keypad was drawn
    pub fn set_keypad_area(&mut self, area: Rect) {
        self.keypad_area = Some(area);
    }

    /// Sends an event straight to the engine, highlighting its button if any
    pub fn dispatch(&mut self, event: CalculatorEvent) {
        match self.keypad.find_button_by_event(event) {
            Some(index) => self.keypad.press_button(index),
            None => self.keypad.release_all(),
        }
        self.engine.dispatch(event);
    }

    /// Presses the button at `index`; focus follows the press
    pub fn press_button(&mut self, index: usize) {
        let Some(event) = self.keypad.get_button(index).map(|b| b.event) else {
            return;
        };
        self.focus = index;
        self.keypad.press_button(index);
        self.engine.dispatch(event);
    }

    /// Presses the focused button
    pub fn press_focused(&mut self) {
        self.press_button(self.focus);
    }

    /// Moves keyboard focus
    pub fn move_focus(&mut self, direction: FocusMove) {
        self.focus = self.keypad.step(self.focus, direction);
        self.keypad.release_all();
    }

    /// Handles a click at terminal cell (x, y); returns true if a button was hit
    pub fn click(&mut self, x: u16, y: u16) -> bool {
        let hit = self
            .keypad_area
            .and_then(|area| self.keypad.hit_test(area, x, y));
        match hit {
            Some(index) => {
                self.press_button(index);
                true
            }
            None => false,
        }
    }

    /// Applies an input action
    pub fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Click(x, y) => {
                if !self.click(x, y) {
                    debug!(x, y, "click missed the keypad");
                }
            }
            KeyAction::MoveFocus(direction) => self.move_focus(direction),
            KeyAction::PressFocused => self.press_focused(),
            KeyAction::Quit => self.quit(),
            KeyAction::None => {}
        }
    }
}
