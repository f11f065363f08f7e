//! Terminal frontend
//!
//! A host for the engine: it turns keypad clicks into events and draws the
//! two display lines. It holds no calculator logic of its own.

mod app;
mod input;
mod keypad;
mod ui;

pub use app::CalculatorApp;
pub use input::{InputHandler, KeyAction};
pub use keypad::{ButtonKind, FocusMove, Keypad, KeypadButton, KeypadWidget};
pub use ui::{render, truncate_with_ellipsis, CalculatorUI};
