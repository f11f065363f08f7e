//! Unified calculator driver
//!
//! Behavior checks are written once against [`CalculatorDriver`] and run
//! against every frontend: the bare engine and the terminal app, which routes
//! each press through its on-screen keypad.

use crate::core::history::HistoryEntry;
use crate::core::{CalcResult, CalculatorEngine, CalculatorEvent, Operation};

/// Abstract interface for pressing keys and reading the display
pub trait CalculatorDriver {
    /// Sends one event to the calculator
    fn press(&mut self, event: CalculatorEvent);

    /// Current expression line
    fn expression(&self) -> String;

    /// Current result line (empty when no result is shown)
    fn result(&self) -> String;

    /// Completed calculations, oldest first
    fn history(&self) -> Vec<HistoryEntry>;

    /// Presses a whitespace-separated sequence of key tokens, e.g. `"3 + 4 ="`
    fn press_keys(&mut self, keys: &str) -> CalcResult<()> {
        for token in keys.split_whitespace() {
            self.press(token.parse()?);
        }
        Ok(())
    }
}

impl CalculatorDriver for CalculatorEngine {
    fn press(&mut self, event: CalculatorEvent) {
        self.dispatch(event);
    }

    fn expression(&self) -> String {
        self.state().expression.clone()
    }

    fn result(&self) -> String {
        self.state().result.clone()
    }

    fn history(&self) -> Vec<HistoryEntry> {
        CalculatorEngine::history(self).iter().cloned().collect()
    }
}

/// TUI driver implementation
#[cfg(feature = "tui")]
pub mod tui_driver {
    use super::{CalculatorDriver, CalculatorEvent, HistoryEntry};
    use crate::tui::CalculatorApp;

    /// Drives the terminal app by clicking its keypad buttons
    #[derive(Debug, Default)]
    pub struct TuiDriver {
        app: CalculatorApp,
    }

    impl TuiDriver {
        /// Creates a new TUI driver
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Returns a reference to the underlying app
        #[must_use]
        pub fn app(&self) -> &CalculatorApp {
            &self.app
        }
    }

    impl CalculatorDriver for TuiDriver {
        fn press(&mut self, event: CalculatorEvent) {
            // Out-of-range digits have no button; hand them to the engine as-is
            match self.app.keypad().find_button_by_event(event) {
                Some(index) => self.app.press_button(index),
                None => self.app.dispatch(event),
            }
        }

        fn expression(&self) -> String {
            self.app.display().expression.clone()
        }

        fn result(&self) -> String {
            self.app.display().result.clone()
        }

        fn history(&self) -> Vec<HistoryEntry> {
            self.app.engine().history().iter().cloned().collect()
        }
    }
}

#[cfg(feature = "tui")]
pub use tui_driver::TuiDriver;

// ===== Shared behavior checks =====
// Each takes a fresh driver (or one that was just cleared)

/// Digits typed without an operator show up literally, with no result
pub fn verify_digit_entry<D: CalculatorDriver>(driver: &mut D) {
    driver.press_keys("0 1 2 0 3").unwrap();
    assert_eq!(driver.expression(), "1203");
    assert_eq!(driver.result(), "");
    driver.press(CalculatorEvent::Clear);
}

/// Clear always returns to the initial display
pub fn verify_clear<D: CalculatorDriver>(driver: &mut D) {
    driver.press_keys("9 × 8 = 7 +").unwrap();
    driver.press(CalculatorEvent::Clear);
    assert_eq!(driver.expression(), "0");
    assert_eq!(driver.result(), "");
}

/// 5 ÷ 0 shows Error instead of failing
pub fn verify_divide_by_zero<D: CalculatorDriver>(driver: &mut D) {
    driver.press_keys("5 ÷ 0 =").unwrap();
    assert_eq!(driver.result(), "Error");
    driver.press(CalculatorEvent::Clear);
}

/// 3 + 4 × 2 resolves 3 + 4 before applying × 2
pub fn verify_chaining<D: CalculatorDriver>(driver: &mut D) {
    driver.press(CalculatorEvent::Digit(3));
    driver.press(CalculatorEvent::Operator(Operation::Add));
    driver.press(CalculatorEvent::Digit(4));
    driver.press(CalculatorEvent::Operator(Operation::Multiply));
    assert_eq!(driver.expression(), "7 × 0");
    driver.press(CalculatorEvent::Digit(2));
    driver.press(CalculatorEvent::Calculate);
    assert_eq!(driver.expression(), "7 × 2");
    assert_eq!(driver.result(), "14");
    driver.press(CalculatorEvent::Clear);
}

/// 50 % 20 is 50 × 20 / 100
pub fn verify_percent<D: CalculatorDriver>(driver: &mut D) {
    driver.press_keys("5 0 % 2 0 =").unwrap();
    assert_eq!(driver.result(), "10");
    driver.press(CalculatorEvent::Clear);
}

/// DEL on a result behaves like C
pub fn verify_backspace_after_result<D: CalculatorDriver>(driver: &mut D) {
    driver.press_keys("6 - 1 =").unwrap();
    assert_eq!(driver.result(), "5");
    driver.press(CalculatorEvent::Backspace);
    assert_eq!(driver.expression(), "0");
    assert_eq!(driver.result(), "");
}

/// A second decimal point in the same operand is ignored
pub fn verify_decimal_rejection<D: CalculatorDriver>(driver: &mut D) {
    driver.press_keys("1 . 2 . 5").unwrap();
    assert_eq!(driver.expression(), "1.25");
    driver.press(CalculatorEvent::Clear);
}

/// 1 ÷ 3 keeps eight fractional digits
pub fn verify_fractional_result<D: CalculatorDriver>(driver: &mut D) {
    driver.press_keys("1 ÷ 3 =").unwrap();
    assert_eq!(driver.result(), "0.33333333");
    driver.press(CalculatorEvent::Clear);
}

/// Runs every shared check in sequence
pub fn verify_all<D: CalculatorDriver>(driver: &mut D) {
    verify_digit_entry(driver);
    verify_clear(driver);
    verify_divide_by_zero(driver);
    verify_chaining(driver);
    verify_percent(driver);
    verify_backspace_after_result(driver);
    verify_decimal_rejection(driver);
    verify_fractional_result(driver);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_driver_passes_all_checks() {
        let mut engine = CalculatorEngine::new();
        verify_all(&mut engine);
    }

    #[test]
    fn test_engine_driver_history() {
        let mut engine = CalculatorEngine::new();
        verify_all(&mut engine);
        let history = CalculatorDriver::history(&engine);
        assert_eq!(history.len(), 7);
        assert_eq!(history[0].display(), "9 × 8 = 72");
        assert_eq!(history[1].display(), "5 ÷ 0 = Error");
    }

    #[test]
    fn test_press_keys_rejects_unknown_token() {
        let mut engine = CalculatorEngine::new();
        assert!(engine.press_keys("1 + sqrt").is_err());
        // Tokens before the bad one were applied
        assert_eq!(engine.expression(), "1 + 0");
    }

    #[cfg(feature = "tui")]
    #[test]
    fn test_tui_driver_passes_all_checks() {
        let mut driver = TuiDriver::new();
        verify_all(&mut driver);
    }

    #[cfg(feature = "tui")]
    #[test]
    fn test_tui_and_engine_agree() {
        let keys = "1 2 . 5 × 4 - 3 DEL 2 = % 5 0 =";
        let mut engine = CalculatorEngine::new();
        let mut tui = TuiDriver::new();
        engine.press_keys(keys).unwrap();
        tui.press_keys(keys).unwrap();
        assert_eq!(engine.expression(), tui.expression());
        assert_eq!(engine.result(), tui.result());
    }

    #[cfg(feature = "tui")]
    #[test]
    fn test_tui_driver_highlights_pressed_button() {
        let mut driver = TuiDriver::new();
        driver.press(CalculatorEvent::Digit(5));
        let pressed: Vec<_> = driver
            .app()
            .keypad()
            .buttons()
            .filter(|b| b.pressed)
            .map(|b| b.label)
            .collect();
        assert_eq!(pressed, vec!["5"]);
    }
}
