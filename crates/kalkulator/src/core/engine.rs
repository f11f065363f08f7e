//! Event-driven calculator state machine
//!
//! [`CalculatorEngine::dispatch`] is the only way state changes. Each call
//! runs to completion, updates the internal [`EngineState`], refreshes the
//! published [`DisplayState`] and notifies subscribers with the new snapshot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::format::{format_number, parse_operand};
use super::history::History;
use super::operations::Operation;
use super::{CalcError, CalcResult};

/// Input events a host UI sends to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalculatorEvent {
    /// Digit key 0-9. Values above 9 are ignored by the engine
    Digit(u8),
    /// Binary operator key
    Operator(Operation),
    /// Decimal point key
    Decimal,
    /// Equals key
    Calculate,
    /// Clear key (C)
    Clear,
    /// Delete key (DEL)
    Backspace,
}

impl CalculatorEvent {
    /// Creates a digit event, rejecting values above 9
    pub fn digit(d: u8) -> CalcResult<Self> {
        if d <= 9 {
            Ok(Self::Digit(d))
        } else {
            Err(CalcError::InvalidDigit(d))
        }
    }
}

impl fmt::Display for CalculatorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digit(d) => write!(f, "{d}"),
            Self::Operator(op) => f.write_str(op.symbol()),
            Self::Decimal => f.write_str("."),
            Self::Calculate => f.write_str("="),
            Self::Clear => f.write_str("C"),
            Self::Backspace => f.write_str("DEL"),
        }
    }
}

impl FromStr for CalculatorEvent {
    type Err = CalcError;

    /// Parses a keypad token: `0`-`9`, `.`, an operator symbol or alias,
    /// `=`, `C`/`AC`/`clear`, `DEL`/`BS`/`backspace`/`⌫`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let mut chars = token.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            if let Some(d) = ch.to_digit(10) {
                return Ok(Self::Digit(d as u8));
            }
            if let Some(op) = Operation::from_symbol(ch) {
                return Ok(Self::Operator(op));
            }
            match ch {
                '.' | ',' => return Ok(Self::Decimal),
                '=' => return Ok(Self::Calculate),
                '⌫' => return Ok(Self::Backspace),
                _ => {}
            }
        }

        match token.to_ascii_uppercase().as_str() {
            "C" | "AC" | "CLEAR" => Ok(Self::Clear),
            "DEL" | "BS" | "BACKSPACE" => Ok(Self::Backspace),
            _ => Err(CalcError::UnknownKey(token.to_string())),
        }
    }
}

/// Internal calculation state, owned exclusively by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    /// Decimal text of the operand being typed; never empty
    pub current_input: String,
    /// First operand of a pending operation, or the last result
    pub operand1: Option<f64>,
    /// Pending operation
    pub operation: Option<Operation>,
    /// Set right after a calculation, until the next digit or decimal entry
    pub has_calculated: bool,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            current_input: "0".to_string(),
            operand1: None,
            operation: None,
            has_calculated: false,
        }
    }
}

/// What the host UI shows: the expression line and the result line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    /// In-progress or just-finished calculation; never empty
    pub expression: String,
    /// Formatted result, empty when no result is current
    pub result: String,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            expression: "0".to_string(),
            result: String::new(),
        }
    }
}

impl DisplayState {
    /// Returns true when a calculation result is on display
    #[must_use]
    pub fn has_result(&self) -> bool {
        !self.result.is_empty()
    }
}

/// Handle returned by [`CalculatorEngine::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&DisplayState) + Send>;

/// The calculator state machine
pub struct CalculatorEngine {
    state: EngineState,
    display: DisplayState,
    history: History,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for CalculatorEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalculatorEngine")
            .field("state", &self.state)
            .field("display", &self.display)
            .field("history", &self.history.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for CalculatorEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorEngine {
    /// Creates an engine in its initial state (`"0"`, no result)
    #[must_use]
    pub fn new() -> Self {
        Self::with_history(History::new())
    }

    /// Creates an engine that records into the given history
    #[must_use]
    pub fn with_history(history: History) -> Self {
        Self {
            state: EngineState::default(),
            display: DisplayState::default(),
            history,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current display snapshot
    #[must_use]
    pub fn state(&self) -> &DisplayState {
        &self.display
    }

    /// Current internal state, read-only
    #[must_use]
    pub fn engine_state(&self) -> &EngineState {
        &self.state
    }

    /// Completed calculations of this session
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Drops the session tape without touching the calculation
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Registers a listener called with the new snapshot after every dispatch
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&DisplayState) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Applies one input event and returns the resulting display state.
    ///
    /// Events that make no sense in the current state are absorbed; the
    /// returned snapshot is always valid.
    pub fn dispatch(&mut self, event: CalculatorEvent) -> DisplayState {
        match event {
            CalculatorEvent::Digit(d) => self.enter_digit(d),
            CalculatorEvent::Operator(op) => self.set_operation(op),
            CalculatorEvent::Decimal => self.enter_decimal(),
            CalculatorEvent::Calculate => self.perform_calculation(),
            CalculatorEvent::Clear => self.clear(),
            CalculatorEvent::Backspace => self.delete_last(),
        }

        debug!(
            %event,
            expression = %self.display.expression,
            result = %self.display.result,
            "dispatched"
        );

        for (_, listener) in &mut self.listeners {
            listener(&self.display);
        }
        self.display.clone()
    }

    fn start_fresh_if_calculated(&mut self) {
        if self.state.has_calculated {
            self.state = EngineState::default();
        }
    }

    fn enter_digit(&mut self, digit: u8) {
        let Some(ch) = char::from_digit(u32::from(digit), 10) else {
            trace!(digit, "ignoring out-of-range digit");
            return;
        };

        self.start_fresh_if_calculated();
        if self.state.current_input == "0" {
            self.state.current_input = ch.to_string();
        } else {
            self.state.current_input.push(ch);
        }
        self.update_expression_display();
    }

    fn enter_decimal(&mut self) {
        self.start_fresh_if_calculated();
        if self.state.current_input.contains('.') {
            trace!(input = %self.state.current_input, "operand already has a decimal point");
            return;
        }
        self.state.current_input.push('.');
        self.update_expression_display();
    }

    fn set_operation(&mut self, op: Operation) {
        let input = &self.state.current_input;
        if input.trim().is_empty() || (input == "0" && self.state.operand1.is_none()) {
            trace!(%op, "no first operand yet");
            return;
        }

        if self.state.operand1.is_some()
            && self.state.operation.is_some()
            && !self.state.has_calculated
        {
            self.perform_calculation();
        }

        let Some(operand) = parse_operand(&self.display.result)
            .or_else(|| parse_operand(&self.state.current_input))
        else {
            trace!(%op, input = %self.state.current_input, "first operand is not a number");
            return;
        };

        self.state.operand1 = Some(operand);
        self.state.operation = Some(op);
        self.state.current_input = "0".to_string();
        self.state.has_calculated = false;
        self.update_expression_display();
    }

    fn perform_calculation(&mut self) {
        let (Some(a), Some(op)) = (self.state.operand1, self.state.operation) else {
            trace!("nothing to calculate");
            return;
        };
        let Some(b) = parse_operand(&self.state.current_input) else {
            trace!(input = %self.state.current_input, "second operand is not a number");
            return;
        };

        let value = op.apply(a, b);
        let result = format_number(value);
        let expression = format!("{} {} {}", format_number(a), op.symbol(), format_number(b));

        self.history.record(&expression, &result);
        self.display = DisplayState {
            expression,
            result: result.clone(),
        };

        self.state.operand1 = Some(value);
        self.state.current_input = result;
        self.state.has_calculated = true;
        self.state.operation = None;
    }

    fn clear(&mut self) {
        self.state = EngineState::default();
        self.display = DisplayState::default();
    }

    fn delete_last(&mut self) {
        if self.state.has_calculated {
            self.clear();
            return;
        }

        let len = self.state.current_input.chars().count();
        if len > 1 {
            self.state.current_input.pop();
        } else if len == 1 && self.state.current_input != "0" {
            self.state.current_input = "0".to_string();
        } else if self.state.operation.is_some() {
            // Step back from the second operand into editing the first
            self.state.current_input = format_number(self.state.operand1.unwrap_or(0.0));
            self.state.operation = None;
            self.state.operand1 = None;
        }
        self.update_expression_display();
    }

    fn update_expression_display(&mut self) {
        let state = &self.state;
        let expression = match (state.operand1, state.operation) {
            (operand1, Some(op)) => {
                let leading = operand1
                    .or_else(|| parse_operand(&state.current_input))
                    .unwrap_or(0.0);
                format!(
                    "{} {} {}",
                    format_number(leading),
                    op.symbol(),
                    state.current_input
                )
            }
            (Some(operand1), None) => format_number(operand1),
            (None, None) => state.current_input.clone(),
        };

        let expression = expression.trim();
        self.display.expression = if expression.is_empty() {
            "0".to_string()
        } else {
            expression.to_string()
        };
        if !state.has_calculated {
            self.display.result.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn press(engine: &mut CalculatorEngine, keys: &str) -> DisplayState {
        let mut display = engine.state().clone();
        for key in keys.split_whitespace() {
            display = engine.dispatch(key.parse().unwrap());
        }
        display
    }

    // ===== Initial state tests =====

    #[test]
    fn test_engine_new() {
        let engine = CalculatorEngine::new();
        assert_eq!(engine.state(), &DisplayState::default());
        assert_eq!(engine.engine_state(), &EngineState::default());
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_display_default() {
        let display = DisplayState::default();
        assert_eq!(display.expression, "0");
        assert_eq!(display.result, "");
        assert!(!display.has_result());
    }

    // ===== Digit tests =====

    #[test]
    fn test_digits_replace_leading_zero() {
        let mut engine = CalculatorEngine::new();
        let display = press(&mut engine, "0 0 7");
        assert_eq!(display.expression, "7");
        assert_eq!(engine.engine_state().current_input, "7");
    }

    #[test]
    fn test_digits_append() {
        let mut engine = CalculatorEngine::new();
        let display = press(&mut engine, "1 2 3");
        assert_eq!(display.expression, "123");
        assert_eq!(display.result, "");
    }

    #[test]
    fn test_zero_alone_stays_zero() {
        let mut engine = CalculatorEngine::new();
        let display = press(&mut engine, "0");
        assert_eq!(display.expression, "0");
    }

    #[test]
    fn test_out_of_range_digit_ignored() {
        let mut engine = CalculatorEngine::new();
        press(&mut engine, "4");
        let display = engine.dispatch(CalculatorEvent::Digit(12));
        assert_eq!(display.expression, "4");
    }

    #[test]
    fn test_digit_after_result_starts_fresh() {
        let mut engine = CalculatorEngine::new();
        press(&mut engine, "2 + 3 =");
        let display = press(&mut engine, "9");
        assert_eq!(display.expression, "9");
        assert_eq!(display.result, "");
        let state = engine.engine_state();
        assert!(state.operand1.is_none());
        assert!(state.operation.is_none());
        assert!(!state.has_calculated);
    }

    // ===== Decimal tests =====

    #[test]
    fn test_decimal_on_zero() {
        let mut engine = CalculatorEngine::new();
        let display = press(&mut engine, ". 5");
        assert_eq!(display.expression, "0.5");
    }

    #[test]
    fn test_trailing_decimal_is_shown() {
        let mut engine = CalculatorEngine::new();
        let display = press(&mut engine, "1 .");
        assert_eq!(display.expression, "1.");
    }

    #[test]
    fn test_second_decimal_rejected() {
        let mut engine = CalculatorEngine::new();
        press(&mut engine, "1 . 5");
        let before = engine.engine_state().clone();
        let display = press(&mut engine, ".");
        assert_eq!(engine.engine_state(), &before);
        assert_eq!(display.expression, "1.5");
    }

    #[test]
    fn test_decimal_after_result_starts_fresh() {
        let mut engine = CalculatorEngine::new();
        press(&mut engine, "1 ÷ 2 =");
        let display = press(&mut engine, ".");
        assert_eq!(display.expression, "0.");
        assert_eq!(display.result, "");
    }

    // ===== Operator tests =====

    #[test]
    fn test_operator_without_operand_ignored() {
        let mut engine = CalculatorEngine::new();
        let display = press(&mut engine, "+");
        assert_eq!(display.expression, "0");
        assert!(engine.engine_state().operation.is_none());
    }

    #[test]
    fn test_operator_shows_pending_expression() {
        let mut engine = CalculatorEngine::new();
        let display = press(&mut engine, "1 2 ×");
        assert_eq!(display.expression, "12 × 0");
        let state = engine.engine_state();
        assert_eq!(state.operand1, Some(12.0));
        assert_eq!(state.operation, Some(Operation::Multiply));
        assert_eq!(state.current_input, "0");
    }

    #[test]
    fn test_second_operand_shown_verbatim() {
        let mut engine = CalculatorEngine::new();
        let display = press(&mut engine, "8 - 0 . 2 5");
        assert_eq!(display.expression, "8 - 0.25");
    }

    #[test]
    fn test_chaining_resolves_pending_operation() {
        let mut engine = CalculatorEngine::new();
        let display = press(&mut engine, "3 + 4 ×");
        assert_eq!(display.expression, "7 × 0");
        assert_eq!(display.result, "");
        assert_eq!(engine.engine_state().operand1, Some(7.0));

        let display = press(&mut engine, "2 =");
        assert_eq!(display.expression, "7 × 2");
        assert_eq!(display.result, "14");
    }

    #[test]
    fn test_operator_after_result_continues_from_result() {
        let mut engine = CalculatorEngine::new();
        press(&mut engine, "6 × 7 =");
        let display = press(&mut engine, "- 2 =");
        assert_eq!(display.expression, "42 - 2");
        assert_eq!(display.result, "40");
    }

    #[test]
    fn test_operator_after_zero_result_continues() {
        let mut engine = CalculatorEngine::new();
        press(&mut engine, "3 - 3 =");
        let display = press(&mut engine, "+ 5 =");
        assert_eq!(display.result, "5");
    }

    #[test]
    fn test_operator_after_error_aborts() {
        let mut engine = CalculatorEngine::new();
        press(&mut engine, "5 ÷ 0 =");
        let before = engine.engine_state().clone();
        let display = press(&mut engine, "+");
        assert_eq!(display.result, "Error");
        assert_eq!(engine.engine_state().operation, before.operation);
        assert_eq!(engine.engine_state().current_input, "Error");
    }

    // ===== Calculate tests =====

    #[test]
    fn test_calculate_without_operation_ignored() {
        let mut engine = CalculatorEngine::new();
        let display = press(&mut engine, "5 =");
        assert_eq!(display.expression, "5");
        assert_eq!(display.result, "");
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_calculate_sets_state() {
        let mut engine = CalculatorEngine::new();
        let display = press(&mut engine, "9 - 4 =");
        assert_eq!(display.expression, "9 - 4");
        assert_eq!(display.result, "5");
        let state = engine.engine_state();
        assert_eq!(state.operand1, Some(5.0));
        assert_eq!(state.current_input, "5");
        assert!(state.operation.is_none());
        assert!(state.has_calculated);
    }

    #[test]
    fn test_repeated_equals_is_noop() {
        let mut engine = CalculatorEngine::new();
        press(&mut engine, "9 - 4 =");
        let display = press(&mut engine, "=");
        assert_eq!(display.result, "5");
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_divide_by_zero_is_error() {
        let mut engine = CalculatorEngine::new();
        let display = press(&mut engine, "5 ÷ 0 =");
        assert_eq!(display.expression, "5 ÷ 0");
        assert_eq!(display.result, "Error");
    }

    #[test]
    fn test_negative_overflow_shows_infinity() {
        let mut engine = CalculatorEngine::new();
        press(&mut engine, "1 - 2 = ×");
        for _ in 0..400 {
            engine.dispatch(CalculatorEvent::Digit(9));
        }
        let display = engine.dispatch(CalculatorEvent::Calculate);
        assert_eq!(display.expression, "-1 × Infinity");
        assert_eq!(display.result, "Infinity");
        assert_eq!(engine.engine_state().operand1, Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_percent() {
        let mut engine = CalculatorEngine::new();
        let display = press(&mut engine, "5 0 % 2 0 =");
        assert_eq!(display.expression, "50 % 20");
        assert_eq!(display.result, "10");
    }

    #[test]
    fn test_one_third() {
        let mut engine = CalculatorEngine::new();
        let display = press(&mut engine, "1 ÷ 3 =");
        assert_eq!(display.result, "0.33333333");
    }

    #[test]
    fn test_trailing_decimal_operand_calculates() {
        let mut engine = CalculatorEngine::new();
        let display = press(&mut engine, "2 × 3 . =");
        assert_eq!(display.expression, "2 × 3");
        assert_eq!(display.result, "6");
    }

    #[test]
    fn test_lone_decimal_operand_is_zero() {
        let mut engine = CalculatorEngine::new();
        press(&mut engine, "2 ×");
        // "0." still parses as zero
        let display = press(&mut engine, ". =");
        assert_eq!(display.result, "0");
    }

    // ===== Clear tests =====

    #[test]
    fn test_clear_resets_everything() {
        let mut engine = CalculatorEngine::new();
        press(&mut engine, "1 2 + 3");
        let display = press(&mut engine, "C");
        assert_eq!(display, DisplayState::default());
        assert_eq!(engine.engine_state(), &EngineState::default());
    }

    #[test]
    fn test_clear_keeps_history() {
        let mut engine = CalculatorEngine::new();
        press(&mut engine, "1 + 1 = C");
        assert_eq!(engine.history().len(), 1);
        engine.clear_history();
        assert!(engine.history().is_empty());
    }

    // ===== Backspace tests =====

    #[test]
    fn test_backspace_drops_last_char() {
        let mut engine = CalculatorEngine::new();
        let display = press(&mut engine, "1 2 3 DEL");
        assert_eq!(display.expression, "12");
    }

    #[test]
    fn test_backspace_single_char_resets_to_zero() {
        let mut engine = CalculatorEngine::new();
        let display = press(&mut engine, "7 DEL");
        assert_eq!(display.expression, "0");
        assert_eq!(engine.engine_state().current_input, "0");
    }

    #[test]
    fn test_backspace_on_zero_is_noop() {
        let mut engine = CalculatorEngine::new();
        let display = press(&mut engine, "DEL DEL");
        assert_eq!(display, DisplayState::default());
        assert_eq!(engine.engine_state(), &EngineState::default());
    }

    #[test]
    fn test_backspace_cancels_pending_operation() {
        let mut engine = CalculatorEngine::new();
        let display = press(&mut engine, "4 2 + DEL");
        assert_eq!(display.expression, "42");
        let state = engine.engine_state();
        assert_eq!(state.current_input, "42");
        assert!(state.operand1.is_none());
        assert!(state.operation.is_none());
    }

    #[test]
    fn test_backspace_after_result_clears() {
        let mut engine = CalculatorEngine::new();
        press(&mut engine, "4 × 5 =");
        let display = press(&mut engine, "DEL");
        assert_eq!(display, DisplayState::default());
        assert_eq!(engine.engine_state(), &EngineState::default());
    }

    // ===== Subscription tests =====

    #[test]
    fn test_subscribers_receive_every_snapshot() {
        let mut engine = CalculatorEngine::new();
        let (tx, rx) = mpsc::channel();
        engine.subscribe(move |display| {
            tx.send(display.clone()).unwrap();
        });

        press(&mut engine, "+ 1");
        let snapshots: Vec<_> = rx.try_iter().collect();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].expression, "0");
        assert_eq!(snapshots[1].expression, "1");
    }

    #[test]
    fn test_unsubscribe() {
        let mut engine = CalculatorEngine::new();
        let (tx, rx) = mpsc::channel();
        let id = engine.subscribe(move |display| {
            let _ = tx.send(display.clone());
        });
        assert!(engine.unsubscribe(id));
        assert!(!engine.unsubscribe(id));

        press(&mut engine, "1");
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn test_engine_debug() {
        let engine = CalculatorEngine::new();
        let debug = format!("{:?}", engine);
        assert!(debug.contains("CalculatorEngine"));
    }

    // ===== Event parsing tests =====

    fn parse(token: &str) -> CalcResult<CalculatorEvent> {
        token.parse()
    }

    #[test]
    fn test_parse_event_tokens() {
        assert_eq!(parse("7"), Ok(CalculatorEvent::Digit(7)));
        assert_eq!(parse("."), Ok(CalculatorEvent::Decimal));
        assert_eq!(parse("="), Ok(CalculatorEvent::Calculate));
        assert_eq!(parse("c"), Ok(CalculatorEvent::Clear));
        assert_eq!(parse("AC"), Ok(CalculatorEvent::Clear));
        assert_eq!(parse("del"), Ok(CalculatorEvent::Backspace));
        assert_eq!(parse("⌫"), Ok(CalculatorEvent::Backspace));
        assert_eq!(
            parse("*"),
            Ok(CalculatorEvent::Operator(Operation::Multiply))
        );
        assert_eq!(parse("÷"), Ok(CalculatorEvent::Operator(Operation::Divide)));
    }

    #[test]
    fn test_parse_unknown_token() {
        assert_eq!(parse("12"), Err(CalcError::UnknownKey("12".into())));
        assert_eq!(parse(""), Err(CalcError::UnknownKey(String::new())));
    }

    #[test]
    fn test_event_display_parses_back() {
        let events = [
            CalculatorEvent::Digit(0),
            CalculatorEvent::Operator(Operation::Percent),
            CalculatorEvent::Decimal,
            CalculatorEvent::Calculate,
            CalculatorEvent::Clear,
            CalculatorEvent::Backspace,
        ];
        for event in events {
            assert_eq!(parse(&event.to_string()), Ok(event));
        }
    }

    #[test]
    fn test_digit_constructor() {
        assert_eq!(CalculatorEvent::digit(9), Ok(CalculatorEvent::Digit(9)));
        assert_eq!(CalculatorEvent::digit(10), Err(CalcError::InvalidDigit(10)));
    }
}
