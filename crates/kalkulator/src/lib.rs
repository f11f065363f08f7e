//! Kalkulator - button-driven arithmetic calculator
//!
//! The heart of the crate is [`CalculatorEngine`](core::CalculatorEngine), a
//! synchronous state machine fed by discrete keypad events. After every
//! event it publishes a [`DisplayState`](core::DisplayState): the expression
//! line and the result line a host UI renders verbatim.
//!
//! Invalid or premature events never fail. They are absorbed and the display
//! stays valid; division by zero surfaces as the `"Error"` result text.
//!
//! # Example
//!
//! ```rust
//! use kalkulator::prelude::*;
//!
//! let mut engine = CalculatorEngine::new();
//! engine.dispatch(CalculatorEvent::Digit(3));
//! engine.dispatch(CalculatorEvent::Operator(Operation::Add));
//! engine.dispatch(CalculatorEvent::Digit(4));
//! engine.dispatch(CalculatorEvent::Operator(Operation::Multiply));
//! engine.dispatch(CalculatorEvent::Digit(2));
//! let display = engine.dispatch(CalculatorEvent::Calculate);
//!
//! assert_eq!(display.expression, "7 × 2");
//! assert_eq!(display.result, "14");
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod core;
pub mod driver;

#[cfg(feature = "tui")]
pub mod tui;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::core::history::{History, HistoryEntry};
    pub use crate::core::{
        format_number, parse_operand, CalcError, CalcResult, CalculatorEngine, CalculatorEvent,
        DisplayState, EngineState, Operation, SubscriptionId,
    };
    pub use crate::driver::CalculatorDriver;

    #[cfg(feature = "tui")]
    pub use crate::tui::CalculatorApp;
}
