//! Calculator core: operations, number formatting and the event-driven engine
//!
//! Nothing in this module touches a terminal. A host UI only feeds
//! [`CalculatorEvent`]s in and renders the [`DisplayState`] it gets back.

mod engine;
mod format;
pub mod history;
mod operations;

pub use engine::{CalculatorEngine, CalculatorEvent, DisplayState, EngineState, SubscriptionId};
pub use format::{format_number, parse_operand};
pub use operations::Operation;

use thiserror::Error;

/// Result type for calculator input parsing
pub type CalcResult<T> = Result<T, CalcError>;

/// Errors raised while translating external input into calculator events.
///
/// The engine itself never fails; these only surface at the boundary where
/// text or raw numbers become [`CalculatorEvent`]s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Key token does not name any keypad button
    #[error("Unknown key: {0:?}")]
    UnknownKey(String),
    /// Digit outside 0..=9
    #[error("Invalid digit: {0} (expected 0-9)")]
    InvalidDigit(u8),
}
