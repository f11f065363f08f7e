//! Binary operations offered by the keypad

use serde::{Deserialize, Serialize};

/// Closed set of binary operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Subtract,
    /// Multiplication (×)
    Multiply,
    /// Division (÷)
    Divide,
    /// Percent of the first operand (%)
    Percent,
}

impl Operation {
    /// Every operation, in keypad order
    pub const ALL: [Self; 5] = [
        Self::Percent,
        Self::Divide,
        Self::Multiply,
        Self::Subtract,
        Self::Add,
    ];

    /// Returns the operator symbol used in the expression line
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
            Self::Percent => "%",
        }
    }

    /// Looks up an operation by display symbol or its ASCII alias
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '×' | '*' | 'x' => Some(Self::Multiply),
            '÷' | '/' => Some(Self::Divide),
            '%' => Some(Self::Percent),
            _ => None,
        }
    }

    /// Applies the operation to `a` and `b`.
    ///
    /// Division by exactly zero yields NaN, which formats as `"Error"`.
    /// Percent is `a * (b / 100)`.
    #[must_use]
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide => {
                if b == 0.0 {
                    f64::NAN
                } else {
                    a / b
                }
            }
            Self::Percent => a * (b / 100.0),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
