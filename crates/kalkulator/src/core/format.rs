//! Number formatting and parsing shared by the expression and result lines

/// Maximum fractional digits kept for non-integral values
const MAX_FRACTION_DIGITS: usize = 8;

/// Formats a value for display.
///
/// NaN renders as `"Error"` and either infinity as `"Infinity"`.
/// Integral values render without a decimal point. Everything else keeps at
/// most eight fractional digits with trailing zeros (and a dangling point)
/// stripped.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "Error".to_string();
    }
    if value.is_infinite() {
        return "Infinity".to_string();
    }

    let formatted = if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value);
        fixed
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    };

    // -0 and tiny negatives that round away
    if formatted == "-0" {
        "0".to_string()
    } else {
        formatted
    }
}

/// Parses operand text, returning `None` for anything that is not a number.
///
/// `"Error"` (the division-by-zero display) deliberately does not parse.
#[must_use]
pub fn parse_operand(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}
