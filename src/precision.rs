//! Pixel precision helpers.
//!
//! Layout values are derived from ratios of measured artwork, which produces
//! long fractional tails that render differently across device pixel ratios.
//! These helpers snap values to half or whole pixels and format them for CSS.
//!
//! Rounding follows browser semantics: pixel snapping rounds ties toward
//! positive infinity (`Math.round`), and decimal truncation rounds the exact
//! binary value with exact ties away from zero (`toFixed`).

use std::fmt;

/// Number of fractional digits kept for internal ratio math.
pub const DEFAULT_PRECISION: usize = 6;

/// Precision used by [`to_css_percentage`] when the caller has no preference.
pub const DEFAULT_PERCENT_PRECISION: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionError {
    /// A ratio was requested with a zero denominator.
    DivisionByZero,
}

impl fmt::Display for PrecisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrecisionError::DivisionByZero => write!(f, "Division by zero is not allowed"),
        }
    }
}

impl std::error::Error for PrecisionError {}

/// Round half toward positive infinity.
#[inline]
fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Enough fractional digits to print any `f64` exactly.
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Whether `value` lies exactly halfway between two `digits`-place decimals.
///
/// Returns the truncated decimal when it does.
fn exact_tie(value: f64, digits: usize) -> Option<f64> {
    if digits >= EXACT_FRACTION_DIGITS {
        return None;
    }
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let (int_part, fraction) = exact.split_once('.')?;
    let (kept, rest) = fraction.split_at(digits);
    let mut rest = rest.bytes();
    if rest.next() != Some(b'5') || !rest.all(|b| b == b'0') {
        return None;
    }
    if kept.is_empty() {
        int_part.parse().ok()
    } else {
        format!("{}.{}", int_part, kept).parse().ok()
    }
}

/// Snap to the nearest 0.5 pixel.
pub fn to_half_pixel(value: f64) -> f64 {
    round_half_up(value * 2.0) / 2.0
}

/// Snap to the nearest whole pixel.
pub fn to_integer_pixel(value: f64) -> f64 {
    round_half_up(value)
}

/// Keep `digits` fractional digits.
///
/// Exact ties round away from zero, as `Number.prototype.toFixed` does.
pub fn to_high_precision(value: f64, digits: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    if let Some(truncated) = exact_tie(value, digits) {
        let step = 10f64.powi(-(digits as i32));
        let rounded = (truncated + step).copysign(value);
        return format!("{:.*}", digits, rounded).parse().unwrap_or(value);
    }
    format!("{:.*}", digits, value).parse().unwrap_or(value)
}

/// Format as a CSS length: `"248px"`, `"148.5px"`.
pub fn to_css_pixel(value: f64) -> String {
    let rounded = to_half_pixel(value);
    if rounded.fract() == 0.0 {
        format!("{}px", rounded)
    } else {
        format!("{:.1}px", rounded)
    }
}

/// Format a 0-100 value as a CSS percentage, dropping trailing zeros.
pub fn to_css_percentage(value: f64, precision: usize) -> String {
    format!("{}%", to_high_precision(value, precision))
}

/// `numerator / denominator` kept to `precision` fractional digits.
pub fn calculate_precise_ratio(
    numerator: f64,
    denominator: f64,
    precision: usize,
) -> Result<f64, PrecisionError> {
    if denominator == 0.0 {
        return Err(PrecisionError::DivisionByZero);
    }
    Ok(to_high_precision(numerator / denominator, precision))
}
