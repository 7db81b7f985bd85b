//! Sanitizers for raw form entry. The engine never validates its input, so
//! everything typed by a user passes through one of these first.

use crate::scoring::DEFAULT_CONTROL_CONSTANT;

/// Parse a score field. Anything that is not a finite number becomes 0.
pub fn parse_score(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Parse a count field (voters, points).
///
/// Reads the leading run of digits, so "12.7" is 12 and "40 votes" is 40.
/// Empty, non-numeric and negative input all become 0. A digit run too large
/// for `u64` saturates to `u64::MAX`.
pub fn parse_count(raw: &str) -> u64 {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let run = &digits[..end];
    if run.is_empty() {
        return 0;
    }
    run.parse().unwrap_or(u64::MAX)
}

/// Parse the control constant. Non-numeric or non-positive input falls back
/// to the default of 20.
pub fn parse_control_constant(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => DEFAULT_CONTROL_CONSTANT,
    }
}
