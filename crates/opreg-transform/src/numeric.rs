//! Numeric field parsing.

/// Parses a duration in days, returning `None` for invalid, negative or
/// empty values. A decimal comma is accepted.
pub fn parse_duration(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = trimmed.replace(',', ".").parse::<f64>().ok()?;
    (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}

/// Parses a yes/no indicator (`"1"`/`"0"`).
pub fn parse_flag(value: &str) -> Option<bool> {
    match opreg_model::parse_code(value)? {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}
