//! Input validation helpers
//!
//! Centralized text length constants and validation functions shared by the
//! wizards. Limits match what fits in a sheet cell without wrapping badly.

use shared::AppError;

/// Names: dishes, suppliers, staff, events, vehicles
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, corrective actions
pub const MAX_NOTE_LEN: usize = 2000;

/// Short identifiers: phone, invoice number, certificate reference
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Lowest / highest temperature a kitchen probe reports
pub const MIN_PROBE_CELSIUS: f64 = -40.0;
pub const MAX_PROBE_CELSIUS: f64 = 150.0;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required(field));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate a probe temperature is a finite number in the probe's range.
pub fn validate_temperature(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || !(MIN_PROBE_CELSIUS..=MAX_PROBE_CELSIUS).contains(&value) {
        return Err(AppError::with_message(
            shared::ErrorCode::InvalidTemperature,
            format!("{field} must be between {MIN_PROBE_CELSIUS} and {MAX_PROBE_CELSIUS} °C"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Trim, drop empties and dedupe a list of free text entries (ingredients, products)
pub fn normalize_list(items: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let trimmed = item.trim();
        if !trimmed.is_empty() && !out.iter().any(|o| o.eq_ignore_ascii_case(trimmed)) {
            out.push(trimmed.to_string());
        }
    }
    out
}

/// `Some(trimmed)` for non-blank strings
pub fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
