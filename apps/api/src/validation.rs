// Request validation helpers. Failures map to 400 VALIDATION_ERROR before any
// service logic runs.

use crate::errors::AppError;

/// Minimum non-blank length for resume text and job descriptions.
pub const MIN_TEXT_CHARS: usize = 10;

/// Requires `value.trim()` to hold at least `min` characters.
pub fn require_min_chars(value: &str, min: usize, message: &str) -> Result<(), AppError> {
    if value.trim().chars().count() < min {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

/// Resume text and job descriptions share the same rule.
pub fn require_text(value: &str, field: &str) -> Result<(), AppError> {
    require_min_chars(
        value,
        MIN_TEXT_CHARS,
        &format!("{field} must be at least {MIN_TEXT_CHARS} characters long"),
    )
}

/// Requires at least one entry that is not blank.
pub fn require_non_blank_items(items: &[String], message: &str) -> Result<(), AppError> {
    if items.iter().all(|s| s.trim().is_empty()) {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}
