//! Input validation helpers.
//!
//! Pure functions run by the façades before a request is built; they never
//! touch the network. Each failure names the offending field so callers can
//! fix the exact input.

use crate::error::{Error, Result};

/// Checks that a required string field is non-empty.
///
/// # Errors
///
/// Returns a validation error naming the field when the value is empty.
pub fn required_str(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::validation(field, "cannot be empty"));
    }
    Ok(())
}

/// Checks that a required sequence field is non-empty.
///
/// # Errors
///
/// Returns a validation error naming the field when the sequence is empty.
pub fn required_slice<T>(field: &str, value: &[T]) -> Result<()> {
    if value.is_empty() {
        return Err(Error::validation(field, "cannot be empty"));
    }
    Ok(())
}

/// Checks that an integer field is strictly positive.
///
/// # Errors
///
/// Returns a validation error carrying the offending value when it is zero.
pub fn positive(field: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(Error::validation_with_value(
            field,
            "must be positive",
            value,
        ));
    }
    Ok(())
}

/// Checks that a float field is strictly positive.
///
/// # Errors
///
/// Returns a validation error carrying the offending value when it is not
/// greater than zero.
pub fn positive_f64(field: &str, value: f64) -> Result<()> {
    if value <= 0.0 {
        return Err(Error::validation_with_value(
            field,
            "must be positive",
            value,
        ));
    }
    Ok(())
}
