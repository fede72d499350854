//! Resolution validation.
//!
//! The render density arrives as free text (a CLI flag, a text field) and
//! must be checked before a conversion run starts: a bad value aborts the
//! run before the document is even opened. Both functions are pure; the
//! caller decides how to surface the error.

use crate::error::DensityError;

/// Lowest accepted density, inclusive.
pub const MIN_DPI: f64 = 10.0;

/// Highest accepted density, inclusive.
pub const MAX_DPI: f64 = 2000.0;

/// Parse and range-check a density given as text.
///
/// Leading/trailing whitespace is ignored. Returns the parsed value on
/// success.
pub fn validate_text(text: &str) -> Result<f64, DensityError> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| DensityError::NotANumber {
            input: text.to_string(),
        })?;
    validate(value)
}

/// Range-check an already-parsed density.
///
/// NaN and infinities are rejected as out of range, as is anything below
/// [`MIN_DPI`] or above [`MAX_DPI`].
pub fn validate(value: f64) -> Result<f64, DensityError> {
    if value.is_nan() || value < MIN_DPI || value > MAX_DPI {
        return Err(DensityError::OutOfRange { value });
    }
    Ok(value)
}
