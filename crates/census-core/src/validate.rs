//! Field-level validation rules shared by create, update and filter input.

use crate::{Error, Result};

/// Upper bound (inclusive) for an explicitly set age.
pub const MAX_AGE: i64 = 120;

/// Require a non-empty value made only of alphabetic characters.
///
/// Any Unicode letter is accepted, so Cyrillic or accented names pass.
pub fn letters(field: &'static str, value: &str) -> Result<()> {
  if value.is_empty() {
    return Err(Error::invalid(field, "must not be empty"));
  }
  if !value.chars().all(char::is_alphabetic) {
    return Err(Error::invalid(field, "must contain only letters"));
  }
  Ok(())
}

/// Require an age in `0..=MAX_AGE`.
pub fn age(value: i64) -> Result<u8> {
  if !(0..=MAX_AGE).contains(&value) {
    return Err(Error::invalid(
      "age",
      format!("must be between 0 and {MAX_AGE}, got {value}"),
    ));
  }
  // In range, so the cast is lossless.
  Ok(value as u8)
}
