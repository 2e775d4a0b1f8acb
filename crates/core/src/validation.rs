//! Field-level validation primitives.
//!
//! Request DTOs validate themselves explicitly into a [`ValidationErrors`]
//! list instead of relying on derive annotations, so every failing field of
//! one input is reported together and nothing half-validated reaches the
//! service layer.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// An ordered collection of [`FieldError`]s for one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error against `field`.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether any error was recorded for `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// Return `value` when no errors were recorded, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Treat missing, empty, and whitespace-only raw values as absent.
pub fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Keep a raw text value unchanged unless it is blank.
///
/// Unlike [`non_blank`], surrounding whitespace is preserved so it can take
/// part in a match.
pub fn non_blank_text(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

/// Parse an optional raw (query-string) value into `T`.
///
/// Blank values count as absent. A value that fails to parse records
/// `"must be {expected}"` against `field` and yields `None`.
pub fn parse_optional<T: FromStr>(
    raw: Option<&str>,
    field: &'static str,
    expected: &str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    let value = non_blank(raw)?;
    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.add(field, format!("must be {expected}"));
            None
        }
    }
}

/// Record an error unless `min <= value <= max`.
pub fn check_range(
    value: i64,
    min: i64,
    max: i64,
    field: &'static str,
    errors: &mut ValidationErrors,
) -> bool {
    if value < min {
        errors.add(field, format!("must not be less than {min}"));
        false
    } else if value > max {
        errors.add(field, format!("must not be greater than {max}"));
        false
    } else {
        true
    }
}
