//! Input validation for form fields and front-matter values.
//!
//! Each validator takes the raw value, a field name for error messages, and a
//! rule set. Optional fields that are absent or empty validate to a neutral
//! value (`""` or `0.0`) rather than an error.

use regex::Regex;
use std::fmt;
use thiserror::Error;

/// A failed validation, naming the field and what was wrong with it.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{field} {kind}")]
pub struct ValidationError {
    pub field: String,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    fn new(field: &str, kind: ValidationErrorKind) -> Self {
        Self {
            field: field.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationErrorKind {
    RequiredString,
    Required,
    TooShort(usize),
    TooLong(usize),
    PatternMismatch,
    NotANumber,
    NotAnInteger,
    BelowMin(f64),
    AboveMax(f64),
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequiredString => write!(f, "is required and must be a string"),
            Self::Required => write!(f, "is required"),
            Self::TooShort(n) => write!(f, "must be at least {n} characters"),
            Self::TooLong(n) => write!(f, "must not exceed {n} characters"),
            Self::PatternMismatch => write!(f, "does not match required format"),
            Self::NotANumber => write!(f, "must be a valid number"),
            Self::NotAnInteger => write!(f, "must be an integer"),
            Self::BelowMin(n) => write!(f, "must be at least {n}"),
            Self::AboveMax(n) => write!(f, "must not exceed {n}"),
        }
    }
}

/// Constraints for [`validate_string`].
#[derive(Debug, Clone, Default)]
pub struct StringRules {
    pub required: bool,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub pattern: Option<Regex>,
}

/// Constraints for [`validate_number`].
#[derive(Debug, Clone, Default)]
pub struct NumberRules {
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub integer: bool,
}

/// Validate a string field and return it trimmed.
///
/// Lengths count characters, not bytes, and are checked after trimming.
pub fn validate_string(
    value: Option<&str>,
    field: &str,
    rules: &StringRules,
) -> Result<String, ValidationError> {
    let raw = value.unwrap_or("");
    if raw.is_empty() {
        return if rules.required {
            Err(ValidationError::new(field, ValidationErrorKind::RequiredString))
        } else {
            Ok(String::new())
        };
    }

    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if let Some(min) = rules.min_len
        && len < min
    {
        return Err(ValidationError::new(field, ValidationErrorKind::TooShort(min)));
    }
    if let Some(max) = rules.max_len
        && len > max
    {
        return Err(ValidationError::new(field, ValidationErrorKind::TooLong(max)));
    }
    if let Some(pattern) = &rules.pattern
        && !pattern.is_match(trimmed)
    {
        return Err(ValidationError::new(
            field,
            ValidationErrorKind::PatternMismatch,
        ));
    }

    Ok(trimmed.to_string())
}

/// Validate a numeric field given as text.
///
/// Surrounding whitespace is ignored; an all-whitespace value counts as
/// zero, the same as an empty optional field.
pub fn validate_number(
    value: Option<&str>,
    field: &str,
    rules: &NumberRules,
) -> Result<f64, ValidationError> {
    let raw = match value {
        None => {
            return if rules.required {
                Err(ValidationError::new(field, ValidationErrorKind::Required))
            } else {
                Ok(0.0)
            };
        }
        Some(v) if v.is_empty() && !rules.required => return Ok(0.0),
        Some(v) => v.trim(),
    };

    let number = if raw.is_empty() {
        0.0
    } else {
        raw.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| ValidationError::new(field, ValidationErrorKind::NotANumber))?
    };

    if rules.integer && number.fract() != 0.0 {
        return Err(ValidationError::new(
            field,
            ValidationErrorKind::NotAnInteger,
        ));
    }
    if let Some(min) = rules.min
        && number < min
    {
        return Err(ValidationError::new(field, ValidationErrorKind::BelowMin(min)));
    }
    if let Some(max) = rules.max
        && number > max
    {
        return Err(ValidationError::new(field, ValidationErrorKind::AboveMax(max)));
    }

    Ok(number)
}
