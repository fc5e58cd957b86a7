use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a field was rejected before any computation took place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationReason {
    /// The field is required and was not supplied (or was blank).
    Missing,
    /// The field was supplied but could not be read as a decimal number.
    NotNumeric,
    /// The field must be a whole, non-negative number (counts, days).
    NotAnInteger,
    /// Monetary amounts and rates must not be negative.
    Negative,
    /// The value is not one of the accepted choices (rate basis, interest mode).
    UnknownOption,
    /// The scenario code is not one of the seven known kinds.
    UnknownScenario,
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ValidationReason::Missing => "is required",
            ValidationReason::NotNumeric => "is not numeric",
            ValidationReason::NotAnInteger => "is not a whole number",
            ValidationReason::Negative => "must not be negative",
            ValidationReason::UnknownOption => "is not a recognised option",
            ValidationReason::UnknownScenario => "is not a known scenario",
        };
        f.write_str(text)
    }
}

/// Every way a calculation can refuse its input.
///
/// Each variant names the field at fault so the presenting layer can point at
/// it; the core never composes user-facing prose beyond these messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// A field is absent, malformed or out of its accepted domain.
    #[error("Invalid input: {field} {reason}")]
    Validation {
        field: String,
        reason: ValidationReason,
    },

    /// A field would break the arithmetic, e.g. zero installments.
    #[error("Precondition violated: {field} {requirement}")]
    Precondition { field: String, requirement: String },

    /// The inputs are valid but a result left the range of `Decimal`.
    #[error("Arithmetic overflow: {field} drives the result beyond the decimal range")]
    Overflow { field: String },
}

impl CalcError {
    pub fn validation(field: impl Into<String>, reason: ValidationReason) -> Self {
        CalcError::Validation {
            field: field.into(),
            reason,
        }
    }

    pub fn precondition(field: impl Into<String>, requirement: impl Into<String>) -> Self {
        CalcError::Precondition {
            field: field.into(),
            requirement: requirement.into(),
        }
    }

    pub fn overflow(field: impl Into<String>) -> Self {
        CalcError::Overflow {
            field: field.into(),
        }
    }

    /// Name of the offending field, for the presenting layer to map onto a label.
    pub fn field(&self) -> &str {
        match self {
            CalcError::Validation { field, .. }
            | CalcError::Precondition { field, .. }
            | CalcError::Overflow { field } => field,
        }
    }
}

pub type CalcResult<T> = Result<T, CalcError>;

/// Turns the `None` of a `checked_*` operation into [`CalcError::Overflow`].
pub(crate) fn checked(value: Option<Decimal>, field: &str) -> CalcResult<Decimal> {
    value.ok_or_else(|| CalcError::overflow(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field() {
        let err = CalcError::validation("installments", ValidationReason::Missing);
        assert_eq!(err.to_string(), "Invalid input: installments is required");
        assert_eq!(err.field(), "installments");
    }

    #[test]
    fn test_precondition_message() {
        let err = CalcError::precondition("installments", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Precondition violated: installments must be at least 1"
        );
    }

    #[test]
    fn test_checked_maps_none_to_overflow() {
        let err = checked(Decimal::MAX.checked_add(Decimal::ONE), "installments").unwrap_err();
        assert_eq!(err, CalcError::overflow("installments"));
        assert_eq!(err.field(), "installments");
        assert_eq!(checked(Some(Decimal::ONE), "installments"), Ok(Decimal::ONE));
    }
}
