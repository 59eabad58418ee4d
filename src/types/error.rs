//! Structured message errors
//!
//! Every parser and validator failure is reported with the name of the
//! offending field so callers can match on the kind instead of the text.

use std::fmt;
use thiserror::Error;

/// Broad category of a message construction failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value was supplied but could not be parsed or violates a rule
    InvalidInput,
    /// A mandatory value is absent or empty
    RequiredField,
}

/// Failure raised while parsing, building or validating a message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MsgError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
    #[error("{field} is required")]
    RequiredField { field: &'static str },
}

impl MsgError {
    /// Invalid-input failure for `field`, keeping the underlying reason
    pub fn invalid(field: &'static str, reason: impl fmt::Display) -> Self {
        MsgError::InvalidInput {
            field,
            reason: reason.to_string(),
        }
    }

    /// Required-field failure for `field`
    pub fn required(field: &'static str) -> Self {
        MsgError::RequiredField { field }
    }

    /// Name of the field that caused the failure
    pub fn field(&self) -> &'static str {
        match self {
            MsgError::InvalidInput { field, .. } | MsgError::RequiredField { field } => field,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MsgError::InvalidInput { .. } => ErrorKind::InvalidInput,
            MsgError::RequiredField { .. } => ErrorKind::RequiredField,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_accessors() {
        let err = MsgError::invalid("amount", "negative coin amount: -5");
        assert_eq!(err.field(), "amount");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.to_string(), "invalid amount: negative coin amount: -5");

        let err = MsgError::required("label");
        assert_eq!(err.field(), "label");
        assert_eq!(err.kind(), ErrorKind::RequiredField);
        assert_eq!(err.to_string(), "label is required");
    }
}
