//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures of the object model (bad input values,
/// malformed records). Persistence and console concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A timestamp string could not be parsed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A raw value could not be converted into an attribute's declared type.
    #[error("cannot convert {value} to {expected}")]
    Coercion {
        expected: &'static str,
        value: String,
    },

    /// A serialized record lacks a mandatory field.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A class name is not part of the registry.
    #[error("unknown class: {0}")]
    UnknownClass(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_timestamp(msg: impl Into<String>) -> Self {
        Self::InvalidTimestamp(msg.into())
    }

    pub fn coercion(expected: &'static str, value: impl Into<String>) -> Self {
        Self::Coercion {
            expected,
            value: value.into(),
        }
    }

    pub fn unknown_class(name: impl Into<String>) -> Self {
        Self::UnknownClass(name.into())
    }
}
