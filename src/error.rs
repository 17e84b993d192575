// src/error.rs
// Standardized error types for versus

use thiserror::Error;

/// Main error type for the versus library
#[derive(Error, Debug)]
pub enum VersusError {
    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("analyzer failure: {0}")]
    Analyzer(String),

    #[error("explainer failure: {0}")]
    Explainer(String),

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Convenience type alias for Result using VersusError
pub type Result<T> = std::result::Result<T, VersusError>;

impl VersusError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        VersusError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        VersusError::NotFound(what.into())
    }
}

/// Fail with a validation error when a required identifier is blank
pub fn require_id<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(VersusError::validation(field, "is required"));
    }
    Ok(trimmed)
}

/// A stored or submitted value that does not belong to its closed enumeration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_field() {
        let err = VersusError::validation("fromVersionId", "does not belong to project");
        let text = err.to_string();
        assert!(text.contains("fromVersionId"));
        assert!(text.contains("does not belong to project"));
    }

    #[test]
    fn test_not_found_error() {
        let err = VersusError::not_found("comparison abc");
        assert_eq!(err.to_string(), "comparison abc not found");
    }

    #[test]
    fn test_require_id() {
        assert_eq!(require_id("id", "  abc ").unwrap(), "abc");
        let err = require_id("toVersionId", "   ").unwrap_err();
        assert!(matches!(err, VersusError::Validation { ref field, .. } if field == "toVersionId"));
    }

    #[test]
    fn test_unknown_variant_message() {
        let err = UnknownVariant::new("severity", "critical");
        assert_eq!(err.to_string(), "unknown severity value: critical");
    }
}
