//! Error handling for the validation chain engine
//!
//! Every check in the engine reports failure as a data-carrying
//! `ValidationError`; nothing in this crate panics on bad input.

use thiserror::Error;

/// Result type for validation operations
pub type ValidationResult = Result<(), ValidationError>;

/// Enum representing different validation error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A declared request parameter was absent from the parameter map
    #[error("Parameter not found: {0}")]
    MissingParameter(String),

    /// A required rule rejected the value
    #[error("{0}")]
    RuleViolation(String),

    /// A rule declared forbidden accepted the value
    #[error("Forbidden rule succeeded: {0}")]
    ForbiddenRuleSatisfied(String),

    /// The request body does not match the shape the chain was built for
    #[error("Body does not match expected shape: {0}")]
    ShapeMismatch(String),

    /// A field extractor produced no value
    #[error("Value is null: {0}")]
    NullValue(String),

    /// Generic top-level failure; the specific cause lives in the report
    #[error("Validation failed")]
    AggregateFailure,
}

impl ValidationError {
    /// Create a rule violation with a message
    pub fn violation<S: Into<String>>(message: S) -> Self {
        ValidationError::RuleViolation(message.into())
    }

    /// Returns true if this error names a missing input rather than a bad one
    pub fn is_missing_input(&self) -> bool {
        matches!(
            self,
            ValidationError::MissingParameter(_) | ValidationError::NullValue(_)
        )
    }
}
