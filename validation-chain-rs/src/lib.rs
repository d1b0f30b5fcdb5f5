//! # Validation Chain Library
//!
//! A declarative validation chain engine for the session control service.
//! A route declares, ahead of time, which rules apply to its request
//! parameters and body fields; the engine evaluates those checks with an
//! allow/forbid composition model before the route's handler runs.
//!
//! ## Features
//!
//! - A library of named, pure rules over string values
//! - Required/forbidden rule bindings with ordered, first-error-wins evaluation
//! - Chains bound to their body type at construction (no runtime casts)
//! - Structured failure reporting alongside the single pass/fail outcome
//! - No panics: every failure is a data-carrying result

mod chain;
mod errors;
pub mod rules;
mod validator;

pub use chain::{Binding, ChainBuilder, FieldSpec, ParamSpec, Polarity, ValidationChain};
pub use errors::{ValidationError, ValidationResult};
pub use validator::{Parameters, ValidationReport, Validator};

/// Re-export commonly used items for convenience
pub mod prelude {
    pub use crate::chain::{ChainBuilder, FieldSpec, ParamSpec, ValidationChain};
    pub use crate::errors::{ValidationError, ValidationResult};
    pub use crate::rules;
    pub use crate::validator::{Parameters, ValidationReport, Validator};
}

/// Version of the validation library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_chain_declared_through_prelude() {
        let validator: Validator<()> = Validator::new(
            ValidationChain::builder()
                .param(
                    ParamSpec::new("count")
                        .require(rules::not_empty())
                        .require(rules::is_integer()),
                )
                .build(),
        );

        let mut params = Parameters::new();
        params.insert("count".to_string(), "7".to_string());
        assert!(validator.validate(&params, None).is_ok());
    }
}
