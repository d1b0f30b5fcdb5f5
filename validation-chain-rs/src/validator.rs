//! Runtime evaluation of validation chains
//!
//! A `Validator<T>` is built once at route-registration time and shared across
//! requests. It holds no mutable state, so concurrent calls need no
//! coordination and repeated calls with identical inputs yield identical
//! results.

use std::collections::HashMap;

use crate::chain::ValidationChain;
use crate::errors::{ValidationError, ValidationResult};

/// Lookup from parameter name to its transport-layer string value
pub type Parameters = HashMap<String, String>;

/// Both aggregates of one validation pass.
///
/// The top-level `validate` collapses everything into a single pass/fail
/// outcome; callers that need the specific failing cause read it from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub params: ValidationResult,
    pub fields: ValidationResult,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.params.is_ok() && self.fields.is_ok()
    }

    /// The first failing aggregate's error, parameters before fields
    pub fn first_error(&self) -> Option<&ValidationError> {
        self.params
            .as_ref()
            .err()
            .or_else(|| self.fields.as_ref().err())
    }
}

/// Evaluator bound to one `ValidationChain<T>`
#[derive(Debug)]
pub struct Validator<T> {
    chain: ValidationChain<T>,
}

impl<T> Validator<T> {
    pub fn new(chain: ValidationChain<T>) -> Self {
        Self { chain }
    }

    /// Empty validator. Will validate nothing.
    pub fn none() -> Self {
        Self {
            chain: ValidationChain::empty(),
        }
    }

    pub fn chain(&self) -> &ValidationChain<T> {
        &self.chain
    }

    /// Validate the declared parameters against a parameter map.
    ///
    /// Every declared spec is evaluated, in declaration order; a missing or
    /// failing parameter does not abort the scan of the remaining ones. The
    /// result is the first error by declaration order, Ok if there is none.
    pub fn validate_params(&self, params: &Parameters) -> ValidationResult {
        let mut first_error = None;

        for spec in self.chain.params() {
            let result = match params.get(spec.name()) {
                Some(value) => spec.evaluate(value),
                None => Err(ValidationError::MissingParameter(spec.name().to_string())),
            };

            if let Err(err) = result {
                log::error!("Validation failed for parameter '{}': {}", spec.name(), err);
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Validate the declared body fields against a deserialized body.
    ///
    /// `None` means the transport layer could not produce a value of the
    /// chain's body shape; every declared field then reports `ShapeMismatch`
    /// and no extractor runs.
    pub fn validate_fields(&self, body: Option<&T>) -> ValidationResult {
        let mut first_error = None;

        for spec in self.chain.fields() {
            let result = match body {
                Some(value) => spec.evaluate(value),
                None => Err(ValidationError::ShapeMismatch(spec.name().to_string())),
            };

            if let Err(err) = result {
                log::error!("Validation failed for field '{}': {}", spec.name(), err);
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Evaluate both aggregates independently and keep the specific causes
    pub fn check(&self, params: &Parameters, body: Option<&T>) -> ValidationReport {
        ValidationReport {
            params: self.validate_params(params),
            fields: self.validate_fields(body),
        }
    }

    /// Single pass/fail outcome for the whole chain.
    ///
    /// Returns Ok iff both aggregates are Ok; any failure collapses to the
    /// generic `AggregateFailure`. Use `check` to recover the failing cause.
    pub fn validate(&self, params: &Parameters, body: Option<&T>) -> ValidationResult {
        if self.check(params, body).is_ok() {
            Ok(())
        } else {
            Err(ValidationError::AggregateFailure)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{FieldSpec, ParamSpec, ValidationChain};
    use crate::rules;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct StartRequest {
        #[serde(rename = "endTime")]
        end_time: String,
    }

    fn params_of(pairs: &[(&str, &str)]) -> Parameters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn end_time_validator() -> Validator<StartRequest> {
        Validator::new(
            ValidationChain::builder()
                .field(
                    FieldSpec::new("endTime", |r: &StartRequest| Some(r.end_time.clone()))
                        .require(rules::not_empty())
                        .require(rules::is_time_of_day()),
                )
                .build(),
        )
    }

    #[test]
    fn test_empty_validator_accepts_anything() {
        let validator: Validator<StartRequest> = Validator::none();

        assert!(validator.validate(&Parameters::new(), None).is_ok());
        assert!(validator
            .validate(
                &params_of(&[("junk", "value")]),
                Some(&StartRequest {
                    end_time: "not even a time".to_string()
                })
            )
            .is_ok());
    }

    #[test]
    fn test_required_param_chain_accepts_valid_value() {
        let validator: Validator<()> = Validator::new(
            ValidationChain::builder()
                .param(
                    ParamSpec::new("test")
                        .require(rules::not_empty())
                        .require(rules::is_integer())
                        .require(rules::length(0, 3)),
                )
                .build(),
        );

        assert!(validator
            .validate_params(&params_of(&[("test", "123")]))
            .is_ok());
    }

    #[test]
    fn test_forbidden_rule_rejects_satisfying_value() {
        let validator: Validator<()> = Validator::new(
            ValidationChain::builder()
                .param(ParamSpec::new("test").forbid(rules::is_integer()))
                .build(),
        );

        // "123" is an integer, so the forbidden rule succeeded
        let err = validator
            .validate_params(&params_of(&[("test", "123")]))
            .unwrap_err();
        assert!(matches!(err, ValidationError::ForbiddenRuleSatisfied(_)));

        assert!(validator
            .validate_params(&params_of(&[("test", "abc")]))
            .is_ok());
    }

    #[test]
    fn test_missing_parameter_does_not_abort_scan() {
        // The first spec passes, the second is absent from the map. A buggy
        // evaluator that returns after the first spec would report Ok here.
        let validator: Validator<()> = Validator::new(
            ValidationChain::builder()
                .param(ParamSpec::new("present").require(rules::not_empty()))
                .param(ParamSpec::new("absent").require(rules::not_empty()))
                .build(),
        );

        let err = validator
            .validate_params(&params_of(&[("present", "value")]))
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingParameter("absent".to_string()));
    }

    #[test]
    fn test_first_error_by_declaration_order_wins() {
        let validator: Validator<()> = Validator::new(
            ValidationChain::builder()
                .param(ParamSpec::new("first").require(rules::is_integer()))
                .param(ParamSpec::new("second").require(rules::not_empty()))
                .build(),
        );

        // Both specs fail; the first declared one is reported
        let err = validator
            .validate_params(&params_of(&[("first", "abc"), ("second", "")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Value is not an integer");
    }

    #[test]
    fn test_end_time_field_chain() {
        let validator = end_time_validator();

        let ok_body = StartRequest {
            end_time: "14:30".to_string(),
        };
        assert!(validator.validate_fields(Some(&ok_body)).is_ok());

        let empty_body = StartRequest {
            end_time: String::new(),
        };
        let err = validator.validate_fields(Some(&empty_body)).unwrap_err();
        assert_eq!(err.to_string(), "Value is empty");

        let bad_body = StartRequest {
            end_time: "abc".to_string(),
        };
        let err = validator.validate_fields(Some(&bad_body)).unwrap_err();
        assert_eq!(err.to_string(), "Value is not a time");
    }

    #[test]
    fn test_shape_mismatch_is_a_typed_result() {
        // A payload that did not deserialize as StartRequest reaches the
        // validator as an absent body.
        let validator = end_time_validator();

        let err = validator.validate_fields(None).unwrap_err();
        assert_eq!(err, ValidationError::ShapeMismatch("endTime".to_string()));

        // And the top level reports the generic aggregate failure
        let err = validator.validate(&Parameters::new(), None).unwrap_err();
        assert_eq!(err, ValidationError::AggregateFailure);
    }

    #[test]
    fn test_check_preserves_both_aggregates() {
        let validator: Validator<StartRequest> = Validator::new(
            ValidationChain::builder()
                .param(ParamSpec::new("test").require(rules::is_integer()))
                .field(
                    FieldSpec::new("endTime", |r: &StartRequest| Some(r.end_time.clone()))
                        .require(rules::is_time_of_day()),
                )
                .build(),
        );

        let body = StartRequest {
            end_time: "not a time".to_string(),
        };
        let report = validator.check(&params_of(&[("test", "abc")]), Some(&body));

        // Both aggregates were computed even though the first already failed
        assert!(report.params.is_err());
        assert!(report.fields.is_err());
        assert_eq!(
            report.first_error().unwrap().to_string(),
            "Value is not an integer"
        );
    }

    #[test]
    fn test_validate_is_idempotent() {
        let validator = end_time_validator();
        let params = params_of(&[("noise", "1")]);
        let body = StartRequest {
            end_time: "23:59:59".to_string(),
        };

        let first = validator.validate(&params, Some(&body));
        let second = validator.validate(&params, Some(&body));
        assert_eq!(first, second);

        let bad = StartRequest {
            end_time: "nope".to_string(),
        };
        assert_eq!(
            validator.validate(&params, Some(&bad)),
            validator.validate(&params, Some(&bad))
        );
    }

    #[test]
    fn test_validator_is_shareable_across_threads() {
        let validator = std::sync::Arc::new(end_time_validator());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let v = validator.clone();
                std::thread::spawn(move || {
                    let body = StartRequest {
                        end_time: "08:15".to_string(),
                    };
                    v.validate(&Parameters::new(), Some(&body)).is_ok()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
