//! Built-in rule library
//!
//! Each rule is a named, pure, stateless predicate over a single string
//! value. Rules never panic: any internal parse failure is converted into a
//! `RuleViolation` result.

use crate::errors::{ValidationError, ValidationResult};
use chrono::NaiveTime;

/// A named check over a single string value.
///
/// Rules are deterministic and side-effect free, so a `Rule` bound into a
/// chain can be shared across concurrent requests without coordination.
pub struct Rule {
    name: &'static str,
    check: Box<dyn Fn(&str) -> ValidationResult + Send + Sync>,
}

impl Rule {
    /// Create a rule from a name and a check function
    pub fn new<F>(name: &'static str, check: F) -> Self
    where
        F: Fn(&str) -> ValidationResult + Send + Sync + 'static,
    {
        Self {
            name,
            check: Box::new(check),
        }
    }

    /// The rule's name, used in forbidden-rule failure reports
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Evaluate the rule against a value
    pub fn evaluate(&self, value: &str) -> ValidationResult {
        (self.check)(value)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Validate that a value is not empty
pub fn not_empty() -> Rule {
    Rule::new("not_empty", |value| {
        if value.is_empty() {
            Err(ValidationError::violation("Value is empty"))
        } else {
            Ok(())
        }
    })
}

/// Validate that a value's length is within an inclusive range
pub fn length(min: usize, max: usize) -> Rule {
    Rule::new("length", move |value| {
        let len = value.chars().count();
        if len < min || len > max {
            Err(ValidationError::violation(format!(
                "Value not in range ({}, {})",
                min, max
            )))
        } else {
            Ok(())
        }
    })
}

/// Validate that a value parses as a base-10 integer (optional leading sign)
pub fn is_integer() -> Rule {
    Rule::new("is_integer", |value| {
        if value.parse::<i64>().is_ok() {
            Ok(())
        } else {
            Err(ValidationError::violation("Value is not an integer"))
        }
    })
}

/// Validate that a value parses as a 24-hour local time, `HH:mm` or `HH:mm:ss`
pub fn is_time_of_day() -> Rule {
    Rule::new("is_time_of_day", |value| {
        let parsed = NaiveTime::parse_from_str(value, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"));
        if parsed.is_ok() {
            Ok(())
        } else {
            Err(ValidationError::violation("Value is not a time"))
        }
    })
}

/// Validate that a value matches a regex pattern.
///
/// The pattern is compiled once, when the rule is built. An invalid pattern
/// produces a rule that reports the compile failure for every value instead
/// of panicking at chain-construction time.
pub fn matches_pattern(pattern: &str) -> Rule {
    match regex::Regex::new(pattern) {
        Ok(re) => Rule::new("matches_pattern", move |value| {
            if re.is_match(value) {
                Ok(())
            } else {
                Err(ValidationError::violation(format!(
                    "Value does not match pattern: {}",
                    re.as_str()
                )))
            }
        }),
        Err(e) => {
            let message = format!("Invalid regex pattern: {}", e);
            Rule::new("matches_pattern", move |_| {
                Err(ValidationError::violation(message.clone()))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_not_empty() {
        assert!(not_empty().evaluate("hello").is_ok());

        let err = not_empty().evaluate("").unwrap_err();
        assert_eq!(err.to_string(), "Value is empty");
    }

    #[test]
    fn test_length() {
        let rule = length(0, 3);
        assert!(rule.evaluate("").is_ok());
        assert!(rule.evaluate("123").is_ok());

        let err = rule.evaluate("1234").unwrap_err();
        assert_eq!(err.to_string(), "Value not in range (0, 3)");

        assert!(length(2, 5).evaluate("a").is_err());
    }

    #[test_case("123" => true; "plain digits")]
    #[test_case("-45" => true; "negative")]
    #[test_case("+7" => true; "explicit positive")]
    #[test_case("1_000" => false; "separator rejected")]
    #[test_case("12.5" => false; "float rejected")]
    #[test_case("abc" => false; "letters rejected")]
    #[test_case("" => false; "empty rejected")]
    fn test_is_integer(value: &str) -> bool {
        is_integer().evaluate(value).is_ok()
    }

    #[test_case("14:30" => true; "hours minutes")]
    #[test_case("14:30:59" => true; "hours minutes seconds")]
    #[test_case("00:00" => true; "midnight")]
    #[test_case("23:59:59" => true; "end of day")]
    #[test_case("24:00" => false; "hour out of range")]
    #[test_case("14:30+02:00" => false; "offset rejected")]
    #[test_case("abc" => false; "not a time")]
    #[test_case("" => false; "empty")]
    fn test_is_time_of_day(value: &str) -> bool {
        is_time_of_day().evaluate(value).is_ok()
    }

    #[test]
    fn test_time_error_message() {
        let err = is_time_of_day().evaluate("abc").unwrap_err();
        assert_eq!(err.to_string(), "Value is not a time");
    }

    #[test]
    fn test_matches_pattern() {
        let rule = matches_pattern(r"^[a-z0-9]+$");
        assert!(rule.evaluate("abc123").is_ok());
        assert!(rule.evaluate("ABC").is_err());
    }

    #[test]
    fn test_matches_pattern_invalid_regex_is_total() {
        // A broken pattern must never panic; every value fails with the
        // compile error instead.
        let rule = matches_pattern(r"([unclosed");
        let err = rule.evaluate("anything").unwrap_err();
        assert!(err.to_string().contains("Invalid regex pattern"));
    }

    #[test]
    fn test_rules_are_deterministic() {
        let rule = is_integer();
        assert_eq!(rule.evaluate("42"), rule.evaluate("42"));
        assert_eq!(rule.evaluate("nope"), rule.evaluate("nope"));
    }
}
