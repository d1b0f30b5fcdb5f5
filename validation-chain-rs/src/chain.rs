//! Declarative validation chains
//!
//! A route declares, once at startup, which rules apply to which request
//! parameters and body fields. The resulting `ValidationChain<T>` is
//! immutable and bound to its body type `T` at construction, so evaluation
//! never needs a runtime cast to recover the field extractors.

use crate::errors::{ValidationError, ValidationResult};
use crate::rules::Rule;

/// How a rule's outcome maps to the binding's outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// The rule must succeed
    Required,
    /// The rule must fail; the rule succeeding is itself a validation failure
    Forbidden,
}

/// A rule attached to a spec with a polarity
#[derive(Debug)]
pub struct Binding {
    rule: Rule,
    polarity: Polarity,
}

impl Binding {
    pub fn required(rule: Rule) -> Self {
        Self {
            rule,
            polarity: Polarity::Required,
        }
    }

    pub fn forbidden(rule: Rule) -> Self {
        Self {
            rule,
            polarity: Polarity::Forbidden,
        }
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Evaluate the binding against a value.
    ///
    /// Required bindings propagate the rule's result verbatim. Forbidden
    /// bindings invert it: an accepted value is reported as
    /// `ForbiddenRuleSatisfied`, a rejected one is fine.
    pub fn evaluate(&self, value: &str) -> ValidationResult {
        match (self.polarity, self.rule.evaluate(value)) {
            (Polarity::Required, result) => result,
            (Polarity::Forbidden, Ok(())) => Err(ValidationError::ForbiddenRuleSatisfied(
                self.rule.name().to_string(),
            )),
            (Polarity::Forbidden, Err(_)) => Ok(()),
        }
    }
}

/// Run a spec's bindings in declaration order, stopping at the first failure
fn evaluate_bindings(bindings: &[Binding], value: &str) -> ValidationResult {
    for binding in bindings {
        binding.evaluate(value)?;
    }
    Ok(())
}

/// One named request parameter and its ordered bindings
#[derive(Debug)]
pub struct ParamSpec {
    name: String,
    bindings: Vec<Binding>,
}

impl ParamSpec {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            bindings: Vec::new(),
        }
    }

    /// Add a rule that must succeed
    pub fn require(mut self, rule: Rule) -> Self {
        self.bindings.push(Binding::required(rule));
        self
    }

    /// Add a rule that must fail
    pub fn forbid(mut self, rule: Rule) -> Self {
        self.bindings.push(Binding::forbidden(rule));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate this spec against a resolved parameter value
    pub fn evaluate(&self, value: &str) -> ValidationResult {
        evaluate_bindings(&self.bindings, value)
    }
}

/// One extracted body field and its ordered bindings.
///
/// The extractor returns `None` when the field has no usable value, which
/// evaluation reports as `NullValue`.
pub struct FieldSpec<T> {
    name: String,
    extract: Box<dyn Fn(&T) -> Option<String> + Send + Sync>,
    bindings: Vec<Binding>,
}

impl<T> FieldSpec<T> {
    pub fn new<S, F>(name: S, extract: F) -> Self
    where
        S: Into<String>,
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            extract: Box::new(extract),
            bindings: Vec::new(),
        }
    }

    /// Add a rule that must succeed
    pub fn require(mut self, rule: Rule) -> Self {
        self.bindings.push(Binding::required(rule));
        self
    }

    /// Add a rule that must fail
    pub fn forbid(mut self, rule: Rule) -> Self {
        self.bindings.push(Binding::forbidden(rule));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extract the field from a body value and run the bindings
    pub fn evaluate(&self, body: &T) -> ValidationResult {
        match (self.extract)(body) {
            Some(value) => evaluate_bindings(&self.bindings, &value),
            None => Err(ValidationError::NullValue(self.name.clone())),
        }
    }
}

impl<T> std::fmt::Debug for FieldSpec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("bindings", &self.bindings)
            .finish()
    }
}

/// The full declarative validation spec for one route and one body shape
#[derive(Debug)]
pub struct ValidationChain<T> {
    params: Vec<ParamSpec>,
    fields: Vec<FieldSpec<T>>,
}

impl<T> ValidationChain<T> {
    pub fn builder() -> ChainBuilder<T> {
        ChainBuilder::new()
    }

    /// A chain with no specs at all
    pub fn empty() -> Self {
        Self {
            params: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn fields(&self) -> &[FieldSpec<T>] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.fields.is_empty()
    }
}

/// Fluent builder producing an immutable `ValidationChain<T>`
#[derive(Debug)]
pub struct ChainBuilder<T> {
    params: Vec<ParamSpec>,
    fields: Vec<FieldSpec<T>>,
}

impl<T> ChainBuilder<T> {
    pub fn new() -> Self {
        Self {
            params: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Declare a parameter spec; specs are evaluated in declaration order
    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    /// Declare a body field spec; specs are evaluated in declaration order
    pub fn field(mut self, spec: FieldSpec<T>) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn build(self) -> ValidationChain<T> {
        ValidationChain {
            params: self.params,
            fields: self.fields,
        }
    }
}

impl<T> Default for ChainBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
