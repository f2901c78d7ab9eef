//! Declarative validation rules shared by every entity.
//!
//! Validation never panics: rules are collected by a [Validator] and reported
//! together as [ValidationErrors], which render as a single human-readable
//! message.

use std::fmt::Display;

use serde::de::DeserializeOwned;

use crate::EntityId;

/// Types whose contents can be checked against their schema.
pub trait Validate {
    /// Check every rule and report all the violations found.
    ///
    /// # Errors
    ///
    /// Returns [ValidationErrors] listing each rule that failed.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The name of the offending field, as it appears in JSON payloads.
    pub field: String,
    /// What is wrong with the field.
    pub message: String,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// The rule violations found while validating a value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Create a list holding one violation.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        Self(vec![FieldError {
            field: field.to_owned(),
            message: message.into(),
        }])
    }

    /// Add a violation.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_owned(),
            message: message.into(),
        });
    }

    /// Whether no violation was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The recorded violations in the order they were found.
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Whether any violation concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }

    /// `Ok(())` if nothing was recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self.0.iter().map(FieldError::to_string).collect();

        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Collects rule violations for a value.
///
/// Every rule accepts either a plain value or an `Option`; `None` skips the
/// rule, which is how optional and partial-update fields are checked.
///
/// # Examples
/// ```
/// use finboard::schema::Validator;
///
/// let result = Validator::new()
///     .non_empty("name", "Rent")
///     .positive("amount", 0.0)
///     .finish();
///
/// assert_eq!(result.unwrap_err().to_string(), "amount must be greater than zero");
/// ```
#[derive(Debug, Default)]
#[must_use]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    /// Start a validation with no violations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Text must contain something other than whitespace.
    pub fn non_empty<'a>(self, field: &str, value: impl Into<Option<&'a str>>) -> Self {
        let violated = value.into().is_some_and(|text| text.trim().is_empty());
        self.check(!violated, field, "must not be empty")
    }

    /// Numbers must be finite and strictly greater than zero.
    pub fn positive(self, field: &str, value: impl Into<Option<f64>>) -> Self {
        let violated = value
            .into()
            .is_some_and(|number| !number.is_finite() || number <= 0.0);
        self.check(!violated, field, "must be greater than zero")
    }

    /// Numbers must be finite and zero or greater.
    pub fn non_negative(self, field: &str, value: impl Into<Option<f64>>) -> Self {
        let violated = value
            .into()
            .is_some_and(|number| !number.is_finite() || number < 0.0);
        self.check(!violated, field, "must not be negative")
    }

    /// Identities must be well-formed.
    pub fn identity<'a>(self, field: &str, id: impl Into<Option<&'a EntityId>>) -> Self {
        let violated = id.into().is_some_and(|id| !id.is_well_formed());
        self.check(!violated, field, "is not a well-formed identity")
    }

    /// Record `message` against `field` unless `condition` holds.
    pub fn check(mut self, condition: bool, field: &str, message: &str) -> Self {
        if !condition {
            self.errors.push(field, message);
        }

        self
    }

    /// Fold in the violations reported by a nested validation.
    pub fn merge(mut self, result: Result<(), ValidationErrors>) -> Self {
        if let Err(errors) = result {
            self.errors.0.extend(errors.0);
        }

        self
    }

    /// Finish the validation.
    ///
    /// # Errors
    ///
    /// Returns every violation recorded so far.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        self.errors.into_result()
    }
}

/// Parse a JSON payload and validate it.
///
/// Decoding failures are reported as validation errors too: a missing field,
/// an unknown field (e.g. an `id` supplied on a create payload) or an enum
/// value outside of its fixed set.
///
/// # Errors
///
/// Returns [ValidationErrors] if the payload cannot be decoded or breaks a rule.
pub fn decode<T>(json: &str) -> Result<T, ValidationErrors>
where
    T: DeserializeOwned + Validate,
{
    let value: T = serde_json::from_str(json)
        .map_err(|error| ValidationErrors::single("payload", format!("is invalid: {error}")))?;

    value.validate()?;

    Ok(value)
}
