//! Composable Validation Rules
//!
//! Each constraint kind a [`FieldRule`](crate::models::rules::FieldRule) can
//! carry is a small rule type implementing [`ValidationRule`]. Rules are pure:
//! they inspect one value and either pass or describe the single violation
//! they are responsible for.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::models::rules::{FieldType, NamedFormat, NamedPattern};
use crate::models::Payload;

/// Cached regex patterns for validation
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});
static ALPHANUMERIC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("valid alphanumeric regex"));
static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").expect("valid alpha regex"));
static NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid numeric regex"));

/// Result type for a single rule evaluation
pub type RuleResult<T> = Result<T, ValidationError>;

/// A single reported problem with a payload.
///
/// `code` is a stable machine-readable tag used internally and in tests; it
/// is not part of the serialized response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    #[serde(skip)]
    pub code: String,
    pub message: String,
}

impl ValidationError {
    /// Creates a ValidationError with the provided field name, error code, and message.
    ///
    /// # Examples
    ///
    /// ```
    /// let err = ValidationError::new("email", "INVALID_EMAIL", "email must be a valid email address");
    /// assert_eq!(err.field, "email");
    /// assert_eq!(err.code, "INVALID_EMAIL");
    /// ```
    pub fn new(field: &str, code: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

/// Core validation rule trait for composable validation
pub trait ValidationRule<T: ?Sized> {
    fn validate(&self, value: &T, field_name: &str) -> RuleResult<()>;
}

/// Presence check against a whole payload.
pub struct Required;

impl ValidationRule<Payload> for Required {
    /// Fails with code `REQUIRED` and message `"<field> is required"` when the
    /// payload has no entry named `field_name`.
    fn validate(&self, payload: &Payload, field_name: &str) -> RuleResult<()> {
        if !payload.contains_key(field_name) {
            return Err(ValidationError::new(
                field_name,
                "REQUIRED",
                &format!("{} is required", field_name),
            ));
        }
        Ok(())
    }
}

/// JSON type check
pub struct TypeCheck(pub FieldType);

impl ValidationRule<Value> for TypeCheck {
    fn validate(&self, value: &Value, field_name: &str) -> RuleResult<()> {
        if !self.0.matches(value) {
            return Err(ValidationError::new(
                field_name,
                "INVALID_TYPE",
                &format!("{} must be {}", field_name, self.0.described()),
            ));
        }
        Ok(())
    }
}

/// String length validation, counted in characters
#[derive(Debug, Clone, Copy)]
pub struct Length {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl ValidationRule<str> for Length {
    /// Validates that a string's length falls within the optional bounds.
    ///
    /// A value shorter than `min` fails with `TOO_SHORT`, one longer than
    /// `max` with `TOO_LONG`. A single value can only violate one of them.
    ///
    /// # Examples
    ///
    /// ```
    /// let rule = Length { min: Some(2), max: Some(4) };
    /// assert!(rule.validate("hi", "name").is_ok());
    /// assert!(rule.validate("h", "name").is_err()); // TOO_SHORT
    /// assert!(rule.validate("hello", "name").is_err()); // TOO_LONG
    /// ```
    fn validate(&self, value: &str, field_name: &str) -> RuleResult<()> {
        let len = value.chars().count();

        if let Some(min) = self.min {
            if len < min {
                return Err(ValidationError::new(
                    field_name,
                    "TOO_SHORT",
                    &format!("{} must be at least {} characters", field_name, min),
                ));
            }
        }

        if let Some(max) = self.max {
            if len > max {
                return Err(ValidationError::new(
                    field_name,
                    "TOO_LONG",
                    &format!("{} must be at most {} characters", field_name, max),
                ));
            }
        }

        Ok(())
    }
}

/// Inclusive integer range validation
#[derive(Debug, Clone, Copy)]
pub struct Range {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl Range {
    /// Applies both bounds, reporting each violated bound separately.
    pub fn violations(&self, value: i64, field_name: &str) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if let Some(min) = self.min {
            if value < min {
                errors.push(ValidationError::new(
                    field_name,
                    "TOO_SMALL",
                    &format!("{} must be at least {}", field_name, min),
                ));
            }
        }

        if let Some(max) = self.max {
            if value > max {
                errors.push(ValidationError::new(
                    field_name,
                    "TOO_LARGE",
                    &format!("{} must be at most {}", field_name, max),
                ));
            }
        }

        errors
    }
}

impl ValidationRule<i64> for Range {
    /// # Examples
    ///
    /// ```
    /// let range = Range { min: Some(0), max: Some(10) };
    /// assert!(range.validate(&5, "count").is_ok());
    /// let err = range.validate(&-1, "count").unwrap_err();
    /// assert_eq!(err.code, "TOO_SMALL");
    /// ```
    fn validate(&self, value: &i64, field_name: &str) -> RuleResult<()> {
        match self.violations(*value, field_name).into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Named character-class pattern validation
#[derive(Debug, Clone, Copy)]
pub struct Pattern(pub NamedPattern);

impl ValidationRule<str> for Pattern {
    fn validate(&self, value: &str, field_name: &str) -> RuleResult<()> {
        let (regex, description) = match self.0 {
            NamedPattern::Alphanumeric => (&*ALPHANUMERIC_REGEX, "alphanumeric"),
            NamedPattern::Alpha => (&*ALPHA_REGEX, "alphabetic"),
            NamedPattern::Numeric => (&*NUMERIC_REGEX, "numeric"),
        };

        if !regex.is_match(value) {
            return Err(ValidationError::new(
                field_name,
                "PATTERN_MISMATCH",
                &format!("{} must contain only {} characters", field_name, description),
            ));
        }
        Ok(())
    }
}

/// Email format validation using regex
pub struct Email;

impl ValidationRule<str> for Email {
    /// # Examples
    ///
    /// ```
    /// assert!(Email.validate("user@example.com", "email").is_ok());
    /// assert!(Email.validate("not-an-email", "email").is_err());
    /// ```
    fn validate(&self, value: &str, field_name: &str) -> RuleResult<()> {
        if !EMAIL_REGEX.is_match(value) {
            return Err(ValidationError::new(
                field_name,
                "INVALID_EMAIL",
                &format!("{} must be a valid email address", field_name),
            ));
        }

        Ok(())
    }
}

/// Canonical (hyphenated) UUID string validation
pub struct UuidString;

impl ValidationRule<str> for UuidString {
    fn validate(&self, value: &str, field_name: &str) -> RuleResult<()> {
        let canonical = uuid::Uuid::parse_str(value)
            .map(|parsed| {
                parsed
                    .hyphenated()
                    .to_string()
                    .eq_ignore_ascii_case(value)
            })
            .unwrap_or(false);

        if !canonical {
            return Err(ValidationError::new(
                field_name,
                "INVALID_UUID_FORMAT",
                &format!("{} must be a valid UUID", field_name),
            ));
        }
        Ok(())
    }
}

/// Named format validation, delegating to the concrete format rule
#[derive(Debug, Clone, Copy)]
pub struct Format(pub NamedFormat);

impl ValidationRule<str> for Format {
    fn validate(&self, value: &str, field_name: &str) -> RuleResult<()> {
        match self.0 {
            NamedFormat::Email => Email.validate(value, field_name),
            NamedFormat::Uuid => UuidString.validate(value, field_name),
        }
    }
}

/// One-of validation for enumerated string values
#[derive(Debug, Clone, Copy)]
pub struct OneOf<'a> {
    allowed_values: &'a [String],
}

impl<'a> OneOf<'a> {
    pub fn new(allowed_values: &'a [String]) -> Self {
        Self { allowed_values }
    }
}

impl ValidationRule<str> for OneOf<'_> {
    /// Fails with `INVALID_VALUE` when `value` is not one of the allowed
    /// values; the message lists the allowed set.
    fn validate(&self, value: &str, field_name: &str) -> RuleResult<()> {
        if !self.allowed_values.iter().any(|allowed| allowed == value) {
            return Err(ValidationError::new(
                field_name,
                "INVALID_VALUE",
                &format!(
                    "{} must be one of: {}",
                    field_name,
                    self.allowed_values.iter().join(", ")
                ),
            ));
        }
        Ok(())
    }
}

/// The string constraint kinds, in the order they are applied
#[derive(Debug, Clone, Copy)]
pub enum StringRule<'a> {
    Length(Length),
    Pattern(Pattern),
    Format(Format),
    OneOf(OneOf<'a>),
}

impl ValidationRule<str> for StringRule<'_> {
    fn validate(&self, value: &str, field_name: &str) -> RuleResult<()> {
        match self {
            StringRule::Length(rule) => rule.validate(value, field_name),
            StringRule::Pattern(rule) => rule.validate(value, field_name),
            StringRule::Format(rule) => rule.validate(value, field_name),
            StringRule::OneOf(rule) => rule.validate(value, field_name),
        }
    }
}

/// Custom validation using a predicate function
pub struct Custom<F> {
    predicate: F,
    error_code: String,
    error_message: String,
}

impl<F> Custom<F> {
    /// Creates a predicate-based custom validation rule.
    ///
    /// The `predicate` returns `true` when the value is valid. Any `{}` in
    /// `error_message` is replaced by the field name.
    ///
    /// # Examples
    ///
    /// ```
    /// let rule = Custom::new(|v: &i64| *v > 0, "TOO_SMALL", "{} must be greater than 0");
    /// assert!(rule.validate(&5, "age").is_ok());
    /// assert!(rule.validate(&0, "age").is_err());
    /// ```
    pub fn new(predicate: F, error_code: &str, error_message: &str) -> Self {
        Self {
            predicate,
            error_code: error_code.to_string(),
            error_message: error_message.to_string(),
        }
    }
}

impl<F, T: ?Sized> ValidationRule<T> for Custom<F>
where
    F: Fn(&T) -> bool,
{
    fn validate(&self, value: &T, field_name: &str) -> RuleResult<()> {
        if !(self.predicate)(value) {
            return Err(ValidationError::new(
                field_name,
                &self.error_code,
                &self.error_message.replace("{}", field_name),
            ));
        }
        Ok(())
    }
}
