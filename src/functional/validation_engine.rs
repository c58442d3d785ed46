//! Declarative Validation Engine
//!
//! Interprets the independent tier of a [`RuleSchema`](crate::models::rules::RuleSchema).
//! Every field is checked by the same evaluator, which applies whichever
//! constraint kinds are present on that field's [`FieldRule`]:
//!
//! 1. presence (`required`), which ends the field's checks when it fails;
//! 2. type, which also ends the field's checks when it fails;
//! 3. for strings: length, pattern, format, enum, all of them, in that order;
//! 4. for integers: `min` and `max`, each reported separately.
//!
//! Nothing short-circuits across fields or across constraint categories, so a
//! single payload yields its complete list of problems.

use indexmap::IndexMap;
use serde_json::Value;

use crate::functional::validation_rules::{
    Format, Length, OneOf, Pattern, Range, Required, StringRule, TypeCheck, ValidationError,
    ValidationRule,
};
use crate::models::rules::{FieldRule, FieldType};
use crate::models::Payload;

impl FieldRule {
    /// String constraint rules present on this field, in evaluation order.
    pub fn string_rules(&self) -> Vec<StringRule<'_>> {
        let mut rules = Vec::with_capacity(4);

        if self.min_length.is_some() || self.max_length.is_some() {
            rules.push(StringRule::Length(Length {
                min: self.min_length,
                max: self.max_length,
            }));
        }
        if let Some(pattern) = self.pattern {
            rules.push(StringRule::Pattern(Pattern(pattern)));
        }
        if let Some(format) = self.format {
            rules.push(StringRule::Format(Format(format)));
        }
        if let Some(allowed) = &self.allowed {
            rules.push(StringRule::OneOf(OneOf::new(allowed)));
        }

        rules
    }

    /// Integer range rule, if the field declares any bound.
    pub fn range_rule(&self) -> Option<Range> {
        if self.min.is_none() && self.max.is_none() {
            return None;
        }
        Some(Range {
            min: self.min,
            max: self.max,
        })
    }
}

/// Context-free validator over an ordered set of field rules.
#[derive(Debug, Clone, Copy)]
pub struct ValidationEngine<'s> {
    rules: &'s IndexMap<String, FieldRule>,
}

impl<'s> ValidationEngine<'s> {
    pub fn new(rules: &'s IndexMap<String, FieldRule>) -> Self {
        Self { rules }
    }

    /// Validates one field of `payload` against `rule`, returning every
    /// violation found.
    ///
    /// # Examples
    ///
    /// ```
    /// let rule = FieldRule::string().required().length(Some(5), Some(15));
    /// let payload = serde_json::json!({ "username": "usr" }).as_object().cloned().unwrap();
    /// let errors = ValidationEngine::validate_field(&payload, "username", &rule);
    /// assert_eq!(errors[0].message, "username must be at least 5 characters");
    /// ```
    pub fn validate_field(
        payload: &Payload,
        field_name: &str,
        rule: &FieldRule,
    ) -> Vec<ValidationError> {
        let value = match payload.get(field_name) {
            Some(value) => value,
            None if rule.required => {
                return Required.validate(payload, field_name).err().into_iter().collect();
            }
            None => return Vec::new(),
        };

        if let Err(error) = TypeCheck(rule.field_type).validate(value, field_name) {
            return vec![error];
        }

        Self::check_constraints(value, field_name, rule)
    }

    fn check_constraints(value: &Value, field_name: &str, rule: &FieldRule) -> Vec<ValidationError> {
        match rule.field_type {
            FieldType::String => {
                let text = value.as_str().unwrap_or_default();
                rule.string_rules()
                    .iter()
                    .filter_map(|string_rule| string_rule.validate(text, field_name).err())
                    .collect()
            }
            FieldType::Integer => {
                // u64 values beyond i64 saturate; they still exceed any configured max
                let number = value.as_i64().unwrap_or(i64::MAX);
                rule.range_rule()
                    .map(|range| range.violations(number, field_name))
                    .unwrap_or_default()
            }
            FieldType::Boolean => Vec::new(),
        }
    }

    /// Validates every declared field in declaration order and concatenates
    /// their errors.
    pub fn validate_fields(&self, payload: &Payload) -> Vec<ValidationError> {
        self.rules
            .iter()
            .flat_map(|(field_name, rule)| Self::validate_field(payload, field_name, rule))
            .collect()
    }
}
