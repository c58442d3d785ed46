//! Declarative rule model
//!
//! A [`FieldRule`] is pure data: the constraint kinds present on it are
//! interpreted by the generic evaluator in
//! [`validation_engine`](crate::functional::validation_engine). A
//! [`RuleSchema`] pairs the context-free field rules, kept in declaration
//! order, with the ordered cross-field [`DependentRule`]s.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigResult, ConfigurationError};
use crate::functional::dependent_rules::DependentRule;

/// Value type a field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Boolean,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
        }
    }

    /// Type name with its indefinite article, as used in error messages.
    pub fn described(&self) -> &'static str {
        match self {
            FieldType::String => "a string",
            FieldType::Integer => "an integer",
            FieldType::Boolean => "a boolean",
        }
    }

    /// Whether a JSON value has this type. Floats are never integers and
    /// booleans are never numbers.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Boolean => value.is_boolean(),
        }
    }
}

/// Named character-class patterns a string field can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedPattern {
    Alphanumeric,
    Alpha,
    Numeric,
}

/// Named string formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedFormat {
    Email,
    Uuid,
}

/// Constraints for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldRule {
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<NamedPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<NamedFormat>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
}

impl FieldRule {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            required: false,
            field_type,
            min_length: None,
            max_length: None,
            min: None,
            max: None,
            pattern: None,
            format: None,
            allowed: None,
        }
    }

    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    pub fn integer() -> Self {
        Self::new(FieldType::Integer)
    }

    pub fn boolean() -> Self {
        Self::new(FieldType::Boolean)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    pub fn range(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn pattern(mut self, pattern: NamedPattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn format(mut self, format: NamedFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    fn has_string_constraints(&self) -> bool {
        self.min_length.is_some()
            || self.max_length.is_some()
            || self.pattern.is_some()
            || self.format.is_some()
            || self.allowed.is_some()
    }

    fn has_numeric_constraints(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Checks that the constraints on this rule are coherent with its type.
    pub fn validate_structure(&self, field: &str) -> ConfigResult<()> {
        if self.field_type != FieldType::String && self.has_string_constraints() {
            return Err(ConfigurationError::invalid_rule(
                field,
                format!(
                    "string constraints are not allowed on a field of type {}",
                    self.field_type.name()
                ),
            ));
        }

        if self.field_type != FieldType::Integer && self.has_numeric_constraints() {
            return Err(ConfigurationError::invalid_rule(
                field,
                format!(
                    "min/max are not allowed on a field of type {}",
                    self.field_type.name()
                ),
            ));
        }

        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(ConfigurationError::invalid_rule(
                    field,
                    format!("min_length {} is greater than max_length {}", min, max),
                ));
            }
        }

        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(ConfigurationError::invalid_rule(
                    field,
                    format!("min {} is greater than max {}", min, max),
                ));
            }
        }

        if matches!(&self.allowed, Some(values) if values.is_empty()) {
            return Err(ConfigurationError::invalid_rule(field, "enum must not be empty"));
        }

        Ok(())
    }
}

/// Immutable validation configuration shared by every request.
#[derive(Debug, Clone)]
pub struct RuleSchema {
    independent: IndexMap<String, FieldRule>,
    dependent: Vec<DependentRule>,
}

impl RuleSchema {
    /// Builds a schema, checking every field rule and putting the dependent
    /// rules into evaluation order.
    pub fn new(
        independent: IndexMap<String, FieldRule>,
        mut dependent: Vec<DependentRule>,
    ) -> ConfigResult<Self> {
        if independent.is_empty() {
            return Err(ConfigurationError::invalid_rule(
                "independent",
                "at least one field rule is required",
            ));
        }

        for (field, rule) in &independent {
            rule.validate_structure(field)?;
        }

        dependent.sort_by_key(DependentRule::priority);

        Ok(Self {
            independent,
            dependent,
        })
    }

    /// Field rules in declaration order.
    pub fn independent(&self) -> &IndexMap<String, FieldRule> {
        &self.independent
    }

    /// Dependent rules in evaluation order.
    pub fn dependent(&self) -> &[DependentRule] {
        &self.dependent
    }

    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.independent.get(name)
    }
}
