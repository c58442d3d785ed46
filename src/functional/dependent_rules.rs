//! Cross-field conditional rules
//!
//! Each [`DependentRule`] is a pure predicate over the whole payload: when its
//! condition holds it requires further fields or stronger values. Rules are
//! evaluated in a fixed order (age consent, then user-type requirements, then
//! corporate domain security) and every rule runs regardless of what earlier
//! rules reported.
//!
//! Conditions only fire on well-typed trigger values. An absent or mistyped
//! `age`, `userType` or `email` is the independent tier's problem and does not
//! produce dependent errors.

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::error::{ConfigResult, ConfigurationError};
use crate::functional::validation_rules::{Custom, ValidationError, ValidationRule};
use crate::models::user::validators::{PasswordPolicy, MAX_PASSWORD_STRENGTH};
use crate::models::Payload;

/// Absent or explicit `null`.
fn is_missing(payload: &Payload, field: &str) -> bool {
    payload.get(field).map_or(true, Value::is_null)
}

fn must_be_true(
    field: &str,
    code: &str,
    message: &str,
    value: Option<&Value>,
) -> Option<ValidationError> {
    let rule = Custom::new(|v: &Value| v.as_bool() == Some(true), code, message);
    rule.validate(value.unwrap_or(&Value::Null), field).err()
}

/// Minors must have parental consent and a minor-class device id.
#[derive(Debug, Clone)]
pub struct AgeConsentRule {
    pub age_field: String,
    pub adult_age: i64,
    pub consent_field: String,
    pub device_field: String,
    pub minor_device_pattern: Regex,
}

impl AgeConsentRule {
    pub fn new(
        age_field: impl Into<String>,
        adult_age: i64,
        consent_field: impl Into<String>,
        device_field: impl Into<String>,
        minor_device_pattern: &str,
    ) -> ConfigResult<Self> {
        let device_field = device_field.into();

        if adult_age <= 0 {
            return Err(ConfigurationError::invalid_rule(
                "age_consent",
                format!("adult_age must be positive, got {}", adult_age),
            ));
        }

        let minor_device_pattern =
            Regex::new(minor_device_pattern).map_err(|source| ConfigurationError::InvalidPattern {
                field: device_field.clone(),
                source,
            })?;

        Ok(Self {
            age_field: age_field.into(),
            adult_age,
            consent_field: consent_field.into(),
            device_field,
            minor_device_pattern,
        })
    }

    fn evaluate(&self, payload: &Payload) -> Vec<ValidationError> {
        let minor = payload
            .get(&self.age_field)
            .and_then(Value::as_i64)
            .map_or(false, |age| age < self.adult_age);
        if !minor {
            return Vec::new();
        }
        log::trace!("age consent rule triggered");

        let mut errors = Vec::new();

        if is_missing(payload, &self.consent_field) {
            errors.push(ValidationError::new(
                &self.consent_field,
                "CONSENT_REQUIRED",
                &format!(
                    "{} is required for users under {}",
                    self.consent_field, self.adult_age
                ),
            ));
        } else if let Some(error) = must_be_true(
            &self.consent_field,
            "CONSENT_NOT_GRANTED",
            &format!("{{}} must be true for users under {}", self.adult_age),
            payload.get(&self.consent_field),
        ) {
            errors.push(error);
        }

        if let Some(device) = payload.get(&self.device_field).and_then(Value::as_str) {
            if !self.minor_device_pattern.is_match(device) {
                errors.push(ValidationError::new(
                    &self.device_field,
                    "MINOR_DEVICE_MISMATCH",
                    &format!("{} must match the minor device pattern", self.device_field),
                ));
            }
        }

        errors
    }
}

/// Extra required fields keyed by user type.
#[derive(Debug, Clone)]
pub struct TypeRequirementsRule {
    pub type_field: String,
    pub required_fields: IndexMap<String, Vec<String>>,
}

impl TypeRequirementsRule {
    pub fn new(type_field: impl Into<String>, required_fields: IndexMap<String, Vec<String>>) -> Self {
        Self {
            type_field: type_field.into(),
            required_fields,
        }
    }

    fn evaluate(&self, payload: &Payload) -> Vec<ValidationError> {
        let user_type = match payload.get(&self.type_field).and_then(Value::as_str) {
            Some(user_type) => user_type,
            None => return Vec::new(),
        };

        self.required_fields
            .get(user_type)
            .map(|fields| {
                fields
                    .iter()
                    .filter(|field| is_missing(payload, field))
                    .map(|field| {
                        ValidationError::new(
                            field,
                            "DEPENDENT_REQUIRED",
                            &format!("{} is required for {} users", field, user_type),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Corporate email addresses require a strong password and two-factor auth.
#[derive(Debug, Clone)]
pub struct DomainSecurityRule {
    pub email_field: String,
    corporate_domains: Vec<String>,
    pub password_field: String,
    pub password_policy: PasswordPolicy,
    pub two_factor_field: String,
}

impl DomainSecurityRule {
    pub fn new(
        email_field: impl Into<String>,
        corporate_domains: Vec<String>,
        password_field: impl Into<String>,
        password_policy: PasswordPolicy,
        two_factor_field: impl Into<String>,
    ) -> ConfigResult<Self> {
        let corporate_domains: Vec<String> = corporate_domains
            .into_iter()
            .map(|domain| domain.trim().trim_start_matches('@').to_lowercase())
            .filter(|domain| !domain.is_empty())
            .collect();

        if corporate_domains.is_empty() {
            return Err(ConfigurationError::invalid_rule(
                "corporate_security",
                "corporate_domains must list at least one domain",
            ));
        }

        if !(1..=MAX_PASSWORD_STRENGTH).contains(&password_policy.min_strength) {
            return Err(ConfigurationError::invalid_rule(
                "corporate_security",
                format!(
                    "min_password_strength must be between 1 and {}, got {}",
                    MAX_PASSWORD_STRENGTH, password_policy.min_strength
                ),
            ));
        }

        Ok(Self {
            email_field: email_field.into(),
            corporate_domains,
            password_field: password_field.into(),
            password_policy,
            two_factor_field: two_factor_field.into(),
        })
    }

    pub fn corporate_domains(&self) -> &[String] {
        &self.corporate_domains
    }

    /// Whether `email` belongs to a corporate domain or one of its subdomains.
    pub fn is_corporate(&self, email: &str) -> bool {
        let email = email.to_lowercase();
        self.corporate_domains.iter().any(|domain| {
            email.ends_with(&format!("@{}", domain)) || email.ends_with(&format!(".{}", domain))
        })
    }

    fn evaluate(&self, payload: &Payload) -> Vec<ValidationError> {
        let corporate = payload
            .get(&self.email_field)
            .and_then(Value::as_str)
            .map_or(false, |email| self.is_corporate(email));
        if !corporate {
            return Vec::new();
        }

        let mut errors = Vec::new();

        match payload.get(&self.password_field) {
            None | Some(Value::Null) => errors.push(ValidationError::new(
                &self.password_field,
                "DEPENDENT_REQUIRED",
                &format!("{} is required for corporate email accounts", self.password_field),
            )),
            Some(Value::String(password)) if !self.password_policy.is_weak(password) => {}
            Some(_) => errors.push(ValidationError::new(
                &self.password_field,
                "WEAK_PASSWORD",
                &format!(
                    "{} does not meet corporate security requirements",
                    self.password_field
                ),
            )),
        }

        if let Some(error) = must_be_true(
            &self.two_factor_field,
            "TWO_FACTOR_REQUIRED",
            "{} must be enabled for corporate email accounts",
            payload.get(&self.two_factor_field),
        ) {
            errors.push(error);
        }

        errors
    }
}

/// A conditional requirement over the whole payload.
#[derive(Debug, Clone)]
pub enum DependentRule {
    AgeConsent(AgeConsentRule),
    TypeRequiredFields(TypeRequirementsRule),
    DomainSecurity(DomainSecurityRule),
}

impl DependentRule {
    /// Evaluation rank; lower runs first.
    pub fn priority(&self) -> u8 {
        match self {
            DependentRule::AgeConsent(_) => 0,
            DependentRule::TypeRequiredFields(_) => 1,
            DependentRule::DomainSecurity(_) => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DependentRule::AgeConsent(_) => "age_consent",
            DependentRule::TypeRequiredFields(_) => "user_type_requirements",
            DependentRule::DomainSecurity(_) => "corporate_security",
        }
    }

    /// Every payload field this rule reads or requires.
    pub fn referenced_fields(&self) -> Vec<&str> {
        match self {
            DependentRule::AgeConsent(rule) => vec![
                rule.age_field.as_str(),
                rule.consent_field.as_str(),
                rule.device_field.as_str(),
            ],
            DependentRule::TypeRequiredFields(rule) => std::iter::once(rule.type_field.as_str())
                .chain(rule.required_fields.values().flatten().map(String::as_str))
                .collect(),
            DependentRule::DomainSecurity(rule) => vec![
                rule.email_field.as_str(),
                rule.password_field.as_str(),
                rule.two_factor_field.as_str(),
            ],
        }
    }

    pub fn evaluate(&self, payload: &Payload) -> Vec<ValidationError> {
        match self {
            DependentRule::AgeConsent(rule) => rule.evaluate(payload),
            DependentRule::TypeRequiredFields(rule) => rule.evaluate(payload),
            DependentRule::DomainSecurity(rule) => rule.evaluate(payload),
        }
    }
}

/// Runs every rule in slice order and concatenates the errors.
pub fn evaluate_all(rules: &[DependentRule], payload: &Payload) -> Vec<ValidationError> {
    rules.iter().flat_map(|rule| rule.evaluate(payload)).collect()
}
