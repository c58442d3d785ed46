//! Registration Service - validation orchestration and response building
//!
//! Two engines share one [`RuleSchema`] shape:
//!
//! - [`BasicValidator`] runs only the independent tier and answers with a
//!   flat error list and a minimal `USR` identifier.
//! - [`RegistrationValidator`] runs the independent tier, then the dependent
//!   tier, keeps their errors apart, and shapes success data by user type.
//!
//! Both hold the schema read-only, so one instance can serve any number of
//! threads; [`RequestValidator::validate_batch`] relies on that.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::Value;

use crate::constants;
use crate::functional::dependent_rules::{self, DependentRule};
use crate::functional::response_transformers::ResponseTransformer;
use crate::functional::validation_engine::ValidationEngine;
use crate::functional::validation_rules::ValidationError;
use crate::models::response::{ErrorBreakdown, RegistrationData, RegistrationResponse};
use crate::models::rules::RuleSchema;
use crate::models::user::UserType;
use crate::models::Payload;
use crate::utils::{generate_user_id, IdStrategy};

/// Common surface of the basic and enhanced engines.
pub trait RequestValidator: Sync {
    type Outcome: Send;

    /// Errors from the context-free tier only, in declaration order.
    fn validate_independent_requirements(&self, payload: &Payload) -> Vec<ValidationError>;

    fn validate_request(&self, payload: &Payload) -> Self::Outcome;

    fn generate_response(&self, outcome: &Self::Outcome, payload: &Payload) -> RegistrationResponse;

    /// Validates and builds the response in one step.
    fn process(&self, payload: &Payload) -> RegistrationResponse {
        let outcome = self.validate_request(payload);
        self.generate_response(&outcome, payload)
    }

    /// Validates many payloads, keeping input order.
    fn validate_batch(&self, payloads: &[Payload]) -> Vec<Self::Outcome> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            payloads
                .par_iter()
                .map(|payload| self.validate_request(payload))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            payloads
                .iter()
                .map(|payload| self.validate_request(payload))
                .collect()
        }
    }
}

/// Outcome of the basic engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Independent-tier-only engine. A dependent section in the schema is ignored.
#[derive(Debug, Clone)]
pub struct BasicValidator {
    schema: RuleSchema,
    id_strategy: IdStrategy,
}

impl BasicValidator {
    pub fn new(schema: RuleSchema) -> Self {
        Self {
            schema,
            id_strategy: IdStrategy::default(),
        }
    }

    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    pub fn schema(&self) -> &RuleSchema {
        &self.schema
    }
}

impl RequestValidator for BasicValidator {
    type Outcome = BasicValidationResult;

    fn validate_independent_requirements(&self, payload: &Payload) -> Vec<ValidationError> {
        ValidationEngine::new(self.schema.independent()).validate_fields(payload)
    }

    fn validate_request(&self, payload: &Payload) -> BasicValidationResult {
        let errors = self.validate_independent_requirements(payload);
        log::debug!("basic validation: valid={}, errors={}", errors.is_empty(), errors.len());

        BasicValidationResult {
            valid: errors.is_empty(),
            errors,
        }
    }

    fn generate_response(
        &self,
        outcome: &BasicValidationResult,
        payload: &Payload,
    ) -> RegistrationResponse {
        if !outcome.valid {
            return ResponseTransformer::failure(outcome.errors.clone()).build();
        }

        ResponseTransformer::new(generate_user_id(
            constants::PREFIX_DEFAULT,
            payload,
            self.id_strategy,
        ))
        .map_data(|user_id| RegistrationData::Basic { user_id })
        .build()
    }
}

/// Outcome of the enhanced engine, errors kept per tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub independent_errors: Vec<ValidationError>,
    pub dependent_errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new(independent_errors: Vec<ValidationError>, dependent_errors: Vec<ValidationError>) -> Self {
        Self {
            valid: independent_errors.is_empty() && dependent_errors.is_empty(),
            independent_errors,
            dependent_errors,
        }
    }

    /// Independent errors followed by dependent errors.
    pub fn all_errors(&self) -> Vec<ValidationError> {
        self.independent_errors
            .iter()
            .chain(&self.dependent_errors)
            .cloned()
            .collect()
    }

    pub fn error_breakdown(&self) -> ErrorBreakdown {
        ErrorBreakdown {
            independent_errors: self.independent_errors.len(),
            dependent_errors: self.dependent_errors.len(),
        }
    }
}

/// Two-tier engine with user-type-aware responses.
#[derive(Debug, Clone)]
pub struct RegistrationValidator {
    schema: RuleSchema,
    id_strategy: IdStrategy,
    student_access_days: u32,
    type_field: String,
}

impl RegistrationValidator {
    pub fn new(schema: RuleSchema) -> Self {
        // The user type is read from wherever the type requirements rule reads it
        let type_field = schema
            .dependent()
            .iter()
            .find_map(|rule| match rule {
                DependentRule::TypeRequiredFields(rule) => Some(rule.type_field.clone()),
                _ => None,
            })
            .unwrap_or_else(|| constants::FIELD_USER_TYPE.to_string());

        Self {
            schema,
            id_strategy: IdStrategy::default(),
            student_access_days: constants::DEFAULT_STUDENT_ACCESS_DAYS,
            type_field,
        }
    }

    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    pub fn with_student_access_days(mut self, days: u32) -> Self {
        self.student_access_days = days;
        self
    }

    pub fn schema(&self) -> &RuleSchema {
        &self.schema
    }

    /// Errors from the cross-field tier only, in rule priority order.
    pub fn validate_dependent_requirements(&self, payload: &Payload) -> Vec<ValidationError> {
        dependent_rules::evaluate_all(self.schema.dependent(), payload)
    }

    /// Builds the response with `now` as the reference time for expiries.
    pub fn generate_response_at(
        &self,
        result: &ValidationResult,
        payload: &Payload,
        now: DateTime<Utc>,
    ) -> RegistrationResponse {
        if !result.valid {
            return ResponseTransformer::failure(result.all_errors())
                .with_error_breakdown(result.error_breakdown())
                .build();
        }

        let user_type = UserType::from_payload(payload, &self.type_field);
        let user_id = generate_user_id(user_type.id_prefix(), payload, self.id_strategy);
        let echo = |field: &str| payload.get(field).cloned().unwrap_or(Value::Null);

        ResponseTransformer::new(user_id)
            .map_data(|user_id| match user_type {
                UserType::Student => RegistrationData::Student {
                    user_id,
                    user_type,
                    access_level: constants::ACCESS_LEVEL_BASIC,
                    expires_at: self.student_expiry(now),
                    student_portal_access: true,
                },
                UserType::Employee => RegistrationData::Employee {
                    user_id,
                    user_type,
                    access_level: constants::ACCESS_LEVEL_STANDARD,
                    department_access: true,
                    department: echo(constants::FIELD_DEPARTMENT),
                },
                UserType::Admin => RegistrationData::Admin {
                    user_id,
                    user_type,
                    access_level: constants::ACCESS_LEVEL_FULL,
                    admin_privileges: true,
                    security_clearance: echo(constants::FIELD_SECURITY_CLEARANCE),
                },
                UserType::Guest => RegistrationData::Basic { user_id },
            })
            .build()
    }

    fn student_expiry(&self, now: DateTime<Utc>) -> String {
        now.checked_add_signed(Duration::days(i64::from(self.student_access_days)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl RequestValidator for RegistrationValidator {
    type Outcome = ValidationResult;

    fn validate_independent_requirements(&self, payload: &Payload) -> Vec<ValidationError> {
        ValidationEngine::new(self.schema.independent()).validate_fields(payload)
    }

    fn validate_request(&self, payload: &Payload) -> ValidationResult {
        let result = ValidationResult::new(
            self.validate_independent_requirements(payload),
            self.validate_dependent_requirements(payload),
        );

        log::debug!(
            "enhanced validation: valid={}, independent_errors={}, dependent_errors={}",
            result.valid,
            result.independent_errors.len(),
            result.dependent_errors.len()
        );

        result
    }

    fn generate_response(&self, outcome: &ValidationResult, payload: &Payload) -> RegistrationResponse {
        self.generate_response_at(outcome, payload, Utc::now())
    }
}
