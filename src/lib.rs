//! Registration payload validation.
//!
//! A [`RuleSchema`] loaded once from JSON drives two engines: the basic
//! [`BasicValidator`] (context-free field rules only) and the enhanced
//! [`RegistrationValidator`] (field rules plus cross-field conditions).
//! Both turn a payload into a validation outcome and then into a
//! [`RegistrationResponse`].

pub mod config;
pub mod constants;
pub mod error;
pub mod functional;
pub mod models;
pub mod services;
pub mod utils;

pub use config::{load_rule_schema, parse_rule_schema, AppConfig};
pub use error::{ConfigResult, ConfigurationError};
pub use functional::validation_rules::ValidationError;
pub use models::response::{ApiResponse, ErrorBreakdown, RegistrationData, RegistrationResponse};
pub use models::rules::{FieldRule, RuleSchema};
pub use models::Payload;
pub use services::{
    BasicValidationResult, BasicValidator, RegistrationValidator, RequestValidator,
    ValidationResult,
};
pub use utils::IdStrategy;
