pub mod registration_service;

pub use registration_service::{
    BasicValidationResult, BasicValidator, RegistrationValidator, RequestValidator,
    ValidationResult,
};
