pub mod dependent_rules;
pub mod response_transformers;
pub mod validation_engine;
pub mod validation_rules;
