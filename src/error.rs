//! Load-time error types.
//!
//! Only configuration problems are errors in this crate. Problems with an
//! inbound payload are reported as [`ValidationError`] data by the validators
//! and never surface as `Err`.
//!
//! [`ValidationError`]: crate::functional::validation_rules::ValidationError

use thiserror::Error;

/// Fatal problem with the rule schema resource or process configuration.
///
/// Raised only while starting up; a process holding one of these must not
/// serve validation requests.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("rule schema resource '{path}' could not be read: {source}")]
    Missing {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("rule schema resource '{path}' is malformed: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid rule for '{field}': {reason}")]
    InvalidRule { field: String, reason: String },

    #[error("invalid pattern for '{field}': {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },
}

impl ConfigurationError {
    pub fn invalid_rule(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigurationError::InvalidRule {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_setting(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigurationError::InvalidSetting {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigurationError>;
