use std::path::PathBuf;

use crate::constants;
use crate::error::{ConfigResult, ConfigurationError};
use crate::utils::logger::LogFormat;
use crate::utils::IdStrategy;

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub rules_path: PathBuf,
    pub log_format: LogFormat,
    pub id_strategy: IdStrategy,
    pub student_access_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rules_path: PathBuf::from(constants::DEFAULT_RULES_PATH),
            log_format: LogFormat::Text,
            id_strategy: IdStrategy::Deterministic,
            student_access_days: constants::DEFAULT_STUDENT_ACCESS_DAYS,
        }
    }
}

impl AppConfig {
    /// Loads `.env` when present, then reads settings from the process
    /// environment. Unset keys keep their defaults; set but unparseable keys
    /// are an error.
    pub fn from_env() -> ConfigResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(constants::ENV_RULES_PATH).filter(|p| !p.trim().is_empty()) {
            config.rules_path = PathBuf::from(path);
        }

        if let Some(value) = lookup(constants::ENV_LOG_FORMAT) {
            config.log_format = LogFormat::parse(&value).ok_or_else(|| {
                ConfigurationError::invalid_setting(
                    constants::ENV_LOG_FORMAT,
                    format!("expected 'text' or 'json', got '{}'", value),
                )
            })?;
        }

        if let Some(value) = lookup(constants::ENV_USER_ID_STRATEGY) {
            config.id_strategy = value.parse().map_err(|reason: String| {
                ConfigurationError::invalid_setting(constants::ENV_USER_ID_STRATEGY, reason)
            })?;
        }

        if let Some(value) = lookup(constants::ENV_STUDENT_ACCESS_DAYS) {
            config.student_access_days = match value.trim().parse::<u32>() {
                Ok(days) if days > 0 => days,
                _ => {
                    return Err(ConfigurationError::invalid_setting(
                        constants::ENV_STUDENT_ACCESS_DAYS,
                        format!("expected a positive number of days, got '{}'", value),
                    ))
                }
            };
        }

        log::debug!(
            "configuration: rules_path={}, id_strategy={}, student_access_days={}",
            config.rules_path.display(),
            config.id_strategy,
            config.student_access_days
        );

        Ok(config)
    }
}
