use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

/// Log output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text format with timestamp, level, target, and message
    Text,
    /// JSON lines with structured fields
    Json,
}

impl LogFormat {
    /// Parses a format name, case-insensitively. Unknown names yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "text" => Some(LogFormat::Text),
            _ => None,
        }
    }
}

/// Initializes the global tracing subscriber with an env filter and a console layer.
///
/// The filter comes from `RUST_LOG` and falls back to `info`. Records emitted
/// through the `log` macros are bridged into tracing so library code can keep
/// using `log::debug!` and friends.
///
/// Safe to call more than once: if a global subscriber is already installed the
/// call is a no-op and returns `false`.
pub fn init_logging(format: LogFormat) -> bool {
    use tracing_log::LogTracer;
    use tracing_subscriber::fmt;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match format {
        LogFormat::Text => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().with_target(true).with_writer(std::io::stderr)),
        ),
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    match result {
        Ok(()) => {
            // An already-installed `log` logger is fine; tracing still works
            let _ = LogTracer::init();
            true
        }
        Err(e) => {
            eprintln!(
                "Tracing subscriber already initialized or failed to initialize: {:?}",
                e
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_format() {
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse(" TEXT "), Some(LogFormat::Text));
        assert_eq!(LogFormat::parse("xml"), None);
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        // The first call may or may not win depending on test ordering;
        // the second call must never panic and must report no-op.
        let _ = init_logging(LogFormat::Text);
        assert!(!init_logging(LogFormat::Json));
    }
}
