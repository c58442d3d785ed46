pub mod logger;

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use once_cell::sync::Lazy;
use serde_json::Value;
use uuid::Uuid;

use crate::constants;
use crate::models::Payload;

/// Namespace for deterministic user identifiers.
static USER_ID_NAMESPACE: Lazy<Uuid> =
    Lazy::new(|| Uuid::new_v5(&Uuid::NAMESPACE_URL, b"urn:registration-validator:user-id"));

/// How the hex part of a user identifier is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    /// UUIDv5 over the key-sorted JSON of the payload; equal payloads get
    /// equal identifiers on every platform.
    #[default]
    Deterministic,
    /// UUIDv4.
    Random,
}

impl IdStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdStrategy::Deterministic => "deterministic",
            IdStrategy::Random => "random",
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deterministic" => Ok(IdStrategy::Deterministic),
            "random" => Ok(IdStrategy::Random),
            other => Err(format!(
                "expected 'deterministic' or 'random', got '{}'",
                other
            )),
        }
    }
}

/// Serializes `value` with object keys sorted at every level.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().sorted_by(|a, b| a.0.cmp(b.0)).enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Builds a user identifier: `prefix` followed by eight upper-case hex digits.
///
/// # Examples
///
/// ```
/// let payload = serde_json::json!({ "username": "tester" }).as_object().cloned().unwrap();
/// let id = generate_user_id("USR", &payload, IdStrategy::Deterministic);
/// assert!(id.starts_with("USR"));
/// assert_eq!(id.len(), 11);
/// ```
pub fn generate_user_id(prefix: &str, payload: &Payload, strategy: IdStrategy) -> String {
    let id = match strategy {
        IdStrategy::Deterministic => {
            let canonical = canonical_json(&Value::Object(payload.clone()));
            Uuid::new_v5(&USER_ID_NAMESPACE, canonical.as_bytes())
        }
        IdStrategy::Random => Uuid::new_v4(),
    };

    let hex = id.simple().to_string();
    format!(
        "{}{}",
        prefix,
        hex[..constants::USER_ID_HEX_LEN].to_uppercase()
    )
}
