pub mod response;
pub mod rules;
pub mod user;

/// Inbound registration payload: field name to arbitrary JSON value.
pub type Payload = serde_json::Map<String, serde_json::Value>;
