pub mod validators;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::constants;
use crate::models::Payload;

/// Account category resolved from a payload's user-type field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserType {
    Student,
    Employee,
    Admin,
    Guest,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Student => "STUDENT",
            UserType::Employee => "EMPLOYEE",
            UserType::Admin => "ADMIN",
            UserType::Guest => "GUEST",
        }
    }

    pub fn id_prefix(&self) -> &'static str {
        match self {
            UserType::Student => constants::PREFIX_STUDENT,
            UserType::Employee => constants::PREFIX_EMPLOYEE,
            UserType::Admin => constants::PREFIX_ADMIN,
            UserType::Guest => constants::PREFIX_DEFAULT,
        }
    }

    /// Resolves the user type from `field`; absent, non-string or unknown
    /// values resolve to `Guest`.
    pub fn from_payload(payload: &Payload, field: &str) -> Self {
        payload
            .get(field)
            .and_then(|value| value.as_str())
            .and_then(|value| value.parse().ok())
            .unwrap_or(UserType::Guest)
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STUDENT" => Ok(UserType::Student),
            "EMPLOYEE" => Ok(UserType::Employee),
            "ADMIN" => Ok(UserType::Admin),
            "GUEST" => Ok(UserType::Guest),
            other => Err(format!("unknown user type '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_from_payload_resolves_known_types() {
        let p = payload(json!({ "userType": "EMPLOYEE" }));
        assert_eq!(UserType::from_payload(&p, "userType"), UserType::Employee);
    }

    #[test]
    fn test_from_payload_defaults_to_guest() {
        assert_eq!(UserType::from_payload(&Payload::new(), "userType"), UserType::Guest);
        let p = payload(json!({ "userType": "student" }));
        assert_eq!(UserType::from_payload(&p, "userType"), UserType::Guest);
        let p = payload(json!({ "userType": 3 }));
        assert_eq!(UserType::from_payload(&p, "userType"), UserType::Guest);
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(UserType::Student.id_prefix(), "STU");
        assert_eq!(UserType::Employee.id_prefix(), "EMP");
        assert_eq!(UserType::Admin.id_prefix(), "ADM");
        assert_eq!(UserType::Guest.id_prefix(), "USR");
    }

    #[test]
    fn test_serializes_upper_case() {
        assert_eq!(serde_json::to_value(UserType::Admin).unwrap(), json!("ADMIN"));
    }
}
