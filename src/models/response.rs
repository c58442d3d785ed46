use serde::Serialize;
use serde_json::Value;

use crate::functional::validation_rules::ValidationError;
use crate::models::user::UserType;

/// Response envelope returned to callers. Field names are part of the
/// external contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub status: String,
    pub message: String,
    pub data: Option<T>,
    pub errors: Vec<ValidationError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_breakdown: Option<ErrorBreakdown>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.data.is_some() && self.errors.is_empty()
    }
}

/// Error counts per validation tier, attached to enhanced failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorBreakdown {
    pub independent_errors: usize,
    pub dependent_errors: usize,
}

/// Success data, shaped by the resolved user type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RegistrationData {
    Student {
        #[serde(rename = "userId")]
        user_id: String,
        #[serde(rename = "userType")]
        user_type: UserType,
        access_level: &'static str,
        expires_at: String,
        student_portal_access: bool,
    },
    Employee {
        #[serde(rename = "userId")]
        user_id: String,
        #[serde(rename = "userType")]
        user_type: UserType,
        access_level: &'static str,
        department_access: bool,
        department: Value,
    },
    Admin {
        #[serde(rename = "userId")]
        user_id: String,
        #[serde(rename = "userType")]
        user_type: UserType,
        access_level: &'static str,
        admin_privileges: bool,
        security_clearance: Value,
    },
    Basic {
        #[serde(rename = "userId")]
        user_id: String,
    },
}

impl RegistrationData {
    pub fn user_id(&self) -> &str {
        match self {
            RegistrationData::Student { user_id, .. }
            | RegistrationData::Employee { user_id, .. }
            | RegistrationData::Admin { user_id, .. }
            | RegistrationData::Basic { user_id } => user_id,
        }
    }
}

pub type RegistrationResponse = ApiResponse<RegistrationData>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_shape_serializes_null_data() {
        let response: RegistrationResponse = ApiResponse {
            status_code: 400,
            status: "Failed".to_string(),
            message: "Validation failed".to_string(),
            data: None,
            errors: vec![ValidationError::new("username", "REQUIRED", "username is required")],
            error_breakdown: None,
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "statusCode": 400,
                "status": "Failed",
                "message": "Validation failed",
                "data": null,
                "errors": [{ "field": "username", "message": "username is required" }]
            })
        );
    }

    #[test]
    fn test_employee_data_shape() {
        let data = RegistrationData::Employee {
            user_id: "EMP0A1B2C3D".to_string(),
            user_type: UserType::Employee,
            access_level: "STANDARD",
            department_access: true,
            department: json!("IT"),
        };

        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["userId"], "EMP0A1B2C3D");
        assert_eq!(value["userType"], "EMPLOYEE");
        assert_eq!(value["access_level"], "STANDARD");
        assert_eq!(value["department_access"], true);
        assert_eq!(value["department"], "IT");
        assert_eq!(data.user_id(), "EMP0A1B2C3D");
    }

    #[test]
    fn test_basic_data_is_minimal() {
        let data = RegistrationData::Basic {
            user_id: "USR00000000".to_string(),
        };
        assert_eq!(serde_json::to_value(&data).unwrap(), json!({ "userId": "USR00000000" }));
    }
}
