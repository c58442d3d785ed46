/// Basic engine behaviour against the shipped `config/requirements.json`.

#[cfg(test)]
mod tests {
    use registration_validator::{load_rule_schema, BasicValidator, Payload, RequestValidator};
    use serde_json::{json, Value};

    fn validator() -> BasicValidator {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/requirements.json");
        BasicValidator::new(load_rule_schema(path).expect("shipped basic schema loads"))
    }

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    fn valid_payload() -> Payload {
        payload(json!({
            "username": "testuser123",
            "password": "password123",
            "email": "test@example.com",
            "age": 25,
            "deviceID": "ABC1234567",
            "uuid": "123e4567-e89b-12d3-a456-426614174000"
        }))
    }

    #[test]
    fn test_valid_request_registers_user() {
        let validator = validator();
        let p = valid_payload();

        let result = validator.validate_request(&p);
        assert!(result.valid);
        assert!(result.errors.is_empty());

        let response = validator.generate_response(&result, &p);
        assert_eq!(response.status_code, 200);
        assert_eq!(response.status, "success");
        assert_eq!(response.message, "User registered successfully");
        assert!(response.data.as_ref().unwrap().user_id().starts_with("USR"));
    }

    #[test]
    fn test_short_username_only_payload_fails() {
        let validator = validator();
        let p = payload(json!({ "username": "usr" }));

        let result = validator.validate_request(&p);
        assert!(!result.valid);

        let response = validator.generate_response(&result, &p);
        assert_eq!(response.status_code, 400);
        assert_eq!(response.status, "Failed");
        assert!(response.data.is_none());
        assert!(response.errors.iter().any(|e| e.field == "username"));

        let fields: Vec<_> = response.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["username", "password", "email", "age", "deviceID", "uuid"]);
        assert_eq!(response.errors[0].message, "username must be at least 5 characters");
    }

    #[test]
    fn test_basic_failure_has_no_breakdown() {
        let validator = validator();
        let p = payload(json!({}));
        let value = serde_json::to_value(validator.process(&p)).unwrap();
        assert!(value.get("error_breakdown").is_none());
        assert_eq!(value["data"], Value::Null);
    }

    #[test]
    fn test_each_missing_field_reported_once() {
        let validator = validator();
        for field in ["username", "password", "email", "age", "deviceID", "uuid"] {
            let mut p = valid_payload();
            p.remove(field);
            let errors = validator.validate_independent_requirements(&p);
            assert_eq!(errors.len(), 1, "missing {}", field);
            assert_eq!(errors[0].field, field);
            assert_eq!(errors[0].message, format!("{} is required", field));
        }
    }

    #[test]
    fn test_individual_field_failures() {
        let validator = validator();
        let cases = [
            ("username", json!("user@123"), "username must contain only alphanumeric characters"),
            ("username", json!("areallylongusername1"), "username must be at most 15 characters"),
            ("password", json!("short"), "password must be at least 8 characters"),
            ("email", json!("test.example.com"), "email must be a valid email address"),
            ("age", json!(17), "age must be at least 18"),
            ("age", json!(121), "age must be at most 120"),
            ("age", json!("25"), "age must be an integer"),
            ("deviceID", json!("ABC"), "deviceID must be at least 8 characters"),
            ("uuid", json!("invalid-uuid"), "uuid must be a valid UUID"),
        ];

        for (field, value, message) in cases {
            let mut p = valid_payload();
            p.insert(field.to_string(), value);
            let errors = validator.validate_independent_requirements(&p);
            assert_eq!(errors.len(), 1, "{}", message);
            assert_eq!(errors[0].message, message);
        }
    }

    #[test]
    fn test_same_payload_gets_same_user_id() {
        let validator = validator();
        let p = valid_payload();
        let first = validator.process(&p);
        let second = validator.process(&p);
        assert_eq!(first.data, second.data);
    }
}
