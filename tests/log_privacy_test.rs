/// Diagnostics emitted while validating never carry payload values.

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use log::{LevelFilter, Log, Metadata, Record};
    use registration_validator::{
        load_rule_schema, BasicValidator, Payload, RegistrationValidator, RequestValidator,
    };
    use serde_json::{json, Value};

    struct CaptureLogger {
        lines: Mutex<Vec<String>>,
    }

    impl Log for CaptureLogger {
        fn enabled(&self, _: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            if let Ok(mut lines) = self.lines.lock() {
                lines.push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger {
        lines: Mutex::new(Vec::new()),
    };

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    fn tokens(line: &str) -> Vec<&str> {
        line.split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|token| !token.is_empty())
            .collect()
    }

    #[test]
    fn test_validation_logs_exclude_payload_values() {
        log::set_logger(&LOGGER).expect("no other logger installed in this test binary");
        log::set_max_level(LevelFilter::Trace);

        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/enhanced_requirements.json");
        let enhanced = RegistrationValidator::new(load_rule_schema(path).unwrap());
        let basic = BasicValidator::new(load_rule_schema(path).unwrap());
        LOGGER.lines.lock().unwrap().clear();

        let minor = payload(json!({
            "username": "teenuser1",
            "email": "teen@example.com",
            "age": 16,
            "deviceID": "REGULAR123",
            "userType": "GUEST"
        }));
        let corporate = payload(json!({
            "username": "bossuser",
            "email": "boss@company.com",
            "age": 44,
            "deviceID": "CORP12345",
            "userType": "EMPLOYEE",
            "password": "weak123"
        }));

        for p in [&minor, &corporate] {
            assert!(!enhanced.validate_request(p).valid);
            enhanced.process(p);
            basic.process(p);
        }

        let lines = LOGGER.lines.lock().unwrap();
        assert!(!lines.is_empty(), "validation should emit diagnostics");
        assert!(lines.iter().any(|line| line.contains("age consent")));

        let secrets = [
            "teenuser1",
            "teen@example.com",
            "REGULAR123",
            "GUEST",
            "bossuser",
            "boss@company.com",
            "CORP12345",
            "EMPLOYEE",
            "weak123",
        ];
        for line in lines.iter() {
            for secret in secrets {
                assert!(!line.contains(secret), "'{}' leaked into log line: {}", secret, line);
            }
            for age in ["16", "44"] {
                assert!(!tokens(line).contains(&age), "age {} leaked into log line: {}", age, line);
            }
        }
    }
}
