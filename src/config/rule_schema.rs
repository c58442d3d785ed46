//! Rule schema loader
//!
//! Reads the JSON rule document once at startup and turns it into an
//! immutable [`RuleSchema`]. A missing file, unparseable JSON, or a
//! structurally invalid rule are all fatal [`ConfigurationError`]s.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ConfigResult, ConfigurationError};
use crate::functional::dependent_rules::{
    AgeConsentRule, DependentRule, DomainSecurityRule, TypeRequirementsRule,
};
use crate::models::rules::{FieldRule, RuleSchema};
use crate::models::user::validators::PasswordPolicy;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaDocument {
    #[serde(alias = "request")]
    independent: IndexMap<String, Value>,
    #[serde(default)]
    dependent: DependentSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DependentSection {
    age_consent: Option<AgeConsentSection>,
    user_type_requirements: Option<UserTypeSection>,
    corporate_security: Option<CorporateSecuritySection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AgeConsentSection {
    age_field: String,
    adult_age: i64,
    consent_field: String,
    device_field: String,
    minor_device_pattern: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UserTypeSection {
    type_field: String,
    required_fields: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CorporateSecuritySection {
    email_field: String,
    corporate_domains: Vec<String>,
    password_field: String,
    min_password_length: usize,
    min_password_strength: u8,
    two_factor_field: String,
}

impl DependentSection {
    /// Builds the dependent rules present in the document.
    fn into_rules(self) -> ConfigResult<Vec<DependentRule>> {
        let mut rules = Vec::new();

        if let Some(section) = self.age_consent {
            rules.push(DependentRule::AgeConsent(AgeConsentRule::new(
                section.age_field,
                section.adult_age,
                section.consent_field,
                section.device_field,
                &section.minor_device_pattern,
            )?));
        }

        if let Some(section) = self.user_type_requirements {
            rules.push(DependentRule::TypeRequiredFields(TypeRequirementsRule::new(
                section.type_field,
                section.required_fields,
            )));
        }

        if let Some(section) = self.corporate_security {
            rules.push(DependentRule::DomainSecurity(DomainSecurityRule::new(
                section.email_field,
                section.corporate_domains,
                section.password_field,
                PasswordPolicy {
                    min_length: section.min_password_length,
                    min_strength: section.min_password_strength,
                },
                section.two_factor_field,
            )?));
        }

        Ok(rules)
    }
}

fn parse_field_rule(field: &str, raw: Value) -> ConfigResult<FieldRule> {
    if raw.get("type").map_or(true, Value::is_null) {
        return Err(ConfigurationError::invalid_rule(field, "missing 'type'"));
    }

    serde_json::from_value(raw).map_err(|e| ConfigurationError::invalid_rule(field, e.to_string()))
}

/// Parses a rule document. `origin` names the source in error messages.
pub fn parse_rule_schema(source: &str, origin: &str) -> ConfigResult<RuleSchema> {
    let document: SchemaDocument =
        serde_json::from_str(source).map_err(|source| ConfigurationError::Malformed {
            path: origin.to_string(),
            source,
        })?;

    let independent = document
        .independent
        .into_iter()
        .map(|(field, raw)| parse_field_rule(&field, raw).map(|rule| (field, rule)))
        .collect::<ConfigResult<IndexMap<_, _>>>()?;

    let schema = RuleSchema::new(independent, document.dependent.into_rules()?)?;

    for rule in schema.dependent() {
        for field in rule.referenced_fields() {
            if schema.field(field).is_none() {
                log::warn!(
                    "{}: dependent rule '{}' references undeclared field '{}'",
                    origin,
                    rule.name(),
                    field
                );
            }
        }
    }

    Ok(schema)
}

/// Loads and validates the rule schema at `path`.
pub fn load_rule_schema(path: impl AsRef<Path>) -> ConfigResult<RuleSchema> {
    let path = path.as_ref();
    let origin = path.display().to_string();

    let source = fs::read_to_string(path).map_err(|source| ConfigurationError::Missing {
        path: origin.clone(),
        source,
    })?;

    let schema = parse_rule_schema(&source, &origin)?;
    log::info!(
        "loaded rule schema from {} ({} independent fields, {} dependent rules)",
        origin,
        schema.independent().len(),
        schema.dependent().len()
    );

    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"{ "independent": { "username": { "required": true, "type": "string" } } }"#;

    #[test]
    fn test_loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let schema = load_rule_schema(file.path()).unwrap();
        assert_eq!(schema.independent().len(), 1);
        assert!(schema.dependent().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_rule_schema(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigurationError::Missing { .. }));
    }

    #[test]
    fn test_unparseable_json() {
        let err = parse_rule_schema("{ \"independent\": ", "inline").unwrap_err();
        assert!(matches!(err, ConfigurationError::Malformed { .. }));
    }

    #[test]
    fn test_missing_tier_is_malformed() {
        let err = parse_rule_schema(r#"{ "dependent": {} }"#, "inline").unwrap_err();
        assert!(matches!(err, ConfigurationError::Malformed { .. }));
    }

    #[test]
    fn test_request_alias() {
        let source = r#"{ "request": { "age": { "required": true, "type": "integer", "min": 18 } } }"#;
        let schema = parse_rule_schema(source, "inline").unwrap();
        assert!(schema.field("age").is_some());
    }

    #[test]
    fn test_missing_type_names_field() {
        let source = r#"{ "independent": { "age": { "required": true, "min": 18 } } }"#;
        match parse_rule_schema(source, "inline").unwrap_err() {
            ConfigurationError::InvalidRule { field, .. } => assert_eq!(field, "age"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_unknown_pattern_is_invalid_rule() {
        let source =
            r#"{ "independent": { "username": { "type": "string", "pattern": "hexadecimal" } } }"#;
        assert!(matches!(
            parse_rule_schema(source, "inline").unwrap_err(),
            ConfigurationError::InvalidRule { .. }
        ));
    }

    #[test]
    fn test_dependent_rules_are_ordered_by_priority() {
        let source = r#"{
            "independent": { "email": { "type": "string" } },
            "dependent": {
                "corporate_security": {
                    "email_field": "email",
                    "corporate_domains": ["company.com"],
                    "password_field": "password",
                    "min_password_length": 12,
                    "min_password_strength": 4,
                    "two_factor_field": "two_factor_auth"
                },
                "age_consent": {
                    "age_field": "age",
                    "adult_age": 18,
                    "consent_field": "parental_consent",
                    "device_field": "deviceID",
                    "minor_device_pattern": "^TEEN"
                }
            }
        }"#;
        let schema = parse_rule_schema(source, "inline").unwrap();
        let names: Vec<_> = schema.dependent().iter().map(DependentRule::name).collect();
        assert_eq!(names, vec!["age_consent", "corporate_security"]);
    }

    #[test]
    fn test_bad_minor_pattern_fails_loading() {
        let source = r#"{
            "independent": { "age": { "type": "integer" } },
            "dependent": {
                "age_consent": {
                    "age_field": "age",
                    "adult_age": 18,
                    "consent_field": "parental_consent",
                    "device_field": "deviceID",
                    "minor_device_pattern": "(unclosed"
                }
            }
        }"#;
        assert!(matches!(
            parse_rule_schema(source, "inline").unwrap_err(),
            ConfigurationError::InvalidPattern { .. }
        ));
    }
}
