//! Command-line front end
//!
//! Loads the configuration and rule schema once, validates a payload file
//! (or stdin) and prints the response JSON to stdout. A JSON array of
//! payloads is validated as a batch and answered with an array of responses.
//!
//! Exit codes: 0 when every payload is valid, 2 when any payload fails
//! validation, 1 on configuration or input errors.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use serde_json::Value;
use thiserror::Error;

use registration_validator::utils::logger::init_logging;
use registration_validator::{
    load_rule_schema, AppConfig, BasicValidator, ConfigurationError, Payload,
    RegistrationResponse, RegistrationValidator, RequestValidator, RuleSchema,
};

/// Validate user registration payloads against a rule schema
#[derive(Parser, Debug)]
#[command(name = "registration-validator")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Payload file, or `-` for stdin
    #[arg(default_value = "-")]
    payload: String,

    /// Rule schema file (overrides RULES_PATH)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Use the basic engine (independent rules only)
    #[arg(long)]
    basic: bool,

    /// Pretty-print the response
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("could not read payload from {path}: {source}")]
    ReadPayload {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("payload is not valid JSON: {0}")]
    ParsePayload(#[source] serde_json::Error),

    #[error("payload must be a JSON object or an array of objects")]
    NotAnObject,

    #[error("could not serialize response: {0}")]
    Output(#[source] serde_json::Error),
}

fn read_input(path: &str) -> Result<String, CliError> {
    let read_error = |source| CliError::ReadPayload {
        path: path.to_string(),
        source,
    };

    if path == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).map_err(read_error)?;
        Ok(buffer)
    } else {
        fs::read_to_string(path).map_err(read_error)
    }
}

fn into_payloads(input: Value) -> Result<(Vec<Payload>, bool), CliError> {
    match input {
        Value::Object(payload) => Ok((vec![payload], false)),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(payload) => Ok(payload),
                _ => Err(CliError::NotAnObject),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|payloads| (payloads, true)),
        _ => Err(CliError::NotAnObject),
    }
}

fn respond<V: RequestValidator>(validator: &V, payloads: &[Payload]) -> Vec<RegistrationResponse> {
    validator
        .validate_batch(payloads)
        .iter()
        .zip(payloads)
        .map(|(outcome, payload)| validator.generate_response(outcome, payload))
        .collect()
}

fn validate_payloads(
    basic: bool,
    schema: RuleSchema,
    config: &AppConfig,
    payloads: &[Payload],
) -> Vec<RegistrationResponse> {
    if basic {
        let validator = BasicValidator::new(schema).with_id_strategy(config.id_strategy);
        respond(&validator, payloads)
    } else {
        let validator = RegistrationValidator::new(schema)
            .with_id_strategy(config.id_strategy)
            .with_student_access_days(config.student_access_days);
        respond(&validator, payloads)
    }
}

fn all_valid(responses: &[RegistrationResponse]) -> bool {
    responses.iter().all(RegistrationResponse::is_success)
}

fn run(cli: Cli) -> Result<bool, CliError> {
    let config = AppConfig::from_env()?;
    init_logging(config.log_format);

    let rules_path = cli.rules.unwrap_or_else(|| config.rules_path.clone());
    let schema = load_rule_schema(&rules_path)?;

    let input = read_input(&cli.payload)?;
    let (payloads, batch) =
        into_payloads(serde_json::from_str(&input).map_err(CliError::ParsePayload)?)?;

    let responses = validate_payloads(cli.basic, schema, &config, &payloads);

    let output = if batch {
        serde_json::to_value(&responses)
    } else {
        serde_json::to_value(&responses[0])
    }
    .map_err(CliError::Output)?;

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .map_err(CliError::Output)?;

    println!("{}", rendered);
    Ok(all_valid(&responses))
}

fn main() {
    match run(Cli::parse()) {
        Ok(true) => {}
        Ok(false) => process::exit(2),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
