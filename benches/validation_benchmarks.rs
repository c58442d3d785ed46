//! # Validation Benchmarks
//!
//! Measures the cost of one request through each engine, and batch
//! validation throughput at a few sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use registration_validator::{
    load_rule_schema, BasicValidator, Payload, RegistrationValidator, RequestValidator,
};
use serde_json::json;
use std::time::Duration;

fn schema_path(name: &str) -> String {
    format!("{}/config/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Generate payloads alternating between valid and invalid students
pub fn generate_payloads(size: usize) -> Vec<Payload> {
    (0..size)
        .map(|i| {
            let value = if i % 2 == 0 {
                json!({
                    "username": format!("student{}", i % 10000),
                    "email": format!("student{}@university.edu", i),
                    "age": 18 + (i % 50),
                    "deviceID": format!("STUD{:05}", i % 100000),
                    "userType": "STUDENT",
                    "student_id": format!("S{}", i),
                    "university_email": format!("student{}@university.edu", i)
                })
            } else {
                json!({ "username": "usr", "age": 16, "userType": "STUDENT", "email": "x@company.com" })
            };
            value.as_object().cloned().unwrap_or_default()
        })
        .collect()
}

pub fn benchmark_single_request(c: &mut Criterion) {
    let basic = BasicValidator::new(load_rule_schema(schema_path("requirements.json")).unwrap());
    let enhanced =
        RegistrationValidator::new(load_rule_schema(schema_path("enhanced_requirements.json")).unwrap());

    let basic_payload = json!({
        "username": "testuser123",
        "password": "password123",
        "email": "test@example.com",
        "age": 25,
        "deviceID": "ABC1234567",
        "uuid": "123e4567-e89b-12d3-a456-426614174000"
    })
    .as_object()
    .cloned()
    .unwrap();
    let enhanced_payloads = generate_payloads(2);

    let mut group = c.benchmark_group("single_request");

    group.bench_function("basic_valid", |b| {
        b.iter(|| basic.process(black_box(&basic_payload)))
    });
    group.bench_function("enhanced_valid", |b| {
        b.iter(|| enhanced.process(black_box(&enhanced_payloads[0])))
    });
    group.bench_function("enhanced_invalid", |b| {
        b.iter(|| enhanced.process(black_box(&enhanced_payloads[1])))
    });

    group.finish();
}

pub fn benchmark_batch_validation(c: &mut Criterion) {
    let enhanced =
        RegistrationValidator::new(load_rule_schema(schema_path("enhanced_requirements.json")).unwrap());
    let mut group = c.benchmark_group("batch_validation");

    for size in [100, 1000, 10000].iter() {
        let payloads = generate_payloads(*size);

        group.bench_with_input(BenchmarkId::new("validate_batch", size), &payloads, |b, payloads| {
            b.iter(|| enhanced.validate_batch(black_box(payloads)))
        });

        group.bench_with_input(BenchmarkId::new("sequential", size), &payloads, |b, payloads| {
            b.iter(|| {
                payloads
                    .iter()
                    .map(|p| enhanced.validate_request(black_box(p)))
                    .collect::<Vec<_>>()
            })
        });
    }

    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(5))
        .sample_size(50);
    targets = benchmark_single_request, benchmark_batch_validation
);

criterion_main!(benches);
