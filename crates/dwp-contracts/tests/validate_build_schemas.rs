//! Integration test: validate passport documents against the generated
//! schemas in `build/v0.1/`.
//!
//! Every schema key must load and compile, every fixture under
//! `tests/fixtures/` must pass unchanged, and targeted mutations of those
//! fixtures must fail with the expected violations.

use std::path::PathBuf;
use std::sync::Arc;

use dwp_contracts::{
    ContractError, ContractValidator, ContractsConfig, EngineOptions, JsonSchemaEngine, SchemaKey,
    SchemaLoader, ValidationResult,
};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Find the repository root.
fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn validator() -> ContractValidator {
    let config = ContractsConfig::discover(repo_root()).expect("config.yml at repo root");
    ContractValidator::from_config(&config)
}

fn fixture(key: SchemaKey) -> Value {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(format!("{key}.json"));
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    serde_json::from_str(&content).unwrap()
}

fn errors_for(validator: &ContractValidator, doc: Value, key: SchemaKey) -> Vec<dwp_contracts::Violation> {
    match validator.validate(doc, key).unwrap() {
        ValidationResult::Invalid { errors, .. } => errors,
        ValidationResult::Valid { .. } => panic!("expected {key} document to be rejected"),
    }
}

#[test]
fn test_every_key_loads_once_and_compiles() {
    let config = ContractsConfig::discover(repo_root()).unwrap();
    let loader = SchemaLoader::new(config.registry());
    for key in SchemaKey::ALL {
        let first = loader.load(key).unwrap();
        assert!(
            first.as_object().is_some_and(|o| !o.is_empty()),
            "{key} schema is empty"
        );
        let second = loader.load(key).unwrap();
        assert!(Arc::ptr_eq(&first, &second), "{key} schema was re-read");
    }

    let validator = validator();
    let failures: Vec<String> = validator
        .preload()
        .into_iter()
        .filter_map(|(key, outcome)| outcome.err().map(|e| format!("{key}: {e}")))
        .collect();
    assert!(failures.is_empty(), "schemas failed to compile:\n{}", failures.join("\n"));
}

#[test]
fn test_fixtures_round_trip_unchanged() {
    let validator = validator();
    for key in SchemaKey::ALL {
        let doc = fixture(key);
        match validator.validate(doc.clone(), key).unwrap() {
            ValidationResult::Valid { schema_key, value } => {
                assert_eq!(schema_key, key);
                assert_eq!(value, doc);
            }
            ValidationResult::Invalid { errors, .. } => {
                panic!("{key} fixture rejected: {errors:#?}")
            }
        }
    }
}

#[test]
fn test_extra_property_rejected() {
    let validator = validator();
    let mut doc = fixture(SchemaKey::DigitalWastePassport);
    doc["colour"] = json!("green");

    let errors = errors_for(&validator, doc, SchemaKey::DigitalWastePassport);
    assert!(
        errors
            .iter()
            .any(|e| e.param("additionalProperty") == Some(&json!("colour"))),
        "no additionalProperties violation: {errors:#?}"
    );
}

#[test]
fn test_missing_required_at_root() {
    let validator = validator();
    let mut doc = fixture(SchemaKey::RecyclerOrganisation);
    doc.as_object_mut().unwrap().remove("legalName");

    let errors = errors_for(&validator, doc, SchemaKey::RecyclerOrganisation);
    let required = errors
        .iter()
        .find(|e| e.param("missingProperty") == Some(&json!("legalName")))
        .expect("required violation for legalName");
    assert_eq!(required.instance_path, "");
    assert!(required.message.as_deref().unwrap_or("").contains("legalName"));
}

#[test]
fn test_missing_required_in_nested_object() {
    let validator = validator();
    let mut doc = fixture(SchemaKey::RecyclerOrganisation);
    doc["address"].as_object_mut().unwrap().remove("country");

    let errors = errors_for(&validator, doc, SchemaKey::RecyclerOrganisation);
    assert!(
        errors
            .iter()
            .any(|e| e.instance_path == "/address" && e.param("missingProperty") == Some(&json!("country"))),
        "got: {errors:#?}"
    );
}

#[test]
fn test_multiple_violations_reported_together() {
    let validator = validator();
    let mut doc = fixture(SchemaKey::DigitalProductPassport);
    doc.as_object_mut().unwrap().remove("productName");
    doc["gtin"] = json!(4012345678901u64);
    doc["materials"][0]["massFraction"] = json!(1.5);

    let errors = errors_for(&validator, doc, SchemaKey::DigitalProductPassport);
    let paths: Vec<&str> = errors.iter().map(|e| e.instance_path.as_str()).collect();
    assert!(paths.contains(&""), "{paths:?}");
    assert!(paths.contains(&"/gtin"), "{paths:?}");
    assert!(paths.contains(&"/materials/0/massFraction"), "{paths:?}");
}

#[test]
fn test_formats_enforced_on_real_schema() {
    let validator = validator();
    let mut doc = fixture(SchemaKey::DigitalMarpolWastePassport);
    doc["issuedAt"] = json!("12 April 2026");
    doc["deliveryDate"] = json!("2026-13-45");

    let errors = errors_for(&validator, doc, SchemaKey::DigitalMarpolWastePassport);
    let formats: Vec<&Value> = errors.iter().filter_map(|e| e.param("format")).collect();
    assert!(formats.contains(&&json!("date-time")), "{errors:#?}");
    assert!(formats.contains(&&json!("date")), "{errors:#?}");
}

#[test]
fn test_assert_valid_message_contains_every_path() {
    let validator = validator();
    let mut doc = fixture(SchemaKey::DigitalWastePassport);
    doc["wasteCode"] = json!("15-01-02");
    doc["quantity"]["unit"] = json!("barrels");

    validator
        .assert_valid(&fixture(SchemaKey::DigitalWastePassport), SchemaKey::DigitalWastePassport)
        .unwrap();

    let err = validator
        .assert_valid(&doc, SchemaKey::DigitalWastePassport)
        .unwrap_err();
    let ContractError::Invalid(invalid) = &err else {
        panic!("expected Invalid, got: {err}");
    };
    let message = err.to_string();
    assert!(message.starts_with("digital-waste-passport"), "{message}");
    for violation in &invalid.violations {
        assert!(message.contains(violation.display_path()), "{message}");
    }
    assert!(message.contains("/wasteCode"));
    assert!(message.contains("/quantity/unit"));
}

#[test]
fn test_document_for_wrong_key_rejected() {
    let validator = validator();
    let doc = fixture(SchemaKey::DigitalProductPassport);
    let result = validator
        .validate(doc, SchemaKey::RecyclerOrganisation)
        .unwrap();
    assert!(!result.is_ok());
}

#[test]
fn test_configured_engine_from_public_options() {
    let config = ContractsConfig::discover(repo_root()).unwrap();
    let options = EngineOptions::default()
        .with_strict(true)
        .with_validate_formats(false);
    assert!(options.strict);
    assert!(!options.validate_formats);

    let validator =
        ContractValidator::with_engine(config.registry(), Arc::new(JsonSchemaEngine::with_options(options)));
    let mut doc = fixture(SchemaKey::DigitalMarpolWastePassport);
    doc["issuedAt"] = json!("12 April 2026");
    let result = validator
        .validate(doc, SchemaKey::DigitalMarpolWastePassport)
        .unwrap();
    assert!(result.is_ok(), "formats should be annotations only: {:#?}", result.errors());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_validate_is_deterministic(name in ".{0,12}", employees in any::<i64>(), extra in any::<bool>()) {
        let validator = validator();
        let mut doc = fixture(SchemaKey::RecyclerOrganisation);
        doc["legalName"] = json!(name);
        doc["registrationNumber"] = json!(employees);
        if extra {
            doc["unexpected"] = json!(true);
        }

        let first = validator.validate(doc.clone(), SchemaKey::RecyclerOrganisation).unwrap();
        let second = validator.validate(doc, SchemaKey::RecyclerOrganisation).unwrap();
        prop_assert_eq!(first, second);
    }
}
