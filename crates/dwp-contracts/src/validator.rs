//! # Contract Validator
//!
//! Public entry point: validates arbitrary JSON against a [`SchemaKey`] and
//! returns a [`ValidationResult`].
//!
//! ## Error layering
//!
//! - `Err(ContractError)` from [`ContractValidator::validate`] means the
//!   system is misconfigured (schema missing, unparsable, or rejected by the
//!   engine). It never means "the document is invalid".
//! - A non-conforming document is `Ok(ValidationResult::Invalid { .. })`.
//! - [`ContractValidator::assert_valid`] is the one place an invalid
//!   document becomes an `Err`.
//!
//! For the same input, key and engine configuration, `validate` returns
//! equal results; the only side effect is populating the caches on first use.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cache::CompilerCache;
use crate::config::ContractsConfig;
use crate::engine::{CompiledValidator, JsonSchemaEngine, ValidationEngine};
use crate::error::ContractError;
use crate::loader::SchemaLoader;
use crate::registry::{SchemaKey, SchemaRegistry};
use crate::result::{InvalidDocument, ValidationResult, Violation};
use crate::VERSION;

/// Validates documents against the generated schema contracts.
///
/// Owns its schema cache and compiled-validator cache, so independent
/// validators in one process never share state.
pub struct ContractValidator {
    loader: SchemaLoader,
    cache: CompilerCache,
}

impl std::fmt::Debug for ContractValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractValidator")
            .field("schema_dir", &self.loader.registry().schema_dir())
            .field("engine", &self.cache.engine().name())
            .field("cached_schemas", &self.loader.cached_count())
            .field("compiled", &self.cache.compiled_count())
            .finish()
    }
}

impl ContractValidator {
    /// Validator over `registry` using the default [`JsonSchemaEngine`].
    pub fn new(registry: SchemaRegistry) -> Self {
        Self::with_engine(registry, Arc::new(JsonSchemaEngine::new()))
    }

    /// Validator over `registry` using a caller-supplied engine.
    pub fn with_engine(registry: SchemaRegistry, engine: Arc<dyn ValidationEngine>) -> Self {
        Self {
            loader: SchemaLoader::new(registry),
            cache: CompilerCache::new(engine),
        }
    }

    /// Validator over the schema directory named by `config`.
    pub fn from_config(config: &ContractsConfig) -> Self {
        Self::new(config.registry())
    }

    /// The engine compiled validators are produced by.
    pub fn engine(&self) -> &Arc<dyn ValidationEngine> {
        self.cache.engine()
    }

    /// Version tag of this crate.
    pub fn version(&self) -> &'static str {
        VERSION
    }

    /// The registry schema keys are resolved with.
    pub fn registry(&self) -> &SchemaRegistry {
        self.loader.registry()
    }

    /// The schema document loader.
    pub fn loader(&self) -> &SchemaLoader {
        &self.loader
    }

    /// Number of validators compiled so far by this validator's engine.
    pub fn compiled_count(&self) -> usize {
        self.cache.compiled_count()
    }

    /// Compiled validator for `key`, compiling it on first use.
    ///
    /// # Errors
    ///
    /// [`ContractError::SchemaLoad`] or [`ContractError::SchemaCompile`].
    pub fn compiled_validator(
        &self,
        key: SchemaKey,
    ) -> Result<Arc<dyn CompiledValidator>, ContractError> {
        self.cache.get_or_compile(&self.loader, key)
    }

    /// Validate `data` against the schema for `key`.
    ///
    /// Every violation is collected, in engine discovery order. On success
    /// the input is returned unchanged as `value`.
    ///
    /// # Errors
    ///
    /// Only configuration defects; see the module docs.
    pub fn validate(&self, data: Value, key: SchemaKey) -> Result<ValidationResult, ContractError> {
        let errors = self.collect(&data, key)?;
        if errors.is_empty() {
            Ok(ValidationResult::Valid {
                schema_key: key,
                value: data,
            })
        } else {
            Ok(ValidationResult::Invalid {
                schema_key: key,
                errors,
            })
        }
    }

    /// Validate `data` and fail with one aggregated error if it does not conform.
    ///
    /// # Errors
    ///
    /// [`ContractError::Invalid`] listing every violation, or any
    /// configuration defect `validate` would return.
    pub fn assert_valid(&self, data: &Value, key: SchemaKey) -> Result<(), ContractError> {
        let violations = self.collect(data, key)?;
        if violations.is_empty() {
            Ok(())
        } else {
            Err(InvalidDocument {
                schema_key: key,
                violations,
            }
            .into())
        }
    }

    /// Validate `data`, then decode the conforming document into `T`.
    ///
    /// Decoding is attempted only after validation succeeds.
    ///
    /// # Errors
    ///
    /// [`ContractError::Invalid`] if the document does not conform,
    /// [`ContractError::Decode`] if it conforms but does not fit `T`.
    pub fn decode<T: DeserializeOwned>(&self, data: Value, key: SchemaKey) -> Result<T, ContractError> {
        let value = self.validate(data, key)?.into_result()?;
        serde_json::from_value(value).map_err(|source| ContractError::Decode { key, source })
    }

    /// Read a JSON document (or YAML, by `.yaml`/`.yml` extension) and validate it.
    ///
    /// # Errors
    ///
    /// [`ContractError::DocumentLoad`] if the file cannot be read or parsed,
    /// plus any configuration defect `validate` would return.
    pub fn validate_file(&self, path: &Path, key: SchemaKey) -> Result<ValidationResult, ContractError> {
        let fail = |reason: String| ContractError::DocumentLoad {
            path: path.display().to_string(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| fail(format!("cannot read file: {e}")))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let data: Value = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| fail(format!("YAML parse error: {e}")))?,
            _ => serde_json::from_str(&content).map_err(|e| fail(format!("invalid JSON: {e}")))?,
        };

        self.validate(data, key)
    }

    /// Load and compile every registered schema, reporting each outcome.
    pub fn preload(&self) -> Vec<(SchemaKey, Result<(), ContractError>)> {
        SchemaKey::ALL
            .into_iter()
            .map(|key| (key, self.compiled_validator(key).map(|_| ())))
            .collect()
    }

    fn collect(&self, data: &Value, key: SchemaKey) -> Result<Vec<Violation>, ContractError> {
        let validator = self.compiled_validator(key)?;
        let errors = validator.collect_errors(data);
        tracing::debug!(schema_key = %key, error_count = errors.len(), "validated document");
        Ok(errors)
    }
}
