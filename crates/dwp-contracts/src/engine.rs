//! # Validation Engine
//!
//! The seam between this crate and the third-party schema engine.
//!
//! A [`ValidationEngine`] turns a parsed schema document into a
//! [`CompiledValidator`]. Compiled validators are only meaningful for the
//! engine instance that produced them: the engine may carry its own format
//! registrations and strictness settings.
//!
//! [`JsonSchemaEngine`] is the default engine, backed by the `jsonschema`
//! crate. Its defaults match the generated schemas: Draft 7, format
//! assertions enabled, unknown keywords and unknown formats tolerated.
//!
//! ## Offline resolution
//!
//! The generated schemas only use document-local `$ref`s
//! (`#/$defs/<Shape>`). Any external `$ref` is refused at compile time
//! instead of being fetched over the network.

use std::fmt;
use std::sync::Arc;

use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::{Draft, Retrieve, Uri};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::registry::SchemaKey;
use crate::result::Violation;

/// The engine rejected a schema document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct EngineError {
    /// Engine-reported reason.
    pub reason: String,
}

impl EngineError {
    /// Wrap an engine-reported reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A schema engine able to compile schema documents.
///
/// Compilation must be deterministic for a given engine configuration and
/// schema, so that callers may cache and reuse its output freely.
pub trait ValidationEngine: Send + Sync {
    /// Short identifier used in logs and introspection output.
    fn name(&self) -> &str;

    /// Compile `schema` (the document registered for `key`).
    fn compile(
        &self,
        key: SchemaKey,
        schema: &Value,
    ) -> Result<Arc<dyn CompiledValidator>, EngineError>;
}

/// Executable form of one schema document.
pub trait CompiledValidator: Send + Sync {
    /// Run the validator against `instance`, returning every violation in
    /// discovery order. An empty vector means the instance conforms.
    fn collect_errors(&self, instance: &Value) -> Vec<Violation>;
}

type FormatCheck = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Construction options for [`JsonSchemaEngine`].
#[derive(Clone)]
pub struct EngineOptions {
    /// JSON Schema dialect. The generation pipeline emits Draft 7.
    pub draft: Draft,
    /// Enforce `format` keywords rather than treating them as annotations.
    pub validate_formats: bool,
    /// Reject unknown formats at compile time.
    pub strict: bool,
    formats: Vec<(String, FormatCheck)>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            draft: Draft::Draft7,
            validate_formats: true,
            strict: false,
            formats: Vec::new(),
        }
    }
}

impl EngineOptions {
    /// Select the JSON Schema dialect.
    pub fn with_draft(mut self, draft: Draft) -> Self {
        self.draft = draft;
        self
    }

    /// Enforce (`true`) or merely annotate (`false`) `format` keywords.
    pub fn with_validate_formats(mut self, enabled: bool) -> Self {
        self.validate_formats = enabled;
        self
    }

    /// Reject unknown formats at compile time.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Register a custom `format` checker.
    pub fn with_format<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.formats.push((name.into(), Arc::new(check)));
        self
    }

    /// Names of the registered custom formats.
    pub fn custom_formats(&self) -> impl Iterator<Item = &str> {
        self.formats.iter().map(|(name, _)| name.as_str())
    }
}

impl fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineOptions")
            .field("draft", &self.draft)
            .field("validate_formats", &self.validate_formats)
            .field("strict", &self.strict)
            .field("custom_formats", &self.custom_formats().collect::<Vec<_>>())
            .finish()
    }
}

/// Retriever that refuses every external `$ref`.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external schema references are not resolved: {}", uri.as_str()).into())
    }
}

/// Default engine backed by the `jsonschema` crate.
#[derive(Debug, Clone, Default)]
pub struct JsonSchemaEngine {
    options: EngineOptions,
}

impl JsonSchemaEngine {
    /// Engine with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with explicit options.
    pub fn with_options(options: EngineOptions) -> Self {
        Self { options }
    }

    /// The options this engine compiles with.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    fn build_options(&self) -> jsonschema::ValidationOptions {
        let mut opts = jsonschema::options();
        opts.with_draft(self.options.draft);
        opts.should_validate_formats(self.options.validate_formats);
        opts.should_ignore_unknown_formats(!self.options.strict);
        opts.with_retriever(OfflineRetriever);
        for (name, check) in &self.options.formats {
            let check = Arc::clone(check);
            opts.with_format(name.clone(), move |value: &str| check(value));
        }
        opts
    }
}

impl ValidationEngine for JsonSchemaEngine {
    fn name(&self) -> &str {
        "jsonschema"
    }

    fn compile(
        &self,
        key: SchemaKey,
        schema: &Value,
    ) -> Result<Arc<dyn CompiledValidator>, EngineError> {
        tracing::debug!(schema_key = %key, draft = ?self.options.draft, "compiling schema");
        let validator = self
            .build_options()
            .build(schema)
            .map_err(|e| EngineError::new(e.to_string()))?;
        Ok(Arc::new(JsonSchemaValidator { validator }))
    }
}

struct JsonSchemaValidator {
    validator: jsonschema::Validator,
}

impl CompiledValidator for JsonSchemaValidator {
    fn collect_errors(&self, instance: &Value) -> Vec<Violation> {
        self.validator
            .iter_errors(instance)
            .flat_map(|error| normalize(&error))
            .collect()
    }
}

/// Normalize one engine error into one or more [`Violation`]s.
///
/// An `additionalProperties` error naming several properties is split into
/// one violation per property, so each carries a single
/// `additionalProperty` parameter. Every piece keeps the engine's message.
fn normalize(error: &jsonschema::ValidationError<'_>) -> Vec<Violation> {
    let instance_path = error.instance_path.to_string();
    let schema_path = error.schema_path.to_string();
    let message = error.to_string();

    if let ValidationErrorKind::AdditionalProperties { unexpected } = &error.kind {
        if unexpected.len() > 1 {
            return unexpected
                .iter()
                .map(|property| Violation {
                    instance_path: instance_path.clone(),
                    schema_path: schema_path.clone(),
                    message: Some(message.clone()),
                    params: single_param("additionalProperty", json!(property)),
                })
                .collect();
        }
    }

    vec![Violation {
        instance_path,
        schema_path,
        message: Some(message),
        params: params_for(&error.kind),
    }]
}

fn params_for(kind: &ValidationErrorKind) -> Option<Map<String, Value>> {
    match kind {
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            let property = unexpected.first()?;
            single_param("additionalProperty", json!(property))
        }
        ValidationErrorKind::Required { property } => {
            single_param("missingProperty", property.clone())
        }
        ValidationErrorKind::Enum { options } => single_param("allowedValues", options.clone()),
        ValidationErrorKind::Constant { expected_value } => {
            single_param("allowedValue", expected_value.clone())
        }
        ValidationErrorKind::Type {
            kind: TypeKind::Single(ty),
        } => single_param("type", json!(ty.to_string())),
        ValidationErrorKind::Format { format } => single_param("format", json!(format)),
        ValidationErrorKind::Pattern { pattern } => single_param("pattern", json!(pattern)),
        ValidationErrorKind::MinLength { limit }
        | ValidationErrorKind::MaxLength { limit }
        | ValidationErrorKind::MinItems { limit }
        | ValidationErrorKind::MaxItems { limit } => single_param("limit", json!(limit)),
        _ => None,
    }
}

fn single_param(name: &str, value: Value) -> Option<Map<String, Value>> {
    let mut params = Map::new();
    params.insert(name.to_string(), value);
    Some(params)
}
