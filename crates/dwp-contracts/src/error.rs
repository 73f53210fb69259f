//! # Error Types
//!
//! Configuration and build-time defects surface as [`ContractError`].
//! Per-call validation failures are *not* errors: they are the
//! [`ValidationResult::Invalid`](crate::ValidationResult::Invalid) variant.
//! The single exception is [`ContractError::Invalid`], raised only by
//! [`ContractValidator::assert_valid`](crate::ContractValidator::assert_valid).

use thiserror::Error;

use crate::registry::SchemaKey;
use crate::result::InvalidDocument;

/// Errors returned by the validation-contracts layer.
#[derive(Error, Debug)]
pub enum ContractError {
    /// The requested key is not part of the closed schema-key set.
    #[error("unknown schema key: {0}")]
    UnknownSchemaKey(String),

    /// The schema document could not be read or parsed.
    #[error("failed to load schema {key} from {path}: {source}")]
    SchemaLoad {
        /// Key whose document failed to load.
        key: SchemaKey,
        /// Resolved document location.
        path: String,
        /// Underlying cause.
        #[source]
        source: LoadCause,
    },

    /// The engine rejected the schema document during compilation.
    #[error("failed to compile schema {key}: {reason}")]
    SchemaCompile {
        /// Key whose document failed to compile.
        key: SchemaKey,
        /// Engine-reported reason.
        reason: String,
    },

    /// An input document could not be read or parsed.
    #[error("failed to load document {path}: {reason}")]
    DocumentLoad {
        /// Path to the document.
        path: String,
        /// Human-readable reason.
        reason: String,
    },

    /// The document did not conform to its schema.
    #[error(transparent)]
    Invalid(#[from] InvalidDocument),

    /// A conforming document could not be decoded into the requested type.
    #[error("document valid against {key} but could not be decoded: {source}")]
    Decode {
        /// Key the document was validated against.
        key: SchemaKey,
        /// Deserialization failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Why a schema document failed to load.
#[derive(Error, Debug)]
pub enum LoadCause {
    /// The file could not be read.
    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),

    /// The content is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The content parsed, but is not a JSON object.
    #[error("schema document is not a JSON object")]
    NotAnObject,
}

impl ContractError {
    /// True for configuration and build-time defects: an unknown key, or a
    /// schema document that cannot be loaded or compiled.
    pub fn is_configuration_defect(&self) -> bool {
        matches!(
            self,
            Self::UnknownSchemaKey(_) | Self::SchemaLoad { .. } | Self::SchemaCompile { .. }
        )
    }
}
