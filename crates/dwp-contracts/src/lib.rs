//! # dwp-contracts — Validation Contracts for Waste Passport Documents
//!
//! Validates JSON documents (Digital Waste Passports, Digital Product
//! Passports, recycler organisation profiles) against the JSON Schema
//! documents generated from the repository's SHACL shapes.
//!
//! ## Layers
//!
//! - [`registry`]: the closed set of [`SchemaKey`]s and where each
//!   schema document lives.
//! - [`loader`]: reads and parses schema documents once per process.
//! - [`engine`]: the [`ValidationEngine`] seam and the default
//!   `jsonschema`-backed [`JsonSchemaEngine`].
//! - [`cache`]: compiled validators memoized per engine instance and key.
//! - [`validator`]: the [`ContractValidator`] facade returning
//!   [`ValidationResult`]s.
//! - [`config`]: `config.yml` discovery and schema directory resolution.
//!
//! ## Example
//!
//! ```no_run
//! use dwp_contracts::{ContractValidator, ContractsConfig, SchemaKey};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ContractsConfig::discover(".")?.with_env_overrides();
//! let validator = ContractValidator::from_config(&config);
//!
//! let result = validator.validate(json!({"name": "Acme"}), SchemaKey::RecyclerOrganisation)?;
//! for error in result.errors() {
//!     eprintln!("{error}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Policy
//!
//! - Semantic (RDF/SHACL graph) validation is out of scope; this crate
//!   checks structure only.
//! - No `.unwrap()` outside tests. Configuration defects are errors,
//!   invalid documents are values.

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod registry;
pub mod result;
pub mod validator;

pub use cache::CompilerCache;
pub use config::{ConfigError, ContractsConfig};
pub use engine::{CompiledValidator, EngineError, EngineOptions, JsonSchemaEngine, ValidationEngine};
pub use error::{ContractError, LoadCause};
pub use loader::SchemaLoader;
pub use registry::{SchemaKey, SchemaRegistry};
pub use result::{InvalidDocument, ValidationResult, Violation};
pub use validator::ContractValidator;

/// Version tag of the validation contracts.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
