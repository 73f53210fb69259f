//! # Validate Subcommand
//!
//! Validates one or more JSON or YAML documents against a schema key.
//!
//! ## Usage
//!
//! ```bash
//! dwp validate recycler-organisation org.json
//! dwp validate digital-waste-passport a.json b.yaml --format json
//! ```
//!
//! Text output reports each failing document with its schema key followed by
//! one `<path> <message>` line per violation. JSON output prints one
//! serialized [`ValidationResult`] per document, failures on stderr.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, ValueEnum};
use dwp_contracts::{ContractError, ContractValidator, SchemaKey, ValidationResult};

use crate::{resolve_path, EXIT_CONFIG, EXIT_INVALID, EXIT_OK};

/// Output format for validation reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines on stdout/stderr.
    #[default]
    Text,
    /// One JSON result object per document.
    Json,
}

/// Arguments for the `dwp validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema key, e.g. `digital-waste-passport` or `recycler-organisation`.
    pub key: String,

    /// Documents to validate (`.json`, `.yaml`, `.yml`).
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the validate subcommand.
///
/// Returns the process exit code: 0 when every document conforms, 1 when any
/// document is invalid or unreadable, 2 on a configuration defect.
pub fn run_validate(
    args: &ValidateArgs,
    validator: &ContractValidator,
    workspace_root: &Path,
) -> Result<u8> {
    let key: SchemaKey = match args.key.parse() {
        Ok(key) => key,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("known schema keys: {}", known_keys());
            return Ok(EXIT_CONFIG);
        }
    };

    let mut failures = 0usize;
    for file in &args.files {
        let path = resolve_path(file, workspace_root);
        match validator.validate_file(&path, key) {
            Ok(result) => {
                if !result.is_ok() {
                    failures += 1;
                }
                report(&result, &path, args.format)?;
            }
            Err(e) if e.is_configuration_defect() => {
                tracing::error!(schema_key = %key, "{e}");
                eprintln!("error: {e}");
                return Ok(EXIT_CONFIG);
            }
            Err(e @ ContractError::DocumentLoad { .. }) => {
                failures += 1;
                eprintln!("FAIL: {}: {e}", path.display());
            }
            Err(e) => return Err(e.into()),
        }
    }

    if failures > 0 {
        tracing::info!(schema_key = %key, failures, total = args.files.len(), "validation failed");
        Ok(EXIT_INVALID)
    } else {
        Ok(EXIT_OK)
    }
}

fn report(result: &ValidationResult, path: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let rendered = serde_json::to_string_pretty(result)?;
            if result.is_ok() {
                println!("{rendered}");
            } else {
                eprintln!("{rendered}");
            }
        }
        OutputFormat::Text => match result {
            ValidationResult::Valid { schema_key, .. } => {
                println!("OK: {} ({schema_key})", path.display());
            }
            ValidationResult::Invalid { schema_key, errors } => {
                eprintln!(
                    "FAIL: {} ({schema_key}): {} violation(s)",
                    path.display(),
                    errors.len()
                );
                for error in errors {
                    eprintln!("  {error}");
                }
            }
        },
    }
    Ok(())
}

fn known_keys() -> String {
    SchemaKey::ALL
        .iter()
        .map(SchemaKey::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
