//! # dwp-cli — Command-Line Front-End for the Validation Contracts
//!
//! Provides the `dwp` binary. Handlers here only parse arguments, call into
//! `dwp-contracts`, and format output; no validation logic lives here.
//!
//! ## Subcommands
//!
//! - `dwp validate <KEY> <FILE>...`: validate documents against a schema key.
//! - `dwp schemas`: list schema keys, their documents, and whether they compile.
//! - `dwp show-config`: print the resolved configuration.
//!
//! ## Exit codes
//!
//! `0` success, `1` at least one document failed validation, `2` the
//! repository is misconfigured (missing or broken schema, unknown key).

pub mod schemas;
pub mod show_config;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dwp_contracts::{ConfigError, ContractsConfig};

/// Every document conformed.
pub const EXIT_OK: u8 = 0;
/// At least one document failed validation.
pub const EXIT_INVALID: u8 = 1;
/// Configuration or build-time defect.
pub const EXIT_CONFIG: u8 = 2;

/// Resolve a path that may be relative to the workspace root.
///
/// Absolute paths are returned as-is. A relative path that exists under
/// `workspace_root` resolves there; otherwise it stays relative to the
/// current directory.
pub fn resolve_path(path: &Path, workspace_root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let rooted = workspace_root.join(path);
    if rooted.exists() {
        rooted
    } else {
        path.to_path_buf()
    }
}

/// Resolve the configuration the subcommands run against.
///
/// An explicit `--config` file must load. Otherwise `config.yml` is searched
/// for upward from `cwd`, falling back to defaults rooted at `cwd`. The
/// `DWP_SCHEMA_DIR` environment variable and then `--schema-dir` override the
/// schema directory.
pub fn resolve_config(
    explicit: Option<&Path>,
    schema_dir: Option<&Path>,
    cwd: &Path,
) -> Result<ContractsConfig> {
    let config = match explicit {
        Some(path) => ContractsConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => match ContractsConfig::discover(cwd) {
            Ok(config) => config,
            Err(ConfigError::NotFound(start)) => {
                tracing::warn!(start = %start, "no config.yml found; using defaults");
                ContractsConfig::with_defaults(cwd)
            }
            Err(e) => return Err(e.into()),
        },
    };
    let config = config.with_env_overrides();
    Ok(match schema_dir {
        Some(dir) => config.with_schema_dir(dir),
        None => config,
    })
}
