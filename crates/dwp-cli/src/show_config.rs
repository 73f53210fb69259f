//! # Show-Config Subcommand
//!
//! Prints the resolved configuration: versions, workspace root, schema
//! directory, and where each schema document is expected.

use anyhow::Result;
use dwp_contracts::{ContractsConfig, SchemaKey};

use crate::EXIT_OK;

/// Execute the show-config subcommand.
pub fn run_show_config(config: &ContractsConfig) -> Result<u8> {
    println!("Workspace root:   {}", config.workspace_root().display());
    println!("Ontology version: {}", config.ontology_version);
    println!("Shapes version:   {}", config.shapes_version);
    println!("Build version:    {}", config.build_version);
    println!("Schema directory: {}", config.schema_dir().display());
    println!();
    for (key, location, exists) in schema_locations(config) {
        println!(
            "  {key:<32} {location}{}",
            if exists { "" } else { "  (missing)" }
        );
    }
    Ok(EXIT_OK)
}

/// Printed location of each schema document and whether it exists.
///
/// Without an override the workspace-relative build path is shown; with one
/// the absolute path under the overriding directory. Existence is checked on
/// the same file either way.
fn schema_locations(config: &ContractsConfig) -> Vec<(SchemaKey, String, bool)> {
    let schema_dir = config.schema_dir();
    SchemaKey::ALL
        .into_iter()
        .map(|key| {
            let path = schema_dir.join(key.file_name());
            let location = if config.schema_dir_overridden() {
                path.display().to_string()
            } else {
                config.build_path(key.file_name())
            };
            (key, location, path.is_file())
        })
        .collect()
}
