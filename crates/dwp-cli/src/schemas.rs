//! # Schemas Subcommand
//!
//! Lists every registered schema key with the document it resolves to and
//! whether that document loads and compiles.

use anyhow::Result;
use clap::Args;
use dwp_contracts::ContractValidator;

use crate::{EXIT_CONFIG, EXIT_OK};

/// Arguments for the `dwp schemas` subcommand.
#[derive(Args, Debug, Default)]
pub struct SchemasArgs {
    /// Only print locations; do not load or compile the schemas.
    #[arg(long)]
    pub no_check: bool,
}

/// Execute the schemas subcommand.
///
/// Returns 2 when any schema fails to load or compile, 0 otherwise.
pub fn run_schemas(args: &SchemasArgs, validator: &ContractValidator) -> Result<u8> {
    let registry = validator.registry();
    println!("Schema directory: {}", registry.schema_dir().display());

    if args.no_check {
        for (key, path) in registry.entries() {
            println!("  {key:<32} {}", path.display());
        }
        return Ok(EXIT_OK);
    }

    let mut broken = 0usize;
    for (key, outcome) in validator.preload() {
        let location = registry.location(key);
        match outcome {
            Ok(()) => println!("  OK   {key:<32} {}", location.display()),
            Err(e) => {
                broken += 1;
                println!("  FAIL {key:<32} {}", location.display());
                eprintln!("       {e}");
            }
        }
    }

    println!();
    println!(
        "{} schema(s) compiled with engine {} (contracts {})",
        validator.compiled_count(),
        validator.engine().name(),
        validator.version()
    );

    if broken > 0 {
        tracing::warn!(broken, "schemas failed to load or compile");
        Ok(EXIT_CONFIG)
    } else {
        Ok(EXIT_OK)
    }
}
