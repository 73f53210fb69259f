//! # dwp CLI entry point
//!
//! Parses command-line arguments, resolves `config.yml`, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use dwp_cli::schemas::{run_schemas, SchemasArgs};
use dwp_cli::show_config::run_show_config;
use dwp_cli::validate::{run_validate, ValidateArgs};
use dwp_cli::{resolve_config, EXIT_CONFIG};
use dwp_contracts::ContractValidator;

/// Digital Waste Passport contracts CLI
///
/// Validates passport and recycler documents against the JSON Schemas
/// generated from the repository's SHACL shapes.
#[derive(Parser, Debug)]
#[command(name = "dwp", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config.yml. Searched for upward from the current directory when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the generated schema documents.
    #[arg(long, global = true)]
    schema_dir: Option<PathBuf>,

    /// Log output format on stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate documents against a schema key.
    Validate(ValidateArgs),

    /// List schema keys and check that every schema compiles.
    Schemas(SchemasArgs),

    /// Print the resolved configuration.
    ShowConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    tracing::debug!("dwp CLI v{} starting", dwp_contracts::VERSION);

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = match resolve_config(cli.config.as_deref(), cli.schema_dir.as_deref(), &cwd) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    tracing::debug!(
        workspace_root = %config.workspace_root().display(),
        schema_dir = %config.schema_dir().display(),
        "resolved configuration"
    );

    let result = match cli.command {
        Commands::Validate(args) => {
            let validator = ContractValidator::from_config(&config);
            run_validate(&args, &validator, config.workspace_root())
        }
        Commands::Schemas(args) => {
            let validator = ContractValidator::from_config(&config);
            run_schemas(&args, &validator)
        }
        Commands::ShowConfig => run_show_config(&config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_CONFIG)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_format_defaults_to_text_and_accepts_json() {
        let cli = Cli::try_parse_from(["dwp", "show-config"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Text);

        let cli = Cli::try_parse_from(["dwp", "--log-format", "json", "-vv", "show-config"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.verbose, 2);

        assert!(Cli::try_parse_from(["dwp", "--log-format", "xml", "show-config"]).is_err());
    }
}
