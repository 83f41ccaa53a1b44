// SPDX-FileCopyrightText: 2026 Provisio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provisio - inspect and validate provider declaration files.
//!
//! This is the binary entry point for the `provisio` command.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use provisio_config::LoadError;
use provisio_core::RegistryError;
use provisio_registry::DEFAULT_SECTION;

/// Provisio - inspect and validate provider declaration files.
#[derive(Parser, Debug)]
#[command(name = "provisio", version, about, long_about = None)]
struct Cli {
    /// Declaration file (default: ./provisio.toml, then the user config dir).
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Section of the file holding the declarations.
    #[arg(long, short, global = true, default_value = DEFAULT_SECTION)]
    section: String,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List declared providers, marking the default.
    List,
    /// Load and validate the declarations.
    Check,
    /// Print the name of the default provider.
    Default,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let path = commands::resolve_config_path(cli.config);
    tracing::debug!(path = %path.display(), section = %cli.section, "using declaration file");
    let registry = commands::open(&path, &cli.section);

    let result = match cli.command {
        Commands::List => commands::list(&registry),
        Commands::Check => commands::check(&registry),
        Commands::Default => commands::default(&registry),
    };

    match result {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

/// Render configuration problems as diagnostics, anything else as one line.
fn report(err: &RegistryError) {
    if let RegistryError::Source { source, .. } = err
        && let Some(load) = source.downcast_ref::<LoadError>()
    {
        provisio_config::render(load);
        return;
    }
    eprintln!("error: {err}");
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "provisio={log_level},provisio_registry={log_level},provisio_config={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
