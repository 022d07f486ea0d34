// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Open Metadata Archive CLI
//!
//! The `omarchive` binary builds open metadata archives through the dynamic
//! archive service and inspects the documents it produces.
//!
//! ## Commands
//!
//! - `omarchive build --content FILE [--output FILE]` - Build an archive from content
//! - `omarchive inspect FILE` - Print an archive's header and section counts
//! - `omarchive config show|validate|generate` - Configuration management
//! - `omarchive report summarize FILE` - Summarise a discovery report document

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use openmeta_archive::commands::{self, BuildCommand, ConfigCommand, ReportCommand};
use openmeta_archive_core::domain::archive_config::{ArchiveServiceManifest, LoggingConfig};

/// Open Metadata Archive builder
#[derive(Parser)]
#[command(name = "omarchive")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the archive service manifest (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "OPENMETA_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); defaults to the manifest's level
    #[arg(long, global = true, env = "OPENMETA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output format; defaults to the manifest's format
    #[arg(long, global = true, value_parser = ["text", "json"])]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an archive and write it to every configured destination
    #[command(name = "build")]
    Build {
        #[command(flatten)]
        command: BuildCommand,
    },

    /// Print an archive document's header and section counts
    #[command(name = "inspect")]
    Inspect {
        /// Archive JSON document
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Discovery report tools
    #[command(name = "report")]
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A broken manifest is reported by the command itself, not here
    let manifest_logging = ArchiveServiceManifest::load_or_default(cli.config.clone())
        .map(|manifest| manifest.logging())
        .unwrap_or_default();
    let logging = LoggingConfig {
        level: cli.log_level.unwrap_or(manifest_logging.level),
        format: cli.log_format.unwrap_or(manifest_logging.format),
    };
    init_logging(&logging)?;

    match cli.command {
        Some(Commands::Build { command }) => commands::build::handle_command(command, cli.config).await,
        Some(Commands::Inspect { file }) => commands::inspect::handle_command(file).await,
        Some(Commands::Config { command }) => commands::config::handle_command(command, cli.config).await,
        Some(Commands::Report { command }) => commands::report::handle_command(command).await,
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging.
///
/// `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&logging.level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.compact().init();
    }

    Ok(())
}
