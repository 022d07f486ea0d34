// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use openmeta_archive_core::domain::archive_config::{ArchiveServiceManifest, DestinationKind};

pub const MINIMAL_TEMPLATE: &str = include_str!("../../templates/archive-minimal.yaml");
pub const EXAMPLES_TEMPLATE: &str = include_str!("../../templates/archive-with-examples.yaml");

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./openmeta-archive.yaml)
        #[arg(short, long, default_value = "./openmeta-archive.yaml")]
        output: PathBuf,

        /// Include examples and comments
        #[arg(long)]
        examples: bool,

        /// Replace an existing file at the output path
        #[arg(long)]
        force: bool,
    },
}

pub async fn handle_command(command: ConfigCommand, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate {
            output,
            examples,
            force,
        } => generate(output, examples, force).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = ArchiveServiceManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Manifest search order:".bold());
        match &config_override {
            Some(path) => println!("  --config {}", path.display()),
            None => println!("  --config {}", "(not set)".dimmed()),
        }
        for candidate in ArchiveServiceManifest::candidate_paths() {
            let marker = if candidate.is_file() { "found".green() } else { "absent".dimmed() };
            println!("  {} [{}]", candidate.display(), marker);
        }
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Service:".bold());
    println!("  Name: {}", config.metadata.name);
    if let Some(version) = &config.metadata.version {
        println!("  Version: {}", version);
    }
    println!();

    println!("{}", "Archive header:".bold());
    match &config.spec.archive {
        Some(archive) => {
            println!("  Name: {}", archive.name);
            println!("  GUID: {}", archive.guid.as_deref().unwrap_or("(generated per build)"));
            println!("  Type: {:?}", archive.archive_type);
            println!("  Originator: {}", archive.originator_name);
            if !archive.depends_on.is_empty() {
                println!("  Depends on: {}", archive.depends_on.join(", "));
            }
        }
        None => println!("  {}", "(none)".dimmed()),
    }
    println!();

    println!("{}", "Destinations:".bold());
    for destination in &config.spec.destinations {
        match &destination.kind {
            DestinationKind::JsonFile { path, pretty } => println!(
                "  {} (json-file) → {}{}",
                destination.name.bold(),
                path.display(),
                if *pretty { "" } else { " [compact]" }
            ),
            DestinationKind::InMemory => println!("  {} (in-memory)", destination.name.bold()),
        }
    }
    println!();

    let logging = config.logging();
    println!("{}", "Broadcast:".bold());
    println!("  Failure policy: {:?}", config.spec.broadcast.failure_policy);
    println!();
    println!("{}", "Logging:".bold());
    println!("  Level: {}", logging.level);
    println!("  Format: {}", logging.format);
    println!();

    Ok(())
}

/// Load a manifest and run its structural checks
pub fn check_manifest(config_path: Option<PathBuf>) -> Result<ArchiveServiceManifest> {
    let manifest = ArchiveServiceManifest::load_or_default(config_path)
        .context("Failed to load archive service manifest")?;
    manifest.validate().context("Archive service manifest is invalid")?;
    Ok(manifest)
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    let manifest = check_manifest(config_path)?;

    let header = match &manifest.spec.archive {
        Some(archive) => format!("header '{}'", archive.name),
        None => "no header".to_string(),
    };
    println!(
        "{}",
        format!(
            "✓ {}: {} destination(s), {}",
            manifest.metadata.name,
            manifest.spec.destinations.len(),
            header
        )
        .green()
    );

    Ok(())
}

async fn generate(output: PathBuf, with_examples: bool, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!("{} already exists (use --force to replace it)", output.display());
    }

    let template = if with_examples { EXAMPLES_TEMPLATE } else { MINIMAL_TEMPLATE };
    std::fs::write(&output, template).with_context(|| format!("Cannot write manifest to {}", output.display()))?;

    println!("{}", format!("✓ Manifest template written to {}", output.display()).green());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_are_valid_manifests() {
        for template in [MINIMAL_TEMPLATE, EXAMPLES_TEMPLATE] {
            let manifest = ArchiveServiceManifest::from_yaml_str(template).unwrap();
            manifest.validate().unwrap();
        }
    }

    #[tokio::test]
    async fn test_generate_writes_template() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("openmeta-archive.yaml");

        generate(output.clone(), true, false).await.unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, EXAMPLES_TEMPLATE);

        let err = generate(output.clone(), false, false).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));

        generate(output.clone(), false, true).await.unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), MINIMAL_TEMPLATE);
    }

    #[test]
    fn test_check_manifest_reports_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive.yaml");

        std::fs::write(&path, MINIMAL_TEMPLATE).unwrap();
        let manifest = check_manifest(Some(path.clone())).unwrap();
        assert!(!manifest.spec.destinations.is_empty());

        let mut broken = manifest.clone();
        broken.spec.destinations.clear();
        broken.to_yaml_file(&path).unwrap();
        let err = check_manifest(Some(path)).unwrap_err();
        assert!(err.to_string().contains("invalid"));
    }
}
