// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Archive build command
//!
//! Checks the content's governance definitions against the program rules,
//! starts a dynamic archive service over the manifest's destinations, replays
//! the content file into it and flushes every buffered destination.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use colored::Colorize;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use openmeta_archive_core::application::{create_archive_service, replay_archive, ReplaySummary};
use openmeta_archive_core::domain::archive::{ArchiveSummary, OpenMetadataArchive};
use openmeta_archive_core::domain::archive_config::{ArchiveServiceManifest, DestinationConfig, DestinationKind};
use openmeta_archive_core::domain::store::{ArchiveBuilder, ArchiveCache};
use openmeta_governance::application::{
    load_definitions, publish_definitions, GovernanceProgramService, StandardGovernanceProgramService,
};
use openmeta_governance::domain::GovernanceDefinition;
use openmeta_governance::infrastructure::{InMemoryCertificationRepository, InMemoryGovernanceDefinitionRepository};

/// Destination name used for `--output`
pub const OUTPUT_DESTINATION: &str = "cli-output";

#[derive(Args)]
pub struct BuildCommand {
    /// Content to add: an archive and/or governance definitions (JSON)
    #[arg(long, value_name = "FILE")]
    pub content: Option<PathBuf>,

    /// Additionally write the archive to this JSON file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Content file layout
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildContent {
    #[serde(default)]
    pub archive: Option<OpenMetadataArchive>,

    #[serde(default)]
    pub governance_definitions: Vec<GovernanceDefinition>,
}

impl BuildContent {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read content file {:?}", path))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse content file {:?}", path))
    }
}

#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub destinations: usize,
    pub replayed: Option<ReplaySummary>,
    pub definitions: usize,
    /// Section counts of the archive as exported by the first exporting destination
    pub archive: Option<ArchiveSummary>,
    /// Destinations whose archive was written by the flush
    pub written: usize,
}

/// Add `--output` to the manifest as one more JSON file destination
pub fn with_output(manifest: &mut ArchiveServiceManifest, output: PathBuf) {
    manifest.spec.destinations.push(DestinationConfig {
        name: OUTPUT_DESTINATION.to_string(),
        kind: DestinationKind::JsonFile {
            path: output,
            pretty: true,
        },
    });
}

/// Load the content's definitions into a fresh in-memory governance program.
///
/// Every definition receives a program-assigned guid; parent references
/// inside the batch follow the reassignment.
pub async fn load_program(definitions: &[GovernanceDefinition]) -> Result<Vec<GovernanceDefinition>> {
    let program = StandardGovernanceProgramService::new(
        Arc::new(InMemoryGovernanceDefinitionRepository::new()),
        Arc::new(InMemoryCertificationRepository::new()),
    );
    load_definitions(&program, definitions)
        .await
        .context("Governance definitions violate program rules")?;
    program.list_all_definitions().await
}

/// Run one build session.
///
/// Governance definitions are checked before any destination starts, so a
/// rejected program leaves nothing written. Content is replayed first; the
/// manifest's archive header is set afterwards so it replaces any properties
/// the content carried.
pub async fn build_archive(manifest: &ArchiveServiceManifest, content: &BuildContent) -> Result<BuildOutcome> {
    manifest.validate().context("Configuration validation failed")?;

    let governance_definitions = load_program(&content.governance_definitions).await?;

    let service = create_archive_service(&manifest.spec).context("Failed to start archive service")?;
    let destinations = service.destinations().len();

    let replayed = match &content.archive {
        Some(archive) => Some(
            replay_archive(archive, &service)
                .await
                .context("Failed to replay archive content")?,
        ),
        None => None,
    };

    let definitions = publish_definitions(&governance_definitions, &service)
        .await
        .context("Failed to publish governance definitions")?;

    if let Some(header) = &manifest.spec.archive {
        service
            .set_archive_properties(&header.to_properties(Utc::now()))
            .await
            .context("Failed to set archive properties")?;
    }

    let archive = service
        .get_open_metadata_archive()
        .await
        .context("Failed to export archive")?
        .map(|archive| archive.summary());

    let written = service.flush().await.context("Failed to flush destinations")?;

    info!(destinations, definitions, written, "Archive build complete");

    Ok(BuildOutcome {
        destinations,
        replayed,
        definitions,
        archive,
        written,
    })
}

pub async fn handle_command(command: BuildCommand, config_override: Option<PathBuf>) -> Result<()> {
    let mut manifest =
        ArchiveServiceManifest::load_or_default(config_override).context("Failed to load configuration")?;
    if let Some(output) = command.output {
        with_output(&mut manifest, output);
    }

    let content = match &command.content {
        Some(path) => BuildContent::from_json_file(path)?,
        None => BuildContent::default(),
    };

    let outcome = build_archive(&manifest, &content).await?;

    println!("{}", "Archive build:".bold());
    println!("  Service: {}", manifest.metadata.name);
    println!("  Destinations: {}", outcome.destinations);
    if let Some(replayed) = &outcome.replayed {
        println!("  Replayed elements: {}", replayed.total());
    }
    println!("  Governance definitions: {}", outcome.definitions);

    match &outcome.archive {
        Some(summary) => {
            println!();
            print_summary(summary);
        }
        None => println!("  {}", "(no destination exports its archive)".dimmed()),
    }

    println!();
    println!(
        "{}",
        format!("✓ Archive written to {} destination(s)", outcome.written).green()
    );

    Ok(())
}

pub(crate) fn print_summary(summary: &ArchiveSummary) {
    println!("{}", "Sections:".bold());
    println!("  Attribute type defs: {}", summary.attribute_type_defs);
    println!("  Type defs: {}", summary.type_defs);
    println!("  Type def patches: {}", summary.type_def_patches);
    println!("  Entities: {}", summary.entities);
    println!("  Relationships: {}", summary.relationships);
    println!("  Classifications: {}", summary.classifications);
}
