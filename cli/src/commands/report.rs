// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Discovery report commands

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use openmeta_discovery::application::{summarize_report, ReportSummary};
use openmeta_discovery::domain::DiscoveryReportDocument;
use openmeta_discovery::infrastructure::InMemoryDiscoveryReportStore;

#[derive(Subcommand)]
pub enum ReportCommand {
    /// Count a report's annotations by kind and status
    Summarize {
        /// Discovery report document (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn handle_command(command: ReportCommand) -> Result<()> {
    match command {
        ReportCommand::Summarize { file, json } => summarize(&file, json).await,
    }
}

/// Load a report document, rejecting annotations anchored to missing elements.
pub fn load_report(path: impl AsRef<Path>) -> Result<DiscoveryReportDocument> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read report {:?}", path))?;
    let document: DiscoveryReportDocument =
        serde_json::from_str(&content).with_context(|| format!("{:?} is not a discovery report document", path))?;

    InMemoryDiscoveryReportStore::from_document(document.clone())
        .with_context(|| format!("Report {:?} is inconsistent", path))?;
    Ok(document)
}

async fn summarize(file: &Path, as_json: bool) -> Result<()> {
    let summary = summarize_report(&load_report(file)?);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print_report_summary(&summary);
    Ok(())
}

fn print_report_summary(summary: &ReportSummary) {
    println!("{}", format!("Discovery report {}", summary.report_name).bold());
    println!("  Status: {:?}", summary.request_status);
    println!("  Data fields: {}", summary.data_fields);
    println!(
        "  Annotations: {} ({} extending annotations, {} on data fields)",
        summary.annotations, summary.extended_annotations, summary.data_field_annotations
    );
    println!("  Divergent: {}", summary.divergent);
    println!("  Average confidence: {:.1}", summary.average_confidence);
    println!();

    println!("{}", "By kind:".bold());
    if summary.by_kind.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for (kind, count) in &summary.by_kind {
        println!("  {}: {}", kind, count);
    }
    println!();

    println!("{}", "By status:".bold());
    if summary.by_status.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for (status, count) in &summary.by_status {
        println!("  {}: {}", status, count);
    }
}
