// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Archive inspection command

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use openmeta_archive_core::domain::archive::OpenMetadataArchive;

use super::build::print_summary;

pub fn load_archive(path: impl AsRef<Path>) -> Result<OpenMetadataArchive> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read archive {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("{:?} is not an open metadata archive", path))
}

pub async fn handle_command(file: PathBuf) -> Result<()> {
    let archive = load_archive(&file)?;

    println!("{}", format!("Archive {}", file.display()).bold());
    println!();

    match &archive.archive_properties {
        Some(properties) => {
            println!("{}", "Header:".bold());
            println!("  GUID: {}", properties.archive_guid);
            println!("  Name: {}", properties.archive_name);
            if let Some(description) = &properties.archive_description {
                println!("  Description: {}", description);
            }
            println!("  Type: {:?}", properties.archive_type);
            if let Some(version) = &properties.archive_version {
                println!("  Version: {}", version);
            }
            println!("  Originator: {}", properties.originator_name);
            if let Some(license) = &properties.originator_license {
                println!("  License: {}", license);
            }
            println!("  Created: {}", properties.creation_date.to_rfc3339());
            if !properties.depends_on_archives.is_empty() {
                println!("  Depends on: {}", properties.depends_on_archives.join(", "));
            }
        }
        None => println!("{}", "(no archive properties)".dimmed()),
    }
    println!();

    let summary = archive.summary();
    print_summary(&summary);
    println!("  Total: {}", summary.total());

    Ok(())
}
