// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! JSON File Archive Store
//!
//! Archive-store connector that persists a whole archive as one JSON
//! document. It has no builder capability, so an `ArchiveDestination`
//! wrapping it buffers content in memory and writes on flush.
//!
//! Writes go to a sibling temporary file first and are renamed into place,
//! so readers never observe a half-written archive.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::archive::OpenMetadataArchive;
use crate::domain::store::{ArchiveError, ArchiveStoreConnector, EmbeddedConnector};

#[derive(Debug, Clone)]
pub struct JsonFileArchiveStore {
    name: String,
    path: PathBuf,
    pretty: bool,
}

impl JsonFileArchiveStore {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            pretty,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "archive.json".into());
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }
}

impl EmbeddedConnector for JsonFileArchiveStore {
    fn connector_name(&self) -> &str {
        &self.name
    }

    fn as_archive_store(self: Arc<Self>) -> Option<Arc<dyn ArchiveStoreConnector>> {
        Some(self)
    }
}

#[async_trait]
impl ArchiveStoreConnector for JsonFileArchiveStore {
    fn connector_name(&self) -> &str {
        &self.name
    }

    async fn get_archive_contents(&self) -> Result<Option<OpenMetadataArchive>, ArchiveError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No archive file at {:?}", self.path);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let archive = serde_json::from_slice(&bytes)?;
        Ok(Some(archive))
    }

    async fn set_archive_contents(&self, archive: &OpenMetadataArchive) -> Result<(), ArchiveError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(archive)?
        } else {
            serde_json::to_vec(archive)?
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        info!(
            destination = %self.name,
            path = ?self.path,
            bytes = bytes.len(),
            "Archive written"
        );
        Ok(())
    }
}
