// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! In-Memory Archive Store
//!
//! Archive-store connector that keeps the last written archive in process
//! memory. Used for dry runs and tests.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::domain::archive::OpenMetadataArchive;
use crate::domain::store::{ArchiveError, ArchiveStoreConnector, EmbeddedConnector};

#[derive(Debug)]
pub struct InMemoryArchiveStore {
    name: String,
    contents: RwLock<Option<OpenMetadataArchive>>,
}

impl InMemoryArchiveStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: RwLock::new(None),
        }
    }

    /// Seed the store with existing contents
    pub fn with_contents(name: impl Into<String>, archive: OpenMetadataArchive) -> Self {
        Self {
            name: name.into(),
            contents: RwLock::new(Some(archive)),
        }
    }
}

impl EmbeddedConnector for InMemoryArchiveStore {
    fn connector_name(&self) -> &str {
        &self.name
    }

    fn as_archive_store(self: Arc<Self>) -> Option<Arc<dyn ArchiveStoreConnector>> {
        Some(self)
    }
}

#[async_trait]
impl ArchiveStoreConnector for InMemoryArchiveStore {
    fn connector_name(&self) -> &str {
        &self.name
    }

    async fn get_archive_contents(&self) -> Result<Option<OpenMetadataArchive>, ArchiveError> {
        Ok(self.contents.read().clone())
    }

    async fn set_archive_contents(&self, archive: &OpenMetadataArchive) -> Result<(), ArchiveError> {
        *self.contents.write() = Some(archive.clone());
        Ok(())
    }
}
