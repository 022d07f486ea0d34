// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Archive Destination Adapter
//!
//! Presents the full builder + cache capability over one store connector,
//! whatever that connector supports natively.
//!
//! The builder is resolved once, at construction:
//! - a connector that exposes its own builder is used directly (and its cache,
//!   if it has one)
//! - otherwise the destination owns an [`InMemoryArchiveBuilder`] that serves
//!   as both builder and cache; [`ArchiveDestination::flush`] hands the
//!   buffered archive to the connector
//!
//! Every call is a pass-through. Errors from the underlying builder propagate
//! unchanged.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::domain::archive::{OpenMetadataArchive, OpenMetadataArchiveProperties};
use crate::domain::instance::{ClassificationEntityExtension, EntityDetail, Relationship};
use crate::domain::store::{ArchiveBuilder, ArchiveCache, ArchiveError, ArchiveStoreConnector};
use crate::domain::typedef::{
    ClassificationDef, CollectionDef, EntityDef, EnumDef, PrimitiveDef, RelationshipDef, TypeDef,
    TypeDefPatch,
};
use crate::infrastructure::in_memory_builder::InMemoryArchiveBuilder;

pub struct ArchiveDestination {
    name: String,
    connector: Arc<dyn ArchiveStoreConnector>,
    builder: Arc<dyn ArchiveBuilder>,
    cache: Option<Arc<dyn ArchiveCache>>,
    buffered: bool,
}

impl ArchiveDestination {
    pub fn new(connector: Arc<dyn ArchiveStoreConnector>) -> Self {
        let name = connector.connector_name().to_string();

        match connector.clone().as_builder() {
            Some(builder) => {
                let cache = connector.clone().as_cache();
                debug!(destination = %name, exportable = cache.is_some(), "Using connector's own builder");
                Self {
                    name,
                    connector,
                    builder,
                    cache,
                    buffered: false,
                }
            }
            None => {
                debug!(destination = %name, "Connector cannot build; buffering in memory");
                let local = Arc::new(InMemoryArchiveBuilder::new());
                Self {
                    name,
                    connector,
                    builder: local.clone(),
                    cache: Some(local),
                    buffered: true,
                }
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when content is buffered in a locally owned builder.
    pub fn is_buffered(&self) -> bool {
        self.buffered
    }

    /// True when the destination can export a finished archive.
    pub fn is_exportable(&self) -> bool {
        self.cache.is_some()
    }

    /// Write buffered content to the connector.
    ///
    /// Returns `Ok(false)` for destinations that build directly in their
    /// store, since there is nothing buffered to hand over.
    pub async fn flush(&self) -> Result<bool, ArchiveError> {
        if !self.buffered {
            return Ok(false);
        }

        let Some(cache) = &self.cache else {
            return Ok(false);
        };

        match cache.get_open_metadata_archive().await? {
            Some(archive) => {
                self.connector.set_archive_contents(&archive).await?;
                debug!(destination = %self.name, entries = archive.summary().total(), "Flushed archive");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Contents currently persisted by the connector
    pub async fn stored_contents(&self) -> Result<Option<OpenMetadataArchive>, ArchiveError> {
        self.connector.get_archive_contents().await
    }
}

impl std::fmt::Debug for ArchiveDestination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveDestination")
            .field("name", &self.name)
            .field("buffered", &self.buffered)
            .field("exportable", &self.cache.is_some())
            .finish()
    }
}

#[async_trait]
impl ArchiveBuilder for ArchiveDestination {
    async fn set_archive_properties(&self, properties: &OpenMetadataArchiveProperties) -> Result<(), ArchiveError> {
        self.builder.set_archive_properties(properties).await
    }

    async fn get_archive_properties(&self) -> Result<Option<OpenMetadataArchiveProperties>, ArchiveError> {
        self.builder.get_archive_properties().await
    }

    async fn add_primitive_def(&self, def: &PrimitiveDef) -> Result<(), ArchiveError> {
        self.builder.add_primitive_def(def).await
    }

    async fn get_primitive_def(&self, name: &str) -> Result<Option<PrimitiveDef>, ArchiveError> {
        self.builder.get_primitive_def(name).await
    }

    async fn add_collection_def(&self, def: &CollectionDef) -> Result<(), ArchiveError> {
        self.builder.add_collection_def(def).await
    }

    async fn get_collection_def(&self, name: &str) -> Result<Option<CollectionDef>, ArchiveError> {
        self.builder.get_collection_def(name).await
    }

    async fn add_enum_def(&self, def: &EnumDef) -> Result<(), ArchiveError> {
        self.builder.add_enum_def(def).await
    }

    async fn get_enum_def(&self, name: &str) -> Result<Option<EnumDef>, ArchiveError> {
        self.builder.get_enum_def(name).await
    }

    async fn add_classification_def(&self, def: &ClassificationDef) -> Result<(), ArchiveError> {
        self.builder.add_classification_def(def).await
    }

    async fn get_classification_def(&self, name: &str) -> Result<Option<ClassificationDef>, ArchiveError> {
        self.builder.get_classification_def(name).await
    }

    async fn add_entity_def(&self, def: &EntityDef) -> Result<(), ArchiveError> {
        self.builder.add_entity_def(def).await
    }

    async fn get_entity_def(&self, name: &str) -> Result<Option<EntityDef>, ArchiveError> {
        self.builder.get_entity_def(name).await
    }

    async fn add_relationship_def(&self, def: &RelationshipDef) -> Result<(), ArchiveError> {
        self.builder.add_relationship_def(def).await
    }

    async fn get_relationship_def(&self, name: &str) -> Result<Option<RelationshipDef>, ArchiveError> {
        self.builder.get_relationship_def(name).await
    }

    async fn get_type_def_by_name(&self, name: &str) -> Result<Option<TypeDef>, ArchiveError> {
        self.builder.get_type_def_by_name(name).await
    }

    async fn add_type_def_patch(&self, patch: &TypeDefPatch) -> Result<(), ArchiveError> {
        self.builder.add_type_def_patch(patch).await
    }

    async fn get_patch_for_type(&self, type_name: &str) -> Result<Option<TypeDefPatch>, ArchiveError> {
        self.builder.get_patch_for_type(type_name).await
    }

    async fn add_entity(&self, entity: &EntityDetail) -> Result<(), ArchiveError> {
        self.builder.add_entity(entity).await
    }

    async fn get_entity(&self, guid: &str) -> Result<Option<EntityDetail>, ArchiveError> {
        self.builder.get_entity(guid).await
    }

    async fn query_entity(&self, guid: &str) -> Result<Option<EntityDetail>, ArchiveError> {
        self.builder.query_entity(guid).await
    }

    async fn add_relationship(&self, relationship: &Relationship) -> Result<(), ArchiveError> {
        self.builder.add_relationship(relationship).await
    }

    async fn get_relationship(&self, guid: &str) -> Result<Option<Relationship>, ArchiveError> {
        self.builder.get_relationship(guid).await
    }

    async fn query_relationship(&self, guid: &str) -> Result<Option<Relationship>, ArchiveError> {
        self.builder.query_relationship(guid).await
    }

    async fn add_classification(&self, classification: &ClassificationEntityExtension) -> Result<(), ArchiveError> {
        self.builder.add_classification(classification).await
    }

    async fn get_classification(
        &self,
        entity_guid: &str,
        classification_name: &str,
    ) -> Result<Option<ClassificationEntityExtension>, ArchiveError> {
        self.builder.get_classification(entity_guid, classification_name).await
    }

    async fn query_classification(
        &self,
        entity_guid: &str,
        classification_name: &str,
    ) -> Result<Option<ClassificationEntityExtension>, ArchiveError> {
        self.builder.query_classification(entity_guid, classification_name).await
    }
}

#[async_trait]
impl ArchiveCache for ArchiveDestination {
    async fn get_open_metadata_archive(&self) -> Result<Option<OpenMetadataArchive>, ArchiveError> {
        match &self.cache {
            Some(cache) => cache.get_open_metadata_archive().await,
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::archive::OpenMetadataArchiveType;
    use crate::infrastructure::in_memory_store::InMemoryArchiveStore;
    use chrono::{TimeZone, Utc};

    /// Store connector that builds directly in its own state but cannot export.
    struct StreamingStore {
        builder: Arc<InMemoryArchiveBuilder>,
    }

    #[async_trait]
    impl ArchiveStoreConnector for StreamingStore {
        fn connector_name(&self) -> &str {
            "streaming"
        }

        fn as_builder(self: Arc<Self>) -> Option<Arc<dyn ArchiveBuilder>> {
            Some(self.builder.clone())
        }

        async fn get_archive_contents(&self) -> Result<Option<OpenMetadataArchive>, ArchiveError> {
            Ok(None)
        }

        async fn set_archive_contents(&self, _archive: &OpenMetadataArchive) -> Result<(), ArchiveError> {
            Err(ArchiveError::Store("streaming store cannot accept snapshots".to_string()))
        }
    }

    fn properties() -> OpenMetadataArchiveProperties {
        OpenMetadataArchiveProperties {
            archive_guid: "9f1c2d3e-1111-4222-8333-444455556666".to_string(),
            archive_name: "Governance Pack".to_string(),
            archive_description: Some("Governance definitions".to_string()),
            archive_type: OpenMetadataArchiveType::ContentPack,
            archive_version: Some("2.1".to_string()),
            originator_name: "Governance Office".to_string(),
            originator_license: Some("Apache-2.0".to_string()),
            creation_date: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            depends_on_archives: vec!["core-types".to_string(), "glossary-pack".to_string()],
        }
    }

    #[tokio::test]
    async fn test_connector_without_builder_gets_in_memory_default() {
        let destination = ArchiveDestination::new(Arc::new(InMemoryArchiveStore::new("memory")));
        assert!(destination.is_buffered());
        assert!(destination.is_exportable());

        assert!(destination.get_entity_def("X").await.unwrap().is_none());
        destination.add_entity_def(&EntityDef::new("guid-x", "X", 1)).await.unwrap();
        assert_eq!(
            destination.get_entity_def("X").await.unwrap().map(|d| d.header.guid),
            Some("guid-x".to_string())
        );
    }

    #[tokio::test]
    async fn test_properties_round_trip_exactly() {
        let destination = ArchiveDestination::new(Arc::new(InMemoryArchiveStore::new("memory")));
        let supplied = properties();

        destination.set_archive_properties(&supplied).await.unwrap();

        assert_eq!(destination.get_archive_properties().await.unwrap(), Some(supplied));
    }

    #[tokio::test]
    async fn test_flush_hands_archive_to_connector() {
        let store = Arc::new(InMemoryArchiveStore::new("memory"));
        let destination = ArchiveDestination::new(store.clone());
        destination.set_archive_properties(&properties()).await.unwrap();
        destination.add_entity_def(&EntityDef::new("guid-asset", "Asset", 1)).await.unwrap();

        assert!(destination.flush().await.unwrap());

        let stored = store.get_archive_contents().await.unwrap().unwrap();
        assert_eq!(stored.archive_name(), Some("Governance Pack"));
        assert_eq!(stored.summary().type_defs, 1);
        assert_eq!(destination.stored_contents().await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn test_connector_builder_used_directly_without_export() {
        let store = Arc::new(StreamingStore {
            builder: Arc::new(InMemoryArchiveBuilder::new()),
        });
        let destination = ArchiveDestination::new(store.clone());
        assert!(!destination.is_buffered());
        assert!(!destination.is_exportable());

        destination.add_entity_def(&EntityDef::new("guid-asset", "Asset", 1)).await.unwrap();

        // Content landed in the connector's own builder
        assert!(store.builder.get_entity_def("Asset").await.unwrap().is_some());
        assert!(destination.get_open_metadata_archive().await.unwrap().is_none());
        assert!(!destination.flush().await.unwrap());
    }
}
