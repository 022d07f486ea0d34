// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Archive Capability Contracts
//!
//! | Trait | Capability | Implementations |
//! |-------|------------|-----------------|
//! | `ArchiveBuilder` | add/get definitions and instances | `InMemoryArchiveBuilder`, `ArchiveDestination`, `DynamicArchiveService` |
//! | `ArchiveCache` | export the finished archive | `InMemoryArchiveBuilder`, `ArchiveDestination`, `DynamicArchiveService` |
//! | `ArchiveStoreConnector` | persist archive contents | `JsonFileArchiveStore`, `InMemoryArchiveStore` |
//! | `EmbeddedConnector` | generic connector handle | `JsonFileArchiveStore`, `InMemoryArchiveStore` |
//!
//! Lookups return `Ok(None)` when nothing matches; errors are reserved for
//! failures of the underlying store.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::archive::{OpenMetadataArchive, OpenMetadataArchiveProperties};
use crate::domain::instance::{ClassificationEntityExtension, EntityDetail, Relationship};
use crate::domain::typedef::{
    ClassificationDef, CollectionDef, EntityDef, EnumDef, PrimitiveDef, RelationshipDef, TypeDef,
    TypeDefPatch,
};

/// Incremental builder for archive content.
#[async_trait]
pub trait ArchiveBuilder: Send + Sync {
    async fn set_archive_properties(&self, properties: &OpenMetadataArchiveProperties) -> Result<(), ArchiveError>;
    async fn get_archive_properties(&self) -> Result<Option<OpenMetadataArchiveProperties>, ArchiveError>;

    async fn add_primitive_def(&self, def: &PrimitiveDef) -> Result<(), ArchiveError>;
    async fn get_primitive_def(&self, name: &str) -> Result<Option<PrimitiveDef>, ArchiveError>;

    async fn add_collection_def(&self, def: &CollectionDef) -> Result<(), ArchiveError>;
    async fn get_collection_def(&self, name: &str) -> Result<Option<CollectionDef>, ArchiveError>;

    async fn add_enum_def(&self, def: &EnumDef) -> Result<(), ArchiveError>;
    async fn get_enum_def(&self, name: &str) -> Result<Option<EnumDef>, ArchiveError>;

    async fn add_classification_def(&self, def: &ClassificationDef) -> Result<(), ArchiveError>;
    async fn get_classification_def(&self, name: &str) -> Result<Option<ClassificationDef>, ArchiveError>;

    async fn add_entity_def(&self, def: &EntityDef) -> Result<(), ArchiveError>;
    async fn get_entity_def(&self, name: &str) -> Result<Option<EntityDef>, ArchiveError>;

    async fn add_relationship_def(&self, def: &RelationshipDef) -> Result<(), ArchiveError>;
    async fn get_relationship_def(&self, name: &str) -> Result<Option<RelationshipDef>, ArchiveError>;

    /// Find an entity, relationship or classification definition by name
    async fn get_type_def_by_name(&self, name: &str) -> Result<Option<TypeDef>, ArchiveError>;

    async fn add_type_def_patch(&self, patch: &TypeDefPatch) -> Result<(), ArchiveError>;
    async fn get_patch_for_type(&self, type_name: &str) -> Result<Option<TypeDefPatch>, ArchiveError>;

    async fn add_entity(&self, entity: &EntityDetail) -> Result<(), ArchiveError>;
    async fn get_entity(&self, guid: &str) -> Result<Option<EntityDetail>, ArchiveError>;
    /// Absence-tolerant lookup; builders backed by remote stores may make
    /// `get_entity` stricter.
    async fn query_entity(&self, guid: &str) -> Result<Option<EntityDetail>, ArchiveError>;

    async fn add_relationship(&self, relationship: &Relationship) -> Result<(), ArchiveError>;
    async fn get_relationship(&self, guid: &str) -> Result<Option<Relationship>, ArchiveError>;
    async fn query_relationship(&self, guid: &str) -> Result<Option<Relationship>, ArchiveError>;

    async fn add_classification(&self, classification: &ClassificationEntityExtension) -> Result<(), ArchiveError>;
    async fn get_classification(
        &self,
        entity_guid: &str,
        classification_name: &str,
    ) -> Result<Option<ClassificationEntityExtension>, ArchiveError>;
    async fn query_classification(
        &self,
        entity_guid: &str,
        classification_name: &str,
    ) -> Result<Option<ClassificationEntityExtension>, ArchiveError>;
}

/// Exports a finished archive.
#[async_trait]
pub trait ArchiveCache: Send + Sync {
    async fn get_open_metadata_archive(&self) -> Result<Option<OpenMetadataArchive>, ArchiveError>;
}

/// The archive-store capability.
///
/// A store may additionally expose the builder and cache capabilities by
/// overriding [`as_builder`](Self::as_builder) / [`as_cache`](Self::as_cache),
/// e.g. `fn as_builder(self: Arc<Self>) -> Option<Arc<dyn ArchiveBuilder>> { Some(self) }`.
#[async_trait]
pub trait ArchiveStoreConnector: Send + Sync {
    fn connector_name(&self) -> &str;

    fn as_builder(self: Arc<Self>) -> Option<Arc<dyn ArchiveBuilder>> {
        None
    }

    fn as_cache(self: Arc<Self>) -> Option<Arc<dyn ArchiveCache>> {
        None
    }

    /// Read the persisted archive, if any
    async fn get_archive_contents(&self) -> Result<Option<OpenMetadataArchive>, ArchiveError>;

    /// Replace the persisted archive
    async fn set_archive_contents(&self, archive: &OpenMetadataArchive) -> Result<(), ArchiveError>;
}

/// A generic connector supplied to the archive service. Only connectors
/// that return a store from [`as_archive_store`](Self::as_archive_store)
/// become archive destinations.
pub trait EmbeddedConnector: Send + Sync {
    fn connector_name(&self) -> &str;

    fn as_archive_store(self: Arc<Self>) -> Option<Arc<dyn ArchiveStoreConnector>> {
        None
    }
}

/// A failure reported by one destination during a broadcast.
#[derive(Debug)]
pub struct DestinationFailure {
    pub destination: String,
    pub error: ArchiveError,
}

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Duplicate {kind}: {key}")]
    Duplicate { kind: &'static str, key: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Archive service has already been started")]
    AlreadyStarted,

    #[error("Broadcast failed on {} destination(s): {}", .0.len(), describe_failures(.0))]
    Broadcast(Vec<DestinationFailure>),
}

impl ArchiveError {
    pub fn duplicate(kind: &'static str, key: impl Into<String>) -> Self {
        Self::Duplicate { kind, key: key.into() }
    }
}

impl From<serde_json::Error> for ArchiveError {
    fn from(err: serde_json::Error) -> Self {
        ArchiveError::Serialization(err.to_string())
    }
}

fn describe_failures(failures: &[DestinationFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.destination, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}
