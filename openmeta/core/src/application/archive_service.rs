// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Dynamic Archive Service
//!
//! Façade over an ordered list of [`ArchiveDestination`]s, one per embedded
//! connector that offers the archive-store capability.
//!
//! - mutations are broadcast to every destination, sequentially, in order
//! - lookups return the first non-null result; later destinations are not
//!   consulted after a hit
//! - a failing destination is handled according to the configured
//!   [`BroadcastFailurePolicy`]
//!
//! Lifecycle is `Uninitialized → Started`. The destination list is fixed at
//! start and never mutated afterwards.

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

use crate::application::archive_destination::ArchiveDestination;
use crate::domain::archive::{OpenMetadataArchive, OpenMetadataArchiveProperties};
use crate::domain::archive_config::BroadcastFailurePolicy;
use crate::domain::instance::{ClassificationEntityExtension, EntityDetail, Relationship};
use crate::domain::store::{
    ArchiveBuilder, ArchiveCache, ArchiveError, DestinationFailure, EmbeddedConnector,
};
use crate::domain::typedef::{
    ClassificationDef, CollectionDef, EntityDef, EnumDef, PrimitiveDef, RelationshipDef, TypeDef,
    TypeDefPatch,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Uninitialized,
    Started,
}

pub struct DynamicArchiveService {
    policy: BroadcastFailurePolicy,
    destinations: OnceLock<Vec<ArchiveDestination>>,
}

impl DynamicArchiveService {
    pub fn new(policy: BroadcastFailurePolicy) -> Self {
        Self {
            policy,
            destinations: OnceLock::new(),
        }
    }

    pub fn policy(&self) -> BroadcastFailurePolicy {
        self.policy
    }

    pub fn state(&self) -> ServiceState {
        if self.destinations.get().is_some() {
            ServiceState::Started
        } else {
            ServiceState::Uninitialized
        }
    }

    /// Wire one destination per archive-store connector, preserving order.
    /// Connectors without the store capability are skipped.
    ///
    /// Returns the number of destinations created.
    pub fn start(&self, embedded: Vec<Arc<dyn EmbeddedConnector>>) -> Result<usize, ArchiveError> {
        if self.destinations.get().is_some() {
            return Err(ArchiveError::AlreadyStarted);
        }

        let offered = embedded.len();
        let destinations: Vec<ArchiveDestination> = embedded
            .into_iter()
            .filter_map(|connector| {
                let name = connector.connector_name().to_string();
                let store = connector.as_archive_store();
                if store.is_none() {
                    debug!(connector = %name, "Ignoring connector without archive-store capability");
                }
                store
            })
            .map(ArchiveDestination::new)
            .collect();

        let count = destinations.len();
        self.destinations
            .set(destinations)
            .map_err(|_| ArchiveError::AlreadyStarted)?;

        info!(
            destinations = count,
            ignored = offered - count,
            policy = ?self.policy,
            "Archive service started"
        );
        Ok(count)
    }

    /// Active destinations in start order; empty before start.
    pub fn destinations(&self) -> &[ArchiveDestination] {
        self.destinations.get().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Hand buffered content to every destination's connector.
    ///
    /// Returns how many destinations wrote an archive.
    pub async fn flush(&self) -> Result<usize, ArchiveError> {
        let mut written = 0;
        let mut failures = Vec::new();

        for destination in self.destinations() {
            match destination.flush().await {
                Ok(true) => written += 1,
                Ok(false) => {}
                Err(error) => {
                    self.record_failure("flush", destination.name(), &error);
                    match self.policy {
                        BroadcastFailurePolicy::StopOnFirstError => return Err(error),
                        BroadcastFailurePolicy::ContinueOnError => failures.push(DestinationFailure {
                            destination: destination.name().to_string(),
                            error,
                        }),
                    }
                }
            }
        }

        if !failures.is_empty() {
            return Err(ArchiveError::Broadcast(failures));
        }

        info!(written, "Archive service flushed");
        Ok(written)
    }

    async fn broadcast<'s, F>(&'s self, operation: &'static str, op: F) -> Result<(), ArchiveError>
    where
        F: Fn(&'s ArchiveDestination) -> BoxFuture<'s, Result<(), ArchiveError>>,
    {
        let destinations = self.destinations();
        debug!(operation, destinations = destinations.len(), "Broadcasting");
        metrics::counter!("openmeta_archive_broadcast_total", "operation" => operation).increment(1);

        let mut failures = Vec::new();
        for destination in destinations {
            if let Err(error) = op(destination).await {
                self.record_failure(operation, destination.name(), &error);
                match self.policy {
                    BroadcastFailurePolicy::StopOnFirstError => return Err(error),
                    BroadcastFailurePolicy::ContinueOnError => failures.push(DestinationFailure {
                        destination: destination.name().to_string(),
                        error,
                    }),
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ArchiveError::Broadcast(failures))
        }
    }

    async fn first_non_null<'s, T, F>(&'s self, op: F) -> Result<Option<T>, ArchiveError>
    where
        F: Fn(&'s ArchiveDestination) -> BoxFuture<'s, Result<Option<T>, ArchiveError>>,
    {
        for destination in self.destinations() {
            if let Some(found) = op(destination).await? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    fn record_failure(&self, operation: &'static str, destination: &str, error: &ArchiveError) {
        warn!(operation, destination, error = %error, "Destination failed");
        metrics::counter!(
            "openmeta_archive_broadcast_failures_total",
            "operation" => operation,
            "destination" => destination.to_string()
        )
        .increment(1);
    }
}

impl std::fmt::Debug for DynamicArchiveService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicArchiveService")
            .field("policy", &self.policy)
            .field("state", &self.state())
            .field("destinations", &self.destinations())
            .finish()
    }
}

impl Default for DynamicArchiveService {
    fn default() -> Self {
        Self::new(BroadcastFailurePolicy::default())
    }
}

#[async_trait]
impl ArchiveBuilder for DynamicArchiveService {
    async fn set_archive_properties(&self, properties: &OpenMetadataArchiveProperties) -> Result<(), ArchiveError> {
        self.broadcast("set_archive_properties", |d| d.set_archive_properties(properties))
            .await
    }

    async fn get_archive_properties(&self) -> Result<Option<OpenMetadataArchiveProperties>, ArchiveError> {
        self.first_non_null(|d| d.get_archive_properties()).await
    }

    async fn add_primitive_def(&self, def: &PrimitiveDef) -> Result<(), ArchiveError> {
        self.broadcast("add_primitive_def", |d| d.add_primitive_def(def)).await
    }

    async fn get_primitive_def(&self, name: &str) -> Result<Option<PrimitiveDef>, ArchiveError> {
        self.first_non_null(|d| d.get_primitive_def(name)).await
    }

    async fn add_collection_def(&self, def: &CollectionDef) -> Result<(), ArchiveError> {
        self.broadcast("add_collection_def", |d| d.add_collection_def(def)).await
    }

    async fn get_collection_def(&self, name: &str) -> Result<Option<CollectionDef>, ArchiveError> {
        self.first_non_null(|d| d.get_collection_def(name)).await
    }

    async fn add_enum_def(&self, def: &EnumDef) -> Result<(), ArchiveError> {
        self.broadcast("add_enum_def", |d| d.add_enum_def(def)).await
    }

    async fn get_enum_def(&self, name: &str) -> Result<Option<EnumDef>, ArchiveError> {
        self.first_non_null(|d| d.get_enum_def(name)).await
    }

    async fn add_classification_def(&self, def: &ClassificationDef) -> Result<(), ArchiveError> {
        self.broadcast("add_classification_def", |d| d.add_classification_def(def))
            .await
    }

    async fn get_classification_def(&self, name: &str) -> Result<Option<ClassificationDef>, ArchiveError> {
        self.first_non_null(|d| d.get_classification_def(name)).await
    }

    async fn add_entity_def(&self, def: &EntityDef) -> Result<(), ArchiveError> {
        self.broadcast("add_entity_def", |d| d.add_entity_def(def)).await
    }

    async fn get_entity_def(&self, name: &str) -> Result<Option<EntityDef>, ArchiveError> {
        self.first_non_null(|d| d.get_entity_def(name)).await
    }

    async fn add_relationship_def(&self, def: &RelationshipDef) -> Result<(), ArchiveError> {
        self.broadcast("add_relationship_def", |d| d.add_relationship_def(def)).await
    }

    async fn get_relationship_def(&self, name: &str) -> Result<Option<RelationshipDef>, ArchiveError> {
        self.first_non_null(|d| d.get_relationship_def(name)).await
    }

    async fn get_type_def_by_name(&self, name: &str) -> Result<Option<TypeDef>, ArchiveError> {
        self.first_non_null(|d| d.get_type_def_by_name(name)).await
    }

    async fn add_type_def_patch(&self, patch: &TypeDefPatch) -> Result<(), ArchiveError> {
        self.broadcast("add_type_def_patch", |d| d.add_type_def_patch(patch)).await
    }

    async fn get_patch_for_type(&self, type_name: &str) -> Result<Option<TypeDefPatch>, ArchiveError> {
        self.first_non_null(|d| d.get_patch_for_type(type_name)).await
    }

    async fn add_entity(&self, entity: &EntityDetail) -> Result<(), ArchiveError> {
        self.broadcast("add_entity", |d| d.add_entity(entity)).await
    }

    async fn get_entity(&self, guid: &str) -> Result<Option<EntityDetail>, ArchiveError> {
        self.first_non_null(|d| d.get_entity(guid)).await
    }

    async fn query_entity(&self, guid: &str) -> Result<Option<EntityDetail>, ArchiveError> {
        self.first_non_null(|d| d.query_entity(guid)).await
    }

    async fn add_relationship(&self, relationship: &Relationship) -> Result<(), ArchiveError> {
        self.broadcast("add_relationship", |d| d.add_relationship(relationship))
            .await
    }

    async fn get_relationship(&self, guid: &str) -> Result<Option<Relationship>, ArchiveError> {
        self.first_non_null(|d| d.get_relationship(guid)).await
    }

    async fn query_relationship(&self, guid: &str) -> Result<Option<Relationship>, ArchiveError> {
        self.first_non_null(|d| d.query_relationship(guid)).await
    }

    async fn add_classification(&self, classification: &ClassificationEntityExtension) -> Result<(), ArchiveError> {
        self.broadcast("add_classification", |d| d.add_classification(classification))
            .await
    }

    async fn get_classification(
        &self,
        entity_guid: &str,
        classification_name: &str,
    ) -> Result<Option<ClassificationEntityExtension>, ArchiveError> {
        self.first_non_null(|d| d.get_classification(entity_guid, classification_name))
            .await
    }

    async fn query_classification(
        &self,
        entity_guid: &str,
        classification_name: &str,
    ) -> Result<Option<ClassificationEntityExtension>, ArchiveError> {
        self.first_non_null(|d| d.query_classification(entity_guid, classification_name))
            .await
    }
}

#[async_trait]
impl ArchiveCache for DynamicArchiveService {
    /// The first destination whose export is non-null wins.
    async fn get_open_metadata_archive(&self) -> Result<Option<OpenMetadataArchive>, ArchiveError> {
        self.first_non_null(|d| d.get_open_metadata_archive()).await
    }
}
