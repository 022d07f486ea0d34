// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! In-Memory Archive Builder
//!
//! Default builder and cache used by an `ArchiveDestination` whose store
//! connector cannot build incrementally. Content is kept in insertion order
//! so the exported archive lists definitions in the order they were added.
//!
//! Duplicate handling:
//! - type names and type guids are unique across all six definition kinds
//! - one patch per type name
//! - entity and relationship guids, and classification keys, are unique
//!
//! `set_archive_properties` overwrites any earlier header (last call wins).

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::borrow::Borrow;
use std::hash::Hash;

use crate::domain::archive::{
    OpenMetadataArchive, OpenMetadataArchiveInstanceStore, OpenMetadataArchiveProperties,
    OpenMetadataArchiveTypeStore,
};
use crate::domain::instance::{ClassificationEntityExtension, ClassificationKey, EntityDetail, Relationship};
use crate::domain::store::{ArchiveBuilder, ArchiveCache, ArchiveError};
use crate::domain::typedef::{
    AttributeTypeDef, ClassificationDef, CollectionDef, EntityDef, EnumDef, PrimitiveDef,
    RelationshipDef, TypeDef, TypeDefPatch,
};

/// Insertion-ordered map.
#[derive(Debug)]
struct OrderedIndex<K, V> {
    items: Vec<V>,
    positions: HashMap<K, usize>,
}

impl<K: Eq + Hash, V> OrderedIndex<K, V> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            positions: HashMap::new(),
        }
    }

    fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.contains_key(key)
    }

    fn insert(&mut self, key: K, value: V) {
        self.positions.insert(key, self.items.len());
        self.items.push(value);
    }

    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.get(key).map(|&i| &self.items[i])
    }

    fn values(&self) -> &[V] {
        &self.items
    }
}

#[derive(Debug)]
struct BuilderState {
    properties: Option<OpenMetadataArchiveProperties>,
    type_names: HashSet<String>,
    type_guids: HashSet<String>,
    attribute_type_defs: OrderedIndex<String, AttributeTypeDef>,
    type_defs: OrderedIndex<String, TypeDef>,
    patches: OrderedIndex<String, TypeDefPatch>,
    entities: OrderedIndex<String, EntityDetail>,
    relationships: OrderedIndex<String, Relationship>,
    classifications: OrderedIndex<ClassificationKey, ClassificationEntityExtension>,
}

impl BuilderState {
    fn new() -> Self {
        Self {
            properties: None,
            type_names: HashSet::new(),
            type_guids: HashSet::new(),
            attribute_type_defs: OrderedIndex::new(),
            type_defs: OrderedIndex::new(),
            patches: OrderedIndex::new(),
            entities: OrderedIndex::new(),
            relationships: OrderedIndex::new(),
            classifications: OrderedIndex::new(),
        }
    }

    fn claim_type_identity(&mut self, kind: &'static str, name: &str, guid: &str) -> Result<(), ArchiveError> {
        if self.type_names.contains(name) {
            return Err(ArchiveError::duplicate(kind, name));
        }
        if self.type_guids.contains(guid) {
            return Err(ArchiveError::duplicate(kind, guid));
        }
        self.type_names.insert(name.to_string());
        self.type_guids.insert(guid.to_string());
        Ok(())
    }

    fn add_attribute_type_def(&mut self, def: AttributeTypeDef) -> Result<(), ArchiveError> {
        self.claim_type_identity(def.category_name(), def.name(), def.guid())?;
        self.attribute_type_defs.insert(def.name().to_string(), def);
        Ok(())
    }

    fn add_type_def(&mut self, def: TypeDef) -> Result<(), ArchiveError> {
        self.claim_type_identity(def.category_name(), def.name(), def.guid())?;
        self.type_defs.insert(def.name().to_string(), def);
        Ok(())
    }

    fn snapshot(&self) -> OpenMetadataArchive {
        let type_store = OpenMetadataArchiveTypeStore {
            attribute_type_defs: self.attribute_type_defs.values().to_vec(),
            new_type_defs: self.type_defs.values().to_vec(),
            type_def_patches: self.patches.values().to_vec(),
        };
        let instance_store = OpenMetadataArchiveInstanceStore {
            entities: self.entities.values().to_vec(),
            relationships: self.relationships.values().to_vec(),
            classifications: self.classifications.values().to_vec(),
        };

        OpenMetadataArchive {
            archive_properties: self.properties.clone(),
            archive_type_store: (!type_store.is_empty()).then_some(type_store),
            archive_instance_store: (!instance_store.is_empty()).then_some(instance_store),
        }
    }
}

/// Thread-safe in-memory implementation of [`ArchiveBuilder`] and [`ArchiveCache`].
#[derive(Debug)]
pub struct InMemoryArchiveBuilder {
    state: RwLock<BuilderState>,
}

impl InMemoryArchiveBuilder {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(BuilderState::new()),
        }
    }
}

impl Default for InMemoryArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArchiveBuilder for InMemoryArchiveBuilder {
    async fn set_archive_properties(&self, properties: &OpenMetadataArchiveProperties) -> Result<(), ArchiveError> {
        self.state.write().properties = Some(properties.clone());
        Ok(())
    }

    async fn get_archive_properties(&self) -> Result<Option<OpenMetadataArchiveProperties>, ArchiveError> {
        Ok(self.state.read().properties.clone())
    }

    async fn add_primitive_def(&self, def: &PrimitiveDef) -> Result<(), ArchiveError> {
        self.state.write().add_attribute_type_def(AttributeTypeDef::Primitive(def.clone()))
    }

    async fn get_primitive_def(&self, name: &str) -> Result<Option<PrimitiveDef>, ArchiveError> {
        let state = self.state.read();
        Ok(match state.attribute_type_defs.get(name) {
            Some(AttributeTypeDef::Primitive(def)) => Some(def.clone()),
            _ => None,
        })
    }

    async fn add_collection_def(&self, def: &CollectionDef) -> Result<(), ArchiveError> {
        self.state.write().add_attribute_type_def(AttributeTypeDef::Collection(def.clone()))
    }

    async fn get_collection_def(&self, name: &str) -> Result<Option<CollectionDef>, ArchiveError> {
        let state = self.state.read();
        Ok(match state.attribute_type_defs.get(name) {
            Some(AttributeTypeDef::Collection(def)) => Some(def.clone()),
            _ => None,
        })
    }

    async fn add_enum_def(&self, def: &EnumDef) -> Result<(), ArchiveError> {
        self.state.write().add_attribute_type_def(AttributeTypeDef::EnumDef(def.clone()))
    }

    async fn get_enum_def(&self, name: &str) -> Result<Option<EnumDef>, ArchiveError> {
        let state = self.state.read();
        Ok(match state.attribute_type_defs.get(name) {
            Some(AttributeTypeDef::EnumDef(def)) => Some(def.clone()),
            _ => None,
        })
    }

    async fn add_classification_def(&self, def: &ClassificationDef) -> Result<(), ArchiveError> {
        self.state.write().add_type_def(TypeDef::ClassificationDef(def.clone()))
    }

    async fn get_classification_def(&self, name: &str) -> Result<Option<ClassificationDef>, ArchiveError> {
        let state = self.state.read();
        Ok(match state.type_defs.get(name) {
            Some(TypeDef::ClassificationDef(def)) => Some(def.clone()),
            _ => None,
        })
    }

    async fn add_entity_def(&self, def: &EntityDef) -> Result<(), ArchiveError> {
        self.state.write().add_type_def(TypeDef::EntityDef(def.clone()))
    }

    async fn get_entity_def(&self, name: &str) -> Result<Option<EntityDef>, ArchiveError> {
        let state = self.state.read();
        Ok(match state.type_defs.get(name) {
            Some(TypeDef::EntityDef(def)) => Some(def.clone()),
            _ => None,
        })
    }

    async fn add_relationship_def(&self, def: &RelationshipDef) -> Result<(), ArchiveError> {
        self.state.write().add_type_def(TypeDef::RelationshipDef(def.clone()))
    }

    async fn get_relationship_def(&self, name: &str) -> Result<Option<RelationshipDef>, ArchiveError> {
        let state = self.state.read();
        Ok(match state.type_defs.get(name) {
            Some(TypeDef::RelationshipDef(def)) => Some(def.clone()),
            _ => None,
        })
    }

    async fn get_type_def_by_name(&self, name: &str) -> Result<Option<TypeDef>, ArchiveError> {
        Ok(self.state.read().type_defs.get(name).cloned())
    }

    async fn add_type_def_patch(&self, patch: &TypeDefPatch) -> Result<(), ArchiveError> {
        let mut state = self.state.write();
        if state.patches.contains(patch.type_def_name.as_str()) {
            return Err(ArchiveError::duplicate("type definition patch", patch.type_def_name.clone()));
        }
        state.patches.insert(patch.type_def_name.clone(), patch.clone());
        Ok(())
    }

    async fn get_patch_for_type(&self, type_name: &str) -> Result<Option<TypeDefPatch>, ArchiveError> {
        Ok(self.state.read().patches.get(type_name).cloned())
    }

    async fn add_entity(&self, entity: &EntityDetail) -> Result<(), ArchiveError> {
        let mut state = self.state.write();
        if state.entities.contains(entity.guid.as_str()) {
            return Err(ArchiveError::duplicate("entity", entity.guid.clone()));
        }
        state.entities.insert(entity.guid.clone(), entity.clone());
        Ok(())
    }

    async fn get_entity(&self, guid: &str) -> Result<Option<EntityDetail>, ArchiveError> {
        Ok(self.state.read().entities.get(guid).cloned())
    }

    async fn query_entity(&self, guid: &str) -> Result<Option<EntityDetail>, ArchiveError> {
        self.get_entity(guid).await
    }

    async fn add_relationship(&self, relationship: &Relationship) -> Result<(), ArchiveError> {
        let mut state = self.state.write();
        if state.relationships.contains(relationship.guid.as_str()) {
            return Err(ArchiveError::duplicate("relationship", relationship.guid.clone()));
        }
        state.relationships.insert(relationship.guid.clone(), relationship.clone());
        Ok(())
    }

    async fn get_relationship(&self, guid: &str) -> Result<Option<Relationship>, ArchiveError> {
        Ok(self.state.read().relationships.get(guid).cloned())
    }

    async fn query_relationship(&self, guid: &str) -> Result<Option<Relationship>, ArchiveError> {
        self.get_relationship(guid).await
    }

    async fn add_classification(&self, classification: &ClassificationEntityExtension) -> Result<(), ArchiveError> {
        let key = classification.key();
        let mut state = self.state.write();
        if state.classifications.contains(&key) {
            return Err(ArchiveError::duplicate("classification", key.to_string()));
        }
        state.classifications.insert(key, classification.clone());
        Ok(())
    }

    async fn get_classification(
        &self,
        entity_guid: &str,
        classification_name: &str,
    ) -> Result<Option<ClassificationEntityExtension>, ArchiveError> {
        let key = ClassificationKey::new(entity_guid, classification_name);
        Ok(self.state.read().classifications.get(&key).cloned())
    }

    async fn query_classification(
        &self,
        entity_guid: &str,
        classification_name: &str,
    ) -> Result<Option<ClassificationEntityExtension>, ArchiveError> {
        self.get_classification(entity_guid, classification_name).await
    }
}

#[async_trait]
impl ArchiveCache for InMemoryArchiveBuilder {
    async fn get_open_metadata_archive(&self) -> Result<Option<OpenMetadataArchive>, ArchiveError> {
        Ok(Some(self.state.read().snapshot()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::archive::OpenMetadataArchiveType;
    use crate::domain::instance::{Classification, InstanceAuditHeader, InstanceType};
    use crate::domain::typedef::PrimitiveDefCategory;
    use chrono::Utc;

    fn string_def() -> PrimitiveDef {
        PrimitiveDef {
            guid: "guid-string".to_string(),
            name: "string".to_string(),
            version: 1,
            version_name: None,
            description: None,
            primitive_def_category: PrimitiveDefCategory::String,
        }
    }

    fn properties(name: &str) -> OpenMetadataArchiveProperties {
        OpenMetadataArchiveProperties {
            archive_guid: "archive-1".to_string(),
            archive_name: name.to_string(),
            archive_description: None,
            archive_type: OpenMetadataArchiveType::ContentPack,
            archive_version: None,
            originator_name: "tests".to_string(),
            originator_license: None,
            creation_date: Utc::now(),
            depends_on_archives: vec![],
        }
    }

    #[tokio::test]
    async fn test_get_before_and_after_add() {
        let builder = InMemoryArchiveBuilder::new();
        assert!(builder.get_entity_def("Asset").await.unwrap().is_none());

        builder.add_entity_def(&EntityDef::new("guid-asset", "Asset", 1)).await.unwrap();

        let def = builder.get_entity_def("Asset").await.unwrap().unwrap();
        assert_eq!(def.header.guid, "guid-asset");
    }

    #[tokio::test]
    async fn test_lookup_by_wrong_category_is_none() {
        let builder = InMemoryArchiveBuilder::new();
        builder.add_entity_def(&EntityDef::new("guid-asset", "Asset", 1)).await.unwrap();

        assert!(builder.get_classification_def("Asset").await.unwrap().is_none());
        assert!(builder.get_type_def_by_name("Asset").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_type_name_rejected_across_categories() {
        let builder = InMemoryArchiveBuilder::new();
        builder.add_primitive_def(&string_def()).await.unwrap();

        let clash = EntityDef::new("guid-other", "string", 1);
        let err = builder.add_entity_def(&clash).await.unwrap_err();
        assert!(matches!(err, ArchiveError::Duplicate { kind: "entity definition", .. }));
    }

    #[tokio::test]
    async fn test_duplicate_guid_rejected() {
        let builder = InMemoryArchiveBuilder::new();
        builder.add_entity_def(&EntityDef::new("guid-1", "Asset", 1)).await.unwrap();

        let err = builder.add_entity_def(&EntityDef::new("guid-1", "DataSet", 1)).await.unwrap_err();
        assert!(matches!(err, ArchiveError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_last_properties_call_wins() {
        let builder = InMemoryArchiveBuilder::new();
        builder.set_archive_properties(&properties("first")).await.unwrap();
        builder.set_archive_properties(&properties("second")).await.unwrap();

        let stored = builder.get_archive_properties().await.unwrap().unwrap();
        assert_eq!(stored.archive_name, "second");
    }

    #[tokio::test]
    async fn test_instances_and_export_order() {
        let builder = InMemoryArchiveBuilder::new();
        let asset_type = InstanceType::new("guid-asset", "Asset", 1);
        let first = EntityDetail::new("e-1", asset_type.clone());
        let second = EntityDetail::new("e-2", asset_type);

        builder.add_entity(&second).await.unwrap();
        builder.add_entity(&first).await.unwrap();
        assert!(builder.add_entity(&first).await.is_err());

        let classification = ClassificationEntityExtension {
            entity_to_be_classified: first.proxy(),
            classification: Classification {
                name: "Confidentiality".to_string(),
                header: InstanceAuditHeader::new(InstanceType::new("guid-conf", "Confidentiality", 1)),
                properties: Default::default(),
            },
        };
        builder.add_classification(&classification).await.unwrap();

        assert!(builder.query_entity("missing").await.unwrap().is_none());
        assert!(builder
            .get_classification("e-1", "Confidentiality")
            .await
            .unwrap()
            .is_some());
        assert!(builder
            .query_classification("e-2", "Confidentiality")
            .await
            .unwrap()
            .is_none());

        let archive = builder.get_open_metadata_archive().await.unwrap().unwrap();
        assert!(archive.archive_properties.is_none());
        assert!(archive.archive_type_store.is_none());
        let instances = archive.archive_instance_store.unwrap();
        let guids: Vec<_> = instances.entities.iter().map(|e| e.guid.as_str()).collect();
        assert_eq!(guids, vec!["e-2", "e-1"]);
        assert_eq!(instances.classifications.len(), 1);
    }

    #[tokio::test]
    async fn test_one_patch_per_type() {
        let builder = InMemoryArchiveBuilder::new();
        let patch = TypeDefPatch {
            type_def_guid: "guid-asset".to_string(),
            type_def_name: "Asset".to_string(),
            apply_to_version: 1,
            update_to_version: 2,
            new_version_name: Some("2.0".to_string()),
            description: None,
            property_definitions: vec![],
            type_def_status: None,
        };

        builder.add_type_def_patch(&patch).await.unwrap();
        assert!(builder.add_type_def_patch(&patch).await.is_err());
        assert_eq!(builder.get_patch_for_type("Asset").await.unwrap(), Some(patch));
        assert!(builder.get_patch_for_type("DataSet").await.unwrap().is_none());
    }
}
