// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{TimeZone, Utc};
use openmeta_archive_core::application::{ArchiveDestination, DynamicArchiveService};
use openmeta_archive_core::domain::archive::{OpenMetadataArchiveProperties, OpenMetadataArchiveType};
use openmeta_archive_core::domain::archive_config::BroadcastFailurePolicy;
use openmeta_archive_core::domain::instance::{
    Classification, ClassificationEntityExtension, EntityDetail, InstanceAuditHeader, InstanceProperties, InstanceType,
    Relationship,
};
use openmeta_archive_core::domain::store::{
    ArchiveBuilder, ArchiveCache, ArchiveError, ArchiveStoreConnector, EmbeddedConnector,
};
use openmeta_archive_core::domain::typedef::{
    ClassificationDef, CollectionDef, CollectionDefCategory, EntityDef, EnumDef, EnumElementDef, PrimitiveDef,
    PrimitiveDefCategory, RelationshipDef, RelationshipEndDef, TypeDef, TypeDefHeader, TypeDefPatch,
};
use openmeta_archive_core::domain::archive::OpenMetadataArchive;
use openmeta_archive_core::infrastructure::{InMemoryArchiveBuilder, InMemoryArchiveStore, JsonFileArchiveStore};
use async_trait::async_trait;
use std::sync::Arc;

/// Store connector that builds in its own builder.
struct BuildingStore {
    name: String,
    builder: Arc<InMemoryArchiveBuilder>,
    exportable: bool,
}

impl BuildingStore {
    fn new(name: &str, exportable: bool) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            builder: Arc::new(InMemoryArchiveBuilder::new()),
            exportable,
        })
    }
}

impl EmbeddedConnector for BuildingStore {
    fn connector_name(&self) -> &str {
        &self.name
    }

    fn as_archive_store(self: Arc<Self>) -> Option<Arc<dyn ArchiveStoreConnector>> {
        Some(self)
    }
}

#[async_trait]
impl ArchiveStoreConnector for BuildingStore {
    fn connector_name(&self) -> &str {
        &self.name
    }

    fn as_builder(self: Arc<Self>) -> Option<Arc<dyn ArchiveBuilder>> {
        Some(self.builder.clone())
    }

    fn as_cache(self: Arc<Self>) -> Option<Arc<dyn ArchiveCache>> {
        if self.exportable {
            Some(self.builder.clone())
        } else {
            None
        }
    }

    async fn get_archive_contents(&self) -> Result<Option<OpenMetadataArchive>, ArchiveError> {
        self.builder.get_open_metadata_archive().await
    }

    async fn set_archive_contents(&self, _archive: &OpenMetadataArchive) -> Result<(), ArchiveError> {
        Ok(())
    }
}

/// Connector without the archive-store capability.
struct EventConnector(&'static str);

impl EmbeddedConnector for EventConnector {
    fn connector_name(&self) -> &str {
        self.0
    }
}

fn properties(name: &str) -> OpenMetadataArchiveProperties {
    OpenMetadataArchiveProperties {
        archive_guid: format!("guid-{}", name),
        archive_name: name.to_string(),
        archive_description: None,
        archive_type: OpenMetadataArchiveType::ContentPack,
        archive_version: Some("1.0".to_string()),
        originator_name: "Data Office".to_string(),
        originator_license: None,
        creation_date: Utc.with_ymd_and_hms(2026, 6, 30, 9, 30, 0).unwrap(),
        depends_on_archives: vec![],
    }
}

fn started(policy: BroadcastFailurePolicy, connectors: Vec<Arc<dyn EmbeddedConnector>>) -> DynamicArchiveService {
    let service = DynamicArchiveService::new(policy);
    service.start(connectors).unwrap();
    service
}

#[tokio::test]
async fn test_only_archive_stores_become_destinations_in_order() {
    let connectors: Vec<Arc<dyn EmbeddedConnector>> = vec![
        Arc::new(EventConnector("audit")),
        Arc::new(InMemoryArchiveStore::new("alpha")),
        Arc::new(EventConnector("events")),
        BuildingStore::new("beta", true),
        Arc::new(JsonFileArchiveStore::new("gamma", "gamma.json", true)),
    ];
    let service = DynamicArchiveService::default();

    assert_eq!(service.start(connectors).unwrap(), 3);

    let names: Vec<&str> = service.destinations().iter().map(|d| d.name()).collect();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    let buffered: Vec<bool> = service.destinations().iter().map(|d| d.is_buffered()).collect();
    assert_eq!(buffered, vec![true, false, true]);
}

#[tokio::test]
async fn test_broadcast_add_reaches_both_destinations() {
    let first = BuildingStore::new("first", true);
    let second = BuildingStore::new("second", true);
    let service = started(
        BroadcastFailurePolicy::StopOnFirstError,
        vec![first.clone(), second.clone()],
    );

    service.add_entity_def(&EntityDef::new("guid-asset", "Asset", 1)).await.unwrap();

    let found = service.get_entity_def("Asset").await.unwrap().unwrap();
    assert_eq!(found.header.guid, "guid-asset");
    assert!(first.builder.get_entity_def("Asset").await.unwrap().is_some());
    assert!(second.builder.get_entity_def("Asset").await.unwrap().is_some());

    // Content is append-only: adding the same name again is refused
    let err = service
        .add_entity_def(&EntityDef::new("guid-asset-2", "Asset", 2))
        .await
        .unwrap_err();
    assert!(matches!(err, ArchiveError::Duplicate { .. }));
    assert_eq!(
        service.get_entity_def("Asset").await.unwrap().map(|d| d.header.version),
        Some(1)
    );
}

#[tokio::test]
async fn test_lookup_falls_through_to_later_destination() {
    let first = BuildingStore::new("first", true);
    let second = BuildingStore::new("second", true);
    second
        .builder
        .add_entity(&EntityDetail::new("e-42", InstanceType::new("guid-asset", "Asset", 1)))
        .await
        .unwrap();
    let service = started(BroadcastFailurePolicy::StopOnFirstError, vec![first, second]);

    let entity = service.get_entity("e-42").await.unwrap().unwrap();
    assert_eq!(entity.guid, "e-42");
    assert!(service.query_entity("e-42").await.unwrap().is_some());
    assert!(service.get_entity("e-43").await.unwrap().is_none());
}

#[tokio::test]
async fn test_lookup_prefers_first_destination() {
    let first = BuildingStore::new("first", true);
    let second = BuildingStore::new("second", true);
    first.builder.add_entity_def(&EntityDef::new("guid-a", "Asset", 1)).await.unwrap();
    second.builder.add_entity_def(&EntityDef::new("guid-b", "Asset", 7)).await.unwrap();
    let service = started(BroadcastFailurePolicy::StopOnFirstError, vec![first, second]);

    let def = service.get_entity_def("Asset").await.unwrap().unwrap();
    assert_eq!(def.header.guid, "guid-a");
}

#[tokio::test]
async fn test_export_comes_from_first_exporting_destination() {
    let first = BuildingStore::new("first", true);
    let second = BuildingStore::new("second", true);
    first.builder.set_archive_properties(&properties("first-pack")).await.unwrap();
    second.builder.set_archive_properties(&properties("second-pack")).await.unwrap();
    let service = started(
        BroadcastFailurePolicy::StopOnFirstError,
        vec![first.clone(), second],
    );

    let exported = service.get_open_metadata_archive().await.unwrap();
    assert_eq!(exported, first.builder.get_open_metadata_archive().await.unwrap());
    assert_eq!(exported.as_ref().and_then(|a| a.archive_name()), Some("first-pack"));
}

#[tokio::test]
async fn test_export_skips_destination_without_cache() {
    let streaming = BuildingStore::new("streaming", false);
    let memory: Arc<dyn EmbeddedConnector> = Arc::new(InMemoryArchiveStore::new("memory"));
    let service = started(BroadcastFailurePolicy::StopOnFirstError, vec![streaming, memory]);

    service.set_archive_properties(&properties("pack")).await.unwrap();

    let exported = service.get_open_metadata_archive().await.unwrap().unwrap();
    assert_eq!(exported.archive_name(), Some("pack"));
}

#[tokio::test]
async fn test_properties_round_trip_on_single_destination() {
    let destination = ArchiveDestination::new(Arc::new(InMemoryArchiveStore::new("memory")));
    let mut supplied = properties("pack");
    supplied.archive_description = Some("Reference data".to_string());
    supplied.originator_license = Some("CC-BY-4.0".to_string());
    supplied.depends_on_archives = vec!["core".to_string()];

    destination.set_archive_properties(&supplied).await.unwrap();

    assert_eq!(destination.get_archive_properties().await.unwrap(), Some(supplied));
}

#[tokio::test]
async fn test_destination_without_builder_supports_add_and_get() {
    let destination = ArchiveDestination::new(Arc::new(JsonFileArchiveStore::new("file", "unused.json", true)));

    assert!(destination.get_entity_def("X").await.unwrap().is_none());
    destination.add_entity_def(&EntityDef::new("guid-x", "X", 1)).await.unwrap();
    assert!(destination.get_entity_def("X").await.unwrap().is_some());
}

#[tokio::test]
async fn test_stop_on_first_error_leaves_later_destinations_untouched() {
    let first = BuildingStore::new("first", true);
    let failing = BuildingStore::new("failing", true);
    let last = BuildingStore::new("last", true);
    failing.builder.add_entity_def(&EntityDef::new("guid-old", "Asset", 1)).await.unwrap();
    let service = started(
        BroadcastFailurePolicy::StopOnFirstError,
        vec![first.clone(), failing, last.clone()],
    );

    let err = service
        .add_entity_def(&EntityDef::new("guid-asset", "Asset", 1))
        .await
        .unwrap_err();

    // Error surfaces unchanged
    assert!(matches!(err, ArchiveError::Duplicate { kind: "entity definition", .. }));
    assert!(first.builder.get_entity_def("Asset").await.unwrap().is_some());
    assert!(last.builder.get_entity_def("Asset").await.unwrap().is_none());
}

#[tokio::test]
async fn test_continue_on_error_reaches_every_destination() {
    let first = BuildingStore::new("first", true);
    let failing = BuildingStore::new("failing", true);
    let last = BuildingStore::new("last", true);
    failing.builder.add_entity_def(&EntityDef::new("guid-old", "Asset", 1)).await.unwrap();
    let service = started(
        BroadcastFailurePolicy::ContinueOnError,
        vec![first.clone(), failing, last.clone()],
    );

    let err = service
        .add_entity_def(&EntityDef::new("guid-asset", "Asset", 1))
        .await
        .unwrap_err();

    match err {
        ArchiveError::Broadcast(failures) => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].destination, "failing");
            assert!(matches!(failures[0].error, ArchiveError::Duplicate { .. }));
        }
        other => panic!("expected broadcast error, got {other:?}"),
    }
    assert!(first.builder.get_entity_def("Asset").await.unwrap().is_some());
    assert!(last.builder.get_entity_def("Asset").await.unwrap().is_some());
}

#[tokio::test]
async fn test_flush_writes_buffered_destinations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pack.json");
    let file_store = Arc::new(JsonFileArchiveStore::new("file", &path, true));
    let service = started(
        BroadcastFailurePolicy::StopOnFirstError,
        vec![
            BuildingStore::new("direct", true),
            Arc::new(InMemoryArchiveStore::new("memory")),
            file_store.clone(),
        ],
    );
    service.set_archive_properties(&properties("flushed")).await.unwrap();
    service.add_entity_def(&EntityDef::new("guid-asset", "Asset", 1)).await.unwrap();

    assert_eq!(service.flush().await.unwrap(), 2);

    let written = file_store.get_archive_contents().await.unwrap().unwrap();
    assert_eq!(written.archive_name(), Some("flushed"));
    assert_eq!(written.summary().type_defs, 1);
}

fn classification(entity: &EntityDetail, name: &str) -> ClassificationEntityExtension {
    ClassificationEntityExtension {
        entity_to_be_classified: entity.proxy(),
        classification: Classification {
            name: name.to_string(),
            header: InstanceAuditHeader::new(InstanceType::new(format!("guid-{name}"), name, 1)),
            properties: InstanceProperties::new(),
        },
    }
}

#[tokio::test]
async fn test_every_family_reads_back_through_service() {
    let first = BuildingStore::new("first", true);
    let second = BuildingStore::new("second", true);
    let service = started(
        BroadcastFailurePolicy::StopOnFirstError,
        vec![first.clone(), second.clone()],
    );

    let primitive = PrimitiveDef {
        guid: "guid-string".to_string(),
        name: "string".to_string(),
        version: 1,
        version_name: None,
        description: None,
        primitive_def_category: PrimitiveDefCategory::String,
    };
    let collection = CollectionDef {
        guid: "guid-map".to_string(),
        name: "map<string,string>".to_string(),
        version: 1,
        version_name: None,
        description: None,
        collection_def_category: CollectionDefCategory::Map,
        argument_types: vec![PrimitiveDefCategory::String, PrimitiveDefCategory::String],
    };
    let enumeration = EnumDef {
        guid: "guid-criticality".to_string(),
        name: "Criticality".to_string(),
        version: 1,
        version_name: None,
        description: None,
        element_defs: vec![EnumElementDef {
            ordinal: 0,
            value: "High".to_string(),
            description: None,
        }],
        default_value: None,
    };
    let asset = EntityDef::new("guid-asset", "Asset", 1);
    let confidentiality = ClassificationDef {
        header: TypeDefHeader::new("guid-confidentiality", "Confidentiality", 1),
        valid_entity_defs: vec![asset.header.link()],
        propagatable: false,
    };
    let end = |name: &str| RelationshipEndDef {
        entity_type: asset.header.link(),
        attribute_name: name.to_string(),
        attribute_cardinality: Default::default(),
        attribute_description: None,
    };
    let lineage = RelationshipDef {
        header: TypeDefHeader::new("guid-lineage", "Lineage", 1),
        end_def1: end("sources"),
        end_def2: end("targets"),
        propagation_rule: Default::default(),
        multi_link: false,
    };
    let patch = TypeDefPatch {
        type_def_guid: "guid-asset".to_string(),
        type_def_name: "Asset".to_string(),
        apply_to_version: 1,
        update_to_version: 2,
        new_version_name: None,
        description: Some("Adds owner".to_string()),
        property_definitions: vec![],
        type_def_status: None,
    };
    let source = EntityDetail::new("e-1", InstanceType::new("guid-asset", "Asset", 1));
    let target = EntityDetail::new("e-2", InstanceType::new("guid-asset", "Asset", 1));
    let relationship = Relationship {
        guid: "r-1".to_string(),
        header: InstanceAuditHeader::new(InstanceType::new("guid-lineage", "Lineage", 1)),
        entity_one_proxy: source.proxy(),
        entity_two_proxy: target.proxy(),
        properties: InstanceProperties::new(),
    };
    let confidential = classification(&source, "Confidentiality");

    service.add_primitive_def(&primitive).await.unwrap();
    service.add_collection_def(&collection).await.unwrap();
    service.add_enum_def(&enumeration).await.unwrap();
    service.add_entity_def(&asset).await.unwrap();
    service.add_classification_def(&confidentiality).await.unwrap();
    service.add_relationship_def(&lineage).await.unwrap();
    service.add_type_def_patch(&patch).await.unwrap();
    service.add_entity(&source).await.unwrap();
    service.add_entity(&target).await.unwrap();
    service.add_relationship(&relationship).await.unwrap();
    service.add_classification(&confidential).await.unwrap();

    assert_eq!(service.get_primitive_def("string").await.unwrap(), Some(primitive));
    assert_eq!(service.get_collection_def("map<string,string>").await.unwrap(), Some(collection));
    assert_eq!(service.get_enum_def("Criticality").await.unwrap(), Some(enumeration));
    assert_eq!(service.get_entity_def("Asset").await.unwrap(), Some(asset));
    assert_eq!(
        service.get_classification_def("Confidentiality").await.unwrap(),
        Some(confidentiality.clone())
    );
    assert_eq!(service.get_relationship_def("Lineage").await.unwrap(), Some(lineage.clone()));
    assert_eq!(service.get_patch_for_type("Asset").await.unwrap(), Some(patch));

    assert_eq!(
        service.get_type_def_by_name("Lineage").await.unwrap(),
        Some(TypeDef::RelationshipDef(lineage))
    );
    assert_eq!(
        service.get_type_def_by_name("Confidentiality").await.unwrap(),
        Some(TypeDef::ClassificationDef(confidentiality))
    );
    assert!(service.get_type_def_by_name("string").await.unwrap().is_none());

    assert_eq!(service.get_entity("e-2").await.unwrap(), Some(target.clone()));
    assert_eq!(service.query_entity("e-2").await.unwrap(), Some(target));
    assert_eq!(service.get_relationship("r-1").await.unwrap(), Some(relationship.clone()));
    assert_eq!(service.query_relationship("r-1").await.unwrap(), Some(relationship));
    assert!(service.query_relationship("r-2").await.unwrap().is_none());
    assert_eq!(
        service.get_classification("e-1", "Confidentiality").await.unwrap(),
        Some(confidential.clone())
    );
    assert_eq!(
        service.query_classification("e-1", "Confidentiality").await.unwrap(),
        Some(confidential)
    );
    assert!(service.get_classification("e-2", "Confidentiality").await.unwrap().is_none());

    // Both destinations received every write
    for store in [&first, &second] {
        let summary = store.builder.get_open_metadata_archive().await.unwrap().unwrap().summary();
        assert_eq!(summary.attribute_type_defs, 3);
        assert_eq!(summary.type_defs, 3);
        assert_eq!(summary.type_def_patches, 1);
        assert_eq!(summary.entities, 2);
        assert_eq!(summary.relationships, 1);
        assert_eq!(summary.classifications, 1);
    }

    // A classification only the second destination holds is still found
    let retention = classification(&EntityDetail::new("e-1", InstanceType::new("guid-asset", "Asset", 1)), "Retention");
    second.builder.add_classification(&retention).await.unwrap();
    assert!(first.builder.get_classification("e-1", "Retention").await.unwrap().is_none());
    assert_eq!(service.get_classification("e-1", "Retention").await.unwrap(), Some(retention.clone()));
    assert_eq!(service.query_classification("e-1", "Retention").await.unwrap(), Some(retention));
}
