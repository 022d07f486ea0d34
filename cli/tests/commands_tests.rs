// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use openmeta_archive::commands::build::{build_archive, with_output, BuildContent, OUTPUT_DESTINATION};
use openmeta_archive::commands::inspect::load_archive;
use openmeta_archive::commands::report::load_report;
use openmeta_archive_core::domain::archive::{
    OpenMetadataArchive, OpenMetadataArchiveInstanceStore, OpenMetadataArchiveProperties, OpenMetadataArchiveTypeStore,
};
use openmeta_archive_core::domain::archive_config::ArchiveServiceManifest;
use openmeta_archive_core::domain::instance::{EntityDetail, InstanceType};
use openmeta_archive_core::domain::typedef::{EntityDef, TypeDef};
use openmeta_discovery::domain::{
    Annotation, AnnotationKind, DataField, DataProfileAnnotation, DiscoveryAnalysisReport, DiscoveryReportStore,
};
use openmeta_discovery::infrastructure::InMemoryDiscoveryReportStore;
use openmeta_governance::domain::{GovernanceDefinition, GovernanceDefinitionKind, GovernanceRole, GovernanceZone};

fn manifest(dir: &std::path::Path) -> ArchiveServiceManifest {
    let yaml = format!(
        r#"
apiVersion: openmeta.io/v1
kind: ArchiveService
metadata:
  name: test-pack
spec:
  archive:
    guid: pack-guid
    name: Test Pack
    originatorName: Test Office
  destinations:
    - name: primary
      type: json-file
      path: {}
    - name: scratch
      type: in-memory
"#,
        dir.join("primary.json").display()
    );
    ArchiveServiceManifest::from_yaml_str(&yaml).unwrap()
}

fn content() -> BuildContent {
    let archive = OpenMetadataArchive {
        // Replaced by the manifest header during the build
        archive_properties: Some(OpenMetadataArchiveProperties {
            archive_guid: "content-guid".to_string(),
            archive_name: "Content Pack".to_string(),
            archive_description: None,
            archive_type: Default::default(),
            archive_version: None,
            originator_name: "Content Office".to_string(),
            originator_license: None,
            creation_date: chrono::Utc::now(),
            depends_on_archives: Vec::new(),
        }),
        archive_type_store: Some(OpenMetadataArchiveTypeStore {
            new_type_defs: vec![TypeDef::EntityDef(EntityDef::new("asset-type", "Asset", 1))],
            ..Default::default()
        }),
        archive_instance_store: Some(OpenMetadataArchiveInstanceStore {
            entities: vec![EntityDetail::new("asset-1", InstanceType::new("asset-type", "Asset", 1))
                .with_property("qualifiedName", "asset:orders")],
            ..Default::default()
        }),
    };

    BuildContent {
        archive: Some(archive),
        governance_definitions: vec![
            GovernanceDefinition::new("role:steward", GovernanceDefinitionKind::Role(GovernanceRole { head_count: 2 })),
            GovernanceDefinition::new("role:owner", GovernanceDefinitionKind::Role(GovernanceRole { head_count: 1 })),
        ],
    }
}

#[tokio::test]
async fn test_build_writes_every_buffered_destination() {
    let dir = tempfile::tempdir().unwrap();
    let mut manifest = manifest(dir.path());
    let output = dir.path().join("nested").join("output.json");
    with_output(&mut manifest, output.clone());

    let outcome = build_archive(&manifest, &content()).await.unwrap();

    assert_eq!(outcome.destinations, 3);
    assert_eq!(outcome.written, 3);
    assert_eq!(outcome.definitions, 2);
    assert_eq!(outcome.replayed.map(|r| r.total()), Some(2));
    assert_eq!(outcome.replayed.map(|r| r.properties), Some(true));

    let summary = outcome.archive.unwrap();
    // Asset plus the governance role type
    assert_eq!(summary.type_defs, 2);
    assert_eq!(summary.entities, 3);

    for path in [dir.path().join("primary.json"), output] {
        let written = load_archive(&path).unwrap();
        assert_eq!(written.summary(), summary);
        let properties = written.archive_properties.unwrap();
        assert_eq!(properties.archive_guid, "pack-guid");
        assert_eq!(properties.archive_name, "Test Pack");
        assert_eq!(properties.originator_name, "Test Office");
    }
    assert_eq!(manifest.spec.destinations.last().map(|d| d.name.as_str()), Some(OUTPUT_DESTINATION));
}

#[tokio::test]
async fn test_build_rejects_invalid_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let mut manifest = manifest(dir.path());
    manifest.spec.destinations[1].name = "primary".to_string();

    let err = build_archive(&manifest, &BuildContent::default()).await.unwrap_err();
    assert!(err.to_string().contains("Configuration validation failed"));
    assert!(!dir.path().join("primary.json").exists());
}

#[tokio::test]
async fn test_build_content_file_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("content.json");
    std::fs::write(
        &path,
        r#"{
  "governanceDefinitions": [
    { "qualifiedName": "domain:privacy", "domainIdentifier": 1, "definitionType": "domain" },
    { "qualifiedName": "zone:landing", "definitionType": "zone", "zoneName": "landing" }
  ]
}"#,
    )
    .unwrap();

    let content = BuildContent::from_json_file(&path).unwrap();
    assert!(content.archive.is_none());
    assert_eq!(content.governance_definitions.len(), 2);

    // Blank guids are assigned during the build
    let outcome = build_archive(&manifest(dir.path()), &content).await.unwrap();
    assert_eq!(outcome.archive.map(|s| s.entities), Some(2));
}

fn zone(name: &str, parent: Option<&str>) -> GovernanceDefinition {
    GovernanceDefinition::new(
        format!("zone:{name}"),
        GovernanceDefinitionKind::Zone(GovernanceZone {
            zone_name: name.to_string(),
            criteria: None,
            parent_zone_guid: parent.map(str::to_string),
        }),
    )
}

#[tokio::test]
async fn test_build_rejects_program_rule_violations() {
    let role = GovernanceDefinition::new("role:dup", GovernanceDefinitionKind::Role(GovernanceRole { head_count: 1 }));
    let cases = [
        (vec![zone("orphan", Some("no-such-zone"))], "not found"),
        (vec![zone("scoped", None).in_domain(42)], "not declared"),
        (vec![role.clone(), role], "already exists"),
    ];

    for (governance_definitions, expected) in cases {
        let dir = tempfile::tempdir().unwrap();
        let content = BuildContent {
            governance_definitions,
            ..content()
        };

        let err = build_archive(&manifest(dir.path()), &content).await.unwrap_err();
        assert!(err.to_string().contains("violate program rules"));
        assert!(format!("{err:#}").contains(expected), "{err:#}");
        assert!(!dir.path().join("primary.json").exists());
    }
}

#[tokio::test]
async fn test_build_publishes_nested_zones_with_assigned_guids() {
    let dir = tempfile::tempdir().unwrap();
    let mut landing = zone("landing", None);
    landing.guid = "authored-landing".to_string();
    let raw = zone("raw", Some("authored-landing"));
    let content = BuildContent {
        archive: None,
        governance_definitions: vec![raw, landing],
    };

    let outcome = build_archive(&manifest(dir.path()), &content).await.unwrap();
    assert_eq!(outcome.definitions, 2);

    let written = load_archive(dir.path().join("primary.json")).unwrap();
    let entities = written.archive_instance_store.unwrap().entities;
    let landing = entities
        .iter()
        .find(|e| e.properties.get("qualifiedName") == Some(&serde_json::json!("zone:landing")))
        .unwrap();
    assert_ne!(landing.guid, "authored-landing");
    assert!(entities.iter().all(|e| e.guid != "authored-landing"));
}

#[tokio::test]
async fn test_load_report_checks_anchors() {
    let store = InMemoryDiscoveryReportStore::new(DiscoveryAnalysisReport::new("report:orders"));
    let field = store.add_data_field(DataField::new("order_id")).await.unwrap();
    store
        .add_annotation_to_data_field(
            &field,
            Annotation::new(AnnotationKind::DataProfile(DataProfileAnnotation::default())),
        )
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    let mut document = store.export_document().await.unwrap();
    std::fs::write(&path, serde_json::to_string(&document).unwrap()).unwrap();
    assert_eq!(load_report(&path).unwrap(), document);

    document.data_fields.clear();
    std::fs::write(&path, serde_json::to_string(&document).unwrap()).unwrap();
    assert!(load_report(&path).is_err());
}
