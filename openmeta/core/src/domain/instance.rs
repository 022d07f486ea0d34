// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Instance Data
//!
//! Concrete records conforming to a type definition. Entities and
//! relationships are keyed by `guid`; classification extensions by the
//! `(entity guid, classification name)` pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Instance property values, keyed by property name.
pub type InstanceProperties = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStatus {
    Unknown,
    Draft,
    Prepared,
    Proposed,
    Approved,
    Rejected,
    ApprovedConcept,
    UnderDevelopment,
    DevelopmentComplete,
    ApprovedForDeployment,
    StandbyDeployment,
    #[default]
    Active,
    Failed,
    Disabled,
    Complete,
    Deprecated,
    Other,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceProvenanceType {
    Unknown,
    LocalCohort,
    ExportArchive,
    #[default]
    ContentPack,
    DeregisteredRepository,
    Configuration,
    ExternalSource,
}

/// The type an instance conforms to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceType {
    pub type_def_guid: String,
    pub type_def_name: String,
    pub type_def_version: i64,
    #[serde(default)]
    pub type_def_super_types: Vec<String>,
}

impl InstanceType {
    pub fn new(guid: impl Into<String>, name: impl Into<String>, version: i64) -> Self {
        Self {
            type_def_guid: guid.into(),
            type_def_name: name.into(),
            type_def_version: version,
            type_def_super_types: Vec::new(),
        }
    }
}

/// Audit header shared by every instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceAuditHeader {
    pub instance_type: InstanceType,
    #[serde(default)]
    pub status: InstanceStatus,
    #[serde(default)]
    pub instance_provenance_type: InstanceProvenanceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_collection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    pub create_time: DateTime<Utc>,
    #[serde(default = "default_version")]
    pub version: i64,
}

fn default_version() -> i64 {
    1
}

impl InstanceAuditHeader {
    pub fn new(instance_type: InstanceType) -> Self {
        Self {
            instance_type,
            status: InstanceStatus::default(),
            instance_provenance_type: InstanceProvenanceType::default(),
            metadata_collection_id: None,
            created_by: None,
            create_time: Utc::now(),
            version: default_version(),
        }
    }
}

/// A classification attached to an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub name: String,
    #[serde(flatten)]
    pub header: InstanceAuditHeader,
    #[serde(default)]
    pub properties: InstanceProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDetail {
    pub guid: String,
    #[serde(flatten)]
    pub header: InstanceAuditHeader,
    #[serde(default)]
    pub properties: InstanceProperties,
    #[serde(default)]
    pub classifications: Vec<Classification>,
}

impl EntityDetail {
    pub fn new(guid: impl Into<String>, instance_type: InstanceType) -> Self {
        Self {
            guid: guid.into(),
            header: InstanceAuditHeader::new(instance_type),
            properties: InstanceProperties::new(),
            classifications: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn type_name(&self) -> &str {
        &self.header.instance_type.type_def_name
    }

    /// Proxy used as a relationship end or classification anchor.
    pub fn proxy(&self) -> EntityProxy {
        EntityProxy {
            guid: self.guid.clone(),
            type_def_name: self.type_name().to_string(),
            unique_properties: InstanceProperties::new(),
        }
    }
}

/// Minimal reference to an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityProxy {
    pub guid: String,
    pub type_def_name: String,
    #[serde(default)]
    pub unique_properties: InstanceProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub guid: String,
    #[serde(flatten)]
    pub header: InstanceAuditHeader,
    pub entity_one_proxy: EntityProxy,
    pub entity_two_proxy: EntityProxy,
    #[serde(default)]
    pub properties: InstanceProperties,
}

/// A classification stored separately from the entity it classifies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationEntityExtension {
    pub entity_to_be_classified: EntityProxy,
    pub classification: Classification,
}

impl ClassificationEntityExtension {
    pub fn key(&self) -> ClassificationKey {
        ClassificationKey::new(
            self.entity_to_be_classified.guid.clone(),
            self.classification.name.clone(),
        )
    }
}

/// Composite identifier of a classification extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassificationKey {
    pub entity_guid: String,
    pub classification_name: String,
}

impl ClassificationKey {
    pub fn new(entity_guid: impl Into<String>, classification_name: impl Into<String>) -> Self {
        Self {
            entity_guid: entity_guid.into(),
            classification_name: classification_name.into(),
        }
    }
}

impl std::fmt::Display for ClassificationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.entity_guid, self.classification_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_detail_json_layout() {
        let entity = EntityDetail::new("e-1", InstanceType::new("t-1", "Asset", 1))
            .with_property("qualifiedName", "asset::one");
        let json = serde_json::to_value(&entity).unwrap();

        assert_eq!(json["guid"], "e-1");
        assert_eq!(json["instanceType"]["typeDefName"], "Asset");
        assert_eq!(json["status"], "ACTIVE");
        assert_eq!(json["properties"]["qualifiedName"], "asset::one");

        let parsed: EntityDetail = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, entity);
    }

    #[test]
    fn test_classification_key() {
        let entity = EntityDetail::new("e-1", InstanceType::new("t-1", "Asset", 1));
        let extension = ClassificationEntityExtension {
            entity_to_be_classified: entity.proxy(),
            classification: Classification {
                name: "Confidentiality".to_string(),
                header: InstanceAuditHeader::new(InstanceType::new("t-2", "Confidentiality", 1)),
                properties: InstanceProperties::new(),
            },
        };

        assert_eq!(extension.key(), ClassificationKey::new("e-1", "Confidentiality"));
        assert_eq!(extension.key().to_string(), "e-1/Confidentiality");
    }
}
