// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Open Metadata Archive
//!
//! A packaged, shareable bundle of type definitions and instance data. An
//! archive is assembled once per build session and is read-only afterwards.
//!
//! The JSON layout (`archiveProperties`, `archiveTypeStore`,
//! `archiveInstanceStore`) is the on-disk format used by
//! [`crate::infrastructure::json_file_store::JsonFileArchiveStore`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::instance::{ClassificationEntityExtension, EntityDetail, Relationship};
use crate::domain::typedef::{AttributeTypeDef, TypeDef, TypeDefPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpenMetadataArchiveType {
    #[default]
    ContentPack,
    MetadataExport,
    RepositoryBackup,
}

impl std::str::FromStr for OpenMetadataArchiveType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "content-pack" => Ok(Self::ContentPack),
            "metadata-export" => Ok(Self::MetadataExport),
            "repository-backup" => Ok(Self::RepositoryBackup),
            other => Err(format!("unknown archive type '{}'", other)),
        }
    }
}

/// Archive header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenMetadataArchiveProperties {
    #[serde(rename = "archiveGUID")]
    pub archive_guid: String,
    pub archive_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_description: Option<String>,
    #[serde(default)]
    pub archive_type: OpenMetadataArchiveType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_version: Option<String>,
    pub originator_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub originator_license: Option<String>,
    pub creation_date: DateTime<Utc>,
    #[serde(default)]
    pub depends_on_archives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenMetadataArchiveTypeStore {
    #[serde(default)]
    pub attribute_type_defs: Vec<AttributeTypeDef>,
    #[serde(default)]
    pub new_type_defs: Vec<TypeDef>,
    #[serde(default)]
    pub type_def_patches: Vec<TypeDefPatch>,
}

impl OpenMetadataArchiveTypeStore {
    pub fn is_empty(&self) -> bool {
        self.attribute_type_defs.is_empty()
            && self.new_type_defs.is_empty()
            && self.type_def_patches.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenMetadataArchiveInstanceStore {
    #[serde(default)]
    pub entities: Vec<EntityDetail>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub classifications: Vec<ClassificationEntityExtension>,
}

impl OpenMetadataArchiveInstanceStore {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relationships.is_empty() && self.classifications.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenMetadataArchive {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_properties: Option<OpenMetadataArchiveProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_type_store: Option<OpenMetadataArchiveTypeStore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_instance_store: Option<OpenMetadataArchiveInstanceStore>,
}

/// Section counts of an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ArchiveSummary {
    pub attribute_type_defs: usize,
    pub type_defs: usize,
    pub type_def_patches: usize,
    pub entities: usize,
    pub relationships: usize,
    pub classifications: usize,
}

impl ArchiveSummary {
    pub fn total(&self) -> usize {
        self.attribute_type_defs
            + self.type_defs
            + self.type_def_patches
            + self.entities
            + self.relationships
            + self.classifications
    }
}

impl OpenMetadataArchive {
    pub fn summary(&self) -> ArchiveSummary {
        let mut summary = ArchiveSummary::default();
        if let Some(types) = &self.archive_type_store {
            summary.attribute_type_defs = types.attribute_type_defs.len();
            summary.type_defs = types.new_type_defs.len();
            summary.type_def_patches = types.type_def_patches.len();
        }
        if let Some(instances) = &self.archive_instance_store {
            summary.entities = instances.entities.len();
            summary.relationships = instances.relationships.len();
            summary.classifications = instances.classifications.len();
        }
        summary
    }

    pub fn archive_name(&self) -> Option<&str> {
        self.archive_properties.as_ref().map(|p| p.archive_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::typedef::EntityDef;

    #[test]
    fn test_empty_sections_are_omitted() {
        let archive = OpenMetadataArchive::default();
        let json = serde_json::to_string(&archive).unwrap();
        assert_eq!(json, "{}");
        assert_eq!(archive.summary().total(), 0);
    }

    #[test]
    fn test_header_uses_archive_guid_key() {
        let properties = OpenMetadataArchiveProperties {
            archive_guid: "a-1".to_string(),
            archive_name: "Core Types".to_string(),
            archive_description: None,
            archive_type: OpenMetadataArchiveType::ContentPack,
            archive_version: Some("1.0".to_string()),
            originator_name: "openmeta".to_string(),
            originator_license: Some("Apache-2.0".to_string()),
            creation_date: Utc::now(),
            depends_on_archives: vec![],
        };
        let json = serde_json::to_value(&properties).unwrap();

        assert_eq!(json["archiveGUID"], "a-1");
        assert_eq!(json["archiveType"], "CONTENT_PACK");
        assert_eq!(json["originatorLicense"], "Apache-2.0");
    }

    #[test]
    fn test_summary_counts_sections() {
        let archive = OpenMetadataArchive {
            archive_properties: None,
            archive_type_store: Some(OpenMetadataArchiveTypeStore {
                attribute_type_defs: vec![],
                new_type_defs: vec![TypeDef::EntityDef(EntityDef::new("g", "Asset", 1))],
                type_def_patches: vec![],
            }),
            archive_instance_store: None,
        };

        let summary = archive.summary();
        assert_eq!(summary.type_defs, 1);
        assert_eq!(summary.total(), 1);
    }

    #[test]
    fn test_archive_type_from_str() {
        assert_eq!("content-pack".parse::<OpenMetadataArchiveType>(), Ok(OpenMetadataArchiveType::ContentPack));
        assert_eq!("METADATA_EXPORT".parse::<OpenMetadataArchiveType>(), Ok(OpenMetadataArchiveType::MetadataExport));
        assert!("tarball".parse::<OpenMetadataArchiveType>().is_err());
    }
}
