// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Replays the content of an existing archive into any [`ArchiveBuilder`].
//!
//! Sections are added in dependency order: header, attribute types, type
//! definitions, patches, entities, relationships, classifications. The first
//! failing add aborts the replay.

use tracing::debug;

use crate::domain::archive::OpenMetadataArchive;
use crate::domain::store::{ArchiveBuilder, ArchiveError};
use crate::domain::typedef::{AttributeTypeDef, TypeDef};

/// Counts of what a replay added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub properties: bool,
    pub attribute_type_defs: usize,
    pub type_defs: usize,
    pub type_def_patches: usize,
    pub entities: usize,
    pub relationships: usize,
    pub classifications: usize,
}

impl ReplaySummary {
    pub fn total(&self) -> usize {
        self.attribute_type_defs
            + self.type_defs
            + self.type_def_patches
            + self.entities
            + self.relationships
            + self.classifications
    }
}

pub async fn replay_archive(
    archive: &OpenMetadataArchive,
    builder: &dyn ArchiveBuilder,
) -> Result<ReplaySummary, ArchiveError> {
    let mut summary = ReplaySummary::default();

    if let Some(properties) = &archive.archive_properties {
        builder.set_archive_properties(properties).await?;
        summary.properties = true;
    }

    if let Some(types) = &archive.archive_type_store {
        for def in &types.attribute_type_defs {
            match def {
                AttributeTypeDef::Primitive(def) => builder.add_primitive_def(def).await?,
                AttributeTypeDef::Collection(def) => builder.add_collection_def(def).await?,
                AttributeTypeDef::EnumDef(def) => builder.add_enum_def(def).await?,
            }
            summary.attribute_type_defs += 1;
        }

        for def in &types.new_type_defs {
            match def {
                TypeDef::EntityDef(def) => builder.add_entity_def(def).await?,
                TypeDef::RelationshipDef(def) => builder.add_relationship_def(def).await?,
                TypeDef::ClassificationDef(def) => builder.add_classification_def(def).await?,
            }
            summary.type_defs += 1;
        }

        for patch in &types.type_def_patches {
            builder.add_type_def_patch(patch).await?;
            summary.type_def_patches += 1;
        }
    }

    if let Some(instances) = &archive.archive_instance_store {
        for entity in &instances.entities {
            builder.add_entity(entity).await?;
            summary.entities += 1;
        }

        for relationship in &instances.relationships {
            builder.add_relationship(relationship).await?;
            summary.relationships += 1;
        }

        for classification in &instances.classifications {
            builder.add_classification(classification).await?;
            summary.classifications += 1;
        }
    }

    debug!(added = summary.total(), "Archive replayed");
    Ok(summary)
}
