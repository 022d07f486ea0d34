// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Publishes governance definitions into an archive as entities.

use tracing::debug;

use openmeta_archive_core::domain::store::{ArchiveBuilder, ArchiveError};

use crate::domain::definition::GovernanceDefinition;

/// Add each definition as an entity, preceded by its entity type the first
/// time that type is seen. Types already present in the builder are reused.
///
/// Returns the number of entities added.
pub async fn publish_definitions(
    definitions: &[GovernanceDefinition],
    builder: &dyn ArchiveBuilder,
) -> Result<usize, ArchiveError> {
    for definition in definitions {
        let type_name = definition.entity_type_name();
        if builder.get_type_def_by_name(type_name).await?.is_none() {
            builder.add_entity_def(&definition.entity_def()).await?;
            debug!(type_name, "Governance entity type added");
        }
        builder.add_entity(&definition.to_entity_detail()).await?;
    }
    Ok(definitions.len())
}
