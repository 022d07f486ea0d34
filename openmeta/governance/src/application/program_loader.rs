// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Loads a batch of authored definitions into a governance program.

use anyhow::{bail, Context, Result};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::application::program_service::GovernanceProgramService;
use crate::domain::definition::{GovernanceDefinition, GovernanceDefinitionType};

/// Create every definition through `service`, so the program's rules apply
/// to the whole batch.
///
/// Domains go first, then the rest with each parent ahead of the
/// definitions nested under it. Parent references name the guids the batch
/// was authored with; they are rewritten to the guids the service assigns.
/// A parent guid outside the batch is passed through and must already exist
/// in the program.
///
/// Returns the number of definitions created.
pub async fn load_definitions(
    service: &dyn GovernanceProgramService,
    definitions: &[GovernanceDefinition],
) -> Result<usize> {
    let authored: HashSet<&str> = definitions
        .iter()
        .map(|d| d.guid.as_str())
        .filter(|guid| !guid.is_empty())
        .collect();
    let mut assigned: HashMap<String, String> = HashMap::new();

    let is_domain = |d: &&GovernanceDefinition| d.definition_type() == GovernanceDefinitionType::Domain;
    let mut pending: Vec<&GovernanceDefinition> = definitions
        .iter()
        .filter(is_domain)
        .chain(definitions.iter().filter(|d| !is_domain(d)))
        .collect();

    let mut created = 0;
    while !pending.is_empty() {
        let (ready, waiting): (Vec<_>, Vec<_>) = pending.into_iter().partition(|d| match d.parent_guid() {
            Some(parent) => !authored.contains(parent) || assigned.contains_key(parent),
            None => true,
        });
        if ready.is_empty() {
            let names: Vec<&str> = waiting.iter().map(|d| d.qualified_name.as_str()).collect();
            bail!("Nesting cycle among {}", names.join(", "));
        }

        for authored_definition in ready {
            let mut definition = authored_definition.clone();
            if let Some(parent) = definition.parent_guid().and_then(|p| assigned.get(p)).cloned() {
                definition.set_parent_guid(Some(parent));
            }

            let guid = service
                .create_definition(definition)
                .await
                .with_context(|| format!("Governance definition '{}' rejected", authored_definition.qualified_name))?;
            debug!(qualified_name = %authored_definition.qualified_name, %guid, "Definition loaded");

            if !authored_definition.guid.is_empty() {
                assigned.insert(authored_definition.guid.clone(), guid);
            }
            created += 1;
        }
        pending = waiting;
    }

    Ok(created)
}
