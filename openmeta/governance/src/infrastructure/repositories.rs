// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! In-memory governance repositories, backed by guid-keyed `HashMap`s.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::definition::{Certification, GovernanceDefinition, GovernanceDefinitionType};
use crate::domain::repository::{CertificationRepository, GovernanceDefinitionRepository, RepositoryError};

#[derive(Clone, Default)]
pub struct InMemoryGovernanceDefinitionRepository {
    definitions: Arc<RwLock<HashMap<String, GovernanceDefinition>>>,
}

impl InMemoryGovernanceDefinitionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(&self, filter: impl Fn(&GovernanceDefinition) -> bool) -> Vec<GovernanceDefinition> {
        let mut found: Vec<GovernanceDefinition> = self
            .definitions
            .read()
            .values()
            .filter(|d| filter(d))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));
        found
    }
}

#[async_trait]
impl GovernanceDefinitionRepository for InMemoryGovernanceDefinitionRepository {
    async fn save(&self, definition: &GovernanceDefinition) -> Result<(), RepositoryError> {
        self.definitions
            .write()
            .insert(definition.guid.clone(), definition.clone());
        Ok(())
    }

    async fn find_by_guid(&self, guid: &str) -> Result<Option<GovernanceDefinition>, RepositoryError> {
        Ok(self.definitions.read().get(guid).cloned())
    }

    async fn find_by_qualified_name(&self, qualified_name: &str) -> Result<Option<GovernanceDefinition>, RepositoryError> {
        Ok(self
            .definitions
            .read()
            .values()
            .find(|d| d.qualified_name == qualified_name)
            .cloned())
    }

    async fn find_by_type(&self, definition_type: GovernanceDefinitionType) -> Result<Vec<GovernanceDefinition>, RepositoryError> {
        Ok(self.sorted(|d| d.definition_type() == definition_type))
    }

    async fn list_all(&self) -> Result<Vec<GovernanceDefinition>, RepositoryError> {
        Ok(self.sorted(|_| true))
    }

    async fn delete(&self, guid: &str) -> Result<(), RepositoryError> {
        match self.definitions.write().remove(guid) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound(format!("governance definition {}", guid))),
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryCertificationRepository {
    certifications: Arc<RwLock<HashMap<String, Certification>>>,
}

impl InMemoryCertificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn by_start(&self, filter: impl Fn(&Certification) -> bool) -> Vec<Certification> {
        let mut found: Vec<Certification> = self
            .certifications
            .read()
            .values()
            .filter(|c| filter(c))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.guid.cmp(&b.guid)));
        found
    }
}

#[async_trait]
impl CertificationRepository for InMemoryCertificationRepository {
    async fn save(&self, certification: &Certification) -> Result<(), RepositoryError> {
        self.certifications
            .write()
            .insert(certification.guid.clone(), certification.clone());
        Ok(())
    }

    async fn find_by_guid(&self, guid: &str) -> Result<Option<Certification>, RepositoryError> {
        Ok(self.certifications.read().get(guid).cloned())
    }

    async fn find_by_element(&self, element_guid: &str) -> Result<Vec<Certification>, RepositoryError> {
        Ok(self.by_start(|c| c.element_guid == element_guid))
    }

    async fn find_by_certification_type(&self, certification_type_guid: &str) -> Result<Vec<Certification>, RepositoryError> {
        Ok(self.by_start(|c| c.certification_type_guid == certification_type_guid))
    }

    async fn delete(&self, guid: &str) -> Result<(), RepositoryError> {
        match self.certifications.write().remove(guid) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound(format!("certification {}", guid))),
        }
    }
}
