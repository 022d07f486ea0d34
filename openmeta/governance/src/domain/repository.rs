// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;

use crate::domain::definition::{Certification, GovernanceDefinition, GovernanceDefinitionType};

/// Repository for governance definitions
#[async_trait]
pub trait GovernanceDefinitionRepository: Send + Sync {
    /// Insert or replace a definition, keyed by guid
    async fn save(&self, definition: &GovernanceDefinition) -> Result<(), RepositoryError>;

    async fn find_by_guid(&self, guid: &str) -> Result<Option<GovernanceDefinition>, RepositoryError>;

    async fn find_by_qualified_name(&self, qualified_name: &str) -> Result<Option<GovernanceDefinition>, RepositoryError>;

    /// Definitions of one type, ordered by qualified name
    async fn find_by_type(&self, definition_type: GovernanceDefinitionType) -> Result<Vec<GovernanceDefinition>, RepositoryError>;

    /// All definitions, ordered by qualified name
    async fn list_all(&self) -> Result<Vec<GovernanceDefinition>, RepositoryError>;

    async fn delete(&self, guid: &str) -> Result<(), RepositoryError>;
}

/// Repository for certifications
#[async_trait]
pub trait CertificationRepository: Send + Sync {
    async fn save(&self, certification: &Certification) -> Result<(), RepositoryError>;

    async fn find_by_guid(&self, guid: &str) -> Result<Option<Certification>, RepositoryError>;

    /// Certifications of one element, ordered by start
    async fn find_by_element(&self, element_guid: &str) -> Result<Vec<Certification>, RepositoryError>;

    async fn find_by_certification_type(&self, certification_type_guid: &str) -> Result<Vec<Certification>, RepositoryError>;

    async fn delete(&self, guid: &str) -> Result<(), RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}
