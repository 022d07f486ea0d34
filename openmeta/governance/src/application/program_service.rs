// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Governance Program Application Service
//!
//! Maintains the definitions of a governance program and the certifications
//! issued against them, enforcing the program's referential rules:
//! - qualified names are unique
//! - a non-zero `domain_identifier` must be declared by a governance domain
//! - parent zones and parent subject areas must exist and be of the same kind
//! - a definition keeps its kind for life
//! - a definition cannot be deleted while nested definitions or
//!   certifications reference it

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::definition::{
    Certification, GovernanceDefinition, GovernanceDefinitionKind, GovernanceDefinitionType,
};
use crate::domain::repository::{CertificationRepository, GovernanceDefinitionRepository};

/// Details of a new certification
#[derive(Debug, Clone, Default)]
pub struct CertificationRequest {
    /// Defaults to now
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub certified_by: Option<String>,
    pub custodian: Option<String>,
    pub recipient: Option<String>,
    pub notes: Option<String>,
    pub conditions: Option<String>,
}

// ============================================================================
// Service Trait
// ============================================================================

#[async_trait]
pub trait GovernanceProgramService: Send + Sync {
    /// Create a definition and return its assigned guid
    async fn create_definition(&self, definition: GovernanceDefinition) -> Result<String>;

    /// Replace an existing definition; its guid identifies it
    async fn update_definition(&self, definition: GovernanceDefinition) -> Result<()>;

    async fn delete_definition(&self, guid: &str) -> Result<()>;

    async fn get_definition(&self, guid: &str) -> Result<Option<GovernanceDefinition>>;

    async fn get_definition_by_name(&self, qualified_name: &str) -> Result<Option<GovernanceDefinition>>;

    async fn list_definitions(&self, definition_type: GovernanceDefinitionType) -> Result<Vec<GovernanceDefinition>>;

    async fn list_all_definitions(&self) -> Result<Vec<GovernanceDefinition>>;

    /// Zones whose parent is `parent_guid`
    async fn nested_zones(&self, parent_guid: &str) -> Result<Vec<GovernanceDefinition>>;

    /// Certify an element; returns the certification guid
    async fn certify(
        &self,
        certification_type_guid: &str,
        element_guid: &str,
        request: CertificationRequest,
    ) -> Result<String>;

    async fn end_certification(&self, certification_guid: &str, end: DateTime<Utc>) -> Result<()>;

    async fn list_certifications(&self, element_guid: &str) -> Result<Vec<Certification>>;

    async fn active_certifications(&self, element_guid: &str, at: DateTime<Utc>) -> Result<Vec<Certification>>;
}

// ============================================================================
// Standard Implementation
// ============================================================================

pub struct StandardGovernanceProgramService {
    definitions: Arc<dyn GovernanceDefinitionRepository>,
    certifications: Arc<dyn CertificationRepository>,
}

impl StandardGovernanceProgramService {
    pub fn new(
        definitions: Arc<dyn GovernanceDefinitionRepository>,
        certifications: Arc<dyn CertificationRepository>,
    ) -> Self {
        Self {
            definitions,
            certifications,
        }
    }

    async fn validate_references(&self, definition: &GovernanceDefinition) -> Result<()> {
        if definition.qualified_name.trim().is_empty() {
            bail!("qualifiedName cannot be empty");
        }

        match &definition.kind {
            GovernanceDefinitionKind::Domain => {
                if definition.domain_identifier == 0 {
                    bail!("Governance domain '{}' needs a non-zero domainIdentifier", definition.qualified_name);
                }
                let clash = self
                    .definitions
                    .find_by_type(GovernanceDefinitionType::Domain)
                    .await?
                    .into_iter()
                    .any(|d| d.domain_identifier == definition.domain_identifier && d.guid != definition.guid);
                if clash {
                    bail!("Domain identifier {} is already declared", definition.domain_identifier);
                }
            }
            _ if definition.domain_identifier != 0 => {
                let declared = self
                    .definitions
                    .find_by_type(GovernanceDefinitionType::Domain)
                    .await?
                    .into_iter()
                    .any(|d| d.domain_identifier == definition.domain_identifier);
                if !declared {
                    bail!(
                        "Domain identifier {} of '{}' is not declared by any governance domain",
                        definition.domain_identifier,
                        definition.qualified_name
                    );
                }
            }
            _ => {}
        }

        if let Some(parent_guid) = definition.parent_guid() {
            if parent_guid == definition.guid {
                bail!("'{}' cannot be its own parent", definition.qualified_name);
            }
            let parent = self
                .definitions
                .find_by_guid(parent_guid)
                .await?
                .with_context(|| format!("Parent {} of '{}' not found", parent_guid, definition.qualified_name))?;
            if parent.definition_type() != definition.definition_type() {
                bail!(
                    "Parent {} is a {}, expected a {}",
                    parent_guid,
                    parent.definition_type(),
                    definition.definition_type()
                );
            }
            self.ensure_not_ancestor(&definition.guid, parent).await?;
        }

        Ok(())
    }

    /// Walk up from `parent`; reaching `guid` would close a cycle.
    async fn ensure_not_ancestor(&self, guid: &str, mut parent: GovernanceDefinition) -> Result<()> {
        if guid.is_empty() {
            return Ok(());
        }
        loop {
            if parent.guid == guid {
                bail!("Nesting under {} would create a cycle", parent.qualified_name);
            }
            let Some(next) = parent.parent_guid().map(str::to_string) else {
                return Ok(());
            };
            match self.definitions.find_by_guid(&next).await? {
                Some(definition) => parent = definition,
                None => return Ok(()),
            }
        }
    }
}

#[async_trait]
impl GovernanceProgramService for StandardGovernanceProgramService {
    async fn create_definition(&self, mut definition: GovernanceDefinition) -> Result<String> {
        definition.guid = uuid::Uuid::new_v4().to_string();

        if self
            .definitions
            .find_by_qualified_name(&definition.qualified_name)
            .await?
            .is_some()
        {
            bail!("A definition named '{}' already exists", definition.qualified_name);
        }
        self.validate_references(&definition).await?;

        self.definitions.save(&definition).await?;
        info!(
            guid = %definition.guid,
            qualified_name = %definition.qualified_name,
            definition_type = %definition.definition_type(),
            "Governance definition created"
        );
        Ok(definition.guid)
    }

    async fn update_definition(&self, definition: GovernanceDefinition) -> Result<()> {
        let existing = self
            .definitions
            .find_by_guid(&definition.guid)
            .await?
            .with_context(|| format!("Governance definition {} not found", definition.guid))?;

        if existing.definition_type() != definition.definition_type() {
            bail!(
                "Cannot change {} {} into a {}",
                existing.definition_type(),
                definition.guid,
                definition.definition_type()
            );
        }

        if existing.qualified_name != definition.qualified_name {
            if let Some(other) = self
                .definitions
                .find_by_qualified_name(&definition.qualified_name)
                .await?
            {
                if other.guid != definition.guid {
                    bail!("A definition named '{}' already exists", definition.qualified_name);
                }
            }
        }
        self.validate_references(&definition).await?;

        self.definitions.save(&definition).await?;
        debug!(guid = %definition.guid, "Governance definition updated");
        Ok(())
    }

    async fn delete_definition(&self, guid: &str) -> Result<()> {
        let existing = self
            .definitions
            .find_by_guid(guid)
            .await?
            .with_context(|| format!("Governance definition {} not found", guid))?;

        let children = self
            .definitions
            .find_by_type(existing.definition_type())
            .await?
            .into_iter()
            .filter(|d| d.parent_guid() == Some(guid))
            .count();
        if children > 0 {
            bail!("'{}' still has {} nested definition(s)", existing.qualified_name, children);
        }

        let certified = self.certifications.find_by_certification_type(guid).await?.len();
        if certified > 0 {
            bail!("'{}' is referenced by {} certification(s)", existing.qualified_name, certified);
        }

        self.definitions.delete(guid).await?;
        info!(guid, qualified_name = %existing.qualified_name, "Governance definition deleted");
        Ok(())
    }

    async fn get_definition(&self, guid: &str) -> Result<Option<GovernanceDefinition>> {
        Ok(self.definitions.find_by_guid(guid).await?)
    }

    async fn get_definition_by_name(&self, qualified_name: &str) -> Result<Option<GovernanceDefinition>> {
        Ok(self.definitions.find_by_qualified_name(qualified_name).await?)
    }

    async fn list_definitions(&self, definition_type: GovernanceDefinitionType) -> Result<Vec<GovernanceDefinition>> {
        Ok(self.definitions.find_by_type(definition_type).await?)
    }

    async fn list_all_definitions(&self) -> Result<Vec<GovernanceDefinition>> {
        Ok(self.definitions.list_all().await?)
    }

    async fn nested_zones(&self, parent_guid: &str) -> Result<Vec<GovernanceDefinition>> {
        Ok(self
            .definitions
            .find_by_type(GovernanceDefinitionType::Zone)
            .await?
            .into_iter()
            .filter(|d| d.parent_guid() == Some(parent_guid))
            .collect())
    }

    async fn certify(
        &self,
        certification_type_guid: &str,
        element_guid: &str,
        request: CertificationRequest,
    ) -> Result<String> {
        let certification_type = self
            .definitions
            .find_by_guid(certification_type_guid)
            .await?
            .with_context(|| format!("Certification type {} not found", certification_type_guid))?;
        if certification_type.definition_type() != GovernanceDefinitionType::CertificationType {
            bail!(
                "{} is a {}, not a certification type",
                certification_type_guid,
                certification_type.definition_type()
            );
        }
        if element_guid.is_empty() {
            bail!("elementGUID cannot be empty");
        }

        let start = request.start.unwrap_or_else(Utc::now);
        if let Some(end) = request.end {
            if end <= start {
                bail!("Certification end {} is not after its start {}", end, start);
            }
        }

        let certification = Certification {
            guid: uuid::Uuid::new_v4().to_string(),
            certification_type_guid: certification_type_guid.to_string(),
            element_guid: element_guid.to_string(),
            start,
            end: request.end,
            certified_by: request.certified_by,
            custodian: request.custodian,
            recipient: request.recipient,
            notes: request.notes,
            conditions: request.conditions,
        };
        self.certifications.save(&certification).await?;

        info!(
            guid = %certification.guid,
            element = element_guid,
            certification_type = %certification_type.qualified_name,
            "Element certified"
        );
        Ok(certification.guid)
    }

    async fn end_certification(&self, certification_guid: &str, end: DateTime<Utc>) -> Result<()> {
        let mut certification = self
            .certifications
            .find_by_guid(certification_guid)
            .await?
            .with_context(|| format!("Certification {} not found", certification_guid))?;

        if end <= certification.start {
            bail!("Certification end {} is not after its start {}", end, certification.start);
        }
        certification.end = Some(end);
        self.certifications.save(&certification).await?;
        debug!(guid = certification_guid, %end, "Certification ended");
        Ok(())
    }

    async fn list_certifications(&self, element_guid: &str) -> Result<Vec<Certification>> {
        Ok(self.certifications.find_by_element(element_guid).await?)
    }

    async fn active_certifications(&self, element_guid: &str, at: DateTime<Utc>) -> Result<Vec<Certification>> {
        Ok(self
            .certifications
            .find_by_element(element_guid)
            .await?
            .into_iter()
            .filter(|c| c.is_active_at(at))
            .collect())
    }
}
