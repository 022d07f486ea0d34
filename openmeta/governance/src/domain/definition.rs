// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Governance Definitions
//!
//! A governance program is made of definitions that share one header
//! (qualified name, display name, description, owning domain, scope) and differ
//! in their kind-specific payload, modelled as [`GovernanceDefinitionKind`].
//!
//! `domain_identifier` 0 means the definition applies to every domain. A
//! [`GovernanceDefinitionKind::Domain`] definition *declares* the identifier
//! other definitions reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use openmeta_archive_core::domain::instance::{EntityDetail, InstanceProperties, InstanceType};
use openmeta_archive_core::domain::typedef::EntityDef;

/// Namespace for deterministic entity type guids
const TYPE_GUID_NAMESPACE: uuid::Uuid = uuid::Uuid::from_u128(0x6f70656e_6d65_7461_9a00_676f76657264);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceDefinition {
    /// Assigned by the program service on create
    #[serde(default)]
    pub guid: String,
    pub qualified_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub domain_identifier: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_properties: BTreeMap<String, String>,
    #[serde(flatten)]
    pub kind: GovernanceDefinitionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "definitionType", rename_all = "kebab-case")]
pub enum GovernanceDefinitionKind {
    Domain,
    Zone(GovernanceZone),
    Role(GovernanceRole),
    Metric(GovernanceMetric),
    SubjectArea(SubjectArea),
    CertificationType(CertificationType),
    Policy(GovernancePolicy),
}

/// Payload-free discriminant of [`GovernanceDefinitionKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GovernanceDefinitionType {
    Domain,
    Zone,
    Role,
    Metric,
    SubjectArea,
    CertificationType,
    Policy,
}

impl std::fmt::Display for GovernanceDefinitionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Domain => "governance domain",
            Self::Zone => "governance zone",
            Self::Role => "governance role",
            Self::Metric => "governance metric",
            Self::SubjectArea => "subject area",
            Self::CertificationType => "certification type",
            Self::Policy => "governance policy",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceZone {
    pub zone_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<String>,
    #[serde(default, rename = "parentZoneGUID", skip_serializing_if = "Option::is_none")]
    pub parent_zone_guid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceRole {
    #[serde(default)]
    pub head_count: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceMetric {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectArea {
    pub subject_area_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(default, rename = "parentSubjectAreaGUID", skip_serializing_if = "Option::is_none")]
    pub parent_subject_area_guid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyType {
    #[default]
    Principle,
    Obligation,
    Approach,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernancePolicy {
    #[serde(default)]
    pub policy_type: PolicyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implications: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outcomes: Vec<String>,
}

impl GovernanceDefinition {
    pub fn new(qualified_name: impl Into<String>, kind: GovernanceDefinitionKind) -> Self {
        Self {
            guid: String::new(),
            qualified_name: qualified_name.into(),
            display_name: None,
            description: None,
            domain_identifier: 0,
            scope: None,
            additional_properties: BTreeMap::new(),
            kind,
        }
    }

    pub fn in_domain(mut self, domain_identifier: i32) -> Self {
        self.domain_identifier = domain_identifier;
        self
    }

    pub fn definition_type(&self) -> GovernanceDefinitionType {
        match &self.kind {
            GovernanceDefinitionKind::Domain => GovernanceDefinitionType::Domain,
            GovernanceDefinitionKind::Zone(_) => GovernanceDefinitionType::Zone,
            GovernanceDefinitionKind::Role(_) => GovernanceDefinitionType::Role,
            GovernanceDefinitionKind::Metric(_) => GovernanceDefinitionType::Metric,
            GovernanceDefinitionKind::SubjectArea(_) => GovernanceDefinitionType::SubjectArea,
            GovernanceDefinitionKind::CertificationType(_) => GovernanceDefinitionType::CertificationType,
            GovernanceDefinitionKind::Policy(_) => GovernanceDefinitionType::Policy,
        }
    }

    /// Guid of the definition this one nests under, for zones and subject areas.
    pub fn parent_guid(&self) -> Option<&str> {
        match &self.kind {
            GovernanceDefinitionKind::Zone(zone) => zone.parent_zone_guid.as_deref(),
            GovernanceDefinitionKind::SubjectArea(area) => area.parent_subject_area_guid.as_deref(),
            _ => None,
        }
    }

    /// Replace the parent reference of a zone or subject area. Other kinds
    /// have no parent and are left unchanged.
    pub fn set_parent_guid(&mut self, parent_guid: Option<String>) {
        match &mut self.kind {
            GovernanceDefinitionKind::Zone(zone) => zone.parent_zone_guid = parent_guid,
            GovernanceDefinitionKind::SubjectArea(area) => area.parent_subject_area_guid = parent_guid,
            _ => {}
        }
    }

    /// Open metadata entity type this definition is stored as.
    pub fn entity_type_name(&self) -> &'static str {
        match &self.kind {
            GovernanceDefinitionKind::Domain => "GovernanceDomainDescription",
            GovernanceDefinitionKind::Zone(_) => "GovernanceZone",
            GovernanceDefinitionKind::Role(_) => "GovernanceRole",
            GovernanceDefinitionKind::Metric(_) => "GovernanceMetric",
            GovernanceDefinitionKind::SubjectArea(_) => "SubjectAreaDefinition",
            GovernanceDefinitionKind::CertificationType(_) => "CertificationType",
            GovernanceDefinitionKind::Policy(policy) => match policy.policy_type {
                PolicyType::Principle => "GovernancePrinciple",
                PolicyType::Obligation => "GovernanceObligation",
                PolicyType::Approach => "GovernanceApproach",
            },
        }
    }

    /// Deterministic guid of [`entity_type_name`](Self::entity_type_name).
    pub fn entity_type_guid(&self) -> String {
        uuid::Uuid::new_v5(&TYPE_GUID_NAMESPACE, self.entity_type_name().as_bytes()).to_string()
    }

    /// Entity type definition matching [`to_entity_detail`](Self::to_entity_detail).
    pub fn entity_def(&self) -> EntityDef {
        let mut def = EntityDef::new(self.entity_type_guid(), self.entity_type_name(), 1);
        def.header.description = Some(format!("Type of a {}", self.definition_type()));
        def
    }

    /// Render as an archive entity so a governance program can ship as a
    /// content pack.
    pub fn to_entity_detail(&self) -> EntityDetail {
        let type_name = self.entity_type_name();
        let type_guid = self.entity_type_guid();

        let mut properties = InstanceProperties::new();
        properties.insert("qualifiedName".to_string(), json!(self.qualified_name));
        insert_opt(&mut properties, "displayName", self.display_name.as_deref());
        insert_opt(&mut properties, "description", self.description.as_deref());
        properties.insert("domainIdentifier".to_string(), json!(self.domain_identifier));
        insert_opt(&mut properties, "scope", self.scope.as_deref());
        if !self.additional_properties.is_empty() {
            properties.insert("additionalProperties".to_string(), json!(self.additional_properties));
        }

        match &self.kind {
            GovernanceDefinitionKind::Domain => {}
            GovernanceDefinitionKind::Zone(zone) => {
                properties.insert("zoneName".to_string(), json!(zone.zone_name));
                insert_opt(&mut properties, "criteria", zone.criteria.as_deref());
            }
            GovernanceDefinitionKind::Role(role) => {
                properties.insert("headCount".to_string(), json!(role.head_count));
            }
            GovernanceDefinitionKind::Metric(metric) => {
                insert_opt(&mut properties, "measurement", metric.measurement.as_deref());
                insert_opt(&mut properties, "target", metric.target.as_deref());
            }
            GovernanceDefinitionKind::SubjectArea(area) => {
                properties.insert("subjectAreaName".to_string(), json!(area.subject_area_name));
                insert_opt(&mut properties, "usage", area.usage.as_deref());
            }
            GovernanceDefinitionKind::CertificationType(certification) => {
                insert_opt(&mut properties, "summary", certification.summary.as_deref());
                insert_opt(&mut properties, "details", certification.details.as_deref());
            }
            GovernanceDefinitionKind::Policy(policy) => {
                insert_opt(&mut properties, "priority", policy.priority.as_deref());
                if !policy.implications.is_empty() {
                    properties.insert("implications".to_string(), json!(policy.implications));
                }
                if !policy.outcomes.is_empty() {
                    properties.insert("outcomes".to_string(), json!(policy.outcomes));
                }
            }
        }

        let mut entity = EntityDetail::new(self.guid.clone(), InstanceType::new(type_guid, type_name, 1));
        entity.properties = properties;
        entity
    }
}

fn insert_opt(properties: &mut InstanceProperties, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        properties.insert(name.to_string(), Value::from(value));
    }
}

/// Certification of an element against a certification type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub guid: String,
    #[serde(rename = "certificationTypeGUID")]
    pub certification_type_guid: String,
    #[serde(rename = "elementGUID")]
    pub element_guid: String,
    pub start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custodian: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
}

impl Certification {
    /// Active from `start` (inclusive) until `end` (exclusive).
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && self.end.map_or(true, |end| at < end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_kind_tag_is_flattened() {
        let zone = GovernanceDefinition::new(
            "zone:quarantine",
            GovernanceDefinitionKind::Zone(GovernanceZone {
                zone_name: "quarantine".to_string(),
                criteria: Some("Unverified data".to_string()),
                parent_zone_guid: None,
            }),
        );

        let value = serde_json::to_value(&zone).unwrap();
        assert_eq!(value["definitionType"], "zone");
        assert_eq!(value["zoneName"], "quarantine");
        assert_eq!(value["qualifiedName"], "zone:quarantine");

        let parsed: GovernanceDefinition = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, zone);
    }

    #[test]
    fn test_policy_entity_type_follows_policy_type() {
        let mut definition = GovernanceDefinition::new(
            "policy:retain",
            GovernanceDefinitionKind::Policy(GovernancePolicy {
                policy_type: PolicyType::Obligation,
                priority: Some("high".to_string()),
                implications: vec!["Backups kept 7 years".to_string()],
                outcomes: vec![],
            }),
        )
        .in_domain(2);
        definition.guid = "d-1".to_string();

        let entity = definition.to_entity_detail();

        assert_eq!(entity.guid, "d-1");
        assert_eq!(entity.type_name(), "GovernanceObligation");
        assert_eq!(entity.properties["qualifiedName"], "policy:retain");
        assert_eq!(entity.properties["domainIdentifier"], 2);
        assert_eq!(entity.properties["implications"], json!(["Backups kept 7 years"]));
        assert!(!entity.properties.contains_key("outcomes"));
    }

    #[test]
    fn test_type_guid_is_stable() {
        let a = GovernanceDefinition::new("a", GovernanceDefinitionKind::Domain).to_entity_detail();
        let b = GovernanceDefinition::new("b", GovernanceDefinitionKind::Domain).to_entity_detail();
        assert_eq!(a.header.instance_type.type_def_guid, b.header.instance_type.type_def_guid);
    }

    #[test]
    fn test_certification_window() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap();
        let certification = Certification {
            guid: "c-1".to_string(),
            certification_type_guid: "ct-1".to_string(),
            element_guid: "asset-1".to_string(),
            start,
            end: Some(end),
            certified_by: None,
            custodian: None,
            recipient: None,
            notes: None,
            conditions: None,
        };

        assert!(certification.is_active_at(start));
        assert!(!certification.is_active_at(end));
        assert!(!certification.is_active_at(start - chrono::Duration::days(1)));
    }
}
