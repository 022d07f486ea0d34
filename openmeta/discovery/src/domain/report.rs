// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Discovery analysis report and its portable document form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::annotation::Annotation;
use crate::domain::data_field::DataField;

/// Progress of the discovery request that produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscoveryRequestStatus {
    #[default]
    Waiting,
    Activating,
    InProgress,
    Failed,
    Completed,
    Unknown,
}

impl DiscoveryRequestStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::Completed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryAnalysisReport {
    pub guid: String,
    pub qualified_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub creation_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub analysis_parameters: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_step: Option<String>,
    #[serde(default)]
    pub discovery_request_status: DiscoveryRequestStatus,
    #[serde(default, rename = "assetGUID", skip_serializing_if = "Option::is_none")]
    pub asset_guid: Option<String>,
    #[serde(default, rename = "discoveryEngineGUID", skip_serializing_if = "Option::is_none")]
    pub discovery_engine_guid: Option<String>,
    #[serde(default, rename = "discoveryServiceGUID", skip_serializing_if = "Option::is_none")]
    pub discovery_service_guid: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_properties: BTreeMap<String, String>,
}

impl DiscoveryAnalysisReport {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            guid: uuid::Uuid::new_v4().to_string(),
            qualified_name: qualified_name.into(),
            display_name: None,
            description: None,
            creation_date: Utc::now(),
            analysis_parameters: BTreeMap::new(),
            analysis_step: None,
            discovery_request_status: DiscoveryRequestStatus::Waiting,
            asset_guid: None,
            discovery_engine_guid: None,
            discovery_service_guid: None,
            additional_properties: BTreeMap::new(),
        }
    }
}

/// What an annotation is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "anchorType", rename_all = "kebab-case")]
pub enum AnnotationAnchor {
    /// Top-level finding of the report
    Report,
    /// Extends another annotation
    Annotation { guid: String },
    /// Describes one data field
    DataField { guid: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationRecord {
    pub anchor: AnnotationAnchor,
    pub annotation: Annotation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFieldRecord {
    /// Absent for top-level fields
    #[serde(default, rename = "parentGUID", skip_serializing_if = "Option::is_none")]
    pub parent_guid: Option<String>,
    pub data_field: DataField,
}

/// Self-contained JSON form of a report with all its content.
///
/// Data fields precede their nested fields, and anchoring annotations
/// precede the annotations that extend them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryReportDocument {
    pub report: DiscoveryAnalysisReport,
    #[serde(default)]
    pub data_fields: Vec<DataFieldRecord>,
    #[serde(default)]
    pub annotations: Vec<AnnotationRecord>,
}
