// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Annotations
//!
//! An [`Annotation`] records one finding of a discovery service. The fields
//! every finding carries live on [`Annotation`] itself; what kind of finding
//! it is, and the kind-specific payload, is the [`AnnotationKind`] sum type.
//!
//! On the wire the kind is the `class` discriminator, flattened into the
//! annotation object:
//!
//! ```json
//! { "class": "QualityAnnotation", "guid": "...", "summary": "...",
//!   "qualityDimension": "completeness", "qualityScore": 87 }
//! ```
//!
//! The divergent-duplicate family nests: every `Divergent*` payload embeds
//! [`DivergentDuplicateAnnotation`], and the `DivergentAttachment*` payloads
//! embed [`DivergentAttachmentAnnotation`]. Nested payloads are flattened, so
//! the JSON stays a single flat object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Steward workflow state of an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnnotationStatus {
    #[default]
    New,
    Reviewed,
    Approved,
    Actioned,
    Invalid,
    Ignore,
    Other,
    Unknown,
}

impl AnnotationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Reviewed => "reviewed",
            Self::Approved => "approved",
            Self::Actioned => "actioned",
            Self::Invalid => "invalid",
            Self::Ignore => "ignore",
            Self::Other => "other",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for AnnotationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A steward's review of an annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationReview {
    pub review_date: DateTime<Utc>,
    pub steward: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// One discovery finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Assigned by the report store when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    /// Informal name of the finding, e.g. "Column profile"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// 0..=100
    #[serde(default)]
    pub confidence_level: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_step: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_properties: Option<String>,
    #[serde(default)]
    pub annotation_status: AnnotationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<AnnotationReview>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extended_properties: BTreeMap<String, serde_json::Value>,
    #[serde(flatten)]
    pub kind: AnnotationKind,
}

impl Annotation {
    pub fn new(kind: AnnotationKind) -> Self {
        Self {
            guid: None,
            annotation_type: None,
            summary: None,
            confidence_level: 0,
            expression: None,
            explanation: None,
            analysis_step: None,
            json_properties: None,
            annotation_status: AnnotationStatus::New,
            review: None,
            additional_properties: BTreeMap::new(),
            extended_properties: BTreeMap::new(),
            kind,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_confidence(mut self, confidence_level: i32) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

/// Kind of finding, with its kind-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum AnnotationKind {
    #[serde(rename = "Annotation")]
    Generic,
    #[serde(rename = "ClassificationAnnotation")]
    Classification(ClassificationAnnotation),
    #[serde(rename = "DataClassAnnotation")]
    DataClass(DataClassAnnotation),
    #[serde(rename = "DataFieldAnnotation")]
    DataField,
    #[serde(rename = "DataProfileAnnotation")]
    DataProfile(DataProfileAnnotation),
    #[serde(rename = "DataProfileLogAnnotation")]
    DataProfileLog(DataProfileLogAnnotation),
    #[serde(rename = "DataSourceMeasurementAnnotation")]
    DataSourceMeasurement(DataSourceMeasurementAnnotation),
    #[serde(rename = "DataSourcePhysicalStatusAnnotation")]
    DataSourcePhysicalStatus(DataSourcePhysicalStatusAnnotation),
    #[serde(rename = "FingerprintAnnotation")]
    Fingerprint(FingerprintAnnotation),
    #[serde(rename = "QualityAnnotation")]
    Quality(QualityAnnotation),
    #[serde(rename = "RelationshipAdviceAnnotation")]
    RelationshipAdvice(RelationshipAdviceAnnotation),
    #[serde(rename = "RequestForActionAnnotation")]
    RequestForAction(RequestForActionAnnotation),
    #[serde(rename = "SchemaAnalysisAnnotation")]
    SchemaAnalysis(SchemaAnalysisAnnotation),
    #[serde(rename = "SemanticAnnotation")]
    Semantic(SemanticAnnotation),
    #[serde(rename = "SuspectDuplicateAnnotation")]
    SuspectDuplicate(SuspectDuplicateAnnotation),
    #[serde(rename = "DivergentDuplicateAnnotation")]
    DivergentDuplicate(DivergentDuplicateAnnotation),
    #[serde(rename = "DivergentValueAnnotation")]
    DivergentValue(DivergentValueAnnotation),
    #[serde(rename = "DivergentClassificationAnnotation")]
    DivergentClassification(DivergentClassificationAnnotation),
    #[serde(rename = "DivergentRelationshipAnnotation")]
    DivergentRelationship(DivergentRelationshipAnnotation),
    #[serde(rename = "DivergentAttachmentAnnotation")]
    DivergentAttachment(DivergentAttachmentAnnotation),
    #[serde(rename = "DivergentAttachmentValueAnnotation")]
    DivergentAttachmentValue(DivergentAttachmentValueAnnotation),
    #[serde(rename = "DivergentAttachmentClassificationAnnotation")]
    DivergentAttachmentClassification(DivergentAttachmentClassificationAnnotation),
    #[serde(rename = "DivergentAttachmentRelationshipAnnotation")]
    DivergentAttachmentRelationship(DivergentAttachmentRelationshipAnnotation),
}

impl AnnotationKind {
    /// The `class` discriminator value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Generic => "Annotation",
            Self::Classification(_) => "ClassificationAnnotation",
            Self::DataClass(_) => "DataClassAnnotation",
            Self::DataField => "DataFieldAnnotation",
            Self::DataProfile(_) => "DataProfileAnnotation",
            Self::DataProfileLog(_) => "DataProfileLogAnnotation",
            Self::DataSourceMeasurement(_) => "DataSourceMeasurementAnnotation",
            Self::DataSourcePhysicalStatus(_) => "DataSourcePhysicalStatusAnnotation",
            Self::Fingerprint(_) => "FingerprintAnnotation",
            Self::Quality(_) => "QualityAnnotation",
            Self::RelationshipAdvice(_) => "RelationshipAdviceAnnotation",
            Self::RequestForAction(_) => "RequestForActionAnnotation",
            Self::SchemaAnalysis(_) => "SchemaAnalysisAnnotation",
            Self::Semantic(_) => "SemanticAnnotation",
            Self::SuspectDuplicate(_) => "SuspectDuplicateAnnotation",
            Self::DivergentDuplicate(_) => "DivergentDuplicateAnnotation",
            Self::DivergentValue(_) => "DivergentValueAnnotation",
            Self::DivergentClassification(_) => "DivergentClassificationAnnotation",
            Self::DivergentRelationship(_) => "DivergentRelationshipAnnotation",
            Self::DivergentAttachment(_) => "DivergentAttachmentAnnotation",
            Self::DivergentAttachmentValue(_) => "DivergentAttachmentValueAnnotation",
            Self::DivergentAttachmentClassification(_) => "DivergentAttachmentClassificationAnnotation",
            Self::DivergentAttachmentRelationship(_) => "DivergentAttachmentRelationshipAnnotation",
        }
    }

    /// Findings that describe a single data field and may be anchored to one.
    pub fn is_data_field_annotation(&self) -> bool {
        matches!(
            self,
            Self::DataField
                | Self::Classification(_)
                | Self::DataClass(_)
                | Self::DataProfile(_)
                | Self::DataProfileLog(_)
                | Self::Fingerprint(_)
                | Self::Quality(_)
                | Self::RelationshipAdvice(_)
                | Self::Semantic(_)
        )
    }

    /// Findings that describe data source measurements.
    pub fn is_data_source_measurement(&self) -> bool {
        matches!(self, Self::DataSourceMeasurement(_) | Self::DataSourcePhysicalStatus(_))
    }

    pub fn is_divergent(&self) -> bool {
        self.duplicate_anchor_guid().is_some()
    }

    /// Guid of the anchor entity this divergence was found against.
    pub fn duplicate_anchor_guid(&self) -> Option<&str> {
        let duplicate = match self {
            Self::DivergentDuplicate(a) => a,
            Self::DivergentValue(a) => &a.duplicate,
            Self::DivergentClassification(a) => &a.duplicate,
            Self::DivergentRelationship(a) => &a.duplicate,
            Self::DivergentAttachment(a) => &a.duplicate,
            Self::DivergentAttachmentValue(a) => &a.attachment.duplicate,
            Self::DivergentAttachmentClassification(a) => &a.attachment.duplicate,
            Self::DivergentAttachmentRelationship(a) => &a.attachment.duplicate,
            _ => return None,
        };
        Some(&duplicate.duplicate_anchor_guid)
    }
}

// ============================================================================
// Data field findings
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationAnnotation {
    /// Candidate classification name to its properties as JSON text
    #[serde(default)]
    pub candidate_classifications: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataClassAnnotation {
    #[serde(default, rename = "candidateDataClassGUIDs")]
    pub candidate_data_class_guids: Vec<String>,
    #[serde(default)]
    pub match_threshold: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataProfileAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inferred_data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inferred_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inferred_length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inferred_precision: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inferred_scale: Option<i32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub profile_properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub profile_flags: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub profile_counts: BTreeMap<String, i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_list: Vec<String>,
    /// Distinct value to number of occurrences
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub value_count: BTreeMap<String, i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_range_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_range_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataProfileLogAnnotation {
    #[serde(default)]
    pub data_profile_log_file_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_algorithm: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_dimension: Option<String>,
    #[serde(default)]
    pub quality_score: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipAdviceAnnotation {
    #[serde(default, rename = "relatedEntityGUID")]
    pub related_entity_guid: String,
    #[serde(default)]
    pub relationship_type_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationship_properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub informal_term: Option<String>,
    #[serde(default, rename = "candidateGlossaryTermGUIDs")]
    pub candidate_glossary_term_guids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub informal_topic: Option<String>,
    #[serde(default, rename = "candidateGlossaryCategoryGUIDs")]
    pub candidate_glossary_category_guids: Vec<String>,
}

// ============================================================================
// Data source findings
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceMeasurementAnnotation {
    #[serde(default)]
    pub data_source_properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourcePhysicalStatusAnnotation {
    #[serde(flatten)]
    pub measurement: DataSourceMeasurementAnnotation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub size: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaAnalysisAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_type_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestForActionAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery_activity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_requested: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub action_properties: BTreeMap<String, String>,
}

// ============================================================================
// Duplicate findings
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspectDuplicateAnnotation {
    #[serde(default, rename = "duplicateAnchorGUIDs")]
    pub duplicate_anchor_guids: Vec<String>,
    #[serde(default)]
    pub matching_property_names: Vec<String>,
    #[serde(default)]
    pub matching_classification_names: Vec<String>,
    #[serde(default, rename = "matchingAttachmentGUIDs")]
    pub matching_attachment_guids: Vec<String>,
    #[serde(default, rename = "matchingRelationshipGUIDs")]
    pub matching_relationship_guids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivergentDuplicateAnnotation {
    #[serde(default, rename = "duplicateAnchorGUID")]
    pub duplicate_anchor_guid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivergentValueAnnotation {
    #[serde(flatten)]
    pub duplicate: DivergentDuplicateAnnotation,
    #[serde(default)]
    pub divergent_property_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivergentClassificationAnnotation {
    #[serde(flatten)]
    pub duplicate: DivergentDuplicateAnnotation,
    #[serde(default)]
    pub divergent_classification_name: String,
    #[serde(default)]
    pub divergent_classification_property_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivergentRelationshipAnnotation {
    #[serde(flatten)]
    pub duplicate: DivergentDuplicateAnnotation,
    #[serde(default, rename = "divergentRelationshipGUID")]
    pub divergent_relationship_guid: String,
    #[serde(default)]
    pub divergent_relationship_property_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivergentAttachmentAnnotation {
    #[serde(flatten)]
    pub duplicate: DivergentDuplicateAnnotation,
    #[serde(default, rename = "attachmentGUID")]
    pub attachment_guid: String,
    #[serde(default, rename = "duplicateAttachmentGUID")]
    pub duplicate_attachment_guid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivergentAttachmentValueAnnotation {
    #[serde(flatten)]
    pub attachment: DivergentAttachmentAnnotation,
    #[serde(default)]
    pub divergent_property_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivergentAttachmentClassificationAnnotation {
    #[serde(flatten)]
    pub attachment: DivergentAttachmentAnnotation,
    #[serde(default)]
    pub divergent_classification_name: String,
    #[serde(default)]
    pub divergent_classification_property_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivergentAttachmentRelationshipAnnotation {
    #[serde(flatten)]
    pub attachment: DivergentAttachmentAnnotation,
    #[serde(default, rename = "divergentRelationshipGUID")]
    pub divergent_relationship_guid: String,
    #[serde(default)]
    pub divergent_relationship_property_names: Vec<String>,
}
