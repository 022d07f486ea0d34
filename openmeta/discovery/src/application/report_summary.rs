// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Aggregate view of a discovery report document.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::annotation::AnnotationStatus;
use crate::domain::report::{AnnotationAnchor, DiscoveryReportDocument, DiscoveryRequestStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub report_name: String,
    pub request_status: DiscoveryRequestStatus,
    pub data_fields: usize,
    pub annotations: usize,
    pub extended_annotations: usize,
    pub data_field_annotations: usize,
    /// Keyed by `class` discriminator
    pub by_kind: BTreeMap<String, usize>,
    pub by_status: BTreeMap<AnnotationStatus, usize>,
    pub divergent: usize,
    /// Mean confidence over all annotations, 0 when there are none
    pub average_confidence: f64,
}

pub fn summarize_report(document: &DiscoveryReportDocument) -> ReportSummary {
    let mut by_kind = BTreeMap::new();
    let mut by_status = BTreeMap::new();
    let mut extended_annotations = 0;
    let mut data_field_annotations = 0;
    let mut divergent = 0;
    let mut confidence_total: i64 = 0;

    for record in &document.annotations {
        let annotation = &record.annotation;
        *by_kind.entry(annotation.type_name().to_string()).or_insert(0) += 1;
        *by_status.entry(annotation.annotation_status).or_insert(0) += 1;
        if annotation.kind.is_divergent() {
            divergent += 1;
        }
        confidence_total += i64::from(annotation.confidence_level);

        match record.anchor {
            AnnotationAnchor::Report => {}
            AnnotationAnchor::Annotation { .. } => extended_annotations += 1,
            AnnotationAnchor::DataField { .. } => data_field_annotations += 1,
        }
    }

    let annotations = document.annotations.len();
    let average_confidence = if annotations == 0 {
        0.0
    } else {
        confidence_total as f64 / annotations as f64
    };

    ReportSummary {
        report_name: document.report.qualified_name.clone(),
        request_status: document.report.discovery_request_status,
        data_fields: document.data_fields.len(),
        annotations,
        extended_annotations,
        data_field_annotations,
        by_kind,
        by_status,
        divergent,
        average_confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::annotation::{Annotation, AnnotationKind, DivergentDuplicateAnnotation};
    use crate::domain::report::{AnnotationRecord, DiscoveryAnalysisReport};

    #[test]
    fn test_counts_by_kind_status_and_anchor() {
        let mut approved = Annotation::new(AnnotationKind::Generic).with_confidence(80);
        approved.annotation_status = AnnotationStatus::Approved;
        let document = DiscoveryReportDocument {
            report: DiscoveryAnalysisReport::new("report:orders"),
            data_fields: vec![],
            annotations: vec![
                AnnotationRecord {
                    anchor: AnnotationAnchor::Report,
                    annotation: approved,
                },
                AnnotationRecord {
                    anchor: AnnotationAnchor::Annotation { guid: "a-1".to_string() },
                    annotation: Annotation::new(AnnotationKind::DivergentDuplicate(DivergentDuplicateAnnotation {
                        duplicate_anchor_guid: "e-7".to_string(),
                    }))
                    .with_confidence(40),
                },
            ],
        };

        let summary = summarize_report(&document);

        assert_eq!(summary.report_name, "report:orders");
        assert_eq!(summary.annotations, 2);
        assert_eq!(summary.extended_annotations, 1);
        assert_eq!(summary.data_field_annotations, 0);
        assert_eq!(summary.by_kind.get("Annotation"), Some(&1));
        assert_eq!(summary.by_kind.get("DivergentDuplicateAnnotation"), Some(&1));
        assert_eq!(summary.by_status.get(&AnnotationStatus::Approved), Some(&1));
        assert_eq!(summary.by_status.get(&AnnotationStatus::New), Some(&1));
        assert_eq!(summary.divergent, 1);
        assert!((summary.average_confidence - 60.0).abs() < f64::EPSILON);
    }
}
