// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! In-memory [`DiscoveryReportStore`] for one report.
//!
//! Records are kept in insertion order so exported documents list parents
//! before children.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashSet;
use tracing::debug;

use crate::domain::annotation::{Annotation, AnnotationReview, AnnotationStatus};
use crate::domain::data_field::DataField;
use crate::domain::report::{
    AnnotationAnchor, AnnotationRecord, DataFieldRecord, DiscoveryAnalysisReport, DiscoveryReportDocument,
    DiscoveryRequestStatus,
};
use crate::domain::report_store::{page, DiscoveryError, DiscoveryReportStore};

#[derive(Debug)]
struct ReportState {
    report: DiscoveryAnalysisReport,
    data_fields: Vec<DataFieldRecord>,
    annotations: Vec<AnnotationRecord>,
}

impl ReportState {
    fn annotation_index(&self, guid: &str) -> Option<usize> {
        self.annotations
            .iter()
            .position(|r| r.annotation.guid.as_deref() == Some(guid))
    }

    fn field_index(&self, guid: &str) -> Option<usize> {
        self.data_fields
            .iter()
            .position(|r| r.data_field.guid.as_deref() == Some(guid))
    }

    fn insert_annotation(
        &mut self,
        anchor: AnnotationAnchor,
        mut annotation: Annotation,
    ) -> Result<String, DiscoveryError> {
        match &anchor {
            AnnotationAnchor::Report => {}
            AnnotationAnchor::Annotation { guid } => {
                if self.annotation_index(guid).is_none() {
                    return Err(DiscoveryError::not_found("annotation", guid.clone()));
                }
            }
            AnnotationAnchor::DataField { guid } => {
                if self.field_index(guid).is_none() {
                    return Err(DiscoveryError::not_found("data field", guid.clone()));
                }
                if !annotation.kind.is_data_field_annotation() {
                    return Err(DiscoveryError::InvalidParameter(format!(
                        "{} cannot be attached to a data field",
                        annotation.type_name()
                    )));
                }
            }
        }

        let guid = match &annotation.guid {
            Some(guid) if self.annotation_index(guid).is_some() => {
                return Err(DiscoveryError::Duplicate {
                    kind: "annotation",
                    guid: guid.clone(),
                });
            }
            Some(guid) => guid.clone(),
            None => uuid::Uuid::new_v4().to_string(),
        };
        annotation.guid = Some(guid.clone());

        debug!(guid = %guid, class = annotation.type_name(), anchor = ?anchor, "Annotation added");
        self.annotations.push(AnnotationRecord { anchor, annotation });
        Ok(guid)
    }

    fn insert_data_field(&mut self, parent_guid: Option<String>, mut data_field: DataField) -> Result<String, DiscoveryError> {
        if let Some(parent) = &parent_guid {
            if self.field_index(parent).is_none() {
                return Err(DiscoveryError::not_found("data field", parent.clone()));
            }
        }

        let guid = match &data_field.guid {
            Some(guid) if self.field_index(guid).is_some() => {
                return Err(DiscoveryError::Duplicate {
                    kind: "data field",
                    guid: guid.clone(),
                });
            }
            Some(guid) => guid.clone(),
            None => uuid::Uuid::new_v4().to_string(),
        };
        data_field.guid = Some(guid.clone());

        debug!(guid = %guid, name = %data_field.data_field_name, "Data field added");
        self.data_fields.push(DataFieldRecord { parent_guid, data_field });
        Ok(guid)
    }

    /// Guids of `roots` plus every annotation extending them, transitively.
    fn annotation_closure(&self, roots: HashSet<String>) -> HashSet<String> {
        let mut closure = roots;
        loop {
            let before = closure.len();
            for record in &self.annotations {
                if let (AnnotationAnchor::Annotation { guid: anchor }, Some(guid)) =
                    (&record.anchor, &record.annotation.guid)
                {
                    if closure.contains(anchor) && !closure.contains(guid) {
                        closure.insert(guid.clone());
                    }
                }
            }
            if closure.len() == before {
                return closure;
            }
        }
    }

    fn remove_annotations(&mut self, doomed: &HashSet<String>) {
        self.annotations.retain(|r| match &r.annotation.guid {
            Some(guid) => !doomed.contains(guid),
            None => true,
        });
    }

    fn annotations_where(&self, anchor: &AnnotationAnchor) -> Vec<Annotation> {
        self.annotations
            .iter()
            .filter(|r| &r.anchor == anchor)
            .map(|r| r.annotation.clone())
            .collect()
    }
}

pub struct InMemoryDiscoveryReportStore {
    state: RwLock<ReportState>,
}

impl InMemoryDiscoveryReportStore {
    pub fn new(report: DiscoveryAnalysisReport) -> Self {
        Self {
            state: RwLock::new(ReportState {
                report,
                data_fields: Vec::new(),
                annotations: Vec::new(),
            }),
        }
    }

    /// Rebuild a store from an exported document, validating every anchor.
    pub fn from_document(document: DiscoveryReportDocument) -> Result<Self, DiscoveryError> {
        let mut state = ReportState {
            report: document.report,
            data_fields: Vec::new(),
            annotations: Vec::new(),
        };

        for record in document.data_fields {
            state.insert_data_field(record.parent_guid, record.data_field)?;
        }
        for record in document.annotations {
            state.insert_annotation(record.anchor, record.annotation)?;
        }

        Ok(Self {
            state: RwLock::new(state),
        })
    }
}

#[async_trait]
impl DiscoveryReportStore for InMemoryDiscoveryReportStore {
    async fn get_report(&self) -> Result<DiscoveryAnalysisReport, DiscoveryError> {
        Ok(self.state.read().report.clone())
    }

    async fn set_analysis_step(&self, step: &str) -> Result<(), DiscoveryError> {
        self.state.write().report.analysis_step = Some(step.to_string());
        Ok(())
    }

    async fn set_request_status(&self, status: DiscoveryRequestStatus) -> Result<(), DiscoveryError> {
        self.state.write().report.discovery_request_status = status;
        Ok(())
    }

    async fn add_annotation_to_report(&self, annotation: Annotation) -> Result<String, DiscoveryError> {
        self.state.write().insert_annotation(AnnotationAnchor::Report, annotation)
    }

    async fn add_annotation_to_annotation(
        &self,
        anchor_guid: &str,
        annotation: Annotation,
    ) -> Result<String, DiscoveryError> {
        let anchor = AnnotationAnchor::Annotation {
            guid: anchor_guid.to_string(),
        };
        self.state.write().insert_annotation(anchor, annotation)
    }

    async fn add_annotation_to_data_field(
        &self,
        data_field_guid: &str,
        annotation: Annotation,
    ) -> Result<String, DiscoveryError> {
        let anchor = AnnotationAnchor::DataField {
            guid: data_field_guid.to_string(),
        };
        self.state.write().insert_annotation(anchor, annotation)
    }

    async fn get_annotation(&self, guid: &str) -> Result<Option<Annotation>, DiscoveryError> {
        let state = self.state.read();
        Ok(state
            .annotation_index(guid)
            .map(|i| state.annotations[i].annotation.clone()))
    }

    async fn list_annotations(&self, start_from: usize, page_size: usize) -> Result<Vec<Annotation>, DiscoveryError> {
        let items = self.state.read().annotations_where(&AnnotationAnchor::Report);
        Ok(page(&items, start_from, page_size))
    }

    async fn list_extended_annotations(
        &self,
        anchor_guid: &str,
        start_from: usize,
        page_size: usize,
    ) -> Result<Vec<Annotation>, DiscoveryError> {
        let items = self.state.read().annotations_where(&AnnotationAnchor::Annotation {
            guid: anchor_guid.to_string(),
        });
        Ok(page(&items, start_from, page_size))
    }

    async fn list_data_field_annotations(
        &self,
        data_field_guid: &str,
        start_from: usize,
        page_size: usize,
    ) -> Result<Vec<Annotation>, DiscoveryError> {
        let items = self.state.read().annotations_where(&AnnotationAnchor::DataField {
            guid: data_field_guid.to_string(),
        });
        Ok(page(&items, start_from, page_size))
    }

    async fn update_annotation(&self, annotation: Annotation) -> Result<(), DiscoveryError> {
        let guid = annotation
            .guid
            .clone()
            .ok_or_else(|| DiscoveryError::InvalidParameter("annotation guid is required".to_string()))?;

        let mut state = self.state.write();
        let index = state
            .annotation_index(&guid)
            .ok_or_else(|| DiscoveryError::not_found("annotation", guid.clone()))?;

        let record = &mut state.annotations[index];
        if matches!(record.anchor, AnnotationAnchor::DataField { .. }) && !annotation.kind.is_data_field_annotation() {
            return Err(DiscoveryError::InvalidParameter(format!(
                "{} cannot be attached to a data field",
                annotation.type_name()
            )));
        }
        record.annotation = annotation;
        Ok(())
    }

    async fn review_annotation(
        &self,
        guid: &str,
        status: AnnotationStatus,
        review: AnnotationReview,
    ) -> Result<(), DiscoveryError> {
        let mut state = self.state.write();
        let index = state
            .annotation_index(guid)
            .ok_or_else(|| DiscoveryError::not_found("annotation", guid))?;

        let annotation = &mut state.annotations[index].annotation;
        annotation.annotation_status = status;
        annotation.review = Some(review);
        debug!(guid, status = %status, "Annotation reviewed");
        Ok(())
    }

    async fn delete_annotation(&self, guid: &str) -> Result<(), DiscoveryError> {
        let mut state = self.state.write();
        if state.annotation_index(guid).is_none() {
            return Err(DiscoveryError::not_found("annotation", guid));
        }

        let doomed = state.annotation_closure(HashSet::from([guid.to_string()]));
        state.remove_annotations(&doomed);
        debug!(guid, removed = doomed.len(), "Annotation deleted");
        Ok(())
    }

    async fn add_data_field(&self, data_field: DataField) -> Result<String, DiscoveryError> {
        self.state.write().insert_data_field(None, data_field)
    }

    async fn add_nested_data_field(&self, parent_guid: &str, data_field: DataField) -> Result<String, DiscoveryError> {
        self.state
            .write()
            .insert_data_field(Some(parent_guid.to_string()), data_field)
    }

    async fn get_data_field(&self, guid: &str) -> Result<Option<DataField>, DiscoveryError> {
        let state = self.state.read();
        Ok(state.field_index(guid).map(|i| state.data_fields[i].data_field.clone()))
    }

    async fn list_data_fields(&self, start_from: usize, page_size: usize) -> Result<Vec<DataField>, DiscoveryError> {
        let items: Vec<DataField> = self
            .state
            .read()
            .data_fields
            .iter()
            .filter(|r| r.parent_guid.is_none())
            .map(|r| r.data_field.clone())
            .collect();
        Ok(page(&items, start_from, page_size))
    }

    async fn list_nested_data_fields(
        &self,
        parent_guid: &str,
        start_from: usize,
        page_size: usize,
    ) -> Result<Vec<DataField>, DiscoveryError> {
        let items: Vec<DataField> = self
            .state
            .read()
            .data_fields
            .iter()
            .filter(|r| r.parent_guid.as_deref() == Some(parent_guid))
            .map(|r| r.data_field.clone())
            .collect();
        Ok(page(&items, start_from, page_size))
    }

    async fn update_data_field(&self, data_field: DataField) -> Result<(), DiscoveryError> {
        let guid = data_field
            .guid
            .clone()
            .ok_or_else(|| DiscoveryError::InvalidParameter("data field guid is required".to_string()))?;

        let mut state = self.state.write();
        let index = state
            .field_index(&guid)
            .ok_or_else(|| DiscoveryError::not_found("data field", guid))?;
        state.data_fields[index].data_field = data_field;
        Ok(())
    }

    async fn delete_data_field(&self, guid: &str) -> Result<(), DiscoveryError> {
        let mut state = self.state.write();
        if state.field_index(guid).is_none() {
            return Err(DiscoveryError::not_found("data field", guid));
        }

        let mut fields = HashSet::from([guid.to_string()]);
        loop {
            let before = fields.len();
            for record in &state.data_fields {
                if let (Some(parent), Some(child)) = (&record.parent_guid, &record.data_field.guid) {
                    if fields.contains(parent) && !fields.contains(child) {
                        fields.insert(child.clone());
                    }
                }
            }
            if fields.len() == before {
                break;
            }
        }

        let anchored: HashSet<String> = state
            .annotations
            .iter()
            .filter(|r| matches!(&r.anchor, AnnotationAnchor::DataField { guid } if fields.contains(guid)))
            .filter_map(|r| r.annotation.guid.clone())
            .collect();
        let doomed = state.annotation_closure(anchored);

        state.remove_annotations(&doomed);
        state.data_fields.retain(|r| match &r.data_field.guid {
            Some(g) => !fields.contains(g),
            None => true,
        });

        debug!(guid, fields = fields.len(), annotations = doomed.len(), "Data field deleted");
        Ok(())
    }

    async fn export_document(&self) -> Result<DiscoveryReportDocument, DiscoveryError> {
        let state = self.state.read();
        Ok(DiscoveryReportDocument {
            report: state.report.clone(),
            data_fields: state.data_fields.clone(),
            annotations: state.annotations.clone(),
        })
    }
}
