// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Discovery Report Store
//!
//! Contract through which a discovery service records its findings against
//! one [`DiscoveryAnalysisReport`].
//!
//! Paged listings take `start_from` (zero-based offset) and `page_size`; a
//! `page_size` of 0 returns everything from `start_from` onwards.

use async_trait::async_trait;

use crate::domain::annotation::{Annotation, AnnotationReview, AnnotationStatus};
use crate::domain::data_field::DataField;
use crate::domain::report::{DiscoveryAnalysisReport, DiscoveryReportDocument, DiscoveryRequestStatus};

#[async_trait]
pub trait DiscoveryReportStore: Send + Sync {
    async fn get_report(&self) -> Result<DiscoveryAnalysisReport, DiscoveryError>;

    async fn set_analysis_step(&self, step: &str) -> Result<(), DiscoveryError>;

    async fn set_request_status(&self, status: DiscoveryRequestStatus) -> Result<(), DiscoveryError>;

    /// Add a top-level annotation; returns its guid
    async fn add_annotation_to_report(&self, annotation: Annotation) -> Result<String, DiscoveryError>;

    /// Add an annotation that extends an existing annotation
    async fn add_annotation_to_annotation(
        &self,
        anchor_guid: &str,
        annotation: Annotation,
    ) -> Result<String, DiscoveryError>;

    /// Add an annotation describing a data field
    async fn add_annotation_to_data_field(
        &self,
        data_field_guid: &str,
        annotation: Annotation,
    ) -> Result<String, DiscoveryError>;

    async fn get_annotation(&self, guid: &str) -> Result<Option<Annotation>, DiscoveryError>;

    async fn list_annotations(&self, start_from: usize, page_size: usize) -> Result<Vec<Annotation>, DiscoveryError>;

    async fn list_extended_annotations(
        &self,
        anchor_guid: &str,
        start_from: usize,
        page_size: usize,
    ) -> Result<Vec<Annotation>, DiscoveryError>;

    async fn list_data_field_annotations(
        &self,
        data_field_guid: &str,
        start_from: usize,
        page_size: usize,
    ) -> Result<Vec<Annotation>, DiscoveryError>;

    /// Replace an annotation's content. Its anchor is unchanged.
    async fn update_annotation(&self, annotation: Annotation) -> Result<(), DiscoveryError>;

    async fn review_annotation(
        &self,
        guid: &str,
        status: AnnotationStatus,
        review: AnnotationReview,
    ) -> Result<(), DiscoveryError>;

    /// Removes the annotation and every annotation extending it
    async fn delete_annotation(&self, guid: &str) -> Result<(), DiscoveryError>;

    /// Add a top-level data field; returns its guid
    async fn add_data_field(&self, data_field: DataField) -> Result<String, DiscoveryError>;

    async fn add_nested_data_field(&self, parent_guid: &str, data_field: DataField) -> Result<String, DiscoveryError>;

    async fn get_data_field(&self, guid: &str) -> Result<Option<DataField>, DiscoveryError>;

    async fn list_data_fields(&self, start_from: usize, page_size: usize) -> Result<Vec<DataField>, DiscoveryError>;

    async fn list_nested_data_fields(
        &self,
        parent_guid: &str,
        start_from: usize,
        page_size: usize,
    ) -> Result<Vec<DataField>, DiscoveryError>;

    async fn update_data_field(&self, data_field: DataField) -> Result<(), DiscoveryError>;

    /// Removes the field, its nested fields and every annotation on them
    async fn delete_data_field(&self, guid: &str) -> Result<(), DiscoveryError>;

    async fn export_document(&self) -> Result<DiscoveryReportDocument, DiscoveryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("{kind} not found: {guid}")]
    NotFound { kind: &'static str, guid: String },

    #[error("Duplicate {kind}: {guid}")]
    Duplicate { kind: &'static str, guid: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DiscoveryError {
    pub fn not_found(kind: &'static str, guid: impl Into<String>) -> Self {
        Self::NotFound { kind, guid: guid.into() }
    }
}

impl From<serde_json::Error> for DiscoveryError {
    fn from(err: serde_json::Error) -> Self {
        DiscoveryError::Serialization(err.to_string())
    }
}

/// Page of `items` starting at `start_from`; `page_size` 0 means no limit.
pub fn page<T: Clone>(items: &[T], start_from: usize, page_size: usize) -> Vec<T> {
    let rest = items.iter().skip(start_from);
    if page_size == 0 {
        rest.cloned().collect()
    } else {
        rest.take(page_size).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paging() {
        let items = vec![1, 2, 3, 4, 5];
        assert_eq!(page(&items, 0, 0), vec![1, 2, 3, 4, 5]);
        assert_eq!(page(&items, 1, 2), vec![2, 3]);
        assert_eq!(page(&items, 4, 10), vec![5]);
        assert!(page(&items, 9, 0).is_empty());
    }
}
