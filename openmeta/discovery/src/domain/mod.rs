// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Discovery Domain Layer
//!
//! | Module | Key Types |
//! |--------|-----------|
//! | [`annotation`] | `Annotation`, `AnnotationKind`, `AnnotationStatus` |
//! | [`data_field`] | `DataField`, `DataItemSortOrder` |
//! | [`report`] | `DiscoveryAnalysisReport`, `DiscoveryReportDocument` |
//! | [`report_store`] | `DiscoveryReportStore`, `DiscoveryError` |

pub mod annotation;
pub mod data_field;
pub mod report;
pub mod report_store;

pub use annotation::*;
pub use data_field::*;
pub use report::*;
pub use report_store::*;
