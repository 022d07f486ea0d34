// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # `openmeta-discovery`
//!
//! Property model of the open discovery framework: the findings (annotations)
//! a discovery service produces about an asset, the data fields it finds, and
//! the analysis report that collects them.
//!
//! | Module | Layer | Contents |
//! |--------|-------|----------|
//! | [`domain`] | Domain | `Annotation` sum type, `DataField`, `DiscoveryAnalysisReport`, `DiscoveryReportStore` |
//! | [`application`] | Application | report summaries |
//! | [`infrastructure`] | Infrastructure | `InMemoryDiscoveryReportStore` |

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
