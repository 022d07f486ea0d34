// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Archive Domain Layer
//!
//! Pure data model and capability contracts. No I/O.
//!
//! | Module | Key Types |
//! |--------|-----------|
//! | [`archive`] | `OpenMetadataArchive`, `OpenMetadataArchiveProperties` |
//! | [`typedef`] | `AttributeTypeDef`, `TypeDef`, `TypeDefPatch` |
//! | [`instance`] | `EntityDetail`, `Relationship`, `ClassificationEntityExtension` |
//! | [`store`] | `ArchiveBuilder`, `ArchiveCache`, `ArchiveStoreConnector`, `EmbeddedConnector`, `ArchiveError` |
//! | [`archive_config`] | `ArchiveServiceManifest` |

pub mod archive;
pub mod typedef;
pub mod instance;
pub mod store;
pub mod archive_config;

pub use archive::*;
pub use typedef::*;
pub use instance::*;
pub use store::*;
