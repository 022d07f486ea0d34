// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # `openmeta-archive-core`
//!
//! Archive model and archive-building services for open metadata content packs.
//!
//! | Module | Layer | Contents |
//! |--------|-------|----------|
//! | [`domain`] | Domain | archive, type definition and instance model; builder, cache and store traits; service manifest |
//! | [`application`] | Application | `ArchiveDestination` adapter, `DynamicArchiveService` façade, archive replay, connector factory |
//! | [`infrastructure`] | Infrastructure | `InMemoryArchiveBuilder`, `JsonFileArchiveStore`, `InMemoryArchiveStore` |

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
