// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod archive_destination;
pub mod archive_replay;
pub mod archive_service;
pub mod connector_factory;

pub use archive_destination::ArchiveDestination;
pub use archive_replay::{replay_archive, ReplaySummary};
pub use archive_service::{DynamicArchiveService, ServiceState};
pub use connector_factory::{create_archive_service, create_embedded_connector};
