// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod archive_publisher;
pub mod program_loader;
pub mod program_service;

pub use archive_publisher::publish_definitions;
pub use program_loader::load_definitions;
pub use program_service::{CertificationRequest, GovernanceProgramService, StandardGovernanceProgramService};
