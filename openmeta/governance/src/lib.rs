// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # `openmeta-governance`
//!
//! Governance program model: domains, zones, roles, metrics, subject areas,
//! certification types and policies, plus the certifications issued against
//! them.
//!
//! | Module | Layer | Contents |
//! |--------|-------|----------|
//! | [`domain`] | Domain | `GovernanceDefinition`, `Certification`, repository traits |
//! | [`application`] | Application | `GovernanceProgramService`, archive publishing |
//! | [`infrastructure`] | Infrastructure | in-memory repositories |
//!
//! Definitions render as archive entities
//! ([`GovernanceDefinition::to_entity_detail`]) so a program can be shipped
//! as an open metadata content pack.

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
