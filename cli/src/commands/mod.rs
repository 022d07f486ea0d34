// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the omarchive CLI

pub mod build;
pub mod config;
pub mod inspect;
pub mod report;

pub use self::build::BuildCommand;
pub use self::config::ConfigCommand;
pub use self::report::ReportCommand;
