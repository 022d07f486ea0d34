// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod in_memory_report_store;

pub use in_memory_report_store::InMemoryDiscoveryReportStore;
