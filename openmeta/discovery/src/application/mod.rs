// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod report_summary;

pub use report_summary::{summarize_report, ReportSummary};
