// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod definition;
pub mod repository;

pub use definition::*;
pub use repository::*;
