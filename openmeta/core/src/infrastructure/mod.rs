// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Archive Infrastructure
//!
//! - **InMemoryArchiveBuilder** - default builder/cache for destinations
//! - **JsonFileArchiveStore** - archive persisted as a JSON document
//! - **InMemoryArchiveStore** - archive held in process memory

pub mod in_memory_builder;
pub mod json_file_store;
pub mod in_memory_store;

pub use in_memory_builder::InMemoryArchiveBuilder;
pub use json_file_store::JsonFileArchiveStore;
pub use in_memory_store::InMemoryArchiveStore;
