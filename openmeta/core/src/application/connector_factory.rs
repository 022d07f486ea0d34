// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Connector Factory - Application Layer
//!
//! Creates concrete store connectors from destination configuration and wires
//! them into a started [`DynamicArchiveService`].

use std::sync::Arc;
use tracing::debug;

use crate::application::archive_service::DynamicArchiveService;
use crate::domain::archive_config::{ArchiveServiceSpec, DestinationConfig, DestinationKind};
use crate::domain::store::{ArchiveError, EmbeddedConnector};
use crate::infrastructure::{InMemoryArchiveStore, JsonFileArchiveStore};

/// Creates an EmbeddedConnector implementation based on the destination type
pub fn create_embedded_connector(config: &DestinationConfig) -> Arc<dyn EmbeddedConnector> {
    match &config.kind {
        DestinationKind::JsonFile { path, pretty } => {
            Arc::new(JsonFileArchiveStore::new(&config.name, path, *pretty))
        }
        DestinationKind::InMemory => Arc::new(InMemoryArchiveStore::new(&config.name)),
    }
}

/// Creates and starts an archive service with one destination per configured entry
pub fn create_archive_service(spec: &ArchiveServiceSpec) -> Result<DynamicArchiveService, ArchiveError> {
    if spec.destinations.is_empty() {
        return Err(ArchiveError::Configuration(
            "at least one destination is required".to_string(),
        ));
    }

    let connectors = spec
        .destinations
        .iter()
        .map(|destination| {
            debug!(destination = %destination.name, "Creating connector");
            create_embedded_connector(destination)
        })
        .collect();

    let service = DynamicArchiveService::new(spec.broadcast.failure_policy);
    service.start(connectors)?;
    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::archive_service::ServiceState;
    use crate::domain::archive_config::BroadcastFailurePolicy;
    use std::path::PathBuf;

    #[test]
    fn test_service_from_spec_keeps_destination_order() {
        let mut spec = ArchiveServiceSpec::default();
        spec.destinations.push(DestinationConfig {
            name: "file".to_string(),
            kind: DestinationKind::JsonFile {
                path: PathBuf::from("out/pack.json"),
                pretty: true,
            },
        });
        spec.broadcast.failure_policy = BroadcastFailurePolicy::ContinueOnError;

        let service = create_archive_service(&spec).unwrap();

        assert_eq!(service.state(), ServiceState::Started);
        assert_eq!(service.policy(), BroadcastFailurePolicy::ContinueOnError);
        let names: Vec<&str> = service.destinations().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["memory", "file"]);
        assert!(service.destinations().iter().all(|d| d.is_buffered()));
    }

    #[test]
    fn test_empty_destination_list_is_rejected() {
        let spec = ArchiveServiceSpec {
            destinations: vec![],
            ..ArchiveServiceSpec::default()
        };

        let err = create_archive_service(&spec).unwrap_err();
        assert!(matches!(err, ArchiveError::Configuration(_)));
    }
}
