// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Archive Service Configuration
//
// Kubernetes-style manifest describing one archive-build session:
// - archive header (guid, name, originator, dependencies)
// - ordered list of destinations the archive is written to
// - broadcast failure policy
// - logging settings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::domain::archive::{OpenMetadataArchiveProperties, OpenMetadataArchiveType};

pub const API_VERSION: &str = "openmeta.io/v1";
pub const KIND: &str = "ArchiveService";

/// Top-level archive service manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveServiceManifest {
    /// API version (must be "openmeta.io/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "ArchiveService")
    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: ArchiveServiceSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveServiceSpec {
    /// Archive header written by `set_archive_properties`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<ArchiveHeaderConfig>,

    /// Destinations, in broadcast order
    #[serde(default)]
    pub destinations: Vec<DestinationConfig>,

    #[serde(default)]
    pub broadcast: BroadcastConfig,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub observability: Option<ObservabilityConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveHeaderConfig {
    /// Archive GUID; generated when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, rename = "type")]
    pub archive_type: OpenMetadataArchiveType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default = "default_originator")]
    pub originator_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub originator_license: Option<String>,

    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl ArchiveHeaderConfig {
    /// Render the header as archive properties stamped with `creation_date`
    pub fn to_properties(&self, creation_date: DateTime<Utc>) -> OpenMetadataArchiveProperties {
        OpenMetadataArchiveProperties {
            archive_guid: self
                .guid
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            archive_name: self.name.clone(),
            archive_description: self.description.clone(),
            archive_type: self.archive_type,
            archive_version: self.version.clone(),
            originator_name: self.originator_name.clone(),
            originator_license: self.originator_license.clone(),
            creation_date,
            depends_on_archives: self.depends_on.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Unique destination name
    pub name: String,

    #[serde(flatten)]
    pub kind: DestinationKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DestinationKind {
    /// Archive persisted as a JSON document
    JsonFile {
        path: PathBuf,
        #[serde(default = "default_true")]
        pretty: bool,
    },
    /// Archive held in process memory
    InMemory,
}

/// What a broadcast write does when one destination fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BroadcastFailurePolicy {
    /// Abort at the failing destination and surface its error unchanged;
    /// later destinations are not called
    #[default]
    StopOnFirstError,
    /// Call every destination, then report all failures together
    ContinueOnError,
}

impl std::str::FromStr for BroadcastFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stop-on-first-error" | "stop" => Ok(Self::StopOnFirstError),
            "continue-on-error" | "continue" => Ok(Self::ContinueOnError),
            other => Err(format!("unknown broadcast failure policy '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastConfig {
    #[serde(default)]
    pub failure_policy: BroadcastFailurePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format ("json" or "text")
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_originator() -> String {
    "openmeta".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for ArchiveServiceSpec {
    fn default() -> Self {
        Self {
            archive: None,
            destinations: vec![DestinationConfig {
                name: "memory".to_string(),
                kind: DestinationKind::InMemory,
            }],
            broadcast: BroadcastConfig::default(),
            observability: None,
        }
    }
}

impl Default for ArchiveServiceManifest {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: "openmeta-archive".to_string(),
                version: None,
            },
            spec: ArchiveServiceSpec::default(),
        }
    }
}

impl ArchiveServiceManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Places a manifest is looked for when `--config` is absent, highest
    /// precedence first: `$OPENMETA_CONFIG_PATH`, `./openmeta-archive.yaml`,
    /// `~/.openmeta/archive.yaml`, then the system-wide manifest.
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = std::env::var_os("OPENMETA_CONFIG_PATH")
            .map(PathBuf::from)
            .into_iter()
            .collect();
        candidates.push(PathBuf::from("openmeta-archive.yaml"));
        candidates.extend(dirs::home_dir().map(|home| home.join(".openmeta").join("archive.yaml")));

        #[cfg(unix)]
        candidates.push(PathBuf::from("/etc/openmeta/archive.yaml"));
        #[cfg(windows)]
        candidates.push(PathBuf::from(r"C:\ProgramData\OpenMeta\archive.yaml"));

        candidates
    }

    /// First candidate manifest that exists on disk
    pub fn discover_config() -> Option<PathBuf> {
        Self::candidate_paths().into_iter().find(|path| path.is_file())
    }

    /// Load the manifest named on the command line, else the first one
    /// discovered, else an empty manifest. Environment overrides apply to
    /// all three.
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let mut manifest = match cli_path.or_else(Self::discover_config) {
            Some(path) => {
                tracing::info!(path = %path.display(), "Reading archive service manifest");
                Self::from_yaml_file(&path)
                    .map_err(|e| anyhow::anyhow!("Cannot read archive service manifest {}: {}", path.display(), e))?
            }
            None => {
                tracing::warn!("No archive service manifest found; starting with no destinations");
                Self::default()
            }
        };
        manifest.apply_env_overrides();
        Ok(manifest)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("OPENMETA_BROADCAST_POLICY") {
            match val.parse::<BroadcastFailurePolicy>() {
                Ok(policy) => {
                    tracing::info!("Environment override: OPENMETA_BROADCAST_POLICY={}", val);
                    self.spec.broadcast.failure_policy = policy;
                }
                Err(e) => {
                    tracing::warn!("Invalid value for OPENMETA_BROADCAST_POLICY: {}. Ignoring.", e);
                }
            }
        }

        if let Ok(level) = std::env::var("OPENMETA_LOG_LEVEL") {
            let observability = self.spec.observability.get_or_insert(ObservabilityConfig { logging: None });
            observability.logging.get_or_insert_with(LoggingConfig::default).level = level;
        }
    }

    pub fn logging(&self) -> LoggingConfig {
        self.spec
            .observability
            .as_ref()
            .and_then(|o| o.logging.clone())
            .unwrap_or_default()
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!("Invalid apiVersion: '{}'. Must be '{}'", self.api_version, API_VERSION);
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        if let Some(archive) = &self.spec.archive {
            if archive.name.is_empty() {
                anyhow::bail!("spec.archive.name cannot be empty");
            }
        }

        if self.spec.destinations.is_empty() {
            anyhow::bail!("spec.destinations must list at least one destination");
        }

        let mut seen = HashSet::new();
        for destination in &self.spec.destinations {
            if destination.name.is_empty() {
                anyhow::bail!("Destination name cannot be empty");
            }
            if !seen.insert(destination.name.as_str()) {
                anyhow::bail!("Duplicate destination name: {}", destination.name);
            }
            if let DestinationKind::JsonFile { path, .. } = &destination.kind {
                if path.as_os_str().is_empty() {
                    anyhow::bail!("Destination path cannot be empty for: {}", destination.name);
                }
            }
        }

        if let Some(logging) = self.spec.observability.as_ref().and_then(|o| o.logging.as_ref()) {
            if logging.format != "json" && logging.format != "text" {
                anyhow::bail!("Invalid logging format: '{}'. Must be 'json' or 'text'", logging.format);
            }
        }

        Ok(())
    }
}
