//! Agent configuration
//!
//! The parts of the agent configuration the plan registry reads: which plan
//! files to load, and which plans each monitor uses.
//!
//! ```yaml
//! plans:
//!   files: [plans/fast.yaml, plans/slow.yaml]
//! monitors:
//!   - id: db1
//!     plan: plans/fast.yaml
//!   - id: db2
//!     plans:
//!       files: [plans/db2.yaml]
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

/// Plan sources for the shared set or for one monitor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlansConfig {
    /// Plan files, one plan per file
    pub files: Vec<String>,
    /// Replace the whole shared set on load instead of upserting
    pub replace: bool,
}

impl PlansConfig {
    /// Create empty configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With plan file
    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.files.push(file.into());
        self
    }

    /// With replace flag
    #[inline]
    #[must_use]
    pub fn with_replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }
}

/// Plans for one monitored instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    /// Monitor identifier, unique within the agent
    pub id: String,
    /// Plan to run; empty means the first available plan
    #[serde(default)]
    pub plan: String,
    /// Monitor-private plan files
    #[serde(default)]
    pub plans: PlansConfig,
}

impl MonitorConfig {
    /// Create monitor config
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// With plan name
    #[inline]
    #[must_use]
    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = plan.into();
        self
    }

    /// With private plan file
    #[must_use]
    pub fn with_plan_file(mut self, file: impl Into<String>) -> Self {
        self.plans.files.push(file.into());
        self
    }
}

/// Agent configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    /// Shared plan sources
    pub plans: PlansConfig,
    /// Monitored instances
    pub monitors: Vec<MonitorConfig>,
}

impl AgentConfig {
    /// Config file read when none is given
    pub const DEFAULT_FILE: &'static str = "cadence.yaml";

    /// Parse config from YAML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Yaml`] on malformed YAML or
    /// [`ConfigError::Invalid`] if monitors are inconsistent.
    pub fn from_yaml(path: &Path, text: &str) -> Result<Self, ConfigError> {
        let config = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str::<Option<Self>>(text)
                .map_err(|source| ConfigError::Yaml {
                    path: path.to_path_buf(),
                    source,
                })?
                .unwrap_or_default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Read config from a file
    ///
    /// A missing file yields the default config unless `required` is set.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>, required: bool) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => Self::from_yaml(path, &text),
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Check that monitor ids are present and unique
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the offending monitor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (i, monitor) in self.monitors.iter().enumerate() {
            if monitor.id.is_empty() {
                return Err(ConfigError::Invalid(format!("monitor {i} has no id")));
            }
            if !seen.insert(monitor.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate monitor id '{}'",
                    monitor.id
                )));
            }
        }
        Ok(())
    }

    /// Get monitor by id
    #[must_use]
    pub fn monitor(&self, id: &str) -> Option<&MonitorConfig> {
        self.monitors.iter().find(|m| m.id == id)
    }
}
