//! Error types for the plan registry
//!
//! Provides error handling for:
//! - Agent configuration files ([`ConfigError`])
//! - Loading plans from files, built-ins and external sources ([`LoadError`])
//! - Plan lookups ([`LookupError`])

use crate::source::BoxError;
use cadence_model::PlanError;
use std::path::PathBuf;

/// Errors reading agent configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("io error reading config {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid YAML for the config structure
    #[error("invalid config {path}: {source}")]
    Yaml {
        /// Config file path
        path: PathBuf,
        /// Underlying YAML error
        #[source]
        source: serde_yaml::Error,
    },

    /// Config parsed but is inconsistent
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors loading plans into the registry
///
/// A failed load leaves the registry as it was before the call.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// IO error reading a plan file
    #[error("io error reading plan file {path}: {source}")]
    Io {
        /// Plan file path as given
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Plan file is malformed or invalid
    #[error("invalid plan file {path}: {source}")]
    File {
        /// Plan file path as given
        path: String,
        /// Parse or validation failure
        #[source]
        source: PlanError,
    },

    /// External source failed
    #[error("plan source '{source_id}' failed: {source}")]
    Source {
        /// External source id
        source_id: String,
        /// Error returned by the source
        #[source]
        source: BoxError,
    },

    /// External source returned an invalid plan
    #[error("plan source '{source_id}' returned invalid plan: {source}")]
    InvalidPlan {
        /// External source id
        source_id: String,
        /// Validation failure
        #[source]
        source: PlanError,
    },

    /// External source returned a plan without a name
    #[error("plan source '{source_id}' returned a plan with no name")]
    Unnamed {
        /// External source id
        source_id: String,
    },

    /// Built-in plan failed to parse
    #[error("built-in plan is invalid: {0}")]
    Builtin(#[source] PlanError),
}

impl LoadError {
    /// Create IO error for plan file
    pub fn io_error(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create invalid file error
    pub fn file_error(path: impl Into<String>, source: PlanError) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }
}

/// Errors resolving a plan by name
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// No plan with that name for the monitor or in the shared set
    #[error("plan '{name}' not found (monitor '{monitor_id}')")]
    NotFound {
        /// Requested plan name
        name: String,
        /// Monitor whose plans were searched
        monitor_id: String,
    },
}

/// Combined registry error
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// Agent configuration error
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Plan load error
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// Plan lookup error
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// Level merge error
    #[error("merge error: {0}")]
    Merge(#[from] PlanError),
}

impl LoaderError {
    /// Check if the error is an unknown plan name
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Lookup(LookupError::NotFound { .. }))
    }
}

/// Result type alias for registry operations
pub type LoaderResult<T> = Result<T, LoaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = LookupError::NotFound {
            name: "fast".to_string(),
            monitor_id: "db1".to_string(),
        };
        assert_eq!(err.to_string(), "plan 'fast' not found (monitor 'db1')");
    }

    #[test]
    fn source_error_keeps_cause() {
        let err = LoadError::Source {
            source_id: "remote".to_string(),
            source: "connection refused".into(),
        };
        assert!(err.to_string().contains("remote"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn error_conversions() {
        let err: LoaderError = LookupError::NotFound {
            name: "x".to_string(),
            monitor_id: String::new(),
        }
        .into();
        assert!(err.is_not_found());

        let err: LoaderError = LoadError::Unnamed {
            source_id: "s".to_string(),
        }
        .into();
        assert!(!err.is_not_found());
    }
}
