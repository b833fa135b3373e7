//! Plan provenance

use serde::Serialize;

/// Source identifier of plans compiled into the agent
pub const BUILTIN_SOURCE: &str = "builtin";

/// Provenance record for a loaded plan, independent of its parsed body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Meta {
    /// Plan name, or the file path as given for file-backed plans
    pub name: String,
    /// [`BUILTIN_SOURCE`], absolute file path, or external source id
    pub source: String,
    /// Available to every monitor (false for monitor-private plans)
    pub shared: bool,
    /// Plan document as loaded
    #[serde(skip)]
    pub yaml: String,
}

impl Meta {
    /// Whether the plan came from the built-in set
    #[inline]
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.source == BUILTIN_SOURCE
    }
}
