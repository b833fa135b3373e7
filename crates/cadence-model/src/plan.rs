//! Collection plans
//!
//! A [`Plan`] is a set of named [`Level`]s, each polled at its own frequency
//! and collecting its own [`Domain`]s.
//!
//! Every type here owns its data outright: `Clone` reallocates every map and
//! vector down to the last metric name, so a cloned plan shares no storage
//! with the value it was cloned from. Plan handouts rely on that.
//!
//! # YAML form
//!
//! A plan document is a mapping of level name to level. Names are not
//! repeated inside the bodies; [`Plan::from_yaml`] fills them from the keys.
//!
//! ```yaml
//! kpi:
//!   freq: 5s
//!   collect:
//!     status.global:
//!       metrics: [queries, threads_running]
//! ```

use crate::error::{FreqError, PlanError, PlanResult};
use crate::freq::parse_freq;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// A named collection program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// Plan name, unique within its source
    pub name: String,
    /// Origin of the plan (built-in sentinel, absolute file path, or source id)
    pub source: String,
    /// Owning monitor for monitor-private plans, empty for shared plans
    pub monitor_id: String,
    /// Levels keyed by level name
    pub levels: BTreeMap<String, Level>,
}

impl Plan {
    /// Create an empty plan
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a level, keyed by its name
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.levels.insert(level.name.clone(), level);
        self
    }

    /// With source
    #[inline]
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Parse a plan document
    ///
    /// An empty document yields a plan with no levels; call
    /// [`Plan::validate`] to reject it.
    ///
    /// # Errors
    /// Returns [`PlanError::Yaml`] if the text is not a plan document.
    pub fn from_yaml(name: impl Into<String>, text: &str) -> PlanResult<Self> {
        let name = name.into();
        let levels = if text.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_yaml::from_str::<Option<BTreeMap<String, Level>>>(text)
                .map_err(|source| PlanError::Yaml {
                    plan: name.clone(),
                    source,
                })?
                .unwrap_or_default()
        };

        let mut plan = Self {
            name,
            levels,
            ..Self::default()
        };
        plan.fill_names();
        Ok(plan)
    }

    /// Render the plan body as a YAML document
    ///
    /// # Errors
    /// Returns [`PlanError::Yaml`] if serialization fails.
    pub fn to_yaml(&self) -> PlanResult<String> {
        serde_yaml::to_string(&self.levels).map_err(|source| PlanError::Yaml {
            plan: self.name.clone(),
            source,
        })
    }

    /// Fill empty level and domain names from their map keys
    pub fn fill_names(&mut self) {
        for (level_name, level) in &mut self.levels {
            if level.name.is_empty() {
                level.name.clone_from(level_name);
            }
            for (domain_name, domain) in &mut level.collect {
                if domain.name.is_empty() {
                    domain.name.clone_from(domain_name);
                }
            }
        }
    }

    /// Check that the plan has levels and that every frequency is positive
    ///
    /// # Errors
    /// Returns [`PlanError::NoLevels`] or [`PlanError::InvalidFreq`].
    pub fn validate(&self) -> PlanResult<()> {
        if self.levels.is_empty() {
            return Err(PlanError::NoLevels {
                plan: self.name.clone(),
            });
        }
        for (level_name, level) in &self.levels {
            level
                .duration()
                .map_err(|source| PlanError::invalid_freq(&self.name, level_name, source))?;
        }
        Ok(())
    }

    /// Get level by name
    #[inline]
    #[must_use]
    pub fn level(&self, name: &str) -> Option<&Level> {
        self.levels.get(name)
    }

    /// Total number of domains across all levels
    #[must_use]
    pub fn domain_count(&self) -> usize {
        self.levels.values().map(|l| l.collect.len()).sum()
    }
}

/// One polling tier within a plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Level {
    /// Level name (the key in [`Plan::levels`])
    #[serde(skip)]
    pub name: String,
    /// Frequency as written, e.g. `"5s"`
    pub freq: String,
    /// Domains collected at this level, keyed by domain name
    #[serde(default)]
    pub collect: BTreeMap<String, Domain>,
}

impl Level {
    /// Create level with no domains
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, freq: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            freq: freq.into(),
            collect: BTreeMap::new(),
        }
    }

    /// Add a domain, keyed by its name
    #[must_use]
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.collect.insert(domain.name.clone(), domain);
        self
    }

    /// Parsed frequency
    ///
    /// # Errors
    /// Returns [`FreqError`] if the frequency is not a positive duration.
    #[inline]
    pub fn duration(&self) -> Result<Duration, FreqError> {
        parse_freq(&self.freq)
    }

    /// Get domain by name
    #[inline]
    #[must_use]
    pub fn domain(&self, name: &str) -> Option<&Domain> {
        self.collect.get(name)
    }
}

/// One metric-collection target within a level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Domain {
    /// Domain name, matching a collector capability
    #[serde(skip)]
    pub name: String,
    /// Metrics to collect, in collection order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<String>,
    /// Collector-specific options
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
    /// Collector-specific error policy overrides
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, String>,
}

impl Domain {
    /// Create domain with no metrics
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// With metrics, appended in order
    #[must_use]
    pub fn with_metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics.extend(metrics.into_iter().map(Into::into));
        self
    }

    /// With option
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// With error policy
    #[must_use]
    pub fn with_error(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.errors.insert(key.into(), value.into());
        self
    }
}

/// A level in firing order, produced by the merge engine
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortedLevel {
    /// Parsed frequency
    pub freq: Duration,
    /// Level name
    pub name: String,
}
