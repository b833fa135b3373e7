//! Plan registry
//!
//! [`PlanLoader`] owns the canonical, un-merged plan bodies and hands out
//! owned copies. Consumers are free to merge or otherwise mutate what they
//! get; nothing they do is visible to the registry or to other consumers.
//!
//! All canonical state sits behind one `RwLock`. Loads read and validate
//! every source before taking the write lock, so readers see either the
//! whole previous set or the whole new one.

use crate::config::{MonitorConfig, PlansConfig};
use crate::defaults::builtin_plans;
use crate::error::{LoadError, LoaderResult, LookupError};
use crate::source::PlanSource;
use cadence_merge::Merged;
use cadence_model::{Meta, Plan};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Canonical plan body and its provenance
#[derive(Debug, Clone)]
struct LoadedPlan {
    meta: Meta,
    plan: Plan,
}

impl LoadedPlan {
    fn same_origin(&self, other: &LoadedPlan) -> bool {
        self.meta.name == other.meta.name && self.meta.source == other.meta.source
    }
}

#[derive(Debug, Default)]
struct LoaderState {
    shared: Vec<LoadedPlan>,
    monitors: HashMap<String, Vec<LoadedPlan>>,
}

/// Registry of shared and monitor-private plans
///
/// Safe to share across threads; lookups take a read lock and return owned
/// copies.
pub struct PlanLoader {
    source: Option<Box<dyn PlanSource>>,
    state: RwLock<LoaderState>,
}

impl PlanLoader {
    /// Create loader with no external source
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            state: RwLock::new(LoaderState::default()),
        }
    }

    /// Create loader that also pulls shared plans from `source`
    #[must_use]
    pub fn with_source(source: impl PlanSource + 'static) -> Self {
        Self {
            source: Some(Box::new(source)),
            state: RwLock::new(LoaderState::default()),
        }
    }

    /// Load shared plans
    ///
    /// Sources, in order: plan files from `config`, then the external source
    /// if one was given. The built-in plans are used only when there are
    /// neither files nor an external source.
    ///
    /// Loaded plans are upserted by (name, source) unless `config.replace`
    /// is set, in which case they replace the whole shared set.
    ///
    /// # Errors
    /// Returns [`LoadError`] if any file cannot be read or parsed, any plan
    /// is invalid, or the external source fails. Nothing is committed then.
    pub fn load_shared(&self, config: &PlansConfig) -> Result<(), LoadError> {
        let loaded = match self.read_shared(config) {
            Ok(loaded) => loaded,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load shared plans");
                return Err(err);
            }
        };
        let count = loaded.len();

        let mut state = self.state.write();
        if config.replace {
            state.shared = loaded;
        } else {
            for plan in loaded {
                match state.shared.iter_mut().find(|p| p.same_origin(&plan)) {
                    Some(existing) => *existing = plan,
                    None => state.shared.push(plan),
                }
            }
        }

        tracing::info!(count, total = state.shared.len(), replace = config.replace, "loaded shared plans");
        Ok(())
    }

    /// Load a monitor's private plan files, replacing any it had
    ///
    /// # Errors
    /// Returns [`LoadError`] if any file cannot be read or parsed; the
    /// monitor keeps its previous plans.
    pub fn load_monitor(&self, monitor: &MonitorConfig) -> Result<(), LoadError> {
        let loaded = monitor
            .plans
            .files
            .iter()
            .map(|file| {
                let mut loaded = read_plan_file(file, false)?;
                loaded.plan.monitor_id.clone_from(&monitor.id);
                Ok(loaded)
            })
            .collect::<Result<Vec<_>, LoadError>>();

        let loaded = match loaded {
            Ok(loaded) => loaded,
            Err(err) => {
                tracing::warn!(monitor_id = %monitor.id, error = %err, "failed to load monitor plans");
                return Err(err);
            }
        };

        tracing::info!(monitor_id = %monitor.id, count = loaded.len(), "loaded monitor plans");
        let mut state = self.state.write();
        if loaded.is_empty() {
            state.monitors.remove(&monitor.id);
        } else {
            state.monitors.insert(monitor.id.clone(), loaded);
        }
        Ok(())
    }

    /// Drop a monitor's private plans
    ///
    /// Returns whether the monitor had any.
    pub fn remove_monitor(&self, monitor_id: &str) -> bool {
        self.state.write().monitors.remove(monitor_id).is_some()
    }

    /// Metadata of every shared plan, in load order
    #[must_use]
    pub fn shared_plans(&self) -> Vec<Meta> {
        self.state
            .read()
            .shared
            .iter()
            .map(|p| p.meta.clone())
            .collect()
    }

    /// Metadata of a monitor's private plans, in load order
    #[must_use]
    pub fn monitor_plans(&self, monitor_id: &str) -> Vec<Meta> {
        self.state
            .read()
            .monitors
            .get(monitor_id)
            .map(|plans| plans.iter().map(|p| p.meta.clone()).collect())
            .unwrap_or_default()
    }

    /// Resolve a plan by name and return an owned copy
    ///
    /// The monitor's private plans are searched before the shared set. An
    /// empty `plan_name` selects the first plan found that way.
    ///
    /// # Errors
    /// Returns [`LookupError::NotFound`] if no plan matches.
    pub fn plan(&self, monitor_id: &str, plan_name: &str) -> Result<Plan, LookupError> {
        let state = self.state.read();
        let found = state
            .monitors
            .get(monitor_id)
            .and_then(|plans| find(plans, plan_name))
            .or_else(|| find(&state.shared, plan_name));

        match found {
            Some(loaded) => {
                tracing::debug!(
                    monitor_id,
                    plan = %loaded.meta.name,
                    source = %loaded.meta.source,
                    "resolved plan"
                );
                Ok(loaded.plan.clone())
            }
            None => {
                tracing::debug!(monitor_id, plan = plan_name, "plan not found");
                Err(LookupError::NotFound {
                    name: plan_name.to_string(),
                    monitor_id: monitor_id.to_string(),
                })
            }
        }
    }

    /// Resolve a plan and run the level merge on the copy
    ///
    /// # Errors
    /// Returns a lookup error if no plan matches, or a merge error if a
    /// level frequency is invalid.
    pub fn merged_plan(&self, monitor_id: &str, plan_name: &str) -> LoaderResult<Merged> {
        let mut plan = self.plan(monitor_id, plan_name)?;
        let levels = cadence_merge::sort(&mut plan)?;
        Ok(Merged { plan, levels })
    }

    fn read_shared(&self, config: &PlansConfig) -> Result<Vec<LoadedPlan>, LoadError> {
        let mut loaded = config
            .files
            .iter()
            .map(|file| read_plan_file(file, true))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(source) = &self.source {
            loaded.extend(read_source(source.as_ref(), config)?);
        }

        if config.files.is_empty() && self.source.is_none() {
            loaded = builtin_plans()?
                .into_iter()
                .map(|(meta, plan)| LoadedPlan { meta, plan })
                .collect();
        }

        Ok(loaded)
    }
}

impl Default for PlanLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PlanLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("PlanLoader")
            .field("source", &self.source.as_ref().map(|s| s.id()))
            .field("shared", &state.shared.len())
            .field("monitors", &state.monitors.len())
            .finish()
    }
}

fn find<'a>(plans: &'a [LoadedPlan], name: &str) -> Option<&'a LoadedPlan> {
    if name.is_empty() {
        plans.first()
    } else {
        plans.iter().find(|p| p.meta.name == name)
    }
}

/// Read one plan file; name is the path as given, source its absolute path
fn read_plan_file(file: &str, shared: bool) -> Result<LoadedPlan, LoadError> {
    let path = Path::new(file);
    let source = absolute(path)
        .map_err(|e| LoadError::io_error(file, e))?
        .display()
        .to_string();
    let yaml = fs::read_to_string(path).map_err(|e| LoadError::io_error(file, e))?;

    let plan = Plan::from_yaml(file, &yaml)
        .and_then(|plan| plan.validate().map(|()| plan))
        .map_err(|e| LoadError::file_error(file, e))?
        .with_source(source.clone());

    tracing::debug!(plan = file, source = %source, levels = plan.levels.len(), "read plan file");
    Ok(LoadedPlan {
        meta: Meta {
            name: file.to_string(),
            source,
            shared,
            yaml,
        },
        plan,
    })
}

fn read_source(source: &dyn PlanSource, config: &PlansConfig) -> Result<Vec<LoadedPlan>, LoadError> {
    let source_id = source.id().to_string();
    let plans = source.load(config).map_err(|e| LoadError::Source {
        source_id: source_id.clone(),
        source: e,
    })?;

    plans
        .into_iter()
        .map(|mut plan| {
            if plan.name.is_empty() {
                return Err(LoadError::Unnamed {
                    source_id: source_id.clone(),
                });
            }
            plan.fill_names();
            plan.source.clone_from(&source_id);

            let invalid = |e| LoadError::InvalidPlan {
                source_id: source_id.clone(),
                source: e,
            };
            plan.validate().map_err(invalid)?;
            let yaml = plan.to_yaml().map_err(invalid)?;

            Ok(LoadedPlan {
                meta: Meta {
                    name: plan.name.clone(),
                    source: source_id.clone(),
                    shared: true,
                    yaml,
                },
                plan,
            })
        })
        .collect()
}

/// Absolute, lexically cleaned form of `path`
fn absolute(path: &Path) -> io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut cleaned = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    Ok(cleaned)
}
