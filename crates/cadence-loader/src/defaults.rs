//! Built-in plans
//!
//! Loaded into the shared set when no plan files and no external source are
//! configured. Both are tagged with [`BUILTIN_SOURCE`].

use crate::error::LoadError;
use cadence_model::{Meta, Plan, BUILTIN_SOURCE};

/// Name of the built-in collection plan
pub const DEFAULT_PLAN: &str = "default-mysql";

/// Name of the built-in exporter plan
pub const DEFAULT_EXPORTER_PLAN: &str = "default-exporter";

const DEFAULT_PLAN_YAML: &str = include_str!("plans/default-mysql.yaml");
const DEFAULT_EXPORTER_PLAN_YAML: &str = include_str!("plans/default-exporter.yaml");

/// A plan that collects nothing
#[must_use]
pub fn none() -> Plan {
    Plan::new("none").with_source(BUILTIN_SOURCE)
}

/// Parse the built-in plans in load order
///
/// # Errors
/// Returns [`LoadError::Builtin`] if an embedded document is invalid.
pub fn builtin_plans() -> Result<Vec<(Meta, Plan)>, LoadError> {
    [
        (DEFAULT_PLAN, DEFAULT_PLAN_YAML),
        (DEFAULT_EXPORTER_PLAN, DEFAULT_EXPORTER_PLAN_YAML),
    ]
    .into_iter()
    .map(|(name, yaml)| {
        let plan = Plan::from_yaml(name, yaml)
            .and_then(|plan| plan.validate().map(|()| plan))
            .map_err(LoadError::Builtin)?
            .with_source(BUILTIN_SOURCE);
        let meta = Meta {
            name: name.to_string(),
            source: BUILTIN_SOURCE.to_string(),
            shared: true,
            yaml: yaml.to_string(),
        };
        Ok((meta, plan))
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_plans_parse() {
        let plans = builtin_plans().unwrap();
        let names: Vec<_> = plans.iter().map(|(meta, _)| meta.name.as_str()).collect();
        assert_eq!(names, [DEFAULT_PLAN, DEFAULT_EXPORTER_PLAN]);

        for (meta, plan) in &plans {
            assert!(meta.is_builtin());
            assert!(!meta.yaml.is_empty());
            assert_eq!(plan.name, meta.name);
            assert_eq!(plan.source, BUILTIN_SOURCE);
        }
    }

    #[test]
    fn default_plan_levels_merge() {
        let (_, mut plan) = builtin_plans().unwrap().remove(0);
        let levels = cadence_merge::sort(&mut plan).unwrap();

        let names: Vec<_> = levels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["kpi", "performance", "standard"]);

        // 5s divides 60s, so the slow tier also collects the KPIs
        let status = &plan.levels["standard"].collect["status.global"];
        assert!(status.metrics.iter().any(|m| m == "threads_running"));
    }

    #[test]
    fn exporter_plan_is_single_level() {
        let (_, plan) = builtin_plans().unwrap().remove(1);
        assert_eq!(plan.levels.len(), 1);
        assert_eq!(plan.levels["exporter"].collect.len(), 3);
    }

    #[test]
    fn none_plan_has_no_levels() {
        let mut plan = none();
        assert!(plan.levels.is_empty());
        assert!(cadence_merge::sort(&mut plan).unwrap().is_empty());
    }
}
