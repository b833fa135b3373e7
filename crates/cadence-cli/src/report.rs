//! Plain-text reports written to stdout

use anyhow::{Context, Result};
use cadence_loader::{AgentConfig, PlanLoader};
use cadence_merge::Merged;
use cadence_model::Meta;
use std::io::Write;

/// Final config as YAML
pub(crate) fn config(config: &AgentConfig, out: &mut impl Write) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("failed to encode config")?;
    out.write_all(yaml.as_bytes())?;
    Ok(())
}

/// Shared plans, then each monitor's private plans, each with its document
pub(crate) fn plans(loader: &PlanLoader, config: &AgentConfig, out: &mut impl Write) -> Result<()> {
    writeln!(out, "shared")?;
    metas(&loader.shared_plans(), out)?;

    for monitor in &config.monitors {
        let private = loader.monitor_plans(&monitor.id);
        if private.is_empty() {
            continue;
        }
        writeln!(out, "monitor {}", monitor.id)?;
        metas(&private, out)?;
    }
    Ok(())
}

fn metas(metas: &[Meta], out: &mut impl Write) -> Result<()> {
    for meta in metas {
        writeln!(out, "  {} ({})", meta.name, meta.source)?;
        for line in meta.yaml.lines() {
            writeln!(out, "    {line}")?;
        }
    }
    Ok(())
}

/// Level schedule followed by the merged plan body
pub(crate) fn merged(merged: &Merged, out: &mut impl Write) -> Result<()> {
    writeln!(out, "plan {} ({})", merged.plan.name, merged.plan.source)?;
    for level in &merged.levels {
        writeln!(out, "  {} {}", level.name, humantime::format_duration(level.freq))?;
    }
    writeln!(out, "---")?;

    let yaml = merged
        .plan
        .to_yaml()
        .with_context(|| format!("failed to encode plan '{}'", merged.plan.name))?;
    out.write_all(yaml.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_test_utils::complex_plan;

    #[test]
    fn merged_lists_levels_in_firing_order() {
        let merged = cadence_merge::merge(&complex_plan()).unwrap();
        let mut out = Vec::new();
        super::merged(&merged, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let schedule: Vec<_> = text.lines().skip(1).take_while(|l| *l != "---").collect();
        assert_eq!(
            schedule,
            ["  L1 5s", "  L2 20s", "  L3 30s", "  L4 1m", "  L5 5m"]
        );
    }

    #[test]
    fn plans_skips_monitors_without_private_plans() {
        let loader = PlanLoader::new();
        loader
            .load_shared(&cadence_loader::PlansConfig::default())
            .unwrap();
        let config = AgentConfig {
            monitors: vec![cadence_loader::MonitorConfig::new("db1")],
            ..AgentConfig::default()
        };

        let mut out = Vec::new();
        plans(&loader, &config, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("  default-mysql (builtin)"));
        assert!(text.contains("    kpi:"));
        assert!(text.contains("    exporter:"));
        assert!(!text.contains("monitor db1"));
    }
}
