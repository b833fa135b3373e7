//! Cadence plan inspection tool
//!
//! Boots the plan registry from the agent config the same way the agent
//! does, then prints the config, the loaded plans, or one plan merged into
//! its level schedule.

mod report;

use anyhow::{Context, Result};
use cadence_loader::{AgentConfig, PlanLoader};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Command line options
#[derive(Debug, Parser)]
#[command(name = "cadence", version, about = "Inspect collection plans and level schedules")]
struct Options {
    /// Agent config file
    #[arg(long, env = "CADENCE_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(long, env = "CADENCE_DEBUG")]
    debug: bool,

    /// Print the final config and exit
    #[arg(long)]
    print_config: bool,

    /// Print every loaded plan and exit
    #[arg(long)]
    print_plans: bool,

    /// Plan to merge and print; defaults to the monitor's plan
    #[arg(long, value_name = "NAME")]
    plan: Option<String>,

    /// Monitor whose private plans are searched first
    #[arg(long, value_name = "ID")]
    monitor: Option<String>,
}

fn main() -> Result<()> {
    let options = Options::parse();
    init_tracing(options.debug);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&options, &mut out)?;
    out.flush().context("failed to flush output")
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(options: &Options, out: &mut impl Write) -> Result<()> {
    let config = load_config(options)?;
    if options.print_config {
        return report::config(&config, out);
    }

    let loader = PlanLoader::new();
    loader
        .load_shared(&config.plans)
        .context("failed to load shared plans")?;
    for monitor in &config.monitors {
        loader
            .load_monitor(monitor)
            .with_context(|| format!("failed to load plans for monitor '{}'", monitor.id))?;
    }

    if options.print_plans {
        return report::plans(&loader, &config, out);
    }

    let monitor_id = options.monitor.as_deref().unwrap_or_default();
    let plan_name = match (&options.plan, config.monitor(monitor_id)) {
        (Some(name), _) => name.as_str(),
        (None, Some(monitor)) => monitor.plan.as_str(),
        (None, None) => "",
    };

    let merged = loader
        .merged_plan(monitor_id, plan_name)
        .with_context(|| format!("failed to resolve plan '{plan_name}'"))?;
    report::merged(&merged, out)
}

fn load_config(options: &Options) -> Result<AgentConfig> {
    let (path, required) = match &options.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(AgentConfig::DEFAULT_FILE), false),
    };
    let config = AgentConfig::from_file(&path, required)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    tracing::debug!(path = %path.display(), monitors = config.monitors.len(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_test_utils::{write_plan_file, TWO_LEVEL_PLAN_YAML, VERSION_PLAN_YAML};
    use tempfile::TempDir;

    fn options(args: &[&str]) -> Options {
        Options::try_parse_from(std::iter::once("cadence").chain(args.iter().copied())).unwrap()
    }

    fn output(options: &Options) -> String {
        let mut out = Vec::new();
        run(options, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    /// Config with one shared plan file and one monitor with a private plan
    fn fixture() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let shared = write_plan_file(dir.path(), "shared.yaml", TWO_LEVEL_PLAN_YAML);
        let private = write_plan_file(dir.path(), "private.yaml", VERSION_PLAN_YAML);
        let config = format!(
            "plans:\n  files: ['{}']\nmonitors:\n  - id: db1\n    plan: '{}'\n    plans:\n      files: ['{}']\n",
            shared.display(),
            private.display(),
            private.display(),
        );
        let path = write_plan_file(dir.path(), "cadence.yaml", &config);
        (dir, path)
    }

    #[test]
    fn parses_flags() {
        let opts = options(&["--debug", "--plan", "kpi", "--monitor", "db1"]);
        assert!(opts.debug);
        assert_eq!(opts.plan.as_deref(), Some("kpi"));
        assert_eq!(opts.monitor.as_deref(), Some("db1"));
        assert!(!opts.print_plans);
    }

    #[test]
    fn missing_explicit_config_fails() {
        let opts = options(&["--config", "/nonexistent/cadence.yaml"]);
        let err = run(&opts, &mut Vec::new()).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/cadence.yaml"));
    }

    #[test]
    fn print_config_echoes_monitors() {
        let (_dir, path) = fixture();
        let text = output(&options(&["--config", path.to_str().unwrap(), "--print-config"]));
        assert!(text.contains("id: db1"));
        assert!(text.contains("shared.yaml"));
    }

    #[test]
    fn print_plans_lists_shared_and_monitor_plans() {
        let (_dir, path) = fixture();
        let text = output(&options(&["--config", path.to_str().unwrap(), "--print-plans"]));
        assert!(text.contains("shared.yaml"));
        assert!(text.contains("monitor db1"));
        assert!(text.contains("private.yaml"));
    }

    #[test]
    fn print_plans_includes_plan_documents() {
        let (_dir, path) = fixture();
        let text = output(&options(&["--config", path.to_str().unwrap(), "--print-plans"]));

        let private = text.split("monitor db1").nth(1).unwrap();
        assert!(private.contains("    sysvars:"));
        assert!(private.contains("- version"));
        assert!(text.contains("    standard:"));
        assert!(text.contains("aborted_connects"));
    }

    #[test]
    fn merged_plan_shows_schedule() {
        let (_dir, path) = fixture();
        let shared = path.with_file_name("shared.yaml");
        let text = output(&options(&[
            "--config",
            path.to_str().unwrap(),
            "--plan",
            shared.to_str().unwrap(),
        ]));

        assert!(text.contains("kpi 5s"));
        assert!(text.contains("standard 20s"));
        // 5s divides 20s: the standard tier also reports the KPIs
        assert!(text.contains("threads_running"));
    }

    #[test]
    fn monitor_defaults_to_its_configured_plan() {
        let (_dir, path) = fixture();
        let text = output(&options(&["--config", path.to_str().unwrap(), "--monitor", "db1"]));
        assert!(text.contains("sysvars 5s"));
        assert!(!text.contains("  kpi 5s"));
    }

    #[test]
    fn unknown_plan_fails() {
        let (_dir, path) = fixture();
        let opts = options(&["--config", path.to_str().unwrap(), "--plan", "nope"]);
        let err = run(&opts, &mut Vec::new()).unwrap_err();
        assert!(format!("{err:#}").contains("plan 'nope' not found"));
    }
}
