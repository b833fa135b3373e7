//! Testing utilities for Cadence workspace
//!
//! Shared plan fixtures and accessors.

#![allow(missing_docs)]

use cadence_model::{Domain, Level, Plan};
use std::fs;
use std::path::{Path, PathBuf};

/// Level with one metrics-only domain per `(domain, metrics)` pair
pub fn level(name: &str, freq: &str, domains: &[(&str, &[&str])]) -> Level {
    domains
        .iter()
        .fold(Level::new(name, freq), |level, (domain, metrics)| {
            level.with_domain(Domain::new(*domain).with_metrics(metrics.iter().copied()))
        })
}

pub fn plan_with_levels(name: &str, levels: Vec<Level>) -> Plan {
    levels
        .into_iter()
        .fold(Plan::new(name), |plan, level| plan.with_level(level))
}

/// Metrics of `domain` at `level`, or empty if either is missing
pub fn metrics<'a>(plan: &'a Plan, level: &str, domain: &str) -> Vec<&'a str> {
    plan.level(level)
        .and_then(|l| l.domain(domain))
        .map(|d| d.metrics.iter().map(String::as_str).collect())
        .unwrap_or_default()
}

/// Five levels at 5s, 20s, 30s, 60s and 300s with one domain each
///
/// 20s does not divide 30s, so L3 only sees L1; L4 and L5 see everything.
pub fn complex_plan() -> Plan {
    plan_with_levels(
        "test1",
        vec![
            level("L1", "5s", &[("D1", &["D1_M1"])]),
            level("L2", "20s", &[("D1", &["D1_M2"])]),
            level("L3", "30s", &[("D2", &["D2_M1"])]),
            Level::new("L4", "60s").with_domain(
                Domain::new("D3")
                    .with_metrics(["D3_M1"])
                    .with_option("option1", "1")
                    .with_error("error1", "1"),
            ),
            level("L5", "300s", &[("D4", &["D4_M1"])]),
        ],
    )
}

/// Write a plan document into `dir`, returning its path
pub fn write_plan_file(dir: &Path, file_name: &str, yaml: &str) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, yaml).unwrap();
    path
}

pub const VERSION_PLAN_YAML: &str = "\
sysvars:
  freq: 5s
  collect:
    var.global:
      metrics:
        - version
";

pub const TWO_LEVEL_PLAN_YAML: &str = "\
kpi:
  freq: 5s
  collect:
    status.global:
      metrics: [queries, threads_running]
standard:
  freq: 20s
  collect:
    status.global:
      metrics: [aborted_connects]
    innodb:
      metrics: [buffer_pool_reads]
      options:
        all: enabled
";
