//! Level merge
//!
//! When a level fires, every finer level whose frequency evenly divides it
//! fires at the same instant. Rather than scheduling those collections
//! twice, each level's `collect` is rewritten to carry everything due at its
//! tick.
//!
//! Levels are processed in ascending frequency. For level `L`, the eligible
//! levels are the finer ones whose frequency divides `L`'s, walked
//! nearest-first. Divisibility is transitive, so the eligible set already
//! holds every level due at `L`'s tick, and each contributes only what it
//! declares itself:
//!
//! - a domain `L` declares keeps its own metrics first, then gets each
//!   eligible level's metrics for it appended, nearest first
//! - a domain `L` does not declare is seeded from the nearest eligible level
//!   declaring it, then extended by the farther ones the same way
//! - options and errors are filled nearest-first for keys not already set

use cadence_model::{divides, Domain, Plan, PlanError, PlanResult, SortedLevel};
use std::collections::BTreeMap;

/// Merge a plan in place and return its levels in firing order
///
/// Levels are ordered by ascending frequency, ties by name. A plan with no
/// levels yields an empty list.
///
/// # Errors
/// Returns [`PlanError::InvalidFreq`] if any level frequency does not parse
/// to a positive duration. The plan is left untouched in that case.
pub fn sort(plan: &mut Plan) -> PlanResult<Vec<SortedLevel>> {
    let sorted = sorted_levels(plan)?;

    // Own declarations, before any level is rewritten
    let declared: BTreeMap<String, BTreeMap<String, Domain>> = plan
        .levels
        .iter()
        .map(|(name, level)| (name.clone(), level.collect.clone()))
        .collect();

    for (i, current) in sorted.iter().enumerate().skip(1) {
        let eligible: Vec<&BTreeMap<String, Domain>> = sorted[..i]
            .iter()
            .rev()
            .filter(|finer| divides(finer.freq, current.freq))
            .filter_map(|finer| declared.get(&finer.name))
            .collect();

        if eligible.is_empty() {
            tracing::trace!(level = %current.name, "no eligible levels");
            continue;
        }

        let Some(level) = plan.levels.get_mut(&current.name) else {
            continue;
        };
        for finer in &eligible {
            for (name, domain) in *finer {
                let merged = level
                    .collect
                    .entry(name.clone())
                    .or_insert_with(|| Domain::new(name.clone()));
                extend_domain(merged, domain);
            }
        }

        tracing::trace!(
            level = %current.name,
            eligible = eligible.len(),
            domains = level.collect.len(),
            "merged level"
        );
    }

    Ok(sorted)
}

/// Parse every level frequency and order ascending, ties by name
///
/// # Errors
/// Returns [`PlanError::InvalidFreq`] naming the first bad level.
pub fn sorted_levels(plan: &Plan) -> PlanResult<Vec<SortedLevel>> {
    let mut sorted = plan
        .levels
        .iter()
        .map(|(name, level)| {
            level
                .duration()
                .map(|freq| SortedLevel {
                    freq,
                    name: name.clone(),
                })
                .map_err(|source| PlanError::invalid_freq(&plan.name, name, source))
        })
        .collect::<PlanResult<Vec<_>>>()?;

    sorted.sort_by(|a, b| a.freq.cmp(&b.freq).then_with(|| a.name.cmp(&b.name)));
    Ok(sorted)
}

/// Append `from`'s metrics; copy options and errors `own` does not set
fn extend_domain(own: &mut Domain, from: &Domain) {
    own.metrics.extend(from.metrics.iter().cloned());
    for (key, value) in &from.options {
        own.options
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }
    for (key, value) in &from.errors {
        own.errors
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }
}
