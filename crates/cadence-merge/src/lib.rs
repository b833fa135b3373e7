//! Cadence Level Merge
//!
//! Computes, for every level of a plan, the complete set of domains and
//! metrics due when that level fires, folding in every finer level whose
//! frequency evenly divides it.
//!
//! - [`sort`]: merge a privately owned plan in place
//! - [`merge`]: same result as a new value, input untouched
//!
//! # Example
//!
//! ```rust
//! use cadence_model::{Domain, Level, Plan};
//!
//! let mut plan = Plan::new("example")
//!     .with_level(Level::new("l1", "5s").with_domain(Domain::new("d1").with_metrics(["m1"])))
//!     .with_level(Level::new("l2", "10s").with_domain(Domain::new("d1").with_metrics(["m2"])));
//!
//! let levels = cadence_merge::sort(&mut plan)?;
//!
//! assert_eq!(levels[1].name, "l2");
//! assert_eq!(plan.levels["l2"].collect["d1"].metrics, ["m2", "m1"]);
//! # Ok::<(), cadence_model::PlanError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod sort;

pub use sort::{sort, sorted_levels};

use cadence_model::{Plan, PlanResult, SortedLevel};

/// A merged plan with its levels in firing order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    /// Plan with cumulative `collect` per level
    pub plan: Plan,
    /// Levels ascending by frequency
    pub levels: Vec<SortedLevel>,
}

/// Merge a copy of `plan`, leaving the input untouched
///
/// # Errors
/// Returns [`cadence_model::PlanError::InvalidFreq`] if any level frequency
/// is not a positive duration.
pub fn merge(plan: &Plan) -> PlanResult<Merged> {
    let mut plan = plan.clone();
    let levels = sort(&mut plan)?;
    Ok(Merged { plan, levels })
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
