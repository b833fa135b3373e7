//! Cadence Plan Model
//!
//! Data model for collection plans.
//!
//! # Core Concepts
//!
//! - [`Plan`]: named set of polling levels
//! - [`Level`]: one polling tier with a frequency and its own domains
//! - [`Domain`]: metrics, options and error policy for one collector
//! - [`SortedLevel`]: a level in firing order
//! - [`Meta`]: provenance of a loaded plan
//! - [`parse_freq`]: frequency string to [`std::time::Duration`]
//!
//! # Example
//!
//! ```rust
//! use cadence_model::{Domain, Level, Plan};
//!
//! let plan = Plan::new("example")
//!     .with_level(
//!         Level::new("kpi", "5s")
//!             .with_domain(Domain::new("status.global").with_metrics(["queries"])),
//!     );
//!
//! assert!(plan.validate().is_ok());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod freq;
pub mod meta;
pub mod plan;

// Re-exports
pub use error::{FreqError, PlanError, PlanResult};
pub use freq::{divides, parse_freq};
pub use meta::{Meta, BUILTIN_SOURCE};
pub use plan::{Domain, Level, Plan, SortedLevel};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
