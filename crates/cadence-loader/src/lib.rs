//! Cadence Plan Registry
//!
//! Loads collection plans from built-in defaults, plan files and an
//! injected external source, and hands every consumer its own copy.
//!
//! # Architecture
//!
//! ```text
//! built-in plans ─┐
//! plan files ─────┼─→ PlanLoader (canonical set, RwLock) ─→ plan() ─→ owned Plan ─→ sort()
//! PlanSource ─────┘                                     └─→ shared_plans() ─→ Meta
//! ```
//!
//! # Example
//!
//! ```rust
//! use cadence_loader::{PlanLoader, PlansConfig};
//!
//! let loader = PlanLoader::new();
//! loader.load_shared(&PlansConfig::default())?;
//!
//! let mut plan = loader.plan("db1", "default-mysql")?;
//! let levels = cadence_merge::sort(&mut plan)?;
//! assert_eq!(levels[0].name, "kpi");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod defaults;
pub mod error;
pub mod loader;
pub mod source;

// Re-exports for convenience
pub use config::{AgentConfig, MonitorConfig, PlansConfig};
pub use defaults::{DEFAULT_EXPORTER_PLAN, DEFAULT_PLAN};
pub use error::{ConfigError, LoadError, LoaderError, LoaderResult, LookupError};
pub use loader::PlanLoader;
pub use source::{BoxError, FnSource, PlanSource};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the plan registry
    pub use crate::config::{AgentConfig, MonitorConfig, PlansConfig};
    pub use crate::error::{LoaderError, LoaderResult};
    pub use crate::loader::PlanLoader;
    pub use crate::source::{FnSource, PlanSource};
    pub use cadence_merge::{sort, Merged};
    pub use cadence_model::{Domain, Level, Meta, Plan, SortedLevel};
}
