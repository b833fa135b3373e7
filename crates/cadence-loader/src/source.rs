//! External plan sources
//!
//! A [`PlanSource`] is handed to [`crate::PlanLoader::with_source`] at
//! construction so plans can come from any system (a plan repository, a
//! database table) without the registry depending on its transport.

use crate::config::PlansConfig;
use cadence_model::Plan;
use std::fmt;

/// Boxed error returned by external sources
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A provider of shared plans
pub trait PlanSource: Send + Sync {
    /// Identifier recorded as the `source` of every plan this returns
    fn id(&self) -> &str;

    /// Produce plans for the given configuration
    ///
    /// # Errors
    /// Any error aborts the load that called it.
    fn load(&self, config: &PlansConfig) -> Result<Vec<Plan>, BoxError>;
}

/// [`PlanSource`] backed by a closure
pub struct FnSource<F> {
    id: String,
    load: F,
}

impl<F> FnSource<F>
where
    F: Fn(&PlansConfig) -> Result<Vec<Plan>, BoxError> + Send + Sync,
{
    /// Wrap a closure under the given source id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, load: F) -> Self {
        Self {
            id: id.into(),
            load,
        }
    }
}

impl<F> PlanSource for FnSource<F>
where
    F: Fn(&PlansConfig) -> Result<Vec<Plan>, BoxError> + Send + Sync,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn load(&self, config: &PlansConfig) -> Result<Vec<Plan>, BoxError> {
        (self.load)(config)
    }
}

impl<F> fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSource").field("id", &self.id).finish_non_exhaustive()
    }
}
