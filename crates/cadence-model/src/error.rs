//! Error types for the plan model
//!
//! - Frequency parsing ([`FreqError`])
//! - Plan validation and YAML decoding ([`PlanError`])

/// Errors parsing a level frequency
#[derive(Debug, thiserror::Error)]
pub enum FreqError {
    /// Frequency string is empty
    #[error("empty frequency")]
    Empty,

    /// Frequency string is not a duration
    #[error("invalid frequency '{freq}': {source}")]
    Invalid {
        /// Frequency as written
        freq: String,
        /// Underlying parse failure
        #[source]
        source: humantime::DurationError,
    },

    /// Frequency uses a unit outside [`crate::freq::UNITS`]
    #[error("frequency '{freq}' uses unsupported unit '{unit}'")]
    UnsupportedUnit {
        /// Frequency as written
        freq: String,
        /// Offending unit
        unit: String,
    },

    /// Frequency parsed to zero
    #[error("frequency '{0}' must be greater than zero")]
    NotPositive(String),
}

/// Errors validating or decoding a plan
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Plan declares no levels where at least one is required
    #[error("plan '{plan}' has no levels")]
    NoLevels {
        /// Plan name
        plan: String,
    },

    /// A level frequency does not parse to a positive duration
    #[error("plan '{plan}' level '{level}': {source}")]
    InvalidFreq {
        /// Plan name
        plan: String,
        /// Level name
        level: String,
        /// Underlying frequency error
        #[source]
        source: FreqError,
    },

    /// Plan text is not valid YAML for the plan structure
    #[error("plan '{plan}' is not a valid plan document: {source}")]
    Yaml {
        /// Plan name
        plan: String,
        /// Underlying YAML error
        #[source]
        source: serde_yaml::Error,
    },
}

impl PlanError {
    /// Create invalid frequency error
    pub fn invalid_freq(
        plan: impl Into<String>,
        level: impl Into<String>,
        source: FreqError,
    ) -> Self {
        Self::InvalidFreq {
            plan: plan.into(),
            level: level.into(),
            source,
        }
    }
}

/// Result type alias for plan model operations
pub type PlanResult<T> = Result<T, PlanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_levels_display() {
        let err = PlanError::NoLevels {
            plan: "empty".to_string(),
        };
        assert_eq!(err.to_string(), "plan 'empty' has no levels");
    }

    #[test]
    fn invalid_freq_display() {
        let err = PlanError::invalid_freq("p1", "kpi", FreqError::NotPositive("0s".to_string()));
        assert_eq!(
            err.to_string(),
            "plan 'p1' level 'kpi': frequency '0s' must be greater than zero"
        );
    }
}
