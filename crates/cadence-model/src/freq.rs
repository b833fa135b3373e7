//! Level frequency parsing
//!
//! Frequencies are written as human-readable durations (`"5s"`, `"1m"`,
//! `"500ms"`, `"1h 30m"`) and parsed with humantime, restricted to the
//! units in [`UNITS`]. Calendar units such as days or months are rejected.

use crate::error::FreqError;
use std::time::Duration;

/// Units accepted in a frequency
pub const UNITS: [&str; 6] = ["ns", "us", "ms", "s", "m", "h"];

/// Parse a level frequency into a positive [`Duration`]
///
/// # Errors
/// Returns [`FreqError`] if the string is empty, not a duration, or zero.
pub fn parse_freq(freq: &str) -> Result<Duration, FreqError> {
    let trimmed = freq.trim();
    if trimmed.is_empty() {
        return Err(FreqError::Empty);
    }

    let duration = humantime::parse_duration(trimmed).map_err(|source| FreqError::Invalid {
        freq: freq.to_string(),
        source,
    })?;

    if let Some(unit) = unsupported_unit(trimmed) {
        return Err(FreqError::UnsupportedUnit {
            freq: freq.to_string(),
            unit: unit.to_string(),
        });
    }

    if duration.is_zero() {
        return Err(FreqError::NotPositive(freq.to_string()));
    }

    Ok(duration)
}

fn unsupported_unit(freq: &str) -> Option<&str> {
    freq.split(|c: char| c.is_ascii_digit() || c.is_whitespace())
        .filter(|unit| !unit.is_empty())
        .find(|unit| !UNITS.contains(unit))
}

/// Check whether `finer` evenly divides `coarser`
///
/// Zero never divides anything; [`parse_freq`] never returns zero.
#[inline]
#[must_use]
pub fn divides(finer: Duration, coarser: Duration) -> bool {
    let finer = finer.as_nanos();
    finer != 0 && coarser.as_nanos() % finer == 0
}
