//! Observation data types and the time index normalizer.

use crate::error::{AnalysisError, AnalysisResult};
use serde::Serialize;
use std::fmt;

/// Calendar month of an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Period {
    pub year: i32,
    /// Month of the year, in `1..=12`.
    pub month: u32,
}

impl Period {
    /// Create a period, rejecting months outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Split a `YYYYMM` code into year and month.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::new((code / 100) as i32, code % 100)
    }

    /// Number of months from `base` to `self` (negative if `self` is earlier).
    pub fn months_since(&self, base: &Period) -> i64 {
        (self.year as i64 - base.year as i64) * 12 + (self.month as i64 - base.month as i64)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Single monthly anomaly value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    pub period: Period,
    pub value: f64,
}

/// Chronologically ordered sequence of observations.
///
/// Immutable once built; insertion order is taken as chronological order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    obs_vec: Vec<Observation>,
}

impl Series {
    pub fn new(obs_vec: Vec<Observation>) -> Self {
        Self { obs_vec }
    }

    pub fn len(&self) -> usize {
        self.obs_vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obs_vec.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.obs_vec
    }

    /// First period of the series, the origin of all offsets.
    pub fn base_period(&self) -> Option<Period> {
        self.obs_vec.first().map(|obs| obs.period)
    }

    pub fn values(&self) -> Vec<f64> {
        self.obs_vec.iter().map(|obs| obs.value).collect()
    }

    /// Month offsets of every observation from the first one.
    ///
    /// Offsets are computed from the calendar fields, so gaps in the series
    /// are carried through unchanged.
    ///
    /// # Errors
    /// Returns [`AnalysisError::EmptySeries`] if the series has no observations.
    pub fn time_offsets(&self) -> AnalysisResult<Vec<i64>> {
        let base = self.base_period().ok_or(AnalysisError::EmptySeries)?;
        Ok(self
            .obs_vec
            .iter()
            .map(|obs| obs.period.months_since(&base))
            .collect())
    }

    /// `(offset, value)` pairs used as the regression domain.
    pub fn offset_points(&self) -> AnalysisResult<Vec<(f64, f64)>> {
        let offsets = self.time_offsets()?;
        Ok(offsets
            .into_iter()
            .zip(self.obs_vec.iter())
            .map(|(x, obs)| (x as f64, obs.value))
            .collect())
    }
}

impl FromIterator<Observation> for Series {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
