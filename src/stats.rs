//! Descriptive statistics and empirical-rule checks.

use crate::error::{AnalysisError, AnalysisResult};
use crate::regression::linspace;
use serde::Serialize;
use std::f64::consts::PI;

/// Running mean and sample variance (Welford's algorithm).
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;
    }

    pub fn n_vals(&self) -> usize {
        self.n_vals
    }

    pub fn mean(&self) -> AnalysisResult<f64> {
        if self.n_vals == 0 {
            return Err(AnalysisError::EmptySeries);
        }
        Ok(self.mean)
    }

    /// Sample standard deviation (`n - 1` denominator).
    pub fn std_dev(&self) -> AnalysisResult<f64> {
        match self.n_vals {
            0 => Err(AnalysisError::EmptySeries),
            1 => Err(AnalysisError::InsufficientData {
                operation: "sample standard deviation",
                needed: 2,
                got: 1,
            }),
            n_vals => Ok((self.diff_2_sum / (n_vals as f64 - 1.0)).sqrt()),
        }
    }
}

impl FromIterator<f64> for Accumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        iter.into_iter().for_each(|val| acc.add(val));
        acc
    }
}

/// Arithmetic mean.
///
/// # Errors
/// Returns [`AnalysisError::EmptySeries`] on empty input.
pub fn mean(vals: &[f64]) -> AnalysisResult<f64> {
    vals.iter().copied().collect::<Accumulator>().mean()
}

/// Sample standard deviation.
///
/// # Errors
/// Returns [`AnalysisError::EmptySeries`] on empty input and
/// [`AnalysisError::InsufficientData`] on a single value.
pub fn std_dev(vals: &[f64]) -> AnalysisResult<f64> {
    vals.iter().copied().collect::<Accumulator>().std_dev()
}

/// `(mean - k * std_dev, mean + k * std_dev)`.
pub fn bounds_at(mean: f64, std_dev: f64, k: f64) -> (f64, f64) {
    (mean - k * std_dev, mean + k * std_dev)
}

/// Fraction of values in `[lower, upper]`, both ends included.
///
/// # Errors
/// Returns [`AnalysisError::EmptySeries`] on empty input.
pub fn fraction_within(vals: &[f64], lower: f64, upper: f64) -> AnalysisResult<f64> {
    if vals.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }
    let n_within = vals
        .iter()
        .filter(|&&val| lower <= val && val <= upper)
        .count();
    Ok(n_within as f64 / vals.len() as f64)
}

/// Gaussian probability density at `x`.
pub fn normal_density(x: f64, mean: f64, std_dev: f64) -> f64 {
    let z = (x - mean) / std_dev;
    (-0.5 * z * z).exp() / (std_dev * (2.0 * PI).sqrt())
}

/// Sample the Gaussian density over `mean ± span * std_dev`.
///
/// # Errors
/// Returns [`AnalysisError::DegenerateSeries`] unless `std_dev` is positive
/// and finite, and [`AnalysisError::InsufficientData`] if `n_samples < 2`.
pub fn normal_density_curve(
    mean: f64,
    std_dev: f64,
    span: f64,
    n_samples: usize,
) -> AnalysisResult<Vec<(f64, f64)>> {
    if !(std_dev.is_finite() && std_dev > 0.0) || !mean.is_finite() {
        return Err(AnalysisError::DegenerateSeries {
            operation: "normal density",
            reason: format!("mean {mean} and standard deviation {std_dev} must be finite and positive"),
        });
    }
    let (x_min, x_max) = bounds_at(mean, std_dev, span);
    let xs = linspace(x_min, x_max, n_samples)?;
    Ok(xs
        .into_iter()
        .map(|x| (x, normal_density(x, mean, std_dev)))
        .collect())
}

/// Equal-width histogram bin normalised as a density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    pub density: f64,
}

/// Split `[min, max]` of `vals` into `n_bins` equal-width bins.
///
/// Densities integrate to one. The last bin includes its upper edge.
///
/// # Errors
/// Returns [`AnalysisError::EmptySeries`] on empty input and
/// [`AnalysisError::InsufficientData`] if `n_bins == 0`.
pub fn histogram(vals: &[f64], n_bins: usize) -> AnalysisResult<Vec<Bin>> {
    if vals.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }
    if n_bins == 0 {
        return Err(AnalysisError::InsufficientData {
            operation: "histogram",
            needed: 1,
            got: 0,
        });
    }

    let min = vals.iter().copied().fold(f64::INFINITY, f64::min);
    let max = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // A constant sample gets a unit-wide range centered on its value.
    let (min, max) = if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };
    let width = (max - min) / n_bins as f64;

    let mut counts = vec![0; n_bins];
    for &val in vals {
        let i_bin = (((val - min) / width) as usize).min(n_bins - 1);
        counts[i_bin] += 1;
    }

    let n_vals = vals.len() as f64;
    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i_bin, count)| Bin {
            lower: min + width * i_bin as f64,
            upper: if i_bin + 1 == n_bins {
                max
            } else {
                min + width * (i_bin + 1) as f64
            },
            count,
            density: count as f64 / (n_vals * width),
        })
        .collect())
}

/// Bounds and observed coverage at `k` standard deviations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub k: u32,
    pub lower: f64,
    pub upper: f64,
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSummary {
    pub n_vals: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub bands: Vec<Band>,
}

impl DistributionSummary {
    /// Compute mean, sample standard deviation and one [`Band`] per entry of `sigmas`.
    pub fn compute(vals: &[f64], sigmas: &[u32]) -> AnalysisResult<Self> {
        let acc: Accumulator = vals.iter().copied().collect();
        let mean = acc.mean()?;
        let std_dev = acc.std_dev()?;

        let mut bands = Vec::with_capacity(sigmas.len());
        for &k in sigmas {
            let (lower, upper) = bounds_at(mean, std_dev, k as f64);
            let fraction = fraction_within(vals, lower, upper)?;
            log::debug!("mu +- {k} sigma: [{lower}, {upper}] holds {fraction}");
            bands.push(Band {
                k,
                lower,
                upper,
                fraction,
            });
        }

        Ok(Self {
            n_vals: acc.n_vals(),
            mean,
            std_dev,
            bands,
        })
    }

    pub fn band(&self, k: u32) -> Option<&Band> {
        self.bands.iter().find(|band| band.k == k)
    }
}
