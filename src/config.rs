use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Analysis configuration parameters.
///
/// Loaded from an optional TOML file; missing sections and fields fall back
/// to [`Default`]. See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub regression: RegressionConfig,
    pub distribution: DistributionConfig,
    pub output: OutputConfig,
}

/// Polynomial regression parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegressionConfig {
    /// Degree of the fitted polynomial.
    pub degree: usize,
    /// Number of samples of the smooth fitted curve.
    pub curve_samples: usize,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            degree: 20,
            curve_samples: 500,
        }
    }
}

/// Empirical-rule parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DistributionConfig {
    /// Multiples of the standard deviation to check (strictly increasing).
    pub sigmas: Vec<u32>,
    /// Half-width of the density curve in standard deviations.
    pub span: f64,
    /// Number of samples of the density curve.
    pub curve_samples: usize,
    /// Number of histogram bins.
    pub hist_bins: usize,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            sigmas: vec![1, 2, 3],
            span: 4.0,
            curve_samples: 1000,
            hist_bins: 20,
        }
    }
}

/// Chart size in pixels.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
        }
    }
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let text = fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;
        Self::from_toml(&text)
    }

    /// Parse and validate a [`Config`] from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let reg = &self.regression;
        check_num(reg.degree, 0..=30).context("invalid polynomial degree")?;
        check_num(reg.curve_samples, 2..=100_000).context("invalid number of curve samples")?;

        let dist = &self.distribution;
        if dist.sigmas.is_empty() {
            bail!("at least one sigma multiple is required");
        }
        for &k in &dist.sigmas {
            check_num(k, 1..=6).context("invalid sigma multiple")?;
        }
        if dist.sigmas.windows(2).any(|w| w[0] >= w[1]) {
            bail!("sigma multiples must be strictly increasing, but are {:?}", dist.sigmas);
        }
        check_num(dist.span, 1.0..=10.0).context("invalid density curve span")?;
        check_num(dist.curve_samples, 2..=100_000).context("invalid number of density samples")?;
        check_num(dist.hist_bins, 1..=1000).context("invalid number of histogram bins")?;

        let out = &self.output;
        check_num(out.width, 200..=8000).context("invalid chart width")?;
        check_num(out.height, 200..=8000).context("invalid chart height")?;

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}
