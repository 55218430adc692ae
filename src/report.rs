//! Console text and saved summaries of both pipelines.

use crate::regression::{FitQuality, PolynomialModel, format_sci};
use crate::stats::DistributionSummary;
use anyhow::{Context, Result};
use serde::Serialize;
use std::{fmt::Write, fs, path::Path};

/// Result of the regression pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitReport {
    pub n_obs: usize,
    pub degree: usize,
    pub coefficients: Vec<f64>,
    pub r_squared: f64,
    pub equation: String,
}

impl FitReport {
    pub fn new(n_obs: usize, model: &PolynomialModel, quality: FitQuality) -> Self {
        Self {
            n_obs,
            degree: model.degree(),
            coefficients: model.coefficients().to_vec(),
            r_squared: quality.r_squared,
            equation: model.format_equation(),
        }
    }
}

/// Console text for the regression pipeline.
pub fn fit_text(model: &PolynomialModel, quality: &FitQuality) -> String {
    let mut text = String::new();
    writeln!(text, "Polynomial Equation (Degree {}):", model.degree()).ok();
    for (k, c) in model.terms() {
        writeln!(text, "  {:>12} x^{k}", format_sci(c)).ok();
    }
    writeln!(text, "R-squared: {:.4}", quality.r_squared).ok();
    text
}

/// `μ ± σ` for one standard deviation, `μ ± kσ` otherwise.
pub fn band_label(k: u32) -> String {
    if k == 1 {
        "μ ± σ".to_string()
    } else {
        format!("μ ± {k}σ")
    }
}

/// Console text for the statistics pipeline.
pub fn distribution_text(summary: &DistributionSummary) -> String {
    let mut text = String::new();
    writeln!(text, "Mean (μ): {:.2}", summary.mean).ok();
    for band in &summary.bands {
        writeln!(
            text,
            "{}: [{:.2}, {:.2}]",
            band_label(band.k),
            band.lower,
            band.upper
        )
        .ok();
    }
    for band in &summary.bands {
        writeln!(
            text,
            "Percentage of data within {}: {:.2}%",
            band_label(band.k),
            100.0 * band.fraction
        )
        .ok();
    }
    text
}

/// Write any report as a TOML document.
pub fn save_toml<T: Serialize, P: AsRef<Path>>(report: &T, file: P) -> Result<()> {
    let file = file.as_ref();
    let text = toml::to_string_pretty(report).context("failed to serialize report")?;
    fs::write(file, text).with_context(|| format!("failed to write {file:?}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_lines() {
        let summary = DistributionSummary::compute(&[1.0, 2.0, 3.0, 4.0, 5.0], &[1, 2, 3]).unwrap();
        let text = distribution_text(&summary);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Mean (μ): 3.00");
        assert_eq!(lines[1], "μ ± σ: [1.42, 4.58]");
        assert_eq!(lines[2], "μ ± 2σ: [-0.16, 6.16]");
        assert_eq!(lines[4], "Percentage of data within μ ± σ: 60.00%");
        assert_eq!(lines[6], "Percentage of data within μ ± 3σ: 100.00%");
    }

    #[test]
    fn fit_lines() {
        let model = PolynomialModel::from_coefficients(vec![0.2, 0.1]).unwrap();
        let quality = FitQuality { r_squared: 0.987654 };
        let text = fit_text(&model, &quality);
        assert!(text.starts_with("Polynomial Equation (Degree 1):\n"));
        assert!(text.contains("2.0000e-01 x^1"));
        assert!(text.contains("1.0000e-01 x^0"));
        assert!(text.ends_with("R-squared: 0.9877\n"));
    }

    #[test]
    fn report_serializes_to_toml() {
        let model = PolynomialModel::from_coefficients(vec![0.2, 0.1]).unwrap();
        let report = FitReport::new(3, &model, FitQuality { r_squared: 1.0 });
        let text = toml::to_string_pretty(&report).unwrap();
        assert!(text.contains("degree = 1"));
        assert!(text.contains("equation = "));
    }
}
