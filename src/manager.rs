use crate::chart::{DistributionChart, FitChart, render_distribution_chart, render_fit_chart};
use crate::config::Config;
use crate::loader::load_series;
use crate::regression::PolynomialModel;
use crate::report::{FitReport, distribution_text, fit_text, save_toml};
use crate::series::Series;
use crate::stats::{DistributionSummary, histogram, normal_density_curve};
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Runs the analysis pipelines over one loaded series.
pub struct Manager {
    out_dir: PathBuf,
    cfg: Config,
    series: Series,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(
        data_file: P,
        cfg_file: Option<&Path>,
        out_dir: PathBuf,
    ) -> Result<Self> {
        let cfg = match cfg_file {
            Some(cfg_file) => Config::from_file(cfg_file).context("failed to construct cfg")?,
            None => Config::default(),
        };
        log::info!("{cfg:#?}");

        let data_file = data_file.as_ref();
        let series = load_series(data_file).context("failed to load series")?;
        log::info!("loaded {} observations from {data_file:?}", series.len());

        fs::create_dir_all(&out_dir).with_context(|| format!("failed to create {out_dir:?}"))?;

        Ok(Self {
            out_dir,
            cfg,
            series,
        })
    }

    /// Fit the polynomial trend, print it, and write the chart and summary.
    pub fn run_fit(&self) -> Result<FitReport> {
        let reg_cfg = &self.cfg.regression;
        let points = self
            .series
            .offset_points()
            .context("failed to compute time offsets")?;
        let base = self.series.observations()[0].period;

        let model = PolynomialModel::fit_points(&points, reg_cfg.degree)
            .context("failed to fit polynomial")?;
        let quality = model
            .fit_quality(&self.series)
            .context("failed to compute fit quality")?;
        log::info!(
            "fitted degree {} polynomial, R-squared {:.4}",
            model.degree(),
            quality.r_squared
        );

        print!("{}", fit_text(&model, &quality));

        let x_min = points.first().map_or(0.0, |&(x, _)| x);
        let x_max = points.last().map_or(0.0, |&(x, _)| x);
        let curve = model
            .evaluate_dense(x_min, x_max, reg_cfg.curve_samples)
            .context("failed to sample fitted curve")?;

        let report = FitReport::new(self.series.len(), &model, quality);

        let chart = FitChart {
            base,
            degree: model.degree(),
            points: &points,
            curve: &curve,
            equation: &report.equation,
            r_squared: quality.r_squared,
        };
        let chart_file = self.out_dir.join("polynomial_fit.svg");
        render_fit_chart(&chart, &self.cfg.output, &chart_file)
            .context("failed to render fit chart")?;
        log::info!("wrote {chart_file:?}");

        let summary_file = self.out_dir.join("polynomial_fit.toml");
        save_toml(&report, &summary_file).context("failed to save fit summary")?;
        log::info!("wrote {summary_file:?}");

        Ok(report)
    }

    /// Check the empirical rule, print it, and write the chart and summary.
    pub fn run_distribution(&self) -> Result<DistributionSummary> {
        let dist_cfg = &self.cfg.distribution;
        let vals = self.series.values();

        let summary = DistributionSummary::compute(&vals, &dist_cfg.sigmas)
            .context("failed to summarize distribution")?;
        log::info!(
            "mean {:.4}, standard deviation {:.4} over {} values",
            summary.mean,
            summary.std_dev,
            summary.n_vals
        );

        print!("{}", distribution_text(&summary));

        let bins = histogram(&vals, dist_cfg.hist_bins).context("failed to bin values")?;
        let curve = normal_density_curve(
            summary.mean,
            summary.std_dev,
            dist_cfg.span,
            dist_cfg.curve_samples,
        )
        .context("failed to sample density curve")?;

        let chart = DistributionChart {
            summary: &summary,
            bins: &bins,
            curve: &curve,
        };
        let chart_file = self.out_dir.join("distribution.svg");
        render_distribution_chart(&chart, &self.cfg.output, &chart_file)
            .context("failed to render distribution chart")?;
        log::info!("wrote {chart_file:?}");

        let summary_file = self.out_dir.join("distribution.toml");
        save_toml(&summary, &summary_file).context("failed to save distribution summary")?;
        log::info!("wrote {summary_file:?}");

        Ok(summary)
    }
}
