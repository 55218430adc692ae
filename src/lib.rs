//! Polynomial trend fitting and empirical-rule statistics for monthly
//! temperature anomaly series.

pub mod chart;
pub mod config;
pub mod error;
pub mod loader;
pub mod manager;
pub mod regression;
pub mod report;
pub mod series;
pub mod stats;

pub use error::{AnalysisError, AnalysisResult};
pub use regression::{FitQuality, PolynomialModel};
pub use series::{Observation, Period, Series};
pub use stats::DistributionSummary;
