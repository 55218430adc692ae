//! Polynomial least-squares regression over month offsets.
//!
//! The fit solves the Vandermonde system with an SVD instead of forming the
//! normal equations. Columns are scaled to unit norm before decomposing, and
//! singular values below `n * f64::EPSILON` times the largest one are
//! discarded, so a high degree over a few hundred offsets still yields the
//! least-squares (minimum-norm) coefficients instead of amplified noise.

use crate::error::{AnalysisError, AnalysisResult};
use crate::series::Series;
use crate::stats::Accumulator;
use nalgebra::{DMatrix, DVector};
use serde::Serialize;

/// Fitted polynomial.
///
/// Coefficients are ordered from the `x^degree` term down to the constant term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolynomialModel {
    degree: usize,
    coefficients: Vec<f64>,
}

/// Goodness of fit of a [`PolynomialModel`] against the series it was fit on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitQuality {
    pub r_squared: f64,
}

impl PolynomialModel {
    /// Build a model from coefficients ordered highest degree first.
    ///
    /// # Errors
    /// Returns [`AnalysisError::InsufficientData`] if `coefficients` is empty.
    pub fn from_coefficients(coefficients: Vec<f64>) -> AnalysisResult<Self> {
        if coefficients.is_empty() {
            return Err(AnalysisError::InsufficientData {
                operation: "polynomial",
                needed: 1,
                got: 0,
            });
        }
        Ok(Self {
            degree: coefficients.len() - 1,
            coefficients,
        })
    }

    /// Fit a polynomial of `degree` to the series, using month offsets as `x`.
    ///
    /// A series with `len <= degree` is accepted; the result is the
    /// minimum-norm solution and carries no residual information.
    ///
    /// # Errors
    /// Returns [`AnalysisError::EmptySeries`] for an empty series and
    /// [`AnalysisError::DegenerateSeries`] if the solution is not finite.
    pub fn fit(series: &Series, degree: usize) -> AnalysisResult<Self> {
        let points = series.offset_points()?;
        Self::fit_points(&points, degree)
    }

    /// Fit a polynomial of `degree` to arbitrary `(x, y)` points.
    pub fn fit_points(points: &[(f64, f64)], degree: usize) -> AnalysisResult<Self> {
        if points.is_empty() {
            return Err(AnalysisError::EmptySeries);
        }
        check_finite("polynomial fit", points.iter().flat_map(|&(x, y)| [x, y]))?;

        let n_pts = points.len();
        let order = degree + 1;

        let mut lhs = DMatrix::from_fn(n_pts, order, |i_pt, j| {
            points[i_pt].0.powi((degree - j) as i32)
        });
        let rhs = DVector::from_iterator(n_pts, points.iter().map(|&(_, y)| y));

        // Scale every column to unit norm to improve the conditioning.
        let scale: Vec<f64> = lhs
            .column_iter()
            .map(|col| {
                let norm = col.norm();
                if norm > 0.0 { norm } else { 1.0 }
            })
            .collect();
        for (mut col, &s) in lhs.column_iter_mut().zip(scale.iter()) {
            col /= s;
        }

        let svd = lhs.svd(true, true);
        let rcond = n_pts as f64 * f64::EPSILON;
        let eps = rcond * svd.singular_values.max();
        let rank = svd.rank(eps);
        if rank < order.min(n_pts) {
            log::warn!("polynomial fit may be poorly conditioned (rank {rank} of {order})");
        } else {
            log::debug!("polynomial fit has full rank {rank}");
        }

        let sol = svd
            .solve(&rhs, eps)
            .map_err(|err| AnalysisError::DegenerateSeries {
                operation: "polynomial fit",
                reason: err.to_string(),
            })?;

        let coefficients: Vec<f64> = sol.iter().zip(scale.iter()).map(|(c, s)| c / s).collect();
        check_finite("polynomial fit", coefficients.iter().copied())?;

        Ok(Self {
            degree,
            coefficients,
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Evaluate the polynomial at `x` with Horner's method.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
    }

    pub fn evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }

    /// Sample the polynomial at `n_samples` evenly spaced points of `[x_min, x_max]`.
    ///
    /// # Errors
    /// Returns [`AnalysisError::InsufficientData`] if `n_samples < 2` and
    /// [`AnalysisError::DegenerateSeries`] if a sample is not finite.
    pub fn evaluate_dense(
        &self,
        x_min: f64,
        x_max: f64,
        n_samples: usize,
    ) -> AnalysisResult<Vec<(f64, f64)>> {
        let xs = linspace(x_min, x_max, n_samples)?;
        let curve: Vec<_> = xs.into_iter().map(|x| (x, self.evaluate(x))).collect();
        check_finite("polynomial curve", curve.iter().map(|&(_, y)| y))?;
        Ok(curve)
    }

    /// Coefficient of determination against `(x, y)` points.
    ///
    /// # Errors
    /// Returns [`AnalysisError::EmptySeries`] without points and
    /// [`AnalysisError::DegenerateSeries`] when all `y` are equal.
    pub fn r_squared(&self, points: &[(f64, f64)]) -> AnalysisResult<f64> {
        if points.is_empty() {
            return Err(AnalysisError::EmptySeries);
        }
        let first_y = points[0].1;
        if points.iter().all(|&(_, y)| y == first_y) {
            return Err(AnalysisError::DegenerateSeries {
                operation: "R-squared",
                reason: "all values are identical".to_string(),
            });
        }
        let mean = points.iter().map(|&(_, y)| y).collect::<Accumulator>().mean()?;

        let ss_tot: f64 = points.iter().map(|&(_, y)| (y - mean).powi(2)).sum();
        let ss_res: f64 = points
            .iter()
            .map(|&(x, y)| (y - self.evaluate(x)).powi(2))
            .sum();

        let r_squared = 1.0 - ss_res / ss_tot;
        check_finite("R-squared", [r_squared])?;
        Ok(r_squared)
    }

    /// Goodness of fit against the series the model was fit on.
    pub fn fit_quality(&self, series: &Series) -> AnalysisResult<FitQuality> {
        let points = series.offset_points()?;
        Ok(FitQuality {
            r_squared: self.r_squared(&points)?,
        })
    }

    /// Render as `c·x^k` terms joined by ` + `, highest degree first.
    ///
    /// Coefficients use scientific notation with four fractional digits,
    /// e.g. `1.2000e+00x^1 + -3.5000e-01`.
    pub fn format_equation(&self) -> String {
        self.terms()
            .map(|(k, c)| {
                if k > 0 {
                    format!("{}x^{k}", format_sci(c))
                } else {
                    format_sci(c)
                }
            })
            .collect::<Vec<_>>()
            .join(" + ")
    }

    /// `(exponent, coefficient)` pairs, highest exponent first.
    pub fn terms(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.coefficients
            .iter()
            .enumerate()
            .map(|(i, &c)| (self.degree - i, c))
    }
}

/// Format `val` as `d.dddde±XX`.
pub fn format_sci(val: f64) -> String {
    let text = format!("{val:.4e}");
    match text.split_once('e') {
        Some((mantissa, exp)) => match exp.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.abs())
            }
            Err(_) => text,
        },
        None => text,
    }
}

/// `n_samples` evenly spaced values over `[start, stop]`, both ends included.
pub fn linspace(start: f64, stop: f64, n_samples: usize) -> AnalysisResult<Vec<f64>> {
    if n_samples < 2 {
        return Err(AnalysisError::InsufficientData {
            operation: "linspace",
            needed: 2,
            got: n_samples,
        });
    }
    let step = (stop - start) / (n_samples - 1) as f64;
    let mut xs: Vec<_> = (0..n_samples).map(|i| start + step * i as f64).collect();
    xs[n_samples - 1] = stop;
    Ok(xs)
}

fn check_finite<I>(operation: &'static str, vals: I) -> AnalysisResult<()>
where
    I: IntoIterator<Item = f64>,
{
    if let Some(val) = vals.into_iter().find(|val| !val.is_finite()) {
        return Err(AnalysisError::DegenerateSeries {
            operation,
            reason: format!("encountered non-finite value {val}"),
        });
    }
    Ok(())
}
