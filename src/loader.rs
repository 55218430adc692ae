//! Reader for whitespace-delimited `YYYYMM value` anomaly files.

use crate::error::{AnalysisError, AnalysisResult};
use crate::series::{Observation, Period, Series};
use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Load a [`Series`] from a text file.
///
/// The first line is a header and is skipped. Every following non-blank line
/// must hold a six digit `YYYYMM` code and a decimal anomaly value.
///
/// # Errors
/// Returns an error if the file cannot be read or any row is malformed.
pub fn load_series<P: AsRef<Path>>(file: P) -> Result<Series> {
    let file = file.as_ref();
    let text = fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;
    let series = parse_series(&text).with_context(|| format!("failed to parse {file:?}"))?;
    Ok(series)
}

/// Parse the contents of an anomaly file.
///
/// Periods must be unique and in chronological order.
pub fn parse_series(text: &str) -> AnalysisResult<Series> {
    let mut obs_vec: Vec<Observation> = Vec::new();
    // Line numbers are 1-based and count the header.
    for (i_line, line) in text.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = i_line + 1;
        let obs = parse_row(line, line_no)?;
        if let Some(prev) = obs_vec.last().map(|prev| prev.period) {
            if obs.period <= prev {
                return Err(AnalysisError::MalformedInput {
                    line: line_no,
                    reason: format!("period {} does not follow period {prev}", obs.period),
                });
            }
        }
        obs_vec.push(obs);
    }
    Ok(Series::new(obs_vec))
}

fn parse_row(line: &str, line_no: usize) -> AnalysisResult<Observation> {
    let malformed = |reason: String| AnalysisError::MalformedInput {
        line: line_no,
        reason,
    };

    let tokens: Vec<_> = line.split_whitespace().collect();
    let [code, value] = tokens[..] else {
        return Err(malformed(format!(
            "expected 2 fields, but found {}",
            tokens.len()
        )));
    };

    if code.len() != 6 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(format!("period {code:?} is not a YYYYMM code")));
    }
    let code: u32 = code
        .parse()
        .map_err(|err| malformed(format!("period {code:?}: {err}")))?;
    let period = Period::from_code(code)
        .ok_or_else(|| malformed(format!("month of period {code} must be in 1..=12")))?;

    let value: f64 = value
        .parse()
        .map_err(|err| malformed(format!("value {value:?}: {err}")))?;
    if !value.is_finite() {
        return Err(malformed(format!("value {value} is not finite")));
    }

    Ok(Observation { period, value })
}
