//! Error kinds raised by the numerical core.

use thiserror::Error;

/// Failure of a core operation.
///
/// Every core entry point validates its input and returns one of these
/// instead of letting `NaN` or infinities reach the reports and charts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The series has no observations.
    #[error("series is empty")]
    EmptySeries,

    /// Too few observations for the requested operation.
    #[error("{operation} needs at least {needed} values, but got {got}")]
    InsufficientData {
        operation: &'static str,
        needed: usize,
        got: usize,
    },

    /// A row or field of the input could not be parsed.
    #[error("malformed input on line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    /// The result is undefined for this input (zero variance, non-finite values).
    #[error("{operation} is undefined: {reason}")]
    DegenerateSeries {
        operation: &'static str,
        reason: String,
    },
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
