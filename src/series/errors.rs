//! series::errors — error types for time-series containers and transforms.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias for the `series` subtree. All
//! variants are configuration errors in the pipeline taxonomy: fatal,
//! surfaced immediately through `Result`, never retried.
//!
//! Conventions
//! -----------
//! - Messages state the violated domain constraint ("dates must increase by
//!   one day") rather than implementation detail.

pub type SeriesResult<T> = Result<T, SeriesError>;

/// SeriesError — failure conditions for series construction and transforms.
///
/// Variants
/// --------
/// - `LengthMismatch { dates, values }`
///   The date axis and value vector of a time series differ in length.
/// - `NonMonotonicDates { index }`
///   The date at `index` does not follow its predecessor by exactly one day;
///   the pipeline assumes a gapless daily axis.
/// - `Empty`
///   A series with no samples was supplied where at least one is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    LengthMismatch { dates: usize, values: usize },
    NonMonotonicDates { index: usize },
    Empty,
}

impl std::error::Error for SeriesError {}

impl std::fmt::Display for SeriesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesError::LengthMismatch { dates, values } => {
                write!(f, "dates ({dates}) and values ({values}) must have equal length")
            }
            SeriesError::NonMonotonicDates { index } => {
                write!(f, "dates must increase by exactly one day; violation at index {index}")
            }
            SeriesError::Empty => write!(f, "time series must contain at least one sample"),
        }
    }
}
