//! dispersion::errors — error types for the dispersion estimator.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias for estimator construction and
//! input validation. Only configuration errors live here: numeric
//! degeneracy inside a single (day, kappa) cell and boundary exclusion near
//! the series edges are represented as undefined cells, never as errors,
//! so the estimator stays total over the full day range.

pub type DispersionResult<T> = Result<T, DispersionError>;

/// DispersionError — fatal configuration errors of the estimator.
///
/// Variants
/// --------
/// - `SeriesLengthMismatch { potential, activity }`
///   The potential and activity series are not date-aligned.
/// - `EmptySeries`
///   The input series carry no samples.
/// - `EmptyGrid`
///   The kappa grid has no entries.
/// - `NonPositiveKappa(value)`
///   A grid value is zero, negative, or non-finite; kappa is a dispersion
///   parameter and must be strictly positive.
/// - `ZeroSamples`
///   The Monte-Carlo sample count is zero, which would make every p-value
///   undefined by construction.
/// - `UnknownFamily(name)` / `UnknownShape(name)`
///   A secondary-infection family outside `gamma | NB`, or a model shape
///   outside `c | t | st`, was requested through string parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum DispersionError {
    SeriesLengthMismatch { potential: usize, activity: usize },
    EmptySeries,
    EmptyGrid,
    NonPositiveKappa(f64),
    ZeroSamples,
    UnknownFamily(String),
    UnknownShape(String),
}

impl std::error::Error for DispersionError {}

impl std::fmt::Display for DispersionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispersionError::SeriesLengthMismatch { potential, activity } => {
                write!(
                    f,
                    "potential ({potential}) and activity ({activity}) series must be date-aligned \
                     with equal length"
                )
            }
            DispersionError::EmptySeries => write!(f, "input series must not be empty"),
            DispersionError::EmptyGrid => write!(f, "kappa grid must contain at least one value"),
            DispersionError::NonPositiveKappa(value) => {
                write!(f, "kappa must be strictly positive and finite, got {value}")
            }
            DispersionError::ZeroSamples => {
                write!(f, "Monte-Carlo sample count must be at least 1")
            }
            DispersionError::UnknownFamily(name) => {
                write!(f, "unknown secondary-infection family '{name}': expected gamma or NB")
            }
            DispersionError::UnknownShape(name) => {
                write!(f, "unknown model shape '{name}': expected one of c, t, st")
            }
        }
    }
}
