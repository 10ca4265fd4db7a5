//! dispersion — the per-day, per-kappa dispersion estimator.
//!
//! Purpose
//! -------
//! Estimate which dispersion values are statistically compatible with the
//! observed infection activity given the infection potential. For each day
//! with a full fitting window and each candidate kappa, a local
//! reproduction-number model is fitted and the observed window is scored
//! against Monte-Carlo draws from the fitted overdispersed null, producing
//! a p-value surface plus case-based and fit-based Reff estimates.
//!
//! Key behaviors
//! -------------
//! - [`estimate`](estimator::estimate) is the single entry point; the
//!   (day, kappa) cells are embarrassingly parallel and computed with
//!   rayon over day rows.
//! - Undefined cells (boundary exclusion, numeric degeneracy) are explicit
//!   `None`s; the estimator never fails on them.
//! - Configuration errors (mismatched series, empty grid, zero samples)
//!   are fatal and surfaced before any cell work.
//!
//! Downstream usage
//! ----------------
//! - `level_set` consumes the [`PValueSurface`](surface::PValueSurface)
//!   together with the [`KappaGrid`](grid::KappaGrid) used to produce it.

pub mod errors;
pub mod estimator;
pub mod family;
pub mod grid;
pub mod model;
pub mod surface;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{DispersionError, DispersionResult};
pub use self::estimator::{estimate, DispersionOutcome, EstimatorConfig};
pub use self::family::SecondaryFamily;
pub use self::grid::KappaGrid;
pub use self::model::{LocalFit, ModelShape};
pub use self::surface::{PValueSurface, ReffEstimate};
