//! dispersion::surface — output containers of the dispersion estimator.
//!
//! Purpose
//! -------
//! Hold the per-(day, kappa) p-value surface and the reproduction-number
//! estimates. Undefined cells — boundary exclusion near the series edges
//! and numeric degeneracy inside a window — are explicit `None`s rather
//! than a literal sentinel, so "no value" can never be confused with a
//! structurally valid zero.
//!
//! Invariants & assumptions
//! ------------------------
//! - The surface has exactly one row per input day and one column per grid
//!   kappa, in grid order.
//! - Every defined p-value lies in [0, 1].
//! - Containers are immutable once returned by the estimator.

use ndarray::Array2;

/// PValueSurface — goodness-of-fit p-values per (day, kappa).
///
/// Fields
/// ------
/// - `cells`: `Array2<Option<f64>>`
///   Row index is the day, column index the kappa grid position.
#[derive(Debug, Clone, PartialEq)]
pub struct PValueSurface {
    cells: Array2<Option<f64>>,
}

impl PValueSurface {
    pub(crate) fn from_cells(cells: Array2<Option<f64>>) -> Self {
        PValueSurface { cells }
    }

    /// Number of days (rows).
    pub fn n_days(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of kappa grid points (columns).
    pub fn n_kappas(&self) -> usize {
        self.cells.ncols()
    }

    /// The p-value at (day, kappa index); `None` marks an undefined cell.
    pub fn get(&self, day: usize, kappa_idx: usize) -> Option<f64> {
        self.cells[(day, kappa_idx)]
    }

    /// One day's row across the kappa grid, in grid order.
    pub fn row(&self, day: usize) -> Vec<Option<f64>> {
        self.cells.row(day).to_vec()
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &Array2<Option<f64>> {
        &self.cells
    }
}

/// ReffEstimate — per-day reproduction-number estimates.
///
/// Fields
/// ------
/// - `case`: `Vec<Option<f64>>`
///   Model-free case-based estimate `activity[d] / potential[d]`, defined
///   wherever the potential is positive.
/// - `fits`: `Array2<Option<f64>>`
///   Fit-based estimate per (day, kappa): the fitted local model evaluated
///   at the day under test. Undefined outside full fitting windows and on
///   degenerate cells, mirroring the p-value surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ReffEstimate {
    case: Vec<Option<f64>>,
    fits: Array2<Option<f64>>,
}

impl ReffEstimate {
    pub(crate) fn new(case: Vec<Option<f64>>, fits: Array2<Option<f64>>) -> Self {
        ReffEstimate { case, fits }
    }

    /// Case-based estimates, one per day.
    pub fn case(&self) -> &[Option<f64>] {
        &self.case
    }

    /// Fit-based estimates, day × kappa in grid order.
    pub fn fits(&self) -> &Array2<Option<f64>> {
        &self.fits
    }
}
