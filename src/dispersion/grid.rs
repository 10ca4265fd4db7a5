//! dispersion::grid — the log-spaced dispersion-parameter grid.
//!
//! Purpose
//! -------
//! Represent the ordered set of candidate dispersion values tested per day.
//! The grid is log10-spaced and stored in descending order, matching the
//! level-set scan direction: high kappa (near-Poisson transmission) is
//! visited first, low kappa (superspreading-like variability) last.
//!
//! Invariants & assumptions
//! ------------------------
//! - All values are strictly positive and finite.
//! - The grid is immutable once constructed; every output surface preserves
//!   its index order.

use crate::dispersion::errors::{DispersionError, DispersionResult};

/// KappaGrid — ordered candidate dispersion values, typically descending.
///
/// Fields
/// ------
/// - `values`: `Vec<f64>`
///   Strictly positive dispersion values in scan order.
#[derive(Debug, Clone, PartialEq)]
pub struct KappaGrid {
    values: Vec<f64>,
}

impl KappaGrid {
    /// Construct a grid from explicit values in scan order.
    ///
    /// Errors
    /// ------
    /// - `DispersionError::EmptyGrid` when `values` is empty.
    /// - `DispersionError::NonPositiveKappa` on the first non-positive or
    ///   non-finite entry.
    pub fn new(values: Vec<f64>) -> DispersionResult<Self> {
        if values.is_empty() {
            return Err(DispersionError::EmptyGrid);
        }
        if let Some(&bad) = values.iter().find(|v| !v.is_finite() || **v <= 0.0) {
            return Err(DispersionError::NonPositiveKappa(bad));
        }
        Ok(KappaGrid { values })
    }

    /// Build a descending log10-spaced grid.
    ///
    /// Parameters
    /// ----------
    /// - `log10_min`, `log10_max`: `f64`
    ///   Base-10 exponents of the smallest and largest kappa.
    /// - `samples`: `usize`
    ///   Number of grid points; a single sample places one point at
    ///   `10^log10_min`.
    ///
    /// Returns
    /// -------
    /// `DispersionResult<KappaGrid>`
    ///   Values from `10^log10_max` down to `10^log10_min`, evenly spaced
    ///   in the exponent.
    pub fn logspace(log10_min: f64, log10_max: f64, samples: usize) -> DispersionResult<Self> {
        if samples == 0 {
            return Err(DispersionError::EmptyGrid);
        }
        let mut values = Vec::with_capacity(samples);
        if samples == 1 {
            values.push(10f64.powf(log10_min));
        } else {
            let step = (log10_max - log10_min) / (samples - 1) as f64;
            for i in (0..samples).rev() {
                values.push(10f64.powf(log10_min + step * i as f64));
            }
        }
        KappaGrid::new(values)
    }

    /// Grid values in scan order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a constructed grid.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Check logspace produces a descending grid with the requested
    // endpoints and even exponent spacing.
    //
    // Given
    // -----
    // - Exponent bounds [−1, 4] with 6 samples.
    //
    // Expect
    // ------
    // - First value 10^4, last 10^−1, strictly descending, exponent step 1.
    fn logspace_is_descending_with_even_exponent_steps() {
        let grid = KappaGrid::logspace(-1.0, 4.0, 6).unwrap();
        let v = grid.values();
        assert_eq!(v.len(), 6);
        assert!((v[0] - 1e4).abs() < 1e-9);
        assert!((v[5] - 0.1).abs() < 1e-12);
        for pair in v.windows(2) {
            assert!(pair[0] > pair[1]);
            assert!((pair[0].log10() - pair[1].log10() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure invalid grids are rejected: empty input, zero samples, and
    // non-positive values.
    //
    // Given
    // -----
    // - An empty vector, samples = 0, and a vector containing 0.0.
    //
    // Expect
    // ------
    // - EmptyGrid for the first two, NonPositiveKappa(0.0) for the third.
    fn invalid_grids_are_rejected() {
        assert_eq!(KappaGrid::new(Vec::new()), Err(DispersionError::EmptyGrid));
        assert_eq!(
            KappaGrid::logspace(-1.0, 4.0, 0).unwrap_err(),
            DispersionError::EmptyGrid
        );
        assert_eq!(
            KappaGrid::new(vec![2.0, 0.0]).unwrap_err(),
            DispersionError::NonPositiveKappa(0.0)
        );
    }

    #[test]
    // Purpose
    // -------
    // A one-point grid lands on the lower exponent bound, which is what
    // single-kappa scenario runs rely on.
    //
    // Given
    // -----
    // - logspace(0.0, 4.0, 1).
    //
    // Expect
    // ------
    // - Exactly [1.0].
    fn single_sample_grid_uses_lower_bound() {
        let grid = KappaGrid::logspace(0.0, 4.0, 1).unwrap();
        assert_eq!(grid.values(), &[1.0]);
    }
}
