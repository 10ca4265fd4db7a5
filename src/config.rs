//! config — explicit run configuration for the estimation pipeline.
//!
//! Purpose
//! -------
//! Lift every tunable that the original workflow buried in argument-parser
//! defaults into explicit configuration structs. The kernel builder, the
//! dispersion estimator, and the binary all receive their parameters through
//! these types; no component carries hidden constants.
//!
//! Key behaviors
//! -------------
//! - [`KernelConfig`] fixes the parametric onset/generation-interval
//!   distributions and the shared window half-width used to discretize them.
//! - [`RunConfig`] carries the full estimator surface of one run: model
//!   shape, fitting window, kappa grid bounds, Monte-Carlo sample count,
//!   secondary-infection family, level-set thresholds, and RNG seed.
//!
//! Conventions
//! -----------
//! - `Default` implementations reproduce the reference workflow's defaults
//!   (tau = (6, 7), kappa in 10^[−1, 4] over 300 points, n = 500, gamma
//!   family, seasonal-trend shape, thresholds 0.8/0.85/0.9/0.95).

use crate::dispersion::{
    DispersionResult, EstimatorConfig, KappaGrid, ModelShape, SecondaryFamily,
};

/// KernelConfig — parameters of the discretized onset distributions.
///
/// Fields
/// ------
/// - `gamma_mean`, `gamma_std`: `f64`
///   Mean and standard deviation of the gamma-shaped generation interval;
///   internally converted to shape/scale.
/// - `skewnorm_shape`, `skewnorm_loc`, `skewnorm_scale`: `f64`
///   Skew-normal onset-distribution parameters.
/// - `shaped_half_width`: `i64`
///   Window half-width in days for the gamma and skew-normal kernels. The
///   gamma window is one-sided (`[0, w]` forward, `[−w, 0]` inverse), the
///   skew-normal window symmetric (`[−w, w]`).
///
/// Invariants
/// ----------
/// - All scale-like parameters are strictly positive and
///   `shaped_half_width ≥ 1`; `Default` satisfies both.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelConfig {
    pub gamma_mean: f64,
    pub gamma_std: f64,
    pub skewnorm_shape: f64,
    pub skewnorm_loc: f64,
    pub skewnorm_scale: f64,
    pub shaped_half_width: i64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        KernelConfig {
            gamma_mean: 5.6,
            gamma_std: 4.2,
            skewnorm_shape: 0.828,
            skewnorm_loc: 2.045,
            skewnorm_scale: 5.199,
            shaped_half_width: 70,
        }
    }
}

/// RunConfig — the estimator configuration surface of a single run.
///
/// Fields
/// ------
/// - `shape`: [`ModelShape`]
///   Local reproduction-number model over the fitting window.
/// - `tau_left`, `tau_right`: `usize`
///   Day-window half-widths; day `d` is fitted over `[d − tau_left,
///   d + tau_right]`.
/// - `kappa_log10_min`, `kappa_log10_max`: `f64`
///   Base-10 exponents bounding the dispersion grid.
/// - `kappa_samples`: `usize`
///   Number of log-spaced grid points.
/// - `n_samples`: `usize`
///   Monte-Carlo draws per (day, kappa) cell.
/// - `family`: [`SecondaryFamily`]
///   Overdispersed secondary-infection count model.
/// - `p0s`: `Vec<f64>`
///   Probability thresholds for the level-set extraction.
/// - `seed`: `u64`
///   Base seed; every (day, kappa) cell derives an independent stream.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub shape: ModelShape,
    pub tau_left: usize,
    pub tau_right: usize,
    pub kappa_log10_min: f64,
    pub kappa_log10_max: f64,
    pub kappa_samples: usize,
    pub n_samples: usize,
    pub family: SecondaryFamily,
    pub p0s: Vec<f64>,
    pub seed: u64,
}

impl RunConfig {
    /// The dispersion grid implied by the kappa bounds and sample count.
    ///
    /// Errors
    /// ------
    /// - `DispersionError::EmptyGrid` when `kappa_samples == 0`.
    pub fn grid(&self) -> DispersionResult<KappaGrid> {
        KappaGrid::logspace(self.kappa_log10_min, self.kappa_log10_max, self.kappa_samples)
    }

    /// The estimator-facing slice of this configuration.
    pub fn estimator(&self) -> EstimatorConfig {
        EstimatorConfig {
            shape: self.shape,
            tau_left: self.tau_left,
            tau_right: self.tau_right,
            n_samples: self.n_samples,
            family: self.family,
            seed: self.seed,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            shape: ModelShape::SeasonalTrend,
            tau_left: 6,
            tau_right: 7,
            kappa_log10_min: -1.0,
            kappa_log10_max: 4.0,
            kappa_samples: 300,
            n_samples: 500,
            family: SecondaryFamily::Gamma,
            p0s: vec![0.8, 0.85, 0.9, 0.95],
            seed: 0,
        }
    }
}
