//! kernel::builder — discretized convolution kernels from named distributions.
//!
//! Purpose
//! -------
//! Turn a continuous onset/generation-interval distribution into a finite,
//! normalized, integer-day weight kernel together with its causal (or
//! anticausal) window bounds. This is the single place in the pipeline that
//! performs the discretization, because an off-by-one in the window/weight
//! alignment would propagate silently through every downstream convolution.
//!
//! Key behaviors
//! -------------
//! - [`DistributionKind`] is a closed variant set over
//!   {point-mass, gamma-shaped, skew-normal-shaped}; each variant owns its
//!   window-bound and weight-construction logic and is matched exhaustively.
//! - Discretization evaluates the continuous CDF at unit-day resolution over
//!   the window, first-differences with a prepended 0, checks the raw mass
//!   against a distribution-specific tolerance, and renormalizes to exact
//!   unit mass.
//! - The inverse (back-projection) direction reverses the forward weights and
//!   mirrors a one-sided window about zero.
//!
//! Invariants & assumptions
//! ------------------------
//! - `weights.len() == window_right − window_left + 1` for every constructed
//!   kernel; `weights[i]` corresponds to day offset `window_left + i`.
//! - Weights are non-negative and sum to 1 exactly after renormalization.
//! - The raw (un-renormalized) mass must already be within tolerance of 1;
//!   a larger deviation means the window truncates real probability mass and
//!   is a fatal construction error, not something to paper over.
//!
//! Conventions
//! -----------
//! - Window bounds and the continuous-distribution parameters come from
//!   [`KernelConfig`]; nothing in this module hardcodes them.
//! - Tolerances follow the reference discretization: 1e-4 for the
//!   gamma-shaped kernel, 1e-3 for the skew-normal-shaped one.

use std::str::FromStr;

use ndarray::Array1;
use statrs::distribution::{ContinuousCDF, Gamma};

use crate::config::KernelConfig;
use crate::kernel::errors::{KernelError, KernelResult};
use crate::kernel::skewnorm::skewnorm_cdf;

/// Relative tolerance on the raw discrete mass of the gamma-shaped kernel.
const GAMMA_MASS_TOL: f64 = 1e-4;
/// Relative tolerance on the raw discrete mass of the skew-normal kernel.
const SKEWNORM_MASS_TOL: f64 = 1e-3;

/// DistributionKind — closed set of supported kernel distributions.
///
/// Variants
/// --------
/// - `Delta`
///   Point mass at offset 0; the identity kernel.
/// - `Gamma`
///   Gamma-shaped generation interval, parameterized by mean and standard
///   deviation; one-sided window.
/// - `SkewNorm`
///   Skew-normal onset distribution; symmetric window.
///
/// Notes
/// -----
/// - `FromStr` accepts the CLI spellings `delta | gamma | skewnorm`; any
///   other name yields [`KernelError::InvalidDistribution`]. The enum keeps
///   the dispatch exhaustive at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionKind {
    Delta,
    Gamma,
    SkewNorm,
}

impl FromStr for DistributionKind {
    type Err = KernelError;

    fn from_str(s: &str) -> KernelResult<Self> {
        match s {
            "delta" => Ok(DistributionKind::Delta),
            "gamma" => Ok(DistributionKind::Gamma),
            "skewnorm" => Ok(DistributionKind::SkewNorm),
            other => Err(KernelError::InvalidDistribution(other.to_string())),
        }
    }
}

/// Direction — orientation of a kernel relative to the convolution anchor.
///
/// Variants
/// --------
/// - `Forward`
///   Maps reported cases onto expected secondary-case activity (causal for
///   one-sided distributions).
/// - `Inverse`
///   Back-projects reported cases onto the currently infectious pool
///   (anticausal mirror of the forward kernel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

/// Kernel — a finite, normalized, integer-day convolution kernel.
///
/// Purpose
/// -------
/// Carry the weight vector together with the window bounds that define its
/// alignment, so downstream convolutions never have to re-derive either.
///
/// Fields
/// ------
/// - `window_left`, `window_right`: `i64`
///   Inclusive day-offset bounds relative to the convolution anchor;
///   `window_left ≤ window_right`, and the window may straddle zero.
/// - `weights`: `Array1<f64>`
///   Non-negative weights summing to 1; `weights[i]` belongs to day offset
///   `window_left + i`.
///
/// Invariants
/// ----------
/// - `weights.len() == (window_right − window_left + 1)`, checked by every
///   constructor; a violation is a fatal configuration error.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    window_left: i64,
    window_right: i64,
    weights: Array1<f64>,
}

impl Kernel {
    /// Construct a kernel from explicit window bounds and weights.
    ///
    /// Parameters
    /// ----------
    /// - `window_left`, `window_right`: `i64`
    ///   Inclusive day-offset bounds with `window_left ≤ window_right`.
    /// - `weights`: `Array1<f64>`
    ///   One weight per integer day in the window.
    ///
    /// Returns
    /// -------
    /// `KernelResult<Kernel>`
    ///   `Ok` when the window/weight length invariant holds and all weights
    ///   are non-negative; otherwise the corresponding [`KernelError`].
    ///
    /// Errors
    /// ------
    /// - `KernelError::WindowMismatch`
    ///   When `weights.len() != window_right − window_left + 1`.
    /// - `KernelError::NegativeWeight`
    ///   When any weight is negative.
    pub fn new(window_left: i64, window_right: i64, weights: Array1<f64>) -> KernelResult<Self> {
        let expected = (window_right - window_left + 1).max(0) as usize;
        if weights.len() != expected {
            return Err(KernelError::WindowMismatch { expected, actual: weights.len() });
        }
        if let Some((i, &w)) = weights.iter().enumerate().find(|(_, &w)| w < 0.0) {
            return Err(KernelError::NegativeWeight { offset: window_left + i as i64, weight: w });
        }
        Ok(Kernel { window_left, window_right, weights })
    }

    /// Build the kernel for a distribution and direction.
    ///
    /// Parameters
    /// ----------
    /// - `kind`: [`DistributionKind`]
    ///   Which continuous distribution to discretize.
    /// - `direction`: [`Direction`]
    ///   Forward (activity) or inverse (back-projection) orientation.
    /// - `config`: `&KernelConfig`
    ///   Continuous-distribution parameters and the shared window half-width.
    ///
    /// Returns
    /// -------
    /// `KernelResult<Kernel>`
    ///   The discretized, renormalized kernel with its window bounds:
    ///   - delta: `[0, 0]` / `[1.0]` in both directions;
    ///   - gamma: `[0, w]` forward, `[−w, 0]` inverse with reversed weights;
    ///   - skew-normal: `[−w, w]` in both directions, inverse reversed.
    ///
    /// Errors
    /// ------
    /// - `KernelError::MassMismatch`
    ///   When the raw discrete mass deviates from 1 beyond the
    ///   distribution-specific tolerance.
    /// - `KernelError::WindowMismatch` / `KernelError::NegativeWeight`
    ///   Propagated from [`Kernel::new`]; these indicate a programming error
    ///   in the discretization rather than bad user input.
    pub fn build(
        kind: DistributionKind, direction: Direction, config: &KernelConfig,
    ) -> KernelResult<Self> {
        let w = config.shaped_half_width;
        match kind {
            DistributionKind::Delta => Kernel::new(0, 0, Array1::from(vec![1.0])),
            DistributionKind::Gamma => {
                // Shape/scale from mean and standard deviation.
                let scale = config.gamma_std * config.gamma_std / config.gamma_mean;
                let shape = config.gamma_mean / scale;
                let gamma = Gamma::new(shape, 1.0 / scale).map_err(|_| {
                    KernelError::InvalidDistribution(format!(
                        "gamma with mean {} and std {} has no valid shape/rate",
                        config.gamma_mean, config.gamma_std
                    ))
                })?;
                let forward = discretize(|x| gamma.cdf(x), 0, w, GAMMA_MASS_TOL)?;
                match direction {
                    Direction::Forward => Kernel::new(0, w, forward),
                    Direction::Inverse => Kernel::new(-w, 0, reversed(&forward)),
                }
            }
            DistributionKind::SkewNorm => {
                let cdf = |x: f64| {
                    skewnorm_cdf(x, config.skewnorm_shape, config.skewnorm_loc, config.skewnorm_scale)
                };
                let forward = discretize(cdf, -w, w, SKEWNORM_MASS_TOL)?;
                match direction {
                    Direction::Forward => Kernel::new(-w, w, forward),
                    Direction::Inverse => Kernel::new(-w, w, reversed(&forward)),
                }
            }
        }
    }

    /// Inclusive left window bound (day offset of `weights[0]`).
    pub fn window_left(&self) -> i64 {
        self.window_left
    }

    /// Inclusive right window bound.
    pub fn window_right(&self) -> i64 {
        self.window_right
    }

    /// The normalized weight vector, one entry per integer day.
    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    /// Number of integer days in the window.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True only for the empty kernel, which no constructor produces.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// True when the window collapses to a single day offset.
    pub fn is_degenerate(&self) -> bool {
        self.window_left == self.window_right
    }
}

/// Discretize a continuous CDF onto integer days `window_left..=window_right`.
///
/// Parameters
/// ----------
/// - `cdf`: `impl Fn(f64) -> f64`
///   Cumulative distribution function of the continuous distribution.
/// - `window_left`, `window_right`: `i64`
///   Inclusive integer-day window bounds.
/// - `tol`: `f64`
///   Maximum allowed deviation of the raw discrete mass from 1.
///
/// Returns
/// -------
/// `KernelResult<Array1<f64>>`
///   The renormalized probability-mass vector: first differences of the CDF
///   samples with a 0 prepended at the left boundary, scaled to sum exactly
///   to 1. By construction the vector has exactly one entry per integer day.
///
/// Errors
/// ------
/// - `KernelError::MassMismatch`
///   When `|Σ pmf − 1| > tol` before renormalization. The check is a sanity
///   guard on the window choice, not a correctness requirement of the
///   renormalized output.
fn discretize(
    cdf: impl Fn(f64) -> f64, window_left: i64, window_right: i64, tol: f64,
) -> KernelResult<Array1<f64>> {
    let mut pmf = Vec::with_capacity((window_right - window_left + 1) as usize);
    let mut prev = 0.0;
    for day in window_left..=window_right {
        let value = cdf(day as f64);
        pmf.push(value - prev);
        prev = value;
    }

    let mass: f64 = pmf.iter().sum();
    if (mass - 1.0).abs() > tol {
        return Err(KernelError::MassMismatch { mass, tol });
    }
    Ok(Array1::from(pmf) / mass)
}

/// Reverse a weight vector for the inverse (back-projection) direction.
fn reversed(weights: &Array1<f64>) -> Array1<f64> {
    let mut rev: Vec<f64> = weights.to_vec();
    rev.reverse();
    Array1::from(rev)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Window bounds, unit length, and unit mass for every supported
    //   distribution and direction.
    // - The point-mass kernel shape in both directions.
    // - The inverse/forward weight-reversal relationship.
    // - Rejection of unknown distribution names and malformed windows.
    //
    // They intentionally DO NOT cover:
    // - Downstream convolution alignment (covered in `series::transform`).
    // - Epidemiological plausibility of the parameter defaults.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check the point-mass kernel is window [0, 0] with weight [1.0] for
    // both directions.
    //
    // Given
    // -----
    // - The default kernel configuration.
    //
    // Expect
    // ------
    // - window_left == window_right == 0 and weights == [1.0], forward and
    //   inverse alike.
    fn delta_kernel_is_point_mass_in_both_directions() {
        let config = KernelConfig::default();
        for direction in [Direction::Forward, Direction::Inverse] {
            let kernel = Kernel::build(DistributionKind::Delta, direction, &config).unwrap();
            assert_eq!(kernel.window_left(), 0);
            assert_eq!(kernel.window_right(), 0);
            assert_eq!(kernel.weights().len(), 1);
            assert_eq!(kernel.weights()[0], 1.0);
            assert!(kernel.is_degenerate());
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify window bounds, one-weight-per-day length, non-negativity, and
    // exact unit mass for the gamma and skew-normal kernels in both
    // directions.
    //
    // Given
    // -----
    // - The default kernel configuration (half-width 70).
    //
    // Expect
    // ------
    // - Gamma: [0, 70] forward, [−70, 0] inverse; skew-normal: [−70, 70]
    //   both ways. Lengths match the windows and weights sum to 1 within
    //   1e-12 after renormalization.
    fn shaped_kernels_satisfy_window_and_mass_invariants() {
        let config = KernelConfig::default();
        let cases = [
            (DistributionKind::Gamma, Direction::Forward, 0_i64, 70_i64),
            (DistributionKind::Gamma, Direction::Inverse, -70, 0),
            (DistributionKind::SkewNorm, Direction::Forward, -70, 70),
            (DistributionKind::SkewNorm, Direction::Inverse, -70, 70),
        ];
        for (kind, direction, left, right) in cases {
            let kernel = Kernel::build(kind, direction, &config).unwrap();
            assert_eq!(kernel.window_left(), left, "{kind:?} {direction:?}");
            assert_eq!(kernel.window_right(), right, "{kind:?} {direction:?}");
            assert_eq!(kernel.len(), (right - left + 1) as usize);
            assert!(kernel.weights().iter().all(|&w| w >= 0.0));
            let mass: f64 = kernel.weights().sum();
            assert!((mass - 1.0).abs() < 1e-12, "{kind:?} {direction:?}: mass {mass}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that the inverse kernel carries the forward weights reversed,
    // so back-projection mirrors the forward smearing about zero.
    //
    // Given
    // -----
    // - Gamma forward and inverse kernels from the default configuration.
    //
    // Expect
    // ------
    // - inverse.weights[i] == forward.weights[len − 1 − i] for all i.
    fn inverse_weights_are_reversed_forward_weights() {
        let config = KernelConfig::default();
        let fwd = Kernel::build(DistributionKind::Gamma, Direction::Forward, &config).unwrap();
        let inv = Kernel::build(DistributionKind::Gamma, Direction::Inverse, &config).unwrap();
        let n = fwd.len();
        assert_eq!(inv.len(), n);
        for i in 0..n {
            assert_eq!(inv.weights()[i], fwd.weights()[n - 1 - i]);
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure unknown distribution names are rejected with
    // InvalidDistribution rather than a panic or a silent default.
    //
    // Given
    // -----
    // - The strings "weibull" and "" fed to the FromStr parser.
    //
    // Expect
    // ------
    // - Err(KernelError::InvalidDistribution) carrying the offending name.
    fn unknown_distribution_name_is_rejected() {
        for name in ["weibull", ""] {
            match name.parse::<DistributionKind>() {
                Err(KernelError::InvalidDistribution(got)) => assert_eq!(got, name),
                other => panic!("expected InvalidDistribution, got {other:?}"),
            }
        }
        assert_eq!("gamma".parse::<DistributionKind>().unwrap(), DistributionKind::Gamma);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a window/weight length mismatch is a fatal construction error.
    //
    // Given
    // -----
    // - A window of three days paired with two weights.
    //
    // Expect
    // ------
    // - Err(KernelError::WindowMismatch { expected: 3, actual: 2 }).
    fn window_weight_length_mismatch_is_fatal() {
        let result = Kernel::new(-1, 1, Array1::from(vec![0.5, 0.5]));
        match result {
            Err(KernelError::WindowMismatch { expected, actual }) => {
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("expected WindowMismatch, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Check that the gamma discretization places zero mass at day 0 (the
    // CDF vanishes at the origin) and concentrates mass near the mean.
    //
    // Given
    // -----
    // - The gamma forward kernel with mean 5.6 and sd 4.2.
    //
    // Expect
    // ------
    // - weights[0] == 0, and the mass in days 1..=14 exceeds 0.9.
    fn gamma_forward_mass_is_concentrated_after_day_zero() {
        let config = KernelConfig::default();
        let kernel = Kernel::build(DistributionKind::Gamma, Direction::Forward, &config).unwrap();
        assert_eq!(kernel.weights()[0], 0.0);
        let early: f64 = kernel.weights().iter().take(15).sum();
        assert!(early > 0.9, "mass in first 14 days was {early}");
    }
}
