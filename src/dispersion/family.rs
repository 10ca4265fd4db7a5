//! dispersion::family — overdispersed secondary-infection count models.
//!
//! Purpose
//! -------
//! Define the two distribution families used to model the daily number of
//! secondary-case events produced by a pool of `phi` infectious individuals
//! with reproduction number `r` and dispersion `kappa`. Both families share
//! the mean `phi·r`; they differ in how the individual-level variability
//! enters the variance.
//!
//! Key behaviors
//! -------------
//! - `Gamma`: each individual's transmission intensity is
//!   Gamma(kappa, r/kappa), so the pooled activity is
//!   Gamma(shape = phi·kappa, scale = r/kappa) with variance `phi·r²/kappa`.
//! - `NegBinomial`: Poisson counts over the same gamma intensities, i.e. a
//!   gamma–Poisson mixture with variance `phi·r + phi·r²/kappa`.
//! - Low kappa means heavier tails (superspreading-like variability); as
//!   kappa → ∞ both families collapse toward their deterministic/Poisson
//!   limits.
//!
//! Invariants & assumptions
//! ------------------------
//! - `kappa > 0` is guaranteed by [`KappaGrid`](crate::dispersion::KappaGrid).
//! - Zero pool size or a non-positive fitted mean degenerates to a point
//!   mass at 0: variance 0 and samples of exactly 0.

use std::str::FromStr;

use rand::distributions::Distribution;
use rand::rngs::StdRng;
use statrs::distribution::{Gamma, Poisson};

use crate::dispersion::errors::DispersionError;

/// SecondaryFamily — the secondary-infection count model under test.
///
/// Variants
/// --------
/// - `Gamma`
///   Continuous gamma-mixture activity model.
/// - `NegBinomial`
///   Discrete gamma–Poisson (negative-binomial) count model.
///
/// Notes
/// -----
/// - `FromStr` accepts the CLI spellings `gamma | NB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryFamily {
    Gamma,
    NegBinomial,
}

impl FromStr for SecondaryFamily {
    type Err = DispersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gamma" => Ok(SecondaryFamily::Gamma),
            "NB" => Ok(SecondaryFamily::NegBinomial),
            other => Err(DispersionError::UnknownFamily(other.to_string())),
        }
    }
}

impl SecondaryFamily {
    /// Variance of the daily activity for pool `phi`, reproduction number
    /// `r`, and dispersion `kappa`.
    ///
    /// Returns
    /// -------
    /// `f64`
    ///   `phi·r²/kappa` (gamma) or `phi·r + phi·r²/kappa` (negative
    ///   binomial); 0 when `phi ≤ 0` or `r ≤ 0`.
    pub fn variance(&self, phi: f64, r: f64, kappa: f64) -> f64 {
        if phi <= 0.0 || r <= 0.0 {
            return 0.0;
        }
        match self {
            SecondaryFamily::Gamma => phi * r * r / kappa,
            SecondaryFamily::NegBinomial => phi * r + phi * r * r / kappa,
        }
    }

    /// Draw one day's activity under the family.
    ///
    /// Parameters
    /// ----------
    /// - `phi`: `f64`
    ///   Infectious pool size (may be fractional after convolution).
    /// - `r`: `f64`
    ///   Local reproduction number.
    /// - `kappa`: `f64`
    ///   Dispersion parameter, strictly positive.
    /// - `rng`: `&mut StdRng`
    ///   Cell-local reproducible random source.
    ///
    /// Returns
    /// -------
    /// `f64`
    ///   A non-negative draw with mean `phi·r`; exactly 0 when `phi ≤ 0` or
    ///   `r ≤ 0`.
    pub fn sample(&self, phi: f64, r: f64, kappa: f64, rng: &mut StdRng) -> f64 {
        if phi <= 0.0 || r <= 0.0 {
            return 0.0;
        }
        let shape = phi * kappa;
        let rate = kappa / r;
        let gamma = Gamma::new(shape, rate)
            .expect("shape and rate are positive for positive phi, r, kappa");
        let intensity = gamma.sample(rng);
        match self {
            SecondaryFamily::Gamma => intensity,
            SecondaryFamily::NegBinomial => {
                if intensity <= 0.0 {
                    0.0
                } else {
                    Poisson::new(intensity)
                        .expect("poisson rate is positive")
                        .sample(rng)
                }
            }
        }
    }
}
