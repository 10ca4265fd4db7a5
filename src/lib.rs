//! effdi — time-varying effective dispersion index estimation.
//!
//! Purpose
//! -------
//! Estimate, from a daily case-count time series, how much individual-level
//! transmission variability (superspreading) is statistically compatible
//! with the observed data over time. Raw incidence is convolved into two
//! derived signals — the infection potential (the currently infectious
//! pool, via an inverse kernel) and the infection activity (newly caused
//! secondary cases, via a forward kernel) — and for each day a grid of
//! candidate dispersion values kappa is tested against the observed
//! activity, yielding a p-value surface, per-day effective-reproduction-
//! number estimates, and threshold-crossing (level-set) curves.
//!
//! Key behaviors
//! -------------
//! - [`kernel`] discretizes parametric delay distributions into finite
//!   integer-day weight kernels with validated total mass.
//! - [`series`] validates gapless daily time series and applies kernels as
//!   windowed convolutions.
//! - [`dispersion`] runs the per-day, per-kappa statistical search: local
//!   reproduction-number fits, a Pearson goodness-of-fit statistic, and a
//!   Monte-Carlo p-value per cell.
//! - [`level_set`] reduces the p-value surface to per-threshold curves of
//!   the crossing dispersion value.
//! - [`io`] persists kernels in the two-row weight store, loads the
//!   cumulative incidence table, and writes the JSON result artifact.
//!
//! Invariants & assumptions
//! ------------------------
//! - The pipeline is a synchronous batch computation over one series at a
//!   time; the only parallelism is rayon over independent day rows inside
//!   the estimator.
//! - Configuration errors (unknown distribution name, mismatched windows,
//!   misaligned series) are fatal and surface before any output is
//!   written; numeric degeneracy and window-boundary exclusion are
//!   explicit `None` cells, never failures.
//! - Derived series share the date axis of the raw series they came from.
//!
//! Downstream usage
//! ----------------
//! - Library callers run the stages directly:
//!
//!   ```rust
//!   use effdi::config::KernelConfig;
//!   use effdi::prelude::*;
//!
//!   # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let config = KernelConfig::default();
//!   let fwd = Kernel::build(DistributionKind::Delta, Direction::Forward, &config)?;
//!   let inv = Kernel::build(DistributionKind::Delta, Direction::Inverse, &config)?;
//!
//!   let reported = ndarray::Array1::from(vec![50.0; 60]);
//!   let activity = apply_kernel(&reported, &fwd)?;
//!   let potential = apply_kernel(&reported, &inv)?;
//!
//!   let grid = KappaGrid::logspace(-1.0, 4.0, 20)?;
//!   let config = EstimatorConfig {
//!       shape: ModelShape::Constant,
//!       tau_left: 6,
//!       tau_right: 7,
//!       n_samples: 50,
//!       family: SecondaryFamily::Gamma,
//!       seed: 0,
//!   };
//!   let outcome = estimate(
//!       potential.as_slice().expect("contiguous"),
//!       activity.as_slice().expect("contiguous"),
//!       &grid,
//!       &config,
//!   )?;
//!   let curves = extract_level_sets(&outcome.pvals, &grid, &[0.9]);
//!   assert_eq!(curves.len(), 1);
//!   # Ok(())
//!   # }
//!   ```
//! - The `effdi` binary wraps the same stages behind the
//!   `precompute-weights` and `compute` subcommands.

pub mod config;
pub mod dispersion;
pub mod io;
pub mod kernel;
pub mod level_set;
pub mod series;

// ---- Re-exports (primary public surface) ----------------------------------

pub use crate::config::{KernelConfig, RunConfig};
pub use crate::dispersion::{
    estimate, DispersionError, DispersionOutcome, DispersionResult, EstimatorConfig, KappaGrid,
    ModelShape, PValueSurface, ReffEstimate, SecondaryFamily,
};
pub use crate::kernel::{Direction, DistributionKind, Kernel, KernelError, KernelResult};
pub use crate::level_set::{extract_level_sets, LevelSetCurve};
pub use crate::series::{apply_kernel, SeriesError, SeriesResult, TimeSeries};

/// Convenience prelude importing the main pipeline surface in one line.
pub mod prelude {
    pub use crate::dispersion::{
        estimate, DispersionOutcome, EstimatorConfig, KappaGrid, ModelShape, PValueSurface,
        SecondaryFamily,
    };
    pub use crate::kernel::{Direction, DistributionKind, Kernel};
    pub use crate::level_set::{extract_level_sets, LevelSetCurve};
    pub use crate::series::{apply_kernel, TimeSeries};
}
