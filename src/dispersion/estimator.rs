//! dispersion::estimator — per-day, per-kappa dispersion testing.
//!
//! Purpose
//! -------
//! For each day with a full fitting window and each candidate dispersion
//! value, fit the local reproduction-number model, score the observed
//! window against the fitted overdispersed null with a Pearson-type
//! dispersion statistic, and derive a Monte-Carlo p-value. The result is a
//! p-value surface over (day, kappa) together with case-based and
//! fit-based reproduction-number estimates.
//!
//! Key behaviors
//! -------------
//! - Days whose window `[d − tau_left, d + tau_right]` does not lie fully
//!   inside the series receive undefined cells across the whole row
//!   (boundary exclusion; truncated windows would bias the estimates).
//! - A non-finite or unidentifiable local fit yields an undefined cell and
//!   the run continues; the estimator is total over the day range.
//! - The observed statistic is compared against `n` simulated statistics
//!   drawn from the fitted model at the candidate kappa, all scored with
//!   the same plug-in parameters: `p = #{T* ≥ T} / n`. High kappa
//!   (underdispersed null) drives p toward 0, low kappa toward 1.
//! - Every (day, kappa) cell owns an independent, deterministically seeded
//!   random source, so the surface is reproducible and independent of the
//!   parallel execution order.
//!
//! Concurrency
//! -----------
//! - Day rows are independent and computed in parallel with rayon; cells
//!   write into disjoint row buffers that are assembled into the surface
//!   afterwards, so no locking is involved.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::dispersion::errors::{DispersionError, DispersionResult};
use crate::dispersion::family::SecondaryFamily;
use crate::dispersion::grid::KappaGrid;
use crate::dispersion::model::{fit_window, LocalFit, ModelShape};
use crate::dispersion::surface::{PValueSurface, ReffEstimate};

/// EstimatorConfig — parameters of one dispersion-estimation run.
///
/// Fields
/// ------
/// - `shape`: [`ModelShape`]
///   Local reproduction-number model over the fitting window.
/// - `tau_left`, `tau_right`: `usize`
///   Window half-widths; day `d` is fitted over `[d − tau_left,
///   d + tau_right]`.
/// - `n_samples`: `usize`
///   Monte-Carlo draws per cell; must be at least 1.
/// - `family`: [`SecondaryFamily`]
///   Overdispersed secondary-infection count model.
/// - `seed`: `u64`
///   Base seed from which every cell derives its own stream.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorConfig {
    pub shape: ModelShape,
    pub tau_left: usize,
    pub tau_right: usize,
    pub n_samples: usize,
    pub family: SecondaryFamily,
    pub seed: u64,
}

/// DispersionOutcome — everything one estimation run produces.
///
/// Fields
/// ------
/// - `pvals`: [`PValueSurface`]
///   One row per day, one column per grid kappa, grid order preserved.
/// - `reff`: [`ReffEstimate`]
///   Case-based (per day) and fit-based (per day × kappa) estimates.
#[derive(Debug, Clone, PartialEq)]
pub struct DispersionOutcome {
    pub pvals: PValueSurface,
    pub reff: ReffEstimate,
}

/// One (day, kappa) cell: p-value and fit-based Reff, either possibly
/// undefined.
type Cell = (Option<f64>, Option<f64>);

/// Run the dispersion estimator over date-aligned potential and activity
/// series.
///
/// Parameters
/// ----------
/// - `potential`: `&[f64]`
///   Infection-potential series (expected infectious pool per day).
/// - `activity`: `&[f64]`
///   Infection-activity series (secondary-case events per day), same
///   length and date alignment.
/// - `grid`: `&KappaGrid`
///   Candidate dispersion values in scan order.
/// - `config`: `&EstimatorConfig`
///
/// Returns
/// -------
/// `DispersionResult<DispersionOutcome>`
///   The p-value surface and reproduction-number estimates. Every defined
///   p-value lies in [0, 1]; rows for days without a full window are
///   uniformly undefined.
///
/// Errors
/// ------
/// - `DispersionError::SeriesLengthMismatch` when the series lengths differ.
/// - `DispersionError::EmptySeries` when the series are empty.
/// - `DispersionError::ZeroSamples` when `config.n_samples == 0`.
///   Grid validity is enforced by [`KappaGrid`] construction.
///
/// Notes
/// -----
/// - Numeric degeneracy inside a window (all-zero potential, failed fit,
///   no positive-variance offsets) is recorded as `None` cells, never as
///   an error.
pub fn estimate(
    potential: &[f64], activity: &[f64], grid: &KappaGrid, config: &EstimatorConfig,
) -> DispersionResult<DispersionOutcome> {
    if potential.len() != activity.len() {
        return Err(DispersionError::SeriesLengthMismatch {
            potential: potential.len(),
            activity: activity.len(),
        });
    }
    if potential.is_empty() {
        return Err(DispersionError::EmptySeries);
    }
    if config.n_samples == 0 {
        return Err(DispersionError::ZeroSamples);
    }

    let n_days = potential.len();
    let n_kappas = grid.len();

    let rows: Vec<Vec<Cell>> = (0..n_days)
        .into_par_iter()
        .map(|day| estimate_day_row(day, potential, activity, grid, config))
        .collect();

    let mut pval_cells = Array2::from_elem((n_days, n_kappas), None);
    let mut fit_cells = Array2::from_elem((n_days, n_kappas), None);
    for (day, row) in rows.into_iter().enumerate() {
        for (k, (pval, reff_fit)) in row.into_iter().enumerate() {
            pval_cells[(day, k)] = pval;
            fit_cells[(day, k)] = reff_fit;
        }
    }

    let case = case_based_reff(potential, activity);

    Ok(DispersionOutcome {
        pvals: PValueSurface::from_cells(pval_cells),
        reff: ReffEstimate::new(case, fit_cells),
    })
}

/// Compute one day's row of (p-value, fit-based Reff) cells.
///
/// Returns an all-`None` row for days without a full fitting window.
fn estimate_day_row(
    day: usize, potential: &[f64], activity: &[f64], grid: &KappaGrid, config: &EstimatorConfig,
) -> Vec<Cell> {
    let n_days = potential.len();
    let undefined = vec![(None, None); grid.len()];

    // Boundary exclusion: require the full window inside the series.
    if day < config.tau_left || day + config.tau_right >= n_days {
        return undefined;
    }
    let lo = day - config.tau_left;
    let hi = day + config.tau_right + 1;
    let phi = &potential[lo..hi];
    let act = &activity[lo..hi];

    grid.values()
        .iter()
        .enumerate()
        .map(|(k, &kappa)| {
            let mut rng = StdRng::seed_from_u64(cell_seed(config.seed, day, k));
            estimate_cell(phi, act, kappa, config, &mut rng)
        })
        .collect()
}

/// Evaluate a single (window, kappa) cell.
fn estimate_cell(
    phi: &[f64], activity: &[f64], kappa: f64, config: &EstimatorConfig, rng: &mut StdRng,
) -> Cell {
    let fit = match fit_window(config.shape, phi, activity, config.tau_left, config.family, kappa)
    {
        Some(fit) => fit,
        None => return (None, None),
    };
    let reff_fit = Some(fit.r_at(0.0));

    let pval = monte_carlo_pvalue(phi, activity, &fit, kappa, config, rng);
    (pval, reff_fit)
}

/// Pearson-type dispersion statistic of a window against the fitted null.
///
/// Sums `(a_u − mu_u)² / Var(phi_u, r(u), kappa)` over offsets with
/// positive variance; returns `None` when no offset qualifies, which makes
/// the test undefined for that cell.
fn dispersion_statistic(
    phi: &[f64], activity: &[f64], fit: &LocalFit, kappa: f64, tau_left: usize,
    family: SecondaryFamily,
) -> Option<f64> {
    let mut stat = 0.0;
    let mut used = 0usize;
    for (i, (&p, &a)) in phi.iter().zip(activity).enumerate() {
        let u = i as f64 - tau_left as f64;
        let r = fit.r_at(u);
        let var = family.variance(p, r, kappa);
        if var > 0.0 {
            let mu = p * r;
            stat += (a - mu) * (a - mu) / var;
            used += 1;
        }
    }
    if used == 0 || !stat.is_finite() {
        None
    } else {
        Some(stat)
    }
}

/// Monte-Carlo p-value of the observed window under the fitted null.
fn monte_carlo_pvalue(
    phi: &[f64], activity: &[f64], fit: &LocalFit, kappa: f64, config: &EstimatorConfig,
    rng: &mut StdRng,
) -> Option<f64> {
    let observed =
        dispersion_statistic(phi, activity, fit, kappa, config.tau_left, config.family)?;

    let mut simulated = vec![0.0; phi.len()];
    let mut exceed = 0usize;
    for _ in 0..config.n_samples {
        for (i, (sim, &p)) in simulated.iter_mut().zip(phi).enumerate() {
            let u = i as f64 - config.tau_left as f64;
            *sim = config.family.sample(p, fit.r_at(u), kappa, rng);
        }
        let null_stat =
            dispersion_statistic(phi, &simulated, fit, kappa, config.tau_left, config.family)?;
        if null_stat >= observed {
            exceed += 1;
        }
    }
    Some(exceed as f64 / config.n_samples as f64)
}

/// Model-free case-based Reff: `activity[d] / potential[d]` where the
/// potential is positive, undefined elsewhere.
fn case_based_reff(potential: &[f64], activity: &[f64]) -> Vec<Option<f64>> {
    potential
        .iter()
        .zip(activity)
        .map(|(&p, &a)| if p > 0.0 { Some(a / p) } else { None })
        .collect()
}

/// Derive a cell-local seed from the base seed and the cell coordinates.
///
/// A splitmix64-style finalizer over the packed coordinates keeps the
/// streams decorrelated without any coordination between cells.
fn cell_seed(base: u64, day: usize, kappa_idx: usize) -> u64 {
    let mut z = base
        .wrapping_add((day as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .wrapping_add((kappa_idx as u64).wrapping_mul(0xBF58_476D_1CE4_E5B9));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
