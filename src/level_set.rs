//! level_set — threshold-crossing curves over the p-value surface.
//!
//! Purpose
//! -------
//! Reduce the 2-D p-value surface to one curve per probability threshold:
//! for each day, the kappa value at which the day's p-value row crosses the
//! threshold. The curves summarize how much individual-level transmission
//! variability is consistent with the data over time.
//!
//! Key behaviors
//! -------------
//! - Each row is scanned in the grid's stored order (typically descending
//!   kappa) and the first sign change of `p − p0` between consecutive
//!   defined cells is reported. First-crossing-in-scan-order is the
//!   documented tie-break when a non-monotone row crosses more than once.
//! - The crossing kappa is interpolated log10-linearly between the two
//!   bracketing grid points — the grid is log-spaced, so linear-in-log is
//!   the natural interpolation. An exact threshold hit returns the grid
//!   kappa itself.
//! - Days with no crossing in range, or with fewer than two defined cells,
//!   yield `None`. The sentinel value 0 exists only in the serialized
//!   result artifact, never here.

use crate::dispersion::{KappaGrid, PValueSurface};

/// LevelSetCurve — per-day crossing kappas for one threshold.
///
/// Fields
/// ------
/// - `p0`: `f64`
///   The probability threshold this curve belongs to.
/// - `kappa`: `Vec<Option<f64>>`
///   One entry per day; `None` where the row never crosses `p0`.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSetCurve {
    pub p0: f64,
    pub kappa: Vec<Option<f64>>,
}

/// Extract one level-set curve per threshold.
///
/// Parameters
/// ----------
/// - `surface`: `&PValueSurface`
///   The (day × kappa) p-value table.
/// - `grid`: `&KappaGrid`
///   The kappa grid the surface was computed over, in scan order.
/// - `thresholds`: `&[f64]`
///   Probability thresholds p0.
///
/// Returns
/// -------
/// `Vec<LevelSetCurve>`
///   One curve per threshold, in input order, each with one entry per day.
pub fn extract_level_sets(
    surface: &PValueSurface, grid: &KappaGrid, thresholds: &[f64],
) -> Vec<LevelSetCurve> {
    thresholds
        .iter()
        .map(|&p0| LevelSetCurve {
            p0,
            kappa: (0..surface.n_days())
                .map(|day| row_crossing(&surface.row(day), grid.values(), p0))
                .collect(),
        })
        .collect()
}

/// First crossing of `p0` in one row, scanning in grid order.
fn row_crossing(row: &[Option<f64>], kappas: &[f64], p0: f64) -> Option<f64> {
    let mut prev: Option<(f64, f64)> = None;
    for (k, cell) in row.iter().enumerate() {
        let p = match cell {
            Some(p) => *p,
            None => continue,
        };
        let kappa = kappas[k];
        if p == p0 {
            return Some(kappa);
        }
        if let Some((prev_kappa, prev_p)) = prev {
            if (prev_p - p0).signum() != (p - p0).signum() {
                return Some(interpolate_log(prev_kappa, prev_p, kappa, p, p0));
            }
        }
        prev = Some((kappa, p));
    }
    None
}

/// Log10-linear interpolation of the crossing kappa between two bracketing
/// grid points.
fn interpolate_log(kappa_a: f64, p_a: f64, kappa_b: f64, p_b: f64, p0: f64) -> f64 {
    let t = (p0 - p_a) / (p_b - p_a);
    10f64.powf(kappa_a.log10() + t * (kappa_b.log10() - kappa_a.log10()))
}
