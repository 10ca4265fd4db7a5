//! io::results — the serialized result artifact of one country run.
//!
//! Purpose
//! -------
//! Assemble everything the downstream visualization collaborator consumes
//! into a single serializable aggregate and write it as JSON. This is the
//! only place where the core's explicit `Option` cells meet the artifact's
//! sentinel conventions: undefined p-values and Reff cells serialize as
//! `null`, while level-set curves keep the historical sentinel `0.0` for
//! days without a crossing.
//!
//! Conventions
//! -----------
//! - Artifacts are written to `results/<country>_<mode>.json`, where the
//!   country key is lower-cased with spaces and commas stripped.
//! - A run either writes a complete artifact or fails before writing
//!   anything; there are no partial files.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::dispersion::{DispersionOutcome, KappaGrid};
use crate::io::errors::{StoreError, StoreResult};
use crate::level_set::LevelSetCurve;
use crate::series::TimeSeries;

/// ResultArtifact — the complete output of one country/mode run.
///
/// Fields
/// ------
/// - `pvals`: day-major p-value table; `null` marks undefined cells.
/// - `dates`: the shared daily axis.
/// - `reported_cases`: daily incidence after differencing.
/// - `infectious_load`: the infection-potential series.
/// - `infectious_activity`: the infection-activity series.
/// - `kappas`: the dispersion grid in scan order.
/// - `r_eff_case`: case-based Reff per day (`null` where undefined).
/// - `r_eff_fits`: fit-based Reff per (day, kappa) (`null` where undefined).
/// - `kappa_level_set_lines`: one curve per threshold; sentinel `0.0`
///   marks days without a crossing.
/// - `p0s`: the thresholds the curves belong to.
#[derive(Debug, Clone, Serialize)]
pub struct ResultArtifact {
    pub pvals: Vec<Vec<Option<f64>>>,
    pub dates: Vec<NaiveDate>,
    pub reported_cases: Vec<f64>,
    pub infectious_load: Vec<f64>,
    pub infectious_activity: Vec<f64>,
    pub kappas: Vec<f64>,
    pub r_eff_case: Vec<Option<f64>>,
    pub r_eff_fits: Vec<Vec<Option<f64>>>,
    pub kappa_level_set_lines: Vec<Vec<f64>>,
    pub p0s: Vec<f64>,
}

impl ResultArtifact {
    /// Assemble an artifact from the pipeline outputs.
    ///
    /// Parameters
    /// ----------
    /// - `reported`: `&TimeSeries`
    ///   Daily reported cases (supplies the date axis).
    /// - `potential`, `activity`: `&[f64]`
    ///   The derived series, date-aligned with `reported`.
    /// - `grid`: `&KappaGrid`
    /// - `outcome`: `&DispersionOutcome`
    /// - `curves`: `&[LevelSetCurve]`
    ///   Level-set curves in threshold order.
    pub fn assemble(
        reported: &TimeSeries, potential: &[f64], activity: &[f64], grid: &KappaGrid,
        outcome: &DispersionOutcome, curves: &[LevelSetCurve],
    ) -> Self {
        let n_days = outcome.pvals.n_days();
        let pvals = (0..n_days).map(|d| outcome.pvals.row(d)).collect();
        let r_eff_fits =
            outcome.reff.fits().rows().into_iter().map(|row| row.to_vec()).collect();
        let kappa_level_set_lines = curves
            .iter()
            .map(|c| c.kappa.iter().map(|k| k.unwrap_or(0.0)).collect())
            .collect();

        ResultArtifact {
            pvals,
            dates: reported.dates().to_vec(),
            reported_cases: reported.values().to_vec(),
            infectious_load: potential.to_vec(),
            infectious_activity: activity.to_vec(),
            kappas: grid.values().to_vec(),
            r_eff_case: outcome.reff.case().to_vec(),
            r_eff_fits,
            kappa_level_set_lines,
            p0s: curves.iter().map(|c| c.p0).collect(),
        }
    }

    /// Canonical artifact path for a country and model shape.
    ///
    /// Returns
    /// -------
    /// `PathBuf`
    ///   `<dir>/<country key>_<mode>.json` with the country lower-cased
    ///   and spaces/commas stripped.
    pub fn artifact_path(dir: &Path, country: &str, mode: &str) -> PathBuf {
        let key: String =
            country.chars().filter(|c| *c != ' ' && *c != ',').collect::<String>().to_lowercase();
        dir.join(format!("{key}_{mode}.json"))
    }

    /// Serialize the artifact as JSON to `path`, creating parent
    /// directories as needed.
    ///
    /// Errors
    /// ------
    /// - `StoreError::Io` on filesystem failure or serialization failure
    ///   (the latter cannot occur for these concrete field types).
    pub fn write_json(&self, path: &Path) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        serde_json::to_writer(std::io::BufWriter::new(file), self)
            .map_err(|e| StoreError::Io(std::io::Error::other(e)))?;
        Ok(())
    }
}
