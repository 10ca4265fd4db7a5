//! io::incidence — loader for the global cumulative case-count table.
//!
//! Purpose
//! -------
//! Read the JHU-style global confirmed-cases CSV (one row per
//! province/country, date columns in `m/d/yy` format, cumulative counts)
//! into per-country cumulative [`TimeSeries`] values. Province rows are
//! summed into their country, and the shared date axis is parsed once.
//!
//! Key behaviors
//! -------------
//! - [`IncidenceTable::from_path`] parses and aggregates the table.
//! - [`IncidenceTable::series`] yields one country's cumulative series.
//! - [`IncidenceTable::resolve_countries`] re-joins space-separated CLI
//!   tokens into country names that contain spaces ("United Kingdom"
//!   arriving as two tokens), mirroring the reference CLI behavior.
//!
//! Invariants & assumptions
//! ------------------------
//! - The first four columns are `Province/State`, `Country/Region`, `Lat`,
//!   `Long`; everything after is a date column.
//! - Date columns are consecutive days, which the [`TimeSeries`]
//!   constructor re-validates.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use ndarray::Array1;

use crate::io::errors::{StoreError, StoreResult};
use crate::series::TimeSeries;

/// Number of leading non-date columns in the table.
const META_COLUMNS: usize = 4;

/// IncidenceTable — per-country cumulative case counts on a shared axis.
///
/// Fields
/// ------
/// - `dates`: `Vec<NaiveDate>`
///   The shared daily date axis.
/// - `countries`: `BTreeMap<String, Array1<f64>>`
///   Cumulative counts per country, provinces summed.
#[derive(Debug, Clone)]
pub struct IncidenceTable {
    dates: Vec<NaiveDate>,
    countries: BTreeMap<String, Array1<f64>>,
}

impl IncidenceTable {
    /// Load and aggregate the table at `path`.
    ///
    /// Returns
    /// -------
    /// `StoreResult<IncidenceTable>`
    ///
    /// Errors
    /// ------
    /// - `StoreError::MalformedTable` when the header carries no date
    ///   columns or a row is shorter than the header.
    /// - `StoreError::Parse` on an unparseable date or count cell.
    pub fn from_path(path: &Path) -> StoreResult<Self> {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;

        let headers = reader.headers()?.clone();
        if headers.len() <= META_COLUMNS {
            return Err(StoreError::MalformedTable {
                reason: "incidence table has no date columns".to_string(),
            });
        }
        let dates: Vec<NaiveDate> = headers
            .iter()
            .skip(META_COLUMNS)
            .map(|cell| {
                NaiveDate::parse_from_str(cell, "%m/%d/%y")
                    .map_err(|_| StoreError::Parse { field: "date column", value: cell.to_string() })
            })
            .collect::<StoreResult<_>>()?;

        let n_days = dates.len();
        let mut countries: BTreeMap<String, Array1<f64>> = BTreeMap::new();
        for record in reader.records() {
            let record = record?;
            if record.len() != headers.len() {
                return Err(StoreError::MalformedTable {
                    reason: format!(
                        "row for '{}' has {} cells, header has {}",
                        record.get(1).unwrap_or(""),
                        record.len(),
                        headers.len()
                    ),
                });
            }
            let country = record.get(1).unwrap_or("").to_string();
            let acc = countries.entry(country).or_insert_with(|| Array1::zeros(n_days));
            for (i, cell) in record.iter().skip(META_COLUMNS).enumerate() {
                let value: f64 = cell.parse().map_err(|_| StoreError::Parse {
                    field: "case count",
                    value: cell.to_string(),
                })?;
                acc[i] += value;
            }
        }

        Ok(IncidenceTable { dates, countries })
    }

    /// The shared date axis.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// One country's cumulative series.
    ///
    /// Errors
    /// ------
    /// - `StoreError::UnknownCountry` when the name is absent.
    /// - A `SeriesError` from the axis validation is reported as a
    ///   malformed table (gap in the date columns).
    pub fn series(&self, country: &str) -> StoreResult<TimeSeries> {
        let values = self
            .countries
            .get(country)
            .ok_or_else(|| StoreError::UnknownCountry(country.to_string()))?;
        TimeSeries::new(self.dates.clone(), values.clone()).map_err(|e| {
            StoreError::MalformedTable { reason: format!("date axis invalid: {e}") }
        })
    }

    /// Re-join space-separated tokens into known country names.
    ///
    /// Parameters
    /// ----------
    /// - `tokens`: `&[String]`
    ///   CLI tokens; a country name containing one space arrives as two
    ///   consecutive tokens.
    ///
    /// Returns
    /// -------
    /// `Vec<String>`
    ///   Tokens (or adjacent token pairs) that name a country in the
    ///   table, in input order. Unknown tokens are dropped, matching the
    ///   reference behavior.
    pub fn resolve_countries(&self, tokens: &[String]) -> Vec<String> {
        let mut resolved = Vec::new();
        let mut skip_next = false;
        for (i, token) in tokens.iter().enumerate() {
            if skip_next {
                skip_next = false;
                continue;
            }
            if self.countries.contains_key(token) {
                resolved.push(token.clone());
            } else if i + 1 < tokens.len() {
                let joined = format!("{} {}", token, tokens[i + 1]);
                if self.countries.contains_key(&joined) {
                    resolved.push(joined);
                    skip_next = true;
                }
            }
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20
,Austria,47.5,14.5,0,1,3
British Columbia,Canada,49.2,-123.1,0,2,3
Ontario,Canada,43.6,-79.3,1,1,4
,New Zealand,-40.9,174.8,0,0,1
";

    fn sample_table() -> IncidenceTable {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.csv");
        std::fs::File::create(&path).unwrap().write_all(SAMPLE.as_bytes()).unwrap();
        IncidenceTable::from_path(&path).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Provinces must be summed into their country and the date axis
    // parsed from the m/d/yy header.
    //
    // Given
    // -----
    // - A four-row sample with two Canadian provinces.
    //
    // Expect
    // ------
    // - Canada's series is the element-wise sum [1, 3, 7]; the axis starts
    //   2020-01-22 with three days.
    fn provinces_are_summed_per_country() {
        let table = sample_table();
        assert_eq!(table.dates().len(), 3);
        assert_eq!(table.dates()[0], NaiveDate::from_ymd_opt(2020, 1, 22).unwrap());

        let canada = table.series("Canada").unwrap();
        assert_eq!(canada.values().to_vec(), vec![1.0, 3.0, 7.0]);
        let austria = table.series("Austria").unwrap();
        assert_eq!(austria.values().to_vec(), vec![0.0, 1.0, 3.0]);
    }

    #[test]
    // Purpose
    // -------
    // Space-containing country names split across CLI tokens must be
    // re-joined; unknown tokens are dropped.
    //
    // Given
    // -----
    // - Tokens ["Austria", "New", "Zealand", "Atlantis"].
    //
    // Expect
    // ------
    // - ["Austria", "New Zealand"].
    fn country_tokens_are_rejoined() {
        let table = sample_table();
        let tokens: Vec<String> =
            ["Austria", "New", "Zealand", "Atlantis"].iter().map(|s| s.to_string()).collect();
        assert_eq!(table.resolve_countries(&tokens), vec!["Austria", "New Zealand"]);
    }

    #[test]
    // Purpose
    // -------
    // Requesting an absent country is an UnknownCountry error, not a
    // panic or an empty series.
    //
    // Given
    // -----
    // - The sample table and the name "Atlantis".
    //
    // Expect
    // ------
    // - StoreError::UnknownCountry("Atlantis").
    fn unknown_country_is_an_error() {
        let table = sample_table();
        match table.series("Atlantis") {
            Err(StoreError::UnknownCountry(name)) => assert_eq!(name, "Atlantis"),
            other => panic!("expected UnknownCountry, got {other:?}"),
        }
    }
}
