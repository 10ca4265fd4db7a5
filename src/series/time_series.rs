//! series::time_series — validated daily time-series container.
//!
//! Purpose
//! -------
//! Pair a strictly increasing, gapless daily date axis with a value vector of
//! equal length, validated once at construction so downstream stages can rely
//! on the alignment without re-checking it.
//!
//! Key behaviors
//! -------------
//! - [`TimeSeries::new`] enforces equal lengths and a one-day stride between
//!   consecutive dates.
//! - [`TimeSeries::daily_from_cumulative`] converts a cumulative case-count
//!   series into daily increments (first differences, first sample kept
//!   as-is), matching the reference preprocessing of cumulative incidence
//!   exports.
//!
//! Invariants & assumptions
//! ------------------------
//! - Once constructed, a `TimeSeries` is never mutated; pipeline stages
//!   produce new series instead.
//! - Values are finite `f64`; counts may be fractional after convolution.

use chrono::NaiveDate;
use ndarray::Array1;

use crate::series::errors::{SeriesError, SeriesResult};

/// TimeSeries — a gapless daily date axis paired with values.
///
/// Fields
/// ------
/// - `dates`: `Vec<NaiveDate>`
///   Strictly increasing, consecutive daily dates.
/// - `values`: `Array1<f64>`
///   One value per date.
///
/// Invariants
/// ----------
/// - `dates.len() == values.len() ≥ 1` and
///   `dates[i + 1] == dates[i] + 1 day` for every i, both checked by
///   [`TimeSeries::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    dates: Vec<NaiveDate>,
    values: Array1<f64>,
}

impl TimeSeries {
    /// Construct a validated daily time series.
    ///
    /// Parameters
    /// ----------
    /// - `dates`: `Vec<NaiveDate>`
    ///   Daily date axis; must be non-empty and increase by exactly one day
    ///   per step.
    /// - `values`: `Array1<f64>`
    ///   Value vector of the same length.
    ///
    /// Returns
    /// -------
    /// `SeriesResult<TimeSeries>`
    ///   `Ok` when the invariants hold, otherwise the violated-constraint
    ///   [`SeriesError`].
    ///
    /// Errors
    /// ------
    /// - `SeriesError::Empty` when `dates` is empty.
    /// - `SeriesError::LengthMismatch` when the lengths differ.
    /// - `SeriesError::NonMonotonicDates` at the first index whose date does
    ///   not follow its predecessor by one day.
    pub fn new(dates: Vec<NaiveDate>, values: Array1<f64>) -> SeriesResult<Self> {
        if dates.is_empty() {
            return Err(SeriesError::Empty);
        }
        if dates.len() != values.len() {
            return Err(SeriesError::LengthMismatch { dates: dates.len(), values: values.len() });
        }
        for (i, pair) in dates.windows(2).enumerate() {
            if pair[1] != pair[0] + chrono::Duration::days(1) {
                return Err(SeriesError::NonMonotonicDates { index: i + 1 });
            }
        }
        Ok(TimeSeries { dates, values })
    }

    /// Replace the values while keeping the validated date axis.
    ///
    /// Parameters
    /// ----------
    /// - `values`: `Array1<f64>`
    ///   New value vector; must match the existing length.
    ///
    /// Returns
    /// -------
    /// `SeriesResult<TimeSeries>`
    ///   A new series over the same dates.
    ///
    /// Errors
    /// ------
    /// - `SeriesError::LengthMismatch` when the lengths differ.
    pub fn with_values(&self, values: Array1<f64>) -> SeriesResult<Self> {
        if values.len() != self.dates.len() {
            return Err(SeriesError::LengthMismatch {
                dates: self.dates.len(),
                values: values.len(),
            });
        }
        Ok(TimeSeries { dates: self.dates.clone(), values })
    }

    /// Daily increments of a cumulative series over the same dates.
    ///
    /// Returns
    /// -------
    /// `TimeSeries`
    ///   `out[0] = values[0]`, `out[t] = values[t] − values[t − 1]` for
    ///   t ≥ 1. Length and dates are unchanged.
    ///
    /// Notes
    /// -----
    /// - Equivalent to the reference preprocessing
    ///   `convolve(x, [1, −1], "same")` applied to cumulative case counts.
    pub fn daily_from_cumulative(&self) -> Self {
        let n = self.values.len();
        let mut out = Array1::zeros(n);
        out[0] = self.values[0];
        for t in 1..n {
            out[t] = self.values[t] - self.values[t - 1];
        }
        TimeSeries { dates: self.dates.clone(), values: out }
    }

    /// The date axis.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// The value vector.
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Number of daily samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a constructed series; kept for idiomatic pairing
    /// with [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn days(start: (i32, u32, u32), n: usize) -> Vec<NaiveDate> {
        let first = NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap();
        (0..n).map(|i| first + chrono::Duration::days(i as i64)).collect()
    }

    #[test]
    // Purpose
    // -------
    // Verify construction succeeds on a valid daily axis and rejects
    // length mismatches, gaps, and empty input.
    //
    // Given
    // -----
    // - A five-day axis starting 2020-03-01 and matching values.
    // - Variants with a missing day, a short value vector, and no samples.
    //
    // Expect
    // ------
    // - Ok for the valid input; the specific SeriesError for each variant.
    fn construction_validates_axis_and_lengths() {
        let dates = days((2020, 3, 1), 5);
        let values = Array1::from(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(TimeSeries::new(dates.clone(), values.clone()).is_ok());

        let short = Array1::from(vec![1.0, 2.0]);
        match TimeSeries::new(dates.clone(), short) {
            Err(SeriesError::LengthMismatch { dates: 5, values: 2 }) => {}
            other => panic!("expected LengthMismatch, got {other:?}"),
        }

        let mut gapped = dates.clone();
        gapped[3] = gapped[3] + chrono::Duration::days(1);
        match TimeSeries::new(gapped, values.clone()) {
            Err(SeriesError::NonMonotonicDates { index: 3 }) => {}
            other => panic!("expected NonMonotonicDates at 3, got {other:?}"),
        }

        match TimeSeries::new(Vec::new(), Array1::from(Vec::<f64>::new())) {
            Err(SeriesError::Empty) => {}
            other => panic!("expected Empty, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Check the cumulative-to-daily differencing keeps the first sample
    // and produces first differences thereafter.
    //
    // Given
    // -----
    // - A cumulative series [3, 5, 5, 9].
    //
    // Expect
    // ------
    // - Daily increments [3, 2, 0, 4] on the same dates.
    fn daily_from_cumulative_is_first_difference() {
        let series = TimeSeries::new(
            days((2020, 3, 1), 4),
            Array1::from(vec![3.0, 5.0, 5.0, 9.0]),
        )
        .unwrap();
        let daily = series.daily_from_cumulative();
        assert_eq!(daily.values().to_vec(), vec![3.0, 2.0, 0.0, 4.0]);
        assert_eq!(daily.dates(), series.dates());
    }
}
