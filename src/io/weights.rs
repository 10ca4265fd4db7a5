//! io::weights — the two-row delimited weight store.
//!
//! Purpose
//! -------
//! Persist and reload a discretized kernel as a simple two-row table: a
//! header row of integer day offsets from `window_left` to `window_right`
//! inclusive, and a row of the matching floating-point weights. Forward and
//! inverse kernels live in separate files. The store is a cache boundary:
//! kernels are built once, written, and reloaded by later runs without
//! re-discretizing.
//!
//! Key behaviors
//! -------------
//! - [`write_kernel`] emits the offsets and weights with full float
//!   round-trip precision.
//! - [`read_kernel`] recovers the window bounds from the minimum and
//!   maximum of the offset row and re-validates the kernel invariant
//!   before handing back a [`Kernel`], so a hand-edited file cannot smuggle
//!   a misaligned kernel into the pipeline.
//!
//! Invariants & assumptions
//! ------------------------
//! - A write-then-read round trip reproduces `(window_left, window_right,
//!   weights)` exactly.
//! - The offset row must be the contiguous integer range implied by its
//!   extremes; holes or duplicates are malformed-table errors.

use std::path::Path;

use ndarray::Array1;

use crate::io::errors::{StoreError, StoreResult};
use crate::kernel::Kernel;

/// Write a kernel to a two-row delimited table at `path`.
///
/// Parameters
/// ----------
/// - `path`: `&Path`
///   Destination file; created or truncated.
/// - `kernel`: `&Kernel`
///   The kernel to persist.
///
/// Returns
/// -------
/// `StoreResult<()>`
///
/// Errors
/// ------
/// - `StoreError::Io` / `StoreError::Csv` on filesystem or encoding
///   failure.
pub fn write_kernel(path: &Path, kernel: &Kernel) -> StoreResult<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;

    let offsets: Vec<String> =
        (kernel.window_left()..=kernel.window_right()).map(|d| d.to_string()).collect();
    // Ryu formatting via `{}` preserves f64 round-trip exactness.
    let weights: Vec<String> = kernel.weights().iter().map(|w| format!("{w}")).collect();

    writer.write_record(&offsets)?;
    writer.write_record(&weights)?;
    writer.flush().map_err(StoreError::Io)?;
    Ok(())
}

/// Read a kernel back from a two-row delimited table.
///
/// Parameters
/// ----------
/// - `path`: `&Path`
///   Source file produced by [`write_kernel`] (or by hand, in which case
///   the shape checks below apply).
///
/// Returns
/// -------
/// `StoreResult<Kernel>`
///   The reconstructed kernel; window bounds are the extremes of the
///   offset row.
///
/// Errors
/// ------
/// - `StoreError::MalformedTable` when the file does not hold exactly two
///   rows, the rows differ in length, or the offsets are not the
///   contiguous range between their extremes.
/// - `StoreError::Parse` on a non-numeric cell.
/// - `StoreError::Kernel` when the reconstructed pair violates the kernel
///   invariant.
pub fn read_kernel(path: &Path) -> StoreResult<Kernel> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    if rows.len() != 2 {
        return Err(StoreError::MalformedTable {
            reason: format!("expected exactly 2 rows (offsets, weights), found {}", rows.len()),
        });
    }
    let (offset_row, weight_row) = (&rows[0], &rows[1]);
    if offset_row.len() != weight_row.len() {
        return Err(StoreError::MalformedTable {
            reason: format!(
                "offset row has {} entries but weight row has {}",
                offset_row.len(),
                weight_row.len()
            ),
        });
    }

    let offsets: Vec<i64> = offset_row
        .iter()
        .map(|s| {
            // The builder writes integers, but tolerate float-formatted
            // offsets ("-70.0") the way the reference loader did.
            s.parse::<i64>().or_else(|_| s.parse::<f64>().map(|f| f as i64)).map_err(|_| {
                StoreError::Parse { field: "day offset", value: s.clone() }
            })
        })
        .collect::<StoreResult<_>>()?;
    let weights: Vec<f64> = weight_row
        .iter()
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| StoreError::Parse { field: "weight", value: s.clone() })
        })
        .collect::<StoreResult<_>>()?;

    let window_left = *offsets.iter().min().expect("two-row table is non-empty");
    let window_right = *offsets.iter().max().expect("two-row table is non-empty");
    let expected: Vec<i64> = (window_left..=window_right).collect();
    if offsets != expected {
        return Err(StoreError::MalformedTable {
            reason: "offset row is not a contiguous ascending integer range".to_string(),
        });
    }

    Ok(Kernel::new(window_left, window_right, Array1::from(weights))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KernelConfig;
    use crate::kernel::{Direction, DistributionKind};
    use std::io::Write;

    #[test]
    // Purpose
    // -------
    // A write-then-read round trip must reproduce the kernel exactly:
    // window bounds and every weight bit-for-bit.
    //
    // Given
    // -----
    // - The gamma inverse kernel (asymmetric window, 71 weights) written
    //   to a temporary file.
    //
    // Expect
    // ------
    // - read_kernel returns a kernel equal to the original.
    fn round_trip_is_exact() {
        let kernel = Kernel::build(
            DistributionKind::Gamma,
            Direction::Inverse,
            &KernelConfig::default(),
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inv_weights.csv");

        write_kernel(&path, &kernel).unwrap();
        let reloaded = read_kernel(&path).unwrap();
        assert_eq!(reloaded, kernel);
    }

    #[test]
    // Purpose
    // -------
    // Malformed tables are rejected with MalformedTable: wrong row count,
    // ragged rows, and non-contiguous offsets.
    //
    // Given
    // -----
    // - Hand-written files violating each shape rule.
    //
    // Expect
    // ------
    // - StoreError::MalformedTable for each.
    fn malformed_tables_are_rejected() {
        let dir = tempfile::tempdir().unwrap();

        let one_row = dir.path().join("one_row.csv");
        std::fs::File::create(&one_row).unwrap().write_all(b"0,1,2\n").unwrap();
        assert!(matches!(read_kernel(&one_row), Err(StoreError::MalformedTable { .. })));

        let ragged = dir.path().join("ragged.csv");
        std::fs::File::create(&ragged).unwrap().write_all(b"0,1,2\n0.5,0.5\n").unwrap();
        assert!(matches!(read_kernel(&ragged), Err(StoreError::MalformedTable { .. })));

        let holes = dir.path().join("holes.csv");
        std::fs::File::create(&holes).unwrap().write_all(b"0,2,3\n0.2,0.3,0.5\n").unwrap();
        assert!(matches!(read_kernel(&holes), Err(StoreError::MalformedTable { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Float-formatted offsets (as the reference writer produced) still
    // load, and non-numeric cells surface Parse errors.
    //
    // Given
    // -----
    // - A file with offsets "-1.0,0.0,1.0" and one with a textual weight.
    //
    // Expect
    // ------
    // - The former loads with window [−1, 1]; the latter is a Parse error.
    fn float_offsets_load_and_text_weights_fail() {
        let dir = tempfile::tempdir().unwrap();

        let floats = dir.path().join("floats.csv");
        std::fs::File::create(&floats)
            .unwrap()
            .write_all(b"-1.0,0.0,1.0\n0.25,0.5,0.25\n")
            .unwrap();
        let kernel = read_kernel(&floats).unwrap();
        assert_eq!(kernel.window_left(), -1);
        assert_eq!(kernel.window_right(), 1);

        let text = dir.path().join("text.csv");
        std::fs::File::create(&text).unwrap().write_all(b"0,1\n0.5,half\n").unwrap();
        assert!(matches!(read_kernel(&text), Err(StoreError::Parse { field: "weight", .. })));
    }
}
