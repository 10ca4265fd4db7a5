//! series::transform — windowed convolution of a raw series with a kernel.
//!
//! Purpose
//! -------
//! Apply a discretized kernel to a raw incidence series to derive the
//! infection-potential (inverse kernel) or infection-activity (forward
//! kernel) series. The output has the same length as the input; samples the
//! window pushes past either series edge contribute zero.
//!
//! Key behaviors
//! -------------
//! - [`apply_kernel`] computes
//!   `out[t] = Σ_i weights[i] · x[t + window_left + i]`,
//!   which is exactly the same-length slice
//!   `conv(x, flip(w), "full")[window_right .. window_right + n]` of the
//!   full linear convolution.
//! - For a degenerate single-day window, output samples whose raw input was
//!   exactly zero are forced to zero, so convolution bookkeeping cannot
//!   manufacture spurious potential on zero-incidence days. Non-degenerate
//!   windows leave zero-crossings to the convolution itself.
//!
//! Invariants & assumptions
//! ------------------------
//! - The kernel invariant `weights.len() == window_right − window_left + 1`
//!   is established by [`Kernel`](crate::kernel::Kernel) construction and
//!   holds for every value reaching this module; the weight-store read path
//!   re-validates it before a `Kernel` exists.

use ndarray::Array1;

use crate::kernel::Kernel;
use crate::series::errors::SeriesResult;

/// Convolve a raw series with a kernel, same-length output.
///
/// Parameters
/// ----------
/// - `raw`: `&Array1<f64>`
///   Input series of daily values.
/// - `kernel`: `&Kernel`
///   Discretized kernel with window bounds; `weights[i]` weights the input
///   at day offset `window_left + i` from the output sample.
///
/// Returns
/// -------
/// `SeriesResult<Array1<f64>>`
///   Derived series with `out.len() == raw.len()`. Out-of-range input
///   indices contribute zero. For a single-day window, `out[t]` is forced
///   to 0 wherever `raw[t] == 0.0`.
///
/// Errors
/// ------
/// - None at present: the window/weight length invariant is carried by the
///   `Kernel` type itself. The `Result` return keeps the signature stable
///   should transform-specific failures appear.
pub fn apply_kernel(raw: &Array1<f64>, kernel: &Kernel) -> SeriesResult<Array1<f64>> {
    let n = raw.len() as i64;
    let weights = kernel.weights();
    let left = kernel.window_left();

    let mut out = Array1::zeros(raw.len());
    for t in 0..n {
        let mut acc = 0.0;
        for (i, &w) in weights.iter().enumerate() {
            let src = t + left + i as i64;
            if (0..n).contains(&src) {
                acc += w * raw[src as usize];
            }
        }
        out[t as usize] = acc;
    }

    if kernel.is_degenerate() {
        for t in 0..raw.len() {
            if raw[t] == 0.0 {
                out[t] = 0.0;
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KernelConfig;
    use crate::kernel::{Direction, DistributionKind, Kernel};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Same-length output for valid kernel/series pairs.
    // - Exact index alignment for asymmetric windows against hand-computed
    //   convolutions.
    // - Identity behavior of the delta kernel.
    // - The degenerate-window zero-forcing policy.
    //
    // They intentionally DO NOT cover:
    // - Kernel construction errors (covered in `kernel::builder`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check that output length equals input length for degenerate,
    // one-sided, and straddling windows.
    //
    // Given
    // -----
    // - A seven-sample input and kernels with windows [0,0], [0,2], and
    //   [−1,1].
    //
    // Expect
    // ------
    // - out.len() == 7 in every case.
    fn output_length_equals_input_length() {
        let raw = Array1::from(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let kernels = [
            Kernel::new(0, 0, Array1::from(vec![1.0])).unwrap(),
            Kernel::new(0, 2, Array1::from(vec![0.5, 0.3, 0.2])).unwrap(),
            Kernel::new(-1, 1, Array1::from(vec![0.25, 0.5, 0.25])).unwrap(),
        ];
        for kernel in &kernels {
            let out = apply_kernel(&raw, kernel).unwrap();
            assert_eq!(out.len(), raw.len());
        }
    }

    #[test]
    // Purpose
    // -------
    // Pin the index alignment of an asymmetric forward window against a
    // hand-computed convolution, including the zero-padded edges.
    //
    // Given
    // -----
    // - raw = [1, 0, 0, 0, 0] and a kernel with window [0, 2] and weights
    //   [0.5, 0.3, 0.2], so out[t] = 0.5·x[t] + 0.3·x[t+1] + 0.2·x[t+2].
    //
    // Expect
    // ------
    // - out == [0.5, 0, 0, 0, 0]: the unit impulse at t = 0 is only seen
    //   from t = 0 looking forward... and for the anticausal mirror
    //   window [−2, 0] the impulse smears onto t = 0, 1, 2 instead.
    fn asymmetric_window_alignment_matches_hand_computation() {
        let raw = Array1::from(vec![1.0, 0.0, 0.0, 0.0, 0.0]);

        let forward = Kernel::new(0, 2, Array1::from(vec![0.5, 0.3, 0.2])).unwrap();
        let out = apply_kernel(&raw, &forward).unwrap();
        assert_eq!(out.to_vec(), vec![0.5, 0.0, 0.0, 0.0, 0.0]);

        let inverse = Kernel::new(-2, 0, Array1::from(vec![0.2, 0.3, 0.5])).unwrap();
        let out = apply_kernel(&raw, &inverse).unwrap();
        assert_eq!(out.to_vec(), vec![0.5, 0.3, 0.2, 0.0, 0.0]);
    }

    #[test]
    // Purpose
    // -------
    // Verify the delta kernel reproduces the input exactly.
    //
    // Given
    // -----
    // - An arbitrary series and the built point-mass kernel.
    //
    // Expect
    // ------
    // - Output identical to the input.
    fn delta_kernel_is_identity() {
        let raw = Array1::from(vec![0.0, 3.0, 1.5, 0.0, 7.0]);
        let kernel =
            Kernel::build(DistributionKind::Delta, Direction::Forward, &KernelConfig::default())
                .unwrap();
        let out = apply_kernel(&raw, &kernel).unwrap();
        assert_eq!(out, raw);
    }

    #[test]
    // Purpose
    // -------
    // Check the degenerate-window policy: with a single-day window at a
    // non-zero offset, output samples whose raw input was exactly zero
    // are forced to zero, while non-degenerate windows are left alone.
    //
    // Given
    // -----
    // - raw = [0, 2, 0, 4] with a [1, 1] single-day shift kernel, and the
    //   same raw with a two-day window.
    //
    // Expect
    // ------
    // - Degenerate: shifted values appear only where raw was non-zero.
    // - Non-degenerate: smoothing across zeros survives.
    fn degenerate_window_forces_zero_where_input_is_zero() {
        let raw = Array1::from(vec![0.0, 2.0, 0.0, 4.0]);

        // Shift by one day: out[t] = x[t + 1] before the zero fix.
        let shift = Kernel::new(1, 1, Array1::from(vec![1.0])).unwrap();
        let out = apply_kernel(&raw, &shift).unwrap();
        // raw[0] == 0 and raw[2] == 0 force those samples to zero.
        assert_eq!(out.to_vec(), vec![0.0, 0.0, 0.0, 0.0]);

        let smooth = Kernel::new(0, 1, Array1::from(vec![0.5, 0.5])).unwrap();
        let out = apply_kernel(&raw, &smooth).unwrap();
        assert_eq!(out.to_vec(), vec![1.0, 1.0, 2.0, 2.0]);
    }
}
