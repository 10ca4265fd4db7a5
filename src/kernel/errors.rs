//! kernel::errors — error types for kernel construction and validation.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by the distribution kernel
//! builder and the `Kernel` constructor. Kernel construction failures are
//! configuration errors in the sense of the pipeline's error taxonomy: they
//! are always fatal, surfaced immediately, and never retried.
//!
//! Key behaviors
//! -------------
//! - Define [`KernelResult`] and [`KernelError`] as the canonical result and
//!   error types for everything under `kernel`.
//! - Attach human-readable `Display` messages to each variant so diagnostics
//!   are meaningful without extra context.
//!
//! Conventions
//! -----------
//! - Error messages are phrased in terms of domain constraints ("weights must
//!   sum to 1", "one weight per integer day") rather than low-level details.
//! - Other subtrees define their own error enums; this module only covers
//!   kernel construction and discretization.

pub type KernelResult<T> = Result<T, KernelError>;

/// KernelError — failure conditions for kernel construction.
///
/// Variants
/// --------
/// - `InvalidDistribution(name)`
///   A distribution name outside the closed set `delta | gamma | skewnorm`
///   was requested (reachable only through string parsing; the enum itself
///   is exhaustive).
/// - `WindowMismatch { expected, actual }`
///   The weight vector length does not equal `window_right − window_left + 1`,
///   i.e. the kernel does not carry exactly one weight per integer day.
/// - `MassMismatch { mass, tol }`
///   The un-renormalized discrete mass deviates from 1 by more than the
///   distribution-specific tolerance, indicating that the window truncates
///   non-negligible probability mass.
/// - `NegativeWeight { offset, weight }`
///   A discretized weight is negative, which can only happen if the supplied
///   CDF is not monotone over the window.
///
/// Invariants
/// ----------
/// - Each variant carries just enough payload (name, lengths, mass) for
///   logging and debugging without dragging along the weight vector itself.
#[derive(Debug, Clone, PartialEq)]
pub enum KernelError {
    InvalidDistribution(String),
    WindowMismatch { expected: usize, actual: usize },
    MassMismatch { mass: f64, tol: f64 },
    NegativeWeight { offset: i64, weight: f64 },
}

impl std::error::Error for KernelError {}

impl std::fmt::Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::InvalidDistribution(name) => {
                write!(f, "unknown distribution '{name}': expected one of delta, gamma, skewnorm")
            }
            KernelError::WindowMismatch { expected, actual } => {
                write!(
                    f,
                    "kernel must carry one weight per integer day in its window: \
                     expected {expected} weights, got {actual}"
                )
            }
            KernelError::MassMismatch { mass, tol } => {
                write!(
                    f,
                    "discretized mass {mass} deviates from 1 by more than {tol}; \
                     the window truncates too much probability mass"
                )
            }
            KernelError::NegativeWeight { offset, weight } => {
                write!(f, "negative weight {weight} at day offset {offset}; CDF is not monotone")
            }
        }
    }
}
