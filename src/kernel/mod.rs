//! kernel — discretized convolution kernels from parametric distributions.
//!
//! Purpose
//! -------
//! Collect everything needed to turn a named continuous distribution into a
//! finite, normalized, integer-day weight kernel: the closed distribution
//! variant set, the CDF-difference discretization, the skew-normal CDF
//! helper, and the kernel-specific error types.
//!
//! Key behaviors
//! -------------
//! - [`Kernel::build`](builder::Kernel::build) constructs forward and
//!   inverse kernels with exact window/weight alignment.
//! - [`skewnorm_cdf`](skewnorm::skewnorm_cdf) supplies the one CDF the
//!   distribution crate does not provide.
//! - [`KernelError`](errors::KernelError) surfaces every construction
//!   failure as a fatal configuration error.
//!
//! Downstream usage
//! ----------------
//! - `series::transform` consumes [`Kernel`](builder::Kernel) values to
//!   derive potential and activity series.
//! - `io::weights` persists and reloads kernels as two-row delimited tables.

pub mod builder;
pub mod errors;
pub mod skewnorm;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::builder::{Direction, DistributionKind, Kernel};
pub use self::errors::{KernelError, KernelResult};
