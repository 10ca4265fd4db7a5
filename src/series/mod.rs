//! series — daily time-series containers and kernel transforms.
//!
//! Purpose
//! -------
//! Hold the validated [`TimeSeries`](time_series::TimeSeries) container and
//! the windowed-convolution transform that derives infection potential and
//! infection activity from raw incidence.
//!
//! Key behaviors
//! -------------
//! - [`TimeSeries::new`](time_series::TimeSeries::new) validates the gapless
//!   daily axis once; downstream stages rely on it.
//! - [`apply_kernel`](transform::apply_kernel) performs the same-length
//!   windowed convolution with the degenerate-window zero policy.
//!
//! Downstream usage
//! ----------------
//! - The dispersion estimator consumes date-aligned potential and activity
//!   arrays produced here.

pub mod errors;
pub mod time_series;
pub mod transform;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{SeriesError, SeriesResult};
pub use self::time_series::TimeSeries;
pub use self::transform::apply_kernel;
