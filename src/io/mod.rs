//! io — persistence for kernels, incidence data, and result artifacts.
//!
//! Purpose
//! -------
//! Keep every filesystem concern of the pipeline in one subtree: the
//! two-row weight store that caches discretized kernels between runs, the
//! loader for the global cumulative case-count table, and the JSON result
//! artifact the visualization collaborator consumes.
//!
//! Key behaviors
//! -------------
//! - [`write_kernel`](weights::write_kernel) /
//!   [`read_kernel`](weights::read_kernel) round-trip kernels exactly.
//! - [`IncidenceTable`](incidence::IncidenceTable) aggregates provinces
//!   into countries and resolves space-split country tokens.
//! - [`ResultArtifact`](results::ResultArtifact) assembles and writes the
//!   complete per-country output.
//!
//! Conventions
//! -----------
//! - All entry points return [`StoreResult`](errors::StoreResult); every
//!   failure is a fatal configuration error.

pub mod errors;
pub mod incidence;
pub mod results;
pub mod weights;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{StoreError, StoreResult};
pub use self::incidence::IncidenceTable;
pub use self::results::ResultArtifact;
pub use self::weights::{read_kernel, write_kernel};
