//! io::errors — error types for the weight store, incidence loader, and
//! result writer.
//!
//! Purpose
//! -------
//! Wrap filesystem, CSV, and parse failures together with shape violations
//! of the stored formats into one enum, so every I/O entry point returns a
//! single fatal error type. Everything here is a configuration error in the
//! pipeline taxonomy; nothing is retried.

use crate::kernel::KernelError;

pub type StoreResult<T> = Result<T, StoreError>;

/// StoreError — failure conditions of the persistence layer.
///
/// Variants
/// --------
/// - `Io(..)` / `Csv(..)`
///   Underlying filesystem or CSV-format failure, preserved as source.
/// - `Parse { field, value }`
///   A cell that should hold a number or date failed to parse.
/// - `MalformedTable { reason }`
///   The stored table violates its two-row (weights) or header-plus-rows
///   (incidence) shape.
/// - `Kernel(..)`
///   A loaded weight table violates the kernel invariant (window/weight
///   length, negative weight); carries the kernel error.
/// - `UnknownCountry(name)`
///   The requested country is absent from the incidence table.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Csv(csv::Error),
    Parse { field: &'static str, value: String },
    MalformedTable { reason: String },
    Kernel(KernelError),
    UnknownCountry(String),
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Csv(e) => Some(e),
            StoreError::Kernel(e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O failure: {e}"),
            StoreError::Csv(e) => write!(f, "CSV failure: {e}"),
            StoreError::Parse { field, value } => {
                write!(f, "could not parse {field} from '{value}'")
            }
            StoreError::MalformedTable { reason } => write!(f, "malformed table: {reason}"),
            StoreError::Kernel(e) => write!(f, "stored weights violate kernel invariant: {e}"),
            StoreError::UnknownCountry(name) => {
                write!(f, "country '{name}' not present in the incidence table")
            }
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<csv::Error> for StoreError {
    fn from(e: csv::Error) -> Self {
        StoreError::Csv(e)
    }
}

impl From<KernelError> for StoreError {
    fn from(e: KernelError) -> Self {
        StoreError::Kernel(e)
    }
}
