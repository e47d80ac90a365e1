//! Error types for Vedic calculations.

use thiserror::Error;

/// Errors from dasha generation, validation and name parsing.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum VedicError {
    /// Invalid argument to a generation routine.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// A period tree violates the contiguity/coverage preconditions.
    #[error("malformed dasha periods: {0}")]
    MalformedPeriods(String),
    /// Graha name matched neither the English nor the Sanskrit spelling.
    #[error("unknown graha: {0}")]
    UnknownGraha(String),
}
