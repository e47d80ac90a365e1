//! Error types for calendar parsing and time conversion.

use thiserror::Error;

/// Errors from date/time parsing or conversion.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TimeError {
    /// Date string matched none of the accepted layouts.
    #[error("unrecognised date '{0}' (expected YYYY-MM-DD, DD/MM/YYYY or ISO-8601)")]
    DateFormat(String),
    /// Clock time was not `HH:MM` or `HH:MM:SS`.
    #[error("invalid time '{0}' (expected HH:MM)")]
    TimeFormat(String),
    /// Timezone offset was not `+HH:MM` / `-HH:MM`.
    #[error("invalid timezone offset '{0}' (expected +HH:MM or -HH:MM)")]
    OffsetFormat(String),
    /// Calendar fields describe no real date (e.g. 31 February).
    #[error("calendar date out of range: {0}")]
    OutOfRange(String),
}
