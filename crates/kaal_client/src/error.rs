//! Error types for backend access and profile handling.

use kaal_time::TimeError;
use kaal_vedic_base::VedicError;
use thiserror::Error;

/// Errors from the chart backend client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Connection, timeout or TLS failure below HTTP.
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// The backend answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Request body could not be serialised.
    #[error("could not encode {endpoint} request: {source}")]
    Encode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// Response body did not match the expected shape.
    #[error("could not decode {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// Backend dasha table could not be turned into periods.
    #[error("malformed dasha response: {0}")]
    MalformedDasha(String),
    /// Birth details rejected before sending.
    #[error("invalid birth details: {0}")]
    InvalidBirthDetails(String),
    /// The chart carried no Moon, so no dasha can be derived.
    #[error("chart response has no Moon position")]
    MissingMoon,
    /// A section was skipped because the one it depends on failed.
    #[error("skipped: {0} unavailable")]
    Skipped(&'static str),
    #[error("profile store {path}: {source}")]
    ProfileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("profile store {path}: {source}")]
    ProfileFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Time(#[from] TimeError),
    #[error(transparent)]
    Vedic(#[from] VedicError),
}
