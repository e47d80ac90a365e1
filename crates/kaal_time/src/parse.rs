//! Parsing of the date and clock strings exchanged with the chart backend.
//!
//! Birth records carry `DD/MM/YYYY` + `HH:MM`; period tables carry ISO
//! dates (`YYYY-MM-DD`) or full ISO-8601 date-times. All results are UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::TimeError;
use crate::utc_time::UtcTime;

const DATE_LAYOUTS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

const DATETIME_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a calendar date in any accepted layout (midnight UTC).
pub fn parse_date(s: &str) -> Result<NaiveDate, TimeError> {
    let t = s.trim();
    DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(t, layout).ok())
        .ok_or_else(|| TimeError::DateFormat(s.to_string()))
}

/// Parse `HH:MM` or `HH:MM:SS` (24-hour clock).
pub fn parse_clock(s: &str) -> Result<NaiveTime, TimeError> {
    let t = s.trim();
    NaiveTime::parse_from_str(t, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M:%S"))
        .map_err(|_| TimeError::TimeFormat(s.to_string()))
}

/// Parse a date or date-time into UTC.
///
/// Offsets (`Z`, `+05:30`) are honoured; naive date-times and bare dates
/// are taken as UTC.
pub fn parse_utc(s: &str) -> Result<UtcTime, TimeError> {
    let t = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Ok(UtcTime::from_naive(&dt.naive_utc()));
    }
    if let Some(naive) = DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(t, layout).ok())
    {
        return Ok(UtcTime::from_naive(&naive));
    }
    let date = parse_date(t)?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| TimeError::OutOfRange(s.to_string()))?;
    Ok(UtcTime::from_naive(&midnight))
}

/// Parse a date or date-time straight to Julian Date (UTC).
pub fn parse_jd(s: &str) -> Result<f64, TimeError> {
    parse_utc(s).map(|t| t.to_jd())
}
