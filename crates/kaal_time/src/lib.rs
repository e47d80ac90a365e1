//! Calendar and Julian Date handling for dasha timelines.
//!
//! This crate provides:
//! - Julian Date ↔ Gregorian calendar conversions
//! - `UtcTime`, the calendar face of a JD UTC instant
//! - Fixed `+HH:MM` timezone offsets as carried by birth records
//! - Parsing of the date layouts exchanged with the chart backend

pub mod error;
pub mod julian;
pub mod offset;
pub mod parse;
pub mod utc_time;

pub use error::TimeError;
pub use julian::{
    J2000_JD, SECONDS_PER_DAY, UNIX_EPOCH_JD, calendar_to_jd, jd_to_calendar, jd_to_unix_seconds,
    unix_seconds_to_jd,
};
pub use offset::TzOffset;
pub use parse::{parse_clock, parse_date, parse_jd, parse_utc};
pub use utc_time::{UtcTime, datetime_to_jd, format_jd_date, jd_to_datetime};
