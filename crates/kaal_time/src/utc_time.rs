//! UTC calendar date/time with sub-second precision.
//!
//! `UtcTime` is the calendar face of the Julian Dates used for every
//! period boundary. Conversions here are plain UTC ↔ JD UTC; no
//! leap-second or dynamical-time correction is applied, which matches how
//! dasha periods are tabulated.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

use crate::error::TimeError;
use crate::julian::{calendar_to_jd, jd_to_unix_seconds, unix_seconds_to_jd};
use crate::offset::TzOffset;

/// UTC calendar date with sub-second precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtcTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl UtcTime {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Midnight UTC at the start of the given date.
    pub fn date(year: i32, month: u32, day: u32) -> Self {
        Self::new(year, month, day, 0, 0, 0.0)
    }

    /// Interpret local wall-clock fields at a fixed offset and shift to UTC.
    pub fn from_local(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        offset: TzOffset,
    ) -> Result<Self, TimeError> {
        let local = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .ok_or_else(|| {
                TimeError::OutOfRange(format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}"))
            })?;
        let utc = local - chrono::Duration::minutes(offset.minutes() as i64);
        Ok(Self::from_naive(&utc))
    }

    /// The current wall-clock instant.
    pub fn now() -> Self {
        Self::from_datetime(&Utc::now())
    }

    /// Julian Date (UTC).
    pub fn to_jd(&self) -> f64 {
        let day_frac = self.day as f64
            + self.hour as f64 / 24.0
            + self.minute as f64 / 1440.0
            + self.second / 86_400.0;
        calendar_to_jd(self.year, self.month, day_frac)
    }

    /// Calendar fields for a Julian Date (UTC), rounded to the millisecond.
    pub fn from_jd(jd: f64) -> Option<Self> {
        jd_to_datetime(jd).map(|dt| Self::from_datetime(&dt))
    }

    pub fn from_naive(dt: &NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second() as f64 + dt.nanosecond() as f64 / 1e9,
        }
    }

    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        Self::from_naive(&dt.naive_utc())
    }

    /// `chrono` equivalent, or `None` if the fields do not form a real date.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let whole = self.second.floor();
        let nanos = ((self.second - whole) * 1e9).round() as u32;
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|d| d.and_hms_nano_opt(self.hour, self.minute, whole as u32, nanos.min(999_999_999)))
            .map(|naive| Utc.from_utc_datetime(&naive))
    }
}

impl std::fmt::Display for UtcTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole = self.second as u32;
        let frac = self.second - whole as f64;
        if frac.abs() < 1e-9 {
            write!(
                f,
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
                self.year, self.month, self.day, self.hour, self.minute, whole
            )
        } else {
            write!(
                f,
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:06.3}Z",
                self.year, self.month, self.day, self.hour, self.minute, self.second
            )
        }
    }
}

/// Julian Date (UTC) to a `chrono` instant, rounded to the millisecond.
pub fn jd_to_datetime(jd: f64) -> Option<DateTime<Utc>> {
    if !jd.is_finite() {
        return None;
    }
    let millis = (jd_to_unix_seconds(jd) * 1000.0).round() as i64;
    DateTime::from_timestamp_millis(millis)
}

/// `chrono` instant to Julian Date (UTC).
pub fn datetime_to_jd(dt: &DateTime<Utc>) -> f64 {
    unix_seconds_to_jd(dt.timestamp_millis() as f64 / 1000.0)
}

/// `YYYY-MM-DD` rendering of a Julian Date, for tables and summaries.
pub fn format_jd_date(jd: f64) -> String {
    match jd_to_datetime(jd) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => format!("JD {jd:.4}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_constructor() {
        let t = UtcTime::new(2024, 3, 20, 12, 30, 45.5);
        assert_eq!(t.year, 2024);
        assert_eq!(t.month, 3);
        assert_eq!(t.day, 20);
        assert_eq!(t.hour, 12);
        assert_eq!(t.minute, 30);
        assert!((t.second - 45.5).abs() < 1e-12);
    }

    #[test]
    fn display_whole_seconds() {
        let t = UtcTime::date(2024, 1, 15);
        assert_eq!(t.to_string(), "2024-01-15T00:00:00Z");
    }

    #[test]
    fn display_fractional_seconds() {
        let t = UtcTime::new(2024, 1, 15, 12, 30, 45.125);
        assert_eq!(t.to_string(), "2024-01-15T12:30:45.125Z");
    }

    #[test]
    fn jd_roundtrip_through_chrono() {
        let t = UtcTime::new(1990, 4, 16, 23, 36, 0.0);
        let back = UtcTime::from_jd(t.to_jd()).unwrap();
        assert_eq!((back.year, back.month, back.day), (1990, 4, 16));
        assert_eq!((back.hour, back.minute), (23, 36));
        assert!(back.second.abs() < 1e-3);
    }

    #[test]
    fn local_time_shifts_to_utc() {
        // 05:06 IST is 23:36 UTC on the previous day
        let offset: TzOffset = "+05:30".parse().unwrap();
        let t = UtcTime::from_local(1990, 4, 17, 5, 6, offset).unwrap();
        assert_eq!((t.year, t.month, t.day, t.hour, t.minute), (1990, 4, 16, 23, 36));
    }

    #[test]
    fn local_time_rejects_impossible_date() {
        assert!(UtcTime::from_local(2023, 2, 30, 0, 0, TzOffset::UTC).is_err());
    }

    #[test]
    fn format_date_only() {
        let jd = UtcTime::date(2000, 4, 17).to_jd();
        assert_eq!(format_jd_date(jd), "2000-04-17");
    }

    #[test]
    fn datetime_jd_agree_with_calendar() {
        let t = UtcTime::new(2024, 6, 1, 12, 0, 0.0);
        let dt = t.to_datetime().unwrap();
        assert!((datetime_to_jd(&dt) - t.to_jd()).abs() < 1e-8);
    }
}
