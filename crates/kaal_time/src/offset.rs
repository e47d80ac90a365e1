//! Fixed timezone offsets in the `+HH:MM` form used by birth records.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::TimeError;

/// Largest accepted offset magnitude (UTC+14:00, Line Islands).
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// A fixed offset from UTC, in whole minutes east of Greenwich.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TzOffset {
    minutes: i32,
}

impl TzOffset {
    /// UTC itself.
    pub const UTC: Self = Self { minutes: 0 };

    /// Create from minutes east of UTC.
    pub fn from_minutes(minutes: i32) -> Result<Self, TimeError> {
        if minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(TimeError::OffsetFormat(format!("{minutes} minutes")));
        }
        Ok(Self { minutes })
    }

    /// Minutes east of UTC.
    pub const fn minutes(self) -> i32 {
        self.minutes
    }

    /// Offset as a fraction of a day, for Julian Date arithmetic.
    pub fn as_days(self) -> f64 {
        self.minutes as f64 / 1440.0
    }

    /// Equivalent `chrono` offset.
    pub fn to_fixed_offset(self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.minutes * 60)
    }
}

impl FromStr for TzOffset {
    type Err = TimeError;

    /// Accepts `+HH:MM`, `-HH:MM`, `+HHMM`, `+HH` and `Z`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.eq_ignore_ascii_case("z") || t.eq_ignore_ascii_case("utc") {
            return Ok(Self::UTC);
        }
        let err = || TimeError::OffsetFormat(s.to_string());

        let (sign, rest) = match t.as_bytes().first() {
            Some(b'+') => (1, &t[1..]),
            Some(b'-') => (-1, &t[1..]),
            _ => return Err(err()),
        };
        let (hh, mm) = match rest.split_once(':') {
            Some((h, m)) => (h, m),
            None if rest.len() == 4 => rest.split_at(2),
            None if rest.len() <= 2 => (rest, "0"),
            None => return Err(err()),
        };
        let two_digits =
            |f: &str| (1..=2).contains(&f.len()) && f.bytes().all(|b| b.is_ascii_digit());
        if !two_digits(hh) || !two_digits(mm) {
            return Err(err());
        }
        let hours: i32 = hh.parse().map_err(|_| err())?;
        let minutes: i32 = mm.parse().map_err(|_| err())?;
        if !(0..60).contains(&minutes) {
            return Err(err());
        }
        Self::from_minutes(sign * (hours * 60 + minutes)).map_err(|_| err())
    }
}

impl Display for TzOffset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.minutes < 0 { '-' } else { '+' };
        let abs = self.minutes.abs();
        write!(f, "{sign}{:02}:{:02}", abs / 60, abs % 60)
    }
}

impl TryFrom<String> for TzOffset {
    type Error = TimeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TzOffset> for String {
    fn from(tz: TzOffset) -> Self {
        tz.to_string()
    }
}
