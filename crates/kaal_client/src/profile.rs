//! Birth-data profiles and their on-disk store.
//!
//! A [`ChartProfile`] is what the user works with; [`BirthDetails`] is the
//! payload shape the backend validates. Saved-chart records from the
//! backend use different field names, which [`ChartProfile::from_saved_chart`]
//! folds into one shape.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Timelike};
use kaal_time::{TzOffset, UtcTime, parse_clock, parse_date};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::ClientError;

pub const ENV_PROFILE: &str = "KAAL_PROFILE";
pub const DEFAULT_PROFILE_FILE: &str = "kaal_profile.json";

/// Birth payload accepted by every chart endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `DD/MM/YYYY`
    pub date: String,
    /// `HH:MM` (24h)
    pub time: String,
    /// `+HH:MM` / `-HH:MM`
    pub timezone: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl BirthDetails {
    /// Apply the backend's field validators locally.
    pub fn validate(&self) -> Result<(), ClientError> {
        let invalid = |msg: String| Err(ClientError::InvalidBirthDetails(msg));

        if chrono::NaiveDate::parse_from_str(self.date.trim(), "%d/%m/%Y").is_err() {
            return invalid(format!("date {:?} is not DD/MM/YYYY", self.date));
        }
        if parse_clock(&self.time).is_err() {
            return invalid(format!("time {:?} is not HH:MM", self.time));
        }
        if !is_numeric_offset(&self.timezone) {
            return invalid(format!("timezone {:?} is not +HH:MM or -HH:MM", self.timezone));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return invalid(format!("latitude {} outside -90..90", self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return invalid(format!("longitude {} outside -180..180", self.longitude));
        }
        Ok(())
    }
}

/// `±HH` or `±HH:MM` / `±HHMM`, at most 14 hours.
fn is_numeric_offset(s: &str) -> bool {
    let t = s.trim();
    let digits: String = t.chars().skip(1).filter(|c| *c != ':').collect();
    matches!(t.chars().next(), Some('+' | '-'))
        && matches!(digits.len(), 2 | 4)
        && digits.bytes().all(|b| b.is_ascii_digit())
        && t.parse::<TzOffset>().is_ok()
}

/// The active birth chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartProfile {
    pub name: String,
    /// `DD/MM/YYYY` or `YYYY-MM-DD`.
    pub date: String,
    pub time: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
}

impl Default for ChartProfile {
    fn default() -> Self {
        Self {
            name: "Default Chart".to_string(),
            date: "17/04/1990".to_string(),
            time: "05:06".to_string(),
            location: "Bengaluru, Karnataka".to_string(),
            latitude: 12.9716,
            longitude: 77.5946,
            timezone: "+05:30".to_string(),
        }
    }
}

impl ChartProfile {
    /// Normalise a saved-chart record.
    ///
    /// Accepts both the backend's stored form (`first_name`/`last_name`,
    /// `date_str`, `time_str`, `location_name`, `timezone_str`) and the
    /// plain profile field names.
    pub fn from_saved_chart(chart: &Value) -> Result<Self, ClientError> {
        let text = |keys: &[&str]| -> Option<String> {
            keys.iter()
                .filter_map(|k| chart.get(*k).and_then(Value::as_str))
                .map(str::trim)
                .find(|s| !s.is_empty())
                .map(str::to_string)
        };
        let number = |key: &str| -> Result<f64, ClientError> {
            chart.get(key).and_then(Value::as_f64).ok_or_else(|| {
                ClientError::InvalidBirthDetails(format!("saved chart has no numeric {key}"))
            })
        };
        let required = |keys: &[&str]| -> Result<String, ClientError> {
            text(keys).ok_or_else(|| {
                ClientError::InvalidBirthDetails(format!("saved chart has no {}", keys.join("/")))
            })
        };

        let name = match text(&["first_name"]) {
            Some(first) => match text(&["last_name"]) {
                Some(last) => format!("{first} {last}"),
                None => first,
            },
            None => text(&["name"]).unwrap_or_else(|| "My Chart".to_string()),
        };

        Ok(Self {
            name,
            date: required(&["date_str", "date"])?,
            time: required(&["time_str", "time"])?,
            location: text(&["location_name", "location"])
                .unwrap_or_else(|| "Saved Location".to_string()),
            latitude: number("latitude")?,
            longitude: number("longitude")?,
            timezone: required(&["timezone_str", "timezone"])?,
        })
    }

    /// Backend payload, with the date rewritten to `DD/MM/YYYY`.
    pub fn to_birth_details(&self) -> Result<BirthDetails, ClientError> {
        let date = parse_date(&self.date)?;
        let details = BirthDetails {
            name: Some(self.name.clone()),
            date: format!("{:02}/{:02}/{:04}", date.day(), date.month(), date.year()),
            time: self.time.trim().to_string(),
            timezone: self.timezone.trim().to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
        };
        details.validate()?;
        Ok(details)
    }

    pub fn offset(&self) -> Result<TzOffset, ClientError> {
        Ok(self.timezone.parse::<TzOffset>()?)
    }

    /// Birth instant in UTC.
    pub fn birth_utc(&self) -> Result<UtcTime, ClientError> {
        let date = parse_date(&self.date)?;
        let clock = parse_clock(&self.time)?;
        let utc = UtcTime::from_local(
            date.year(),
            date.month(),
            date.day(),
            clock.hour(),
            clock.minute(),
            self.offset()?,
        )?;
        Ok(utc)
    }

    pub fn birth_jd(&self) -> Result<f64, ClientError> {
        Ok(self.birth_utc()?.to_jd())
    }
}

/// JSON file holding the active profile.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `explicit`, else `$KAAL_PROFILE`, else `./kaal_profile.json`.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(ENV_PROFILE).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROFILE_FILE));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored profile, or `None` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<ChartProfile>, ClientError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };
        let value: Value = serde_json::from_str(&raw).map_err(|source| self.format_error(source))?;
        ChartProfile::from_saved_chart(&value).map(Some)
    }

    /// Stored profile, falling back to the default on any problem.
    pub fn load_or_default(&self) -> ChartProfile {
        match self.load() {
            Ok(Some(profile)) => profile,
            Ok(None) => ChartProfile::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "using default profile");
                ChartProfile::default()
            }
        }
    }

    pub fn save(&self, profile: &ChartProfile) -> Result<(), ClientError> {
        let json =
            serde_json::to_string_pretty(profile).map_err(|source| self.format_error(source))?;
        std::fs::write(&self.path, json).map_err(|source| self.io_error(source))
    }

    /// Normalise a saved-chart JSON file and make it the active profile.
    ///
    /// A record that fails birth-detail validation is rejected and nothing is saved.
    pub fn import(&self, source_path: &Path) -> Result<ChartProfile, ClientError> {
        let raw = std::fs::read_to_string(source_path).map_err(|source| ClientError::ProfileIo {
            path: source_path.display().to_string(),
            source,
        })?;
        let value: Value =
            serde_json::from_str(&raw).map_err(|source| ClientError::ProfileFormat {
                path: source_path.display().to_string(),
                source,
            })?;
        let profile = ChartProfile::from_saved_chart(&value)?;
        profile.to_birth_details()?;
        self.save(&profile)?;
        Ok(profile)
    }

    fn io_error(&self, source: std::io::Error) -> ClientError {
        ClientError::ProfileIo {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn format_error(&self, source: serde_json::Error) -> ClientError {
        ClientError::ProfileFormat {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn saved_chart_fields_normalised() {
        let chart = json!({
            "first_name": "Asha",
            "last_name": "Rao",
            "date_str": "1990-04-17",
            "time_str": "05:06",
            "location_name": "Mysuru",
            "latitude": 12.29,
            "longitude": 76.64,
            "timezone_str": "+05:30",
            "id": 42
        });
        let p = ChartProfile::from_saved_chart(&chart).unwrap();
        assert_eq!(p.name, "Asha Rao");
        assert_eq!(p.date, "1990-04-17");
        assert_eq!(p.location, "Mysuru");
        assert_eq!(p.timezone, "+05:30");
    }

    #[test]
    fn plain_fields_and_fallbacks() {
        let chart = json!({
            "date": "17/04/1990",
            "time": "05:06",
            "latitude": 12.0,
            "longitude": 77.0,
            "timezone": "+05:30"
        });
        let p = ChartProfile::from_saved_chart(&chart).unwrap();
        assert_eq!(p.name, "My Chart");
        assert_eq!(p.location, "Saved Location");
    }

    #[test]
    fn missing_coordinates_rejected() {
        let chart = json!({"date": "17/04/1990", "time": "05:06", "timezone": "+05:30"});
        assert!(matches!(
            ChartProfile::from_saved_chart(&chart),
            Err(ClientError::InvalidBirthDetails(_))
        ));
    }

    #[test]
    fn iso_date_converted_for_backend() {
        let p = ChartProfile {
            date: "1990-04-17".into(),
            ..ChartProfile::default()
        };
        let bd = p.to_birth_details().unwrap();
        assert_eq!(bd.date, "17/04/1990");
        assert_eq!(bd.timezone, "+05:30");
    }

    #[test]
    fn birth_utc_applies_offset() {
        let utc = ChartProfile::default().birth_utc().unwrap();
        assert_eq!((utc.year, utc.month, utc.day), (1990, 4, 16));
        assert_eq!((utc.hour, utc.minute), (23, 36));
    }

    #[test]
    fn validation_rules() {
        let good = ChartProfile::default().to_birth_details().unwrap();
        assert!(good.validate().is_ok());

        let bad = |f: fn(&mut BirthDetails)| {
            let mut d = good.clone();
            f(&mut d);
            d.validate().is_err()
        };
        assert!(bad(|d| d.date = "1990-04-17".into()));
        assert!(bad(|d| d.time = "5 am".into()));
        assert!(bad(|d| d.timezone = "Asia/Kolkata".into()));
        assert!(bad(|d| d.timezone = "+15:00".into()));
        assert!(bad(|d| d.latitude = 91.0));
        assert!(bad(|d| d.longitude = -180.5));
        assert!(!bad(|d| d.timezone = "-0330".into()));
    }

    #[test]
    fn store_roundtrip_and_fallback() {
        let dir = std::env::temp_dir().join(format!("kaal_profile_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let store = ProfileStore::new(dir.join("profile.json"));

        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.load_or_default(), ChartProfile::default());

        let profile = ChartProfile {
            name: "Test".into(),
            ..ChartProfile::default()
        };
        store.save(&profile).unwrap();
        assert_eq!(store.load().unwrap(), Some(profile));

        std::fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().is_err());
        assert_eq!(store.load_or_default(), ChartProfile::default());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn import_rejects_invalid_record() {
        let dir = std::env::temp_dir().join(format!("kaal_import_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let store = ProfileStore::new(dir.join("profile.json"));
        let source = dir.join("saved_chart.json");

        let chart = json!({
            "date": "17/04/1990",
            "time": "05:06",
            "latitude": 12.0,
            "longitude": 77.0,
            "timezone": "+99999999:00"
        });
        std::fs::write(&source, chart.to_string()).unwrap();
        assert!(matches!(
            store.import(&source),
            Err(ClientError::InvalidBirthDetails(_))
        ));
        assert_eq!(store.load().unwrap(), None);

        let chart = json!({
            "date": "17/04/1990",
            "time": "05:06",
            "latitude": 12.0,
            "longitude": 77.0,
            "timezone": "+05:30"
        });
        std::fs::write(&source, chart.to_string()).unwrap();
        let imported = store.import(&source).unwrap();
        assert_eq!(store.load().unwrap(), Some(imported));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
