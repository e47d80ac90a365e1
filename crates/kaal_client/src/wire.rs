//! Request and response bodies exchanged with the chart backend.
//!
//! Responses are lenient: fields the dashboard can live without are
//! `Option`, list fields default to empty and unknown fields are ignored.

use kaal_time::parse_jd;
use kaal_vedic_base::{DashaLevel, DashaPeriod, Graha};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ClientError;
use crate::profile::BirthDetails;

pub const DEFAULT_AYANAMSA: &str = "LAHIRI";

// ── Requests ─────────────────────────────────────────────────────────

/// `POST /chart/dasha`
#[derive(Debug, Clone, Serialize)]
pub struct DashaRequest {
    pub birth_details: BirthDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moon_longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ayanamsa: Option<String>,
}

/// `POST /chart/ashtakvarga`
#[derive(Debug, Clone, Serialize)]
pub struct BirthRequest {
    pub birth_details: BirthDetails,
}

/// `POST /chart/period/overview`
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest {
    pub birth_details: BirthDetails,
    /// `YYYY-MM-DD`; the backend defaults to today.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_date: Option<String>,
}

/// `POST /chart/kp-astrology`
#[derive(Debug, Clone, Serialize)]
pub struct KpRequest {
    pub birth_details: BirthDetails,
    /// KP horary number 1-249; 0 or absent for a natal reading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horary_number: Option<u16>,
}

/// `POST /ai/generate`
#[derive(Debug, Clone, Serialize)]
pub struct AiRequest {
    /// Report context, e.g. `dasha`, `period`, `general`.
    pub context: String,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

// ── Responses ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlanetPosition {
    pub name: String,
    /// Sidereal longitude in degrees.
    pub longitude: f64,
    #[serde(default)]
    pub zodiac_sign: Option<String>,
    #[serde(default)]
    pub nakshatra: Option<String>,
    #[serde(default)]
    pub pada: Option<u8>,
    #[serde(default)]
    pub house: Option<u8>,
    #[serde(default)]
    pub is_retrograde: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Ascendant {
    #[serde(default)]
    pub sign: Option<String>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// `POST /chart/birth`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartResponse {
    #[serde(default)]
    pub planets: Vec<PlanetPosition>,
    #[serde(default)]
    pub ascendant: Option<Ascendant>,
}

impl ChartResponse {
    pub fn planet(&self, name: &str) -> Option<&PlanetPosition> {
        self.planets
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Moon's sidereal longitude, the seed for Vimshottari.
    pub fn moon_longitude(&self) -> Option<f64> {
        self.planet("Moon")
            .or_else(|| self.planet("Chandra"))
            .map(|p| p.longitude)
    }
}

/// `POST /chart/panchang`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Panchang {
    #[serde(default)]
    pub day_of_week: Option<String>,
    #[serde(default)]
    pub tithi: Option<String>,
    #[serde(default)]
    pub nakshatra: Option<String>,
    #[serde(default)]
    pub yoga: Option<String>,
    #[serde(default)]
    pub karana: Option<String>,
    #[serde(default)]
    pub sunrise: Option<String>,
    #[serde(default)]
    pub sunset: Option<String>,
}

/// `POST /chart/ashtakvarga`; the scoring tables are passed through as-is.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct AshtakvargaResponse(pub Value);

/// `POST /chart/period/overview`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PeriodOverview {
    #[serde(default)]
    pub daily_analysis: Option<Value>,
    #[serde(flatten)]
    pub sections: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KpLords {
    #[serde(default)]
    pub sign_lord: Option<String>,
    #[serde(default)]
    pub star_lord: Option<String>,
    #[serde(default)]
    pub sub_lord: Option<String>,
    #[serde(default)]
    pub sub_sub_lord: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KpCusp {
    pub house: u8,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub sign: Option<String>,
    #[serde(default)]
    pub lords: Option<KpLords>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KpPlanet {
    pub name: String,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub sign: Option<String>,
    #[serde(default)]
    pub is_retrograde: Option<bool>,
    #[serde(default)]
    pub lords: Option<KpLords>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KpRulingPlanets {
    #[serde(default)]
    pub day_lord: Option<String>,
    #[serde(default)]
    pub moon_star: Option<String>,
    #[serde(default)]
    pub moon_sign: Option<String>,
    #[serde(default)]
    pub lagna_star: Option<String>,
    #[serde(default)]
    pub lagna_sign: Option<String>,
}

/// `POST /chart/kp-astrology`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KpResponse {
    #[serde(default)]
    pub ayanamsa: Option<String>,
    #[serde(default)]
    pub cusps: Vec<KpCusp>,
    #[serde(default)]
    pub planets: Vec<KpPlanet>,
    #[serde(default)]
    pub ruling_planets: Option<KpRulingPlanets>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `POST /ai/generate`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InsightResponse {
    pub insight: String,
}

/// One hit from `GET /geo/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPlace {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

// ── Dasha ────────────────────────────────────────────────────────────

/// One backend dasha row; nested rows are its sub-periods.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireDasha {
    pub lord: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub duration_years: Option<f64>,
    #[serde(default)]
    pub antardashas: Vec<WireDasha>,
    #[serde(default)]
    pub is_current: Option<bool>,
}

/// Summary entries arrive either as a bare lord name or as an object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SummaryEntry {
    Lord(String),
    Detail {
        #[serde(alias = "lord")]
        planet: String,
        #[serde(default)]
        start_date: Option<String>,
        #[serde(default)]
        end_date: Option<String>,
    },
}

impl SummaryEntry {
    pub fn lord(&self) -> &str {
        match self {
            Self::Lord(name) => name,
            Self::Detail { planet, .. } => planet,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DashaSummary {
    #[serde(default)]
    pub current_mahadasha: Option<SummaryEntry>,
    #[serde(default)]
    pub current_antardasha: Option<SummaryEntry>,
    #[serde(default)]
    pub current_pratyantardasha: Option<SummaryEntry>,
}

/// `POST /chart/dasha`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashaResponse {
    pub dashas: Vec<WireDasha>,
    #[serde(default)]
    pub summary: Option<DashaSummary>,
}

impl DashaResponse {
    /// Convert the backend table into a period tree.
    ///
    /// The backend's own `is_current` flags are ignored; currency is always
    /// re-derived from the evaluation instant.
    pub fn to_periods(&self) -> Result<Vec<DashaPeriod>, ClientError> {
        convert_level(&self.dashas, DashaLevel::Mahadasha)
    }
}

fn convert_level(rows: &[WireDasha], level: DashaLevel) -> Result<Vec<DashaPeriod>, ClientError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let lord: Graha = row
                .lord
                .parse()
                .map_err(|_| ClientError::MalformedDasha(format!("unknown lord {:?}", row.lord)))?;
            let start_jd = parse_boundary(&row.start_date)?;
            let end_jd = parse_boundary(&row.end_date)?;
            if end_jd < start_jd {
                return Err(ClientError::MalformedDasha(format!(
                    "{} period ends {} before it starts {}",
                    lord, row.end_date, row.start_date
                )));
            }
            let order = u16::try_from(i + 1)
                .map_err(|_| ClientError::MalformedDasha("too many periods".to_string()))?;

            let mut period = DashaPeriod::new(lord, start_jd, end_jd, level, order);
            if !row.antardashas.is_empty() {
                let child_level = level.child_level().ok_or_else(|| {
                    ClientError::MalformedDasha("dasha nesting deeper than 5 levels".to_string())
                })?;
                period.sub_periods = convert_level(&row.antardashas, child_level)?;
            }
            Ok(period)
        })
        .collect()
}

fn parse_boundary(s: &str) -> Result<f64, ClientError> {
    parse_jd(s).map_err(|_| ClientError::MalformedDasha(format!("unparseable date {s:?}")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn chart_response_lenient() {
        let chart: ChartResponse = serde_json::from_value(json!({
            "planets": [
                {"name": "Sun", "longitude": 3.2, "zodiac_sign": "Aries", "house": 12},
                {"name": "Moon", "longitude": 123.4, "is_retrograde": false}
            ],
            "ascendant": {"sign": "Taurus"},
            "houses": [1, 2, 3]
        }))
        .unwrap();
        assert_eq!(chart.moon_longitude(), Some(123.4));
        assert_eq!(chart.planet("sun").and_then(|p| p.house), Some(12));
        assert_eq!(chart.ascendant.and_then(|a| a.sign).as_deref(), Some("Taurus"));
    }

    #[test]
    fn chart_without_moon() {
        let chart: ChartResponse = serde_json::from_value(json!({"planets": []})).unwrap();
        assert_eq!(chart.moon_longitude(), None);
    }

    #[test]
    fn summary_accepts_both_shapes() {
        let summary: DashaSummary = serde_json::from_value(json!({
            "current_mahadasha": {"planet": "Venus", "start_date": "1990-04-17"},
            "current_antardasha": "Rahu"
        }))
        .unwrap();
        assert_eq!(summary.current_mahadasha.unwrap().lord(), "Venus");
        assert_eq!(summary.current_antardasha.unwrap().lord(), "Rahu");
        assert!(summary.current_pratyantardasha.is_none());
    }

    #[test]
    fn dasha_rows_become_periods() {
        let resp: DashaResponse = serde_json::from_value(json!({
            "dashas": [{
                "lord": "Venus",
                "start_date": "1990-04-17",
                "end_date": "2010-04-17",
                "duration_years": 20,
                "is_current": true,
                "antardashas": [
                    {"lord": "Venus", "start_date": "1990-04-17", "end_date": "1993-08-17"},
                    {"lord": "Sun", "start_date": "17/08/1993", "end_date": "1994-08-17T00:00:00Z"}
                ]
            }]
        }))
        .unwrap();
        let periods = resp.to_periods().unwrap();
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].lord, Graha::Shukra);
        assert_eq!(periods[0].sub_periods.len(), 2);
        assert_eq!(periods[0].sub_periods[1].lord, Graha::Surya);
        assert_eq!(periods[0].sub_periods[1].level, DashaLevel::Antardasha);
        assert_eq!(periods[0].sub_periods[1].order, 2);
        assert_eq!(
            periods[0].sub_periods[0].end_jd,
            periods[0].sub_periods[1].start_jd
        );
    }

    #[test]
    fn bad_lord_or_date_rejected() {
        let bad_lord: DashaResponse = serde_json::from_value(json!({
            "dashas": [{"lord": "Pluto", "start_date": "2000-01-01", "end_date": "2001-01-01"}]
        }))
        .unwrap();
        assert!(matches!(bad_lord.to_periods(), Err(ClientError::MalformedDasha(_))));

        let bad_date: DashaResponse = serde_json::from_value(json!({
            "dashas": [{"lord": "Ketu", "start_date": "soon", "end_date": "2001-01-01"}]
        }))
        .unwrap();
        assert!(matches!(bad_date.to_periods(), Err(ClientError::MalformedDasha(_))));

        let inverted: DashaResponse = serde_json::from_value(json!({
            "dashas": [{"lord": "Ketu", "start_date": "2001-01-01", "end_date": "2000-01-01"}]
        }))
        .unwrap();
        assert!(inverted.to_periods().is_err());
    }

    #[test]
    fn requests_omit_absent_options() {
        let bd = BirthDetails {
            name: None,
            date: "17/04/1990".into(),
            time: "05:06".into(),
            timezone: "+05:30".into(),
            latitude: 12.97,
            longitude: 77.59,
        };
        let req = DashaRequest {
            birth_details: bd,
            moon_longitude: Some(123.4),
            ayanamsa: None,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["moon_longitude"], json!(123.4));
        assert!(v.get("ayanamsa").is_none());
        assert!(v["birth_details"].get("name").is_none());
    }
}
