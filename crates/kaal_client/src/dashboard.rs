//! Concurrent loading of every dashboard section.
//!
//! Sections are fetched together and fail independently: one section's
//! error is logged and kept in its slot while the others still render.

use chrono::{Datelike, NaiveDateTime, Timelike};
use kaal_vedic_base::{CurrentDasha, resolve_validated};
use tracing::{error, info};

use crate::api::{ApiClient, DashaTimeline};
use crate::backend::Backend;
use crate::error::ClientError;
use crate::profile::{BirthDetails, ChartProfile};
use crate::wire::{AnalysisRequest, AshtakvargaResponse, ChartResponse, Panchang, PeriodOverview};

/// Everything the home dashboard shows for one profile and target moment.
#[derive(Debug)]
pub struct Dashboard {
    /// Panchang at the target moment and the birth location.
    pub panchang: Result<Panchang, ClientError>,
    pub birth_panchang: Result<Panchang, ClientError>,
    pub chart: Result<ChartResponse, ClientError>,
    pub dasha: Result<DashaTimeline, ClientError>,
    pub ashtakvarga: Result<AshtakvargaResponse, ClientError>,
    pub period_overview: Result<PeriodOverview, ClientError>,
}

impl Dashboard {
    /// Current period at `at_jd`, when a dasha timeline is available.
    pub fn current_dasha(&self, at_jd: f64) -> Option<CurrentDasha<'_>> {
        self.dasha
            .as_ref()
            .ok()
            .map(|timeline| resolve_validated(&timeline.periods, at_jd))
    }

    /// Names of the sections that failed.
    pub fn failed_sections(&self) -> Vec<&'static str> {
        [
            ("panchang", self.panchang.is_err()),
            ("birth panchang", self.birth_panchang.is_err()),
            ("chart", self.chart.is_err()),
            ("dasha", self.dasha.is_err()),
            ("ashtakvarga", self.ashtakvarga.is_err()),
            ("period overview", self.period_overview.is_err()),
        ]
        .into_iter()
        .filter_map(|(name, failed)| failed.then_some(name))
        .collect()
    }
}

/// Birth details with date and time replaced by a target local moment.
pub fn panchang_details(birth: &BirthDetails, target_local: NaiveDateTime) -> BirthDetails {
    BirthDetails {
        date: format!(
            "{:02}/{:02}/{:04}",
            target_local.day(),
            target_local.month(),
            target_local.year()
        ),
        time: format!("{:02}:{:02}", target_local.hour(), target_local.minute()),
        ..birth.clone()
    }
}

/// Fetch all sections for `profile` at `target_local` (profile timezone).
pub async fn load_dashboard<B: Backend>(
    api: &ApiClient<B>,
    profile: &ChartProfile,
    target_local: NaiveDateTime,
) -> Result<Dashboard, ClientError> {
    let birth = profile.to_birth_details()?;
    let birth_jd = profile.birth_jd()?;
    let today = panchang_details(&birth, target_local);
    let overview_request = AnalysisRequest {
        birth_details: birth.clone(),
        analysis_date: Some(target_local.format("%Y-%m-%d").to_string()),
    };
    info!(profile = %profile.name, target = %target_local, "loading dashboard");

    let (panchang, birth_panchang, (chart, dasha), ashtakvarga, period_overview) = futures::join!(
        api.panchang(&today),
        api.panchang(&birth),
        api.chart_and_dasha(&birth, birth_jd),
        api.ashtakvarga(&birth),
        api.period_overview(&overview_request),
    );

    let dashboard = Dashboard {
        panchang: logged("panchang", panchang),
        birth_panchang: logged("birth panchang", birth_panchang),
        chart: logged("chart", chart),
        dasha: logged("dasha", dasha),
        ashtakvarga: logged("ashtakvarga", ashtakvarga),
        period_overview: logged("period overview", period_overview),
    };
    Ok(dashboard)
}

fn logged<T>(section: &'static str, result: Result<T, ClientError>) -> Result<T, ClientError> {
    if let Err(e) = &result {
        error!(section, error = %e, "dashboard section failed");
    }
    result
}
