//! Typed calls to the chart, dasha, AI and geocoding endpoints.

use kaal_vedic_base::{DashaPeriod, vimshottari_config, vimshottari_cycle_from_moon};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, info};

use crate::backend::Backend;
use crate::error::ClientError;
use crate::profile::BirthDetails;
use crate::wire::{
    AiRequest, AnalysisRequest, AshtakvargaResponse, BirthRequest, ChartResponse, DEFAULT_AYANAMSA,
    DashaRequest, DashaResponse, GeoPlace, InsightResponse, KpRequest, KpResponse, Panchang,
    PeriodOverview,
};

pub const EP_BIRTH_CHART: &str = "chart/birth";
pub const EP_DASHA: &str = "chart/dasha";
pub const EP_PANCHANG: &str = "chart/panchang";
pub const EP_ASHTAKVARGA: &str = "chart/ashtakvarga";
pub const EP_KP: &str = "chart/kp-astrology";
pub const EP_PERIOD_OVERVIEW: &str = "chart/period/overview";
pub const EP_AI_GENERATE: &str = "ai/generate";
pub const EP_GEO_SEARCH: &str = "geo/search";

/// Where a dasha tree came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashaSource {
    Backend,
    /// Generated here from the chart's Moon after the backend call failed.
    Local,
}

/// Mahadashas with antardashas, ready for resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct DashaTimeline {
    pub periods: Vec<DashaPeriod>,
    pub source: DashaSource,
}

/// Typed front for a [`Backend`].
#[derive(Debug, Clone)]
pub struct ApiClient<B> {
    backend: B,
}

impl<B: Backend> ApiClient<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn post<Req, Resp>(&self, endpoint: &str, request: &Req) -> Result<Resp, ClientError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let body = serde_json::to_value(request).map_err(|source| ClientError::Encode {
            endpoint: endpoint.to_string(),
            source,
        })?;
        let value = self.backend.post_json(endpoint, body).await?;
        decode(endpoint, value)
    }

    pub async fn birth_chart(&self, birth: &BirthDetails) -> Result<ChartResponse, ClientError> {
        self.post(EP_BIRTH_CHART, birth).await
    }

    pub async fn dasha(&self, request: &DashaRequest) -> Result<DashaResponse, ClientError> {
        self.post(EP_DASHA, request).await
    }

    pub async fn panchang(&self, details: &BirthDetails) -> Result<Panchang, ClientError> {
        self.post(EP_PANCHANG, details).await
    }

    pub async fn ashtakvarga(&self, birth: &BirthDetails) -> Result<AshtakvargaResponse, ClientError> {
        let request = BirthRequest {
            birth_details: birth.clone(),
        };
        self.post(EP_ASHTAKVARGA, &request).await
    }

    pub async fn kp_astrology(&self, request: &KpRequest) -> Result<KpResponse, ClientError> {
        self.post(EP_KP, request).await
    }

    pub async fn period_overview(
        &self,
        request: &AnalysisRequest,
    ) -> Result<PeriodOverview, ClientError> {
        self.post(EP_PERIOD_OVERVIEW, request).await
    }

    /// Ask the AI backend to interpret `data` under `context`.
    pub async fn ai_insight(
        &self,
        context: &str,
        data: Value,
        query: Option<&str>,
    ) -> Result<String, ClientError> {
        let request = AiRequest {
            context: context.to_string(),
            data,
            query: query.map(str::to_string),
        };
        let resp: InsightResponse = self.post(EP_AI_GENERATE, &request).await?;
        Ok(resp.insight)
    }

    pub async fn geo_search(&self, name: &str) -> Result<Vec<GeoPlace>, ClientError> {
        let value = self.backend.get_json(EP_GEO_SEARCH, &[("q", name)]).await?;
        decode(EP_GEO_SEARCH, value)
    }

    /// Chart first, then the dasha seeded by its Moon.
    ///
    /// If the backend dasha call fails the tree is generated locally from the
    /// same Moon longitude; if the chart fails there is nothing to seed from.
    pub async fn chart_and_dasha(
        &self,
        birth: &BirthDetails,
        birth_jd: f64,
    ) -> (
        Result<ChartResponse, ClientError>,
        Result<DashaTimeline, ClientError>,
    ) {
        let chart = self.birth_chart(birth).await;
        let dasha = match &chart {
            Ok(chart) => match chart.moon_longitude() {
                Some(moon) => self.dasha_for_moon(birth, birth_jd, moon).await,
                None => Err(ClientError::MissingMoon),
            },
            Err(_) => Err(ClientError::Skipped("birth chart")),
        };
        (chart, dasha)
    }

    async fn dasha_for_moon(
        &self,
        birth: &BirthDetails,
        birth_jd: f64,
        moon_longitude: f64,
    ) -> Result<DashaTimeline, ClientError> {
        let request = DashaRequest {
            birth_details: birth.clone(),
            moon_longitude: Some(moon_longitude),
            ayanamsa: Some(DEFAULT_AYANAMSA.to_string()),
        };
        let fetched = self
            .dasha(&request)
            .await
            .and_then(|resp| resp.to_periods());
        match fetched {
            Ok(periods) if !periods.is_empty() => Ok(DashaTimeline {
                periods,
                source: DashaSource::Backend,
            }),
            Ok(_) => {
                info!("backend returned no dashas, generating locally");
                local_timeline(birth_jd, moon_longitude)
            }
            Err(e) => {
                error!(error = %e, "dasha fetch failed, generating locally");
                local_timeline(birth_jd, moon_longitude)
            }
        }
    }
}

/// Mahadashas with antardashas generated from the Moon at birth.
pub fn local_timeline(birth_jd: f64, moon_longitude: f64) -> Result<DashaTimeline, ClientError> {
    let periods = vimshottari_cycle_from_moon(birth_jd, moon_longitude, 1, &vimshottari_config())?;
    Ok(DashaTimeline {
        periods,
        source: DashaSource::Local,
    })
}

fn decode<T: DeserializeOwned>(endpoint: &str, value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|source| ClientError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}
