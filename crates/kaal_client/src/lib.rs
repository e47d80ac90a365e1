//! Client side of the chart backend.
//!
//! This crate provides:
//! - `Backend`, the JSON transport seam, with a reqwest implementation
//! - `ApiClient`, typed calls for chart, dasha, panchang, ashtakvarga,
//!   KP, period overview, AI insight and place search
//! - Chart profiles, their normalisation and on-disk store
//! - Concurrent dashboard loading with per-section failure

pub mod api;
pub mod backend;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod profile;
pub mod wire;

pub use api::{ApiClient, DashaSource, DashaTimeline, local_timeline};
pub use backend::{Backend, HttpBackend};
pub use config::ClientConfig;
pub use dashboard::{Dashboard, load_dashboard, panchang_details};
pub use error::ClientError;
pub use profile::{BirthDetails, ChartProfile, ProfileStore};
pub use wire::{
    ChartResponse, DashaResponse, DashaSummary, GeoPlace, KpRequest, KpResponse, Panchang,
    PeriodOverview,
};
