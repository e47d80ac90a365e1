//! Flat mahadasha timeline for bar-style display.

use serde::Serialize;

use crate::graha::Graha;

use super::types::DashaPeriod;
use super::vimshottari_data::VIMSHOTTARI_TOTAL_YEARS;

/// One mahadasha as a bar on a 120-year axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineSegment {
    pub lord: Graha,
    pub start_jd: f64,
    pub end_jd: f64,
    pub duration_years: f64,
    pub is_current: bool,
    /// Share of the full cycle, `duration_years / 120`.
    pub width_fraction: f64,
}

/// Project mahadashas onto timeline segments, flagging the one current at `at_jd`.
pub fn timeline_segments(periods: &[DashaPeriod], at_jd: f64) -> Vec<TimelineSegment> {
    periods
        .iter()
        .map(|p| {
            let duration_years = p.duration_years();
            TimelineSegment {
                lord: p.lord,
                start_jd: p.start_jd,
                end_jd: p.end_jd,
                duration_years,
                is_current: p.is_current(at_jd),
                width_fraction: duration_years / VIMSHOTTARI_TOTAL_YEARS,
            }
        })
        .collect()
}
