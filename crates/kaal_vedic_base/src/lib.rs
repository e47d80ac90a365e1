//! Vedic period calculations on top of Julian Date timestamps.
//!
//! This crate provides:
//! - The 9 grahas and the 27 nakshatras
//! - Vimshottari dasha generation (mahadasha through pranadasha)
//! - Current-period resolution, validation and timeline projection
//!
//! All functions are pure; timestamps are JD UTC `f64`.

pub mod dasha;
pub mod error;
pub mod graha;
pub mod nakshatra;
pub mod util;

pub use dasha::{
    CurrentDasha, DAYS_PER_YEAR, DashaLevel, DashaPeriod, TimelineSegment, VimshottariConfig,
    active_chain, find_active_period, resolve_current_dasha, resolve_validated,
    timeline_segments, validate_periods, vimshottari_config, vimshottari_cycle,
    vimshottari_cycle_from_moon,
};
pub use error::VedicError;
pub use graha::{ALL_GRAHAS, Graha};
pub use nakshatra::{ALL_NAKSHATRAS_27, Nakshatra, NakshatraInfo, nakshatra_from_longitude};
pub use util::{elapsed_fraction, normalize_360};
