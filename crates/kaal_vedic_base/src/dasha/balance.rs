//! Birth balance: how much of the first mahadasha remains at birth.
//!
//! The Moon's position within its nakshatra measures how much of the
//! ruling lord's period has already elapsed.

use crate::nakshatra::{NAKSHATRA_SPAN_27, nakshatra_from_longitude};

/// Compute the Vimshottari birth balance.
///
/// Returns `(nakshatra_index, balance_days, elapsed_fraction)`:
/// - `nakshatra_index`: 0-based index (0=Ashwini..26=Revati) of the Moon's nakshatra
/// - `balance_days`: remaining days in the starting graha's period
/// - `elapsed_fraction`: fraction of nakshatra already traversed [0, 1)
pub fn nakshatra_birth_balance(moon_sidereal_lon: f64, entry_period_days: f64) -> (u8, f64, f64) {
    let info = nakshatra_from_longitude(moon_sidereal_lon);
    let elapsed_fraction = info.degrees_in_nakshatra / NAKSHATRA_SPAN_27;
    let balance_days = entry_period_days * (1.0 - elapsed_fraction);
    (info.nakshatra_index, balance_days, elapsed_fraction)
}
