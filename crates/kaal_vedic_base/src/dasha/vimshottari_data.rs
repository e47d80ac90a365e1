//! Const configuration data for the Vimshottari dasha system.
//!
//! Nine lords in a fixed cyclic order with periods summing to 120 years.
//! Every third nakshatra shares a lord, starting from Ketu at Ashwini.

use crate::graha::Graha;

use super::types::DAYS_PER_YEAR;

/// Vimshottari graha sequence: Ketu, Shukra, Surya, Chandra, Mangal, Rahu, Guru, Shani, Buddh.
pub const VIMSHOTTARI_GRAHAS: [Graha; 9] = [
    Graha::Ketu,
    Graha::Shukra,
    Graha::Surya,
    Graha::Chandra,
    Graha::Mangal,
    Graha::Rahu,
    Graha::Guru,
    Graha::Shani,
    Graha::Buddh,
];

/// Vimshottari periods in years, parallel to [`VIMSHOTTARI_GRAHAS`].
pub const VIMSHOTTARI_YEARS: [f64; 9] = [7.0, 20.0, 6.0, 10.0, 7.0, 18.0, 16.0, 19.0, 17.0];

/// Length of the full cycle in years.
pub const VIMSHOTTARI_TOTAL_YEARS: f64 = 120.0;

/// Nakshatra-to-graha mapping (every 3rd nakshatra shares a graha).
const VIMSHOTTARI_NAK_MAP: [u8; 27] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, // Ashwini..Ashlesha
    0, 1, 2, 3, 4, 5, 6, 7, 8, // Magha..Jyeshtha
    0, 1, 2, 3, 4, 5, 6, 7, 8, // Mula..Revati
];

/// Configuration for Vimshottari generation.
#[derive(Debug, Clone)]
pub struct VimshottariConfig {
    /// Graha sequence in dasha order.
    pub graha_sequence: [Graha; 9],
    /// Full-cycle period in days for each graha in sequence.
    pub periods_days: [f64; 9],
    /// Total period in days (sum of periods_days).
    pub total_period_days: f64,
    /// Nakshatra (0-26) to graha_sequence index mapping.
    pub nakshatra_to_graha_idx: [u8; 27],
}

impl VimshottariConfig {
    /// Position of a graha in the dasha sequence.
    pub fn sequence_index(&self, graha: Graha) -> usize {
        self.graha_sequence
            .iter()
            .position(|&g| g == graha)
            .unwrap_or(0)
    }

    /// Full period of a graha's mahadasha, in days.
    pub fn full_period_days(&self, graha: Graha) -> f64 {
        self.periods_days[self.sequence_index(graha)]
    }

    /// Nominal mahadasha length of a graha, in years.
    pub fn nominal_years(&self, graha: Graha) -> f64 {
        self.full_period_days(graha) / DAYS_PER_YEAR
    }

    /// Starting lord for a Moon in the given nakshatra (0-26).
    pub fn starting_graha(&self, nakshatra_index: u8) -> Graha {
        let gi = self.nakshatra_to_graha_idx[nakshatra_index.min(26) as usize];
        self.graha_sequence[gi as usize]
    }

    /// Entity/period pairs in dasha order, rotated to begin at `first`.
    pub fn sequence_from(&self, first: Graha) -> Vec<(Graha, f64)> {
        let start = self.sequence_index(first);
        let n = self.graha_sequence.len();
        (0..n)
            .map(|i| {
                let idx = (start + i) % n;
                (self.graha_sequence[idx], self.periods_days[idx])
            })
            .collect()
    }
}

impl Default for VimshottariConfig {
    fn default() -> Self {
        vimshottari_config()
    }
}

/// Create the Vimshottari dasha configuration.
pub fn vimshottari_config() -> VimshottariConfig {
    let periods_days = VIMSHOTTARI_YEARS.map(|y| y * DAYS_PER_YEAR);
    VimshottariConfig {
        graha_sequence: VIMSHOTTARI_GRAHAS,
        periods_days,
        total_period_days: periods_days.iter().sum(),
        nakshatra_to_graha_idx: VIMSHOTTARI_NAK_MAP,
    }
}
