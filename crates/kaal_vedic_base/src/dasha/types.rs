//! Core types for Vimshottari dasha (planetary period) timelines.
//!
//! A timeline is an ordered list of mahadashas, each owning its ordered
//! sub-periods, recursively. Boundaries are Julian Dates (UTC) and every
//! period is the half-open interval `[start_jd, end_jd)`.

use serde::Serialize;

use crate::graha::Graha;

/// Year length constant for dasha period calculations.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Maximum dasha depth. Levels 0-4 supported.
pub const MAX_DASHA_LEVEL: u8 = 4;

/// Default depth for generated trees: mahadashas with their antardashas.
pub const DEFAULT_DASHA_LEVEL: u8 = 1;

/// Hard cap on periods per level to prevent combinatorial explosion.
pub const MAX_PERIODS_PER_LEVEL: usize = 100_000;

/// 5 hierarchical dasha levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[repr(u8)]
pub enum DashaLevel {
    Mahadasha = 0,
    Antardasha = 1,
    Pratyantardasha = 2,
    Sookshmadasha = 3,
    Pranadasha = 4,
}

impl DashaLevel {
    /// Create from raw u8 value.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Mahadasha),
            1 => Some(Self::Antardasha),
            2 => Some(Self::Pratyantardasha),
            3 => Some(Self::Sookshmadasha),
            4 => Some(Self::Pranadasha),
            _ => None,
        }
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mahadasha => "Mahadasha",
            Self::Antardasha => "Antardasha",
            Self::Pratyantardasha => "Pratyantardasha",
            Self::Sookshmadasha => "Sookshmadasha",
            Self::Pranadasha => "Pranadasha",
        }
    }

    /// Next deeper level, if any.
    pub const fn child_level(self) -> Option<Self> {
        match self {
            Self::Mahadasha => Some(Self::Antardasha),
            Self::Antardasha => Some(Self::Pratyantardasha),
            Self::Pratyantardasha => Some(Self::Sookshmadasha),
            Self::Sookshmadasha => Some(Self::Pranadasha),
            Self::Pranadasha => None,
        }
    }
}

/// A single dasha period and its nested sub-periods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashaPeriod {
    /// The graha ruling this period.
    pub lord: Graha,
    /// JD UTC, inclusive.
    pub start_jd: f64,
    /// JD UTC, exclusive.
    pub end_jd: f64,
    /// Hierarchical level.
    pub level: DashaLevel,
    /// 1-indexed position in the parent's full sequence. The first
    /// sub-period of a mahadasha cut short at birth may not be 1.
    pub order: u16,
    /// Sub-periods at the next level, partitioning `[start_jd, end_jd)`.
    /// Empty when the tree was not generated this deep.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_periods: Vec<DashaPeriod>,
}

impl DashaPeriod {
    /// A leaf period with no sub-periods.
    pub fn new(lord: Graha, start_jd: f64, end_jd: f64, level: DashaLevel, order: u16) -> Self {
        Self {
            lord,
            start_jd,
            end_jd,
            level,
            order,
            sub_periods: Vec::new(),
        }
    }

    /// Duration of the period in days.
    pub fn duration_days(&self) -> f64 {
        self.end_jd - self.start_jd
    }

    /// Duration of the period in dasha years (365.25 days).
    pub fn duration_years(&self) -> f64 {
        self.duration_days() / DAYS_PER_YEAR
    }

    /// Whether `jd` falls in `[start_jd, end_jd)`.
    pub fn is_current(&self, jd: f64) -> bool {
        self.start_jd <= jd && jd < self.end_jd
    }

    /// Number of levels materialised below and including this period.
    pub fn depth(&self) -> usize {
        1 + self
            .sub_periods
            .iter()
            .map(DashaPeriod::depth)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dasha_level_from_u8() {
        assert_eq!(DashaLevel::from_u8(0), Some(DashaLevel::Mahadasha));
        assert_eq!(DashaLevel::from_u8(4), Some(DashaLevel::Pranadasha));
        assert_eq!(DashaLevel::from_u8(5), None);
    }

    #[test]
    fn dasha_level_child() {
        assert_eq!(
            DashaLevel::Mahadasha.child_level(),
            Some(DashaLevel::Antardasha)
        );
        assert_eq!(DashaLevel::Pranadasha.child_level(), None);
    }

    #[test]
    fn half_open_membership() {
        let p = DashaPeriod::new(Graha::Ketu, 100.0, 200.0, DashaLevel::Mahadasha, 1);
        assert!(p.is_current(100.0));
        assert!(p.is_current(199.999));
        assert!(!p.is_current(200.0));
        assert!(!p.is_current(99.999));
    }

    #[test]
    fn duration_in_years() {
        let p = DashaPeriod::new(Graha::Shukra, 0.0, 20.0 * DAYS_PER_YEAR, DashaLevel::Mahadasha, 1);
        assert!((p.duration_years() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn depth_counts_levels() {
        let mut p = DashaPeriod::new(Graha::Ketu, 0.0, 10.0, DashaLevel::Mahadasha, 1);
        assert_eq!(p.depth(), 1);
        p.sub_periods
            .push(DashaPeriod::new(Graha::Ketu, 0.0, 10.0, DashaLevel::Antardasha, 1));
        assert_eq!(p.depth(), 2);
    }
}
