//! Current-period resolution.
//!
//! Given the mahadashas of a cycle (each carrying its antardashas) and an
//! evaluation instant, find the running mahadasha and antardasha, the
//! antardasha that follows, and how far the current antardasha has run.
//! An instant outside the cycle is a valid outcome with nothing current.

use serde::Serialize;
use tracing::warn;

use crate::util::elapsed_fraction;

use super::query::find_active_period;
use super::types::DashaPeriod;
use super::validate::validate_periods;

/// Resolved view of a timeline at one instant.
///
/// Borrows from the period list it was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurrentDasha<'a> {
    pub mahadasha: Option<&'a DashaPeriod>,
    pub antardasha: Option<&'a DashaPeriod>,
    /// Following antardasha, crossing into the next mahadasha if needed.
    pub next_antardasha: Option<&'a DashaPeriod>,
    /// Elapsed fraction of the current antardasha in [0, 1].
    pub progress: f64,
}

impl<'a> CurrentDasha<'a> {
    /// The "no current period" result.
    pub const fn none() -> Self {
        Self {
            mahadasha: None,
            antardasha: None,
            next_antardasha: None,
            progress: 0.0,
        }
    }

    pub fn is_none(&self) -> bool {
        self.mahadasha.is_none()
    }
}

impl Default for CurrentDasha<'_> {
    fn default() -> Self {
        Self::none()
    }
}

/// Resolve the current mahadasha/antardasha at `at_jd`.
///
/// `periods` must be chronologically contiguous; this is not checked here
/// (see [`resolve_validated`]).
pub fn resolve_current_dasha(periods: &[DashaPeriod], at_jd: f64) -> CurrentDasha<'_> {
    let Some(md_idx) = find_active_period(periods, at_jd) else {
        return CurrentDasha::none();
    };
    let md = &periods[md_idx];

    let Some(ad_idx) = find_active_period(&md.sub_periods, at_jd) else {
        return CurrentDasha {
            mahadasha: Some(md),
            ..CurrentDasha::none()
        };
    };
    let ad = &md.sub_periods[ad_idx];

    let next_antardasha = md
        .sub_periods
        .get(ad_idx + 1)
        .or_else(|| periods.get(md_idx + 1).and_then(|next| next.sub_periods.first()));

    CurrentDasha {
        mahadasha: Some(md),
        antardasha: Some(ad),
        next_antardasha,
        progress: elapsed_fraction(ad.start_jd, ad.end_jd, at_jd),
    }
}

/// Like [`resolve_current_dasha`], but checks the period tree first.
///
/// A malformed tree is logged and resolves to nothing current.
pub fn resolve_validated(periods: &[DashaPeriod], at_jd: f64) -> CurrentDasha<'_> {
    match validate_periods(periods) {
        Ok(()) => resolve_current_dasha(periods, at_jd),
        Err(e) => {
            warn!(error = %e, "refusing to resolve malformed dasha periods");
            CurrentDasha::none()
        }
    }
}
