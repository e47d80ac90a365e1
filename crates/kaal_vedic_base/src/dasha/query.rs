//! Lookups over generated period lists.

use super::types::DashaPeriod;

/// Index of the period containing `jd`, scanning in order.
///
/// Intervals are half-open, so an instant on a shared boundary belongs to
/// the later period.
pub fn find_active_period(periods: &[DashaPeriod], jd: f64) -> Option<usize> {
    periods.iter().position(|p| p.is_current(jd))
}

/// Active period at every materialised level, outermost first.
///
/// Stops at the first level with no match or no sub-periods.
pub fn active_chain(periods: &[DashaPeriod], jd: f64) -> Vec<&DashaPeriod> {
    let mut chain = Vec::new();
    let mut level = periods;
    while let Some(idx) = find_active_period(level, jd) {
        let period = &level[idx];
        chain.push(period);
        level = &period.sub_periods;
    }
    chain
}
