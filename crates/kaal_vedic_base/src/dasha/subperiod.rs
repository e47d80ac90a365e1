//! Proportional sub-period generation.
//!
//! child duration = (child_full_period / total_period) * parent_duration,
//! with lords taken cyclically starting from the parent's own lord.

use crate::graha::Graha;

use super::types::{DashaLevel, DashaPeriod};

/// Snap the last child's end_jd to parent's end_jd to absorb floating-point drift.
pub fn snap_last_child_end(children: &mut [DashaPeriod], parent_end_jd: f64) {
    if let Some(last) = children.last_mut() {
        last.end_jd = parent_end_jd;
    }
}

/// Rotate a cyclic lord sequence so it begins at `parent_lord`.
///
/// Falls back to the unrotated sequence if the lord is not present.
pub fn build_cyclic_sequence(sequence: &[(Graha, f64)], parent_lord: Graha) -> Vec<(Graha, f64)> {
    let n = sequence.len();
    let start = sequence
        .iter()
        .position(|(g, _)| *g == parent_lord)
        .unwrap_or(0);
    (0..n).map(|i| sequence[(start + i) % n]).collect()
}

/// Generate proportional children for a parent period.
///
/// `sequence`: ordered lords and their full-cycle periods (in days), already
/// rotated to the desired first child.
/// `total_period_days`: sum of all sequence periods.
pub fn proportional_children(
    parent: &DashaPeriod,
    sequence: &[(Graha, f64)],
    total_period_days: f64,
    child_level: DashaLevel,
) -> Vec<DashaPeriod> {
    let parent_duration = parent.duration_days();
    let mut children = Vec::with_capacity(sequence.len());
    let mut cursor = parent.start_jd;

    for (order_0, &(lord, full_period)) in sequence.iter().enumerate() {
        let duration = (full_period / total_period_days) * parent_duration;
        let end = cursor + duration;
        children.push(DashaPeriod::new(
            lord,
            cursor,
            end,
            child_level,
            (order_0 as u16) + 1,
        ));
        cursor = end;
    }

    snap_last_child_end(&mut children, parent.end_jd);
    children
}
