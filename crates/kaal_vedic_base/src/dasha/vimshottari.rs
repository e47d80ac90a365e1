//! Vimshottari period generation.
//!
//! Computation tiers:
//! - Level-0 (mahadasha) generation, from a known first lord or from the
//!   Moon's sidereal longitude (with birth balance)
//! - All children of one parent
//! - Nested tree down to a requested level
//! - Snapshot-only path (active chain without materializing the tree)

use tracing::debug;

use crate::error::VedicError;
use crate::graha::Graha;

use super::balance::nakshatra_birth_balance;
use super::query::find_active_period;
use super::subperiod::{build_cyclic_sequence, proportional_children};
use super::types::{DashaLevel, DashaPeriod, MAX_DASHA_LEVEL, MAX_PERIODS_PER_LEVEL};
use super::vimshottari_data::VimshottariConfig;

// ── Level-0 (Mahadasha) generation ───────────────────────────────────

/// Nine full mahadashas starting at `cycle_start_jd` with `first_lord`.
///
/// The cycle spans exactly 120 dasha years.
pub fn vimshottari_level0(
    cycle_start_jd: f64,
    first_lord: Graha,
    config: &VimshottariConfig,
) -> Vec<DashaPeriod> {
    let mut cursor = cycle_start_jd;
    config
        .sequence_from(first_lord)
        .into_iter()
        .enumerate()
        .map(|(i, (lord, days))| {
            let start = cursor;
            cursor += days;
            DashaPeriod::new(lord, start, cursor, DashaLevel::Mahadasha, (i as u16) + 1)
        })
        .collect()
}

/// Mahadashas from birth, with the first lord taken from the Moon's
/// nakshatra and its period shortened to the birth balance.
///
/// Trees built from these keep the canonical sub-periods of the first
/// mahadasha: those already over at birth are omitted.
pub fn vimshottari_level0_from_moon(
    birth_jd: f64,
    moon_sidereal_lon: f64,
    config: &VimshottariConfig,
) -> Vec<DashaPeriod> {
    let nak_idx = crate::nakshatra::nakshatra_from_longitude(moon_sidereal_lon).nakshatra_index;
    let first_lord = config.starting_graha(nak_idx);
    let entry_period = config.full_period_days(first_lord);
    let (_nak, balance_days, elapsed) = nakshatra_birth_balance(moon_sidereal_lon, entry_period);
    debug!(
        lord = %first_lord,
        nakshatra = nak_idx,
        elapsed,
        balance_days,
        "vimshottari birth balance"
    );

    let mut periods = vimshottari_level0(birth_jd, first_lord, config);
    let shortfall = entry_period - balance_days;
    for (i, p) in periods.iter_mut().enumerate() {
        if i > 0 {
            p.start_jd -= shortfall;
        }
        p.end_jd -= shortfall;
    }
    periods
}

// ── Children of one parent ───────────────────────────────────────────

/// All child periods of a single parent, starting from the parent's own lord.
pub fn vimshottari_children(parent: &DashaPeriod, config: &VimshottariConfig) -> Vec<DashaPeriod> {
    let Some(child_level) = parent.level.child_level() else {
        return Vec::new();
    };
    let seq = build_cyclic_sequence(&config.sequence_from(config.graha_sequence[0]), parent.lord);
    proportional_children(parent, &seq, config.total_period_days, child_level)
}

/// Children of a parent that may have been cut short at birth.
///
/// The children are laid out over the nominal span
/// `[nominal_start_jd, parent.end_jd)`. Those ending at or before
/// `parent.start_jd` are dropped and the one running at that instant is
/// clipped to start there. Each child is returned with its own nominal start.
/// Children keep their `order` in the full sequence.
fn clipped_children(
    parent: &DashaPeriod,
    nominal_start_jd: f64,
    config: &VimshottariConfig,
) -> Vec<(DashaPeriod, f64)> {
    if nominal_start_jd >= parent.start_jd {
        return vimshottari_children(parent, config)
            .into_iter()
            .map(|c| {
                let start = c.start_jd;
                (c, start)
            })
            .collect();
    }
    let nominal = DashaPeriod {
        start_jd: nominal_start_jd,
        sub_periods: Vec::new(),
        ..parent.clone()
    };
    vimshottari_children(&nominal, config)
        .into_iter()
        .filter(|c| c.end_jd > parent.start_jd)
        .map(|mut c| {
            let start = c.start_jd;
            if c.start_jd < parent.start_jd {
                c.start_jd = parent.start_jd;
            }
            (c, start)
        })
        .collect()
}

/// Where a mahadasha would have begun had it run its full length.
///
/// Equals `start_jd` except for a first mahadasha shortened to the birth balance.
fn nominal_start(md: &DashaPeriod, config: &VimshottariConfig) -> f64 {
    (md.end_jd - config.full_period_days(md.lord)).min(md.start_jd)
}

// ── Nested tree ──────────────────────────────────────────────────────

/// Fill in sub-periods below every mahadasha down to `max_level`.
///
/// `max_level` is clamped to [`MAX_DASHA_LEVEL`]; level 0 returns the
/// mahadashas unchanged.
pub fn vimshottari_tree(
    mut level0: Vec<DashaPeriod>,
    max_level: u8,
    config: &VimshottariConfig,
) -> Result<Vec<DashaPeriod>, VedicError> {
    let max_level = max_level.min(MAX_DASHA_LEVEL);
    let n = config.graha_sequence.len();
    let mut level_count = level0.len();
    for _ in 1..=max_level {
        level_count *= n;
        if level_count > MAX_PERIODS_PER_LEVEL {
            return Err(VedicError::InvalidInput(
                "dasha level would exceed MAX_PERIODS_PER_LEVEL",
            ));
        }
    }

    for md in &mut level0 {
        let nominal = nominal_start(md, config);
        fill_children(md, nominal, max_level, config);
    }
    Ok(level0)
}

fn fill_children(
    parent: &mut DashaPeriod,
    nominal_start_jd: f64,
    max_level: u8,
    config: &VimshottariConfig,
) {
    if parent.level as u8 >= max_level {
        return;
    }
    parent.sub_periods = clipped_children(parent, nominal_start_jd, config)
        .into_iter()
        .map(|(mut child, child_nominal)| {
            fill_children(&mut child, child_nominal, max_level, config);
            child
        })
        .collect();
}

/// Full 120-year cycle from a known first lord, as a tree to `max_level`.
pub fn vimshottari_cycle(
    cycle_start_jd: f64,
    first_lord: Graha,
    max_level: u8,
    config: &VimshottariConfig,
) -> Result<Vec<DashaPeriod>, VedicError> {
    vimshottari_tree(
        vimshottari_level0(cycle_start_jd, first_lord, config),
        max_level,
        config,
    )
}

/// Cycle from birth and the Moon's sidereal longitude, as a tree to `max_level`.
pub fn vimshottari_cycle_from_moon(
    birth_jd: f64,
    moon_sidereal_lon: f64,
    max_level: u8,
    config: &VimshottariConfig,
) -> Result<Vec<DashaPeriod>, VedicError> {
    if !moon_sidereal_lon.is_finite() {
        return Err(VedicError::InvalidInput("moon longitude must be finite"));
    }
    vimshottari_tree(
        vimshottari_level0_from_moon(birth_jd, moon_sidereal_lon, config),
        max_level,
        config,
    )
}

// ── Snapshot-only path ───────────────────────────────────────────────

/// Active periods at `query_jd`, one per level down to `max_level`.
///
/// Generates only the chain of active periods from the given mahadashas.
/// O(depth * sequence_length) instead of O(sequence_length^depth). The
/// returned periods carry no sub-periods.
pub fn vimshottari_snapshot(
    level0: &[DashaPeriod],
    query_jd: f64,
    max_level: u8,
    config: &VimshottariConfig,
) -> Vec<DashaPeriod> {
    let max_level = max_level.min(MAX_DASHA_LEVEL);
    let mut active = Vec::with_capacity(max_level as usize + 1);

    let Some(idx) = find_active_period(level0, query_jd) else {
        return active;
    };
    let mut current = DashaPeriod {
        sub_periods: Vec::new(),
        ..level0[idx].clone()
    };
    let mut nominal = nominal_start(&current, config);

    for _ in 1..=max_level {
        let mut children = clipped_children(&current, nominal, config);
        active.push(current);
        let Some(i) = children.iter().position(|(c, _)| c.is_current(query_jd)) else {
            return active;
        };
        (current, nominal) = children.swap_remove(i);
    }
    active.push(current);
    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dasha::types::DAYS_PER_YEAR;
    use crate::dasha::vimshottari_data::vimshottari_config;
    use crate::nakshatra::NAKSHATRA_SPAN_27;

    const J2000: f64 = 2451545.0;

    #[test]
    fn level0_full_cycle_is_120_years() {
        let cfg = vimshottari_config();
        let periods = vimshottari_level0(J2000, Graha::Shukra, &cfg);
        assert_eq!(periods.len(), 9);
        assert_eq!(periods[0].lord, Graha::Shukra);
        assert_eq!(periods[8].lord, Graha::Ketu);
        let span = periods[8].end_jd - periods[0].start_jd;
        assert!((span / DAYS_PER_YEAR - 120.0).abs() < 1e-9);
    }

    #[test]
    fn moon_at_ashwini_start_is_full_ketu() {
        let cfg = vimshottari_config();
        let periods = vimshottari_level0_from_moon(J2000, 0.0, &cfg);
        assert_eq!(periods[0].lord, Graha::Ketu);
        assert!((periods[0].duration_years() - 7.0).abs() < 1e-6);
        assert!((periods[0].start_jd - J2000).abs() < 1e-10);
    }

    #[test]
    fn moon_mid_rohini_halves_chandra() {
        let cfg = vimshottari_config();
        let mid_rohini = 40.0 + NAKSHATRA_SPAN_27 / 2.0;
        let periods = vimshottari_level0_from_moon(J2000, mid_rohini, &cfg);
        assert_eq!(periods[0].lord, Graha::Chandra);
        assert!((periods[0].duration_years() - 5.0).abs() < 1e-6);
        // Later mahadashas keep their full length
        assert_eq!(periods[1].lord, Graha::Mangal);
        assert!((periods[1].duration_years() - 7.0).abs() < 1e-6);
    }

    #[test]
    fn birth_antardasha_follows_elapsed_arc() {
        let cfg = vimshottari_config();
        let mid_rohini = 40.0 + NAKSHATRA_SPAN_27 / 2.0;
        let tree = vimshottari_cycle_from_moon(J2000, mid_rohini, 1, &cfg).unwrap();
        let ads = &tree[0].sub_periods;

        // Five of Chandra's ten years are spent; Moon, Mars, Rahu and Jupiter are over
        assert_eq!(ads.len(), 5);
        assert_eq!(ads[0].lord, Graha::Shani);
        assert_eq!(ads[0].order, 5);
        assert_eq!(ads[0].start_jd, J2000);
        // Shani runs 5.0..5.8333y of the full Chandra mahadasha
        assert!((ads[0].duration_years() - 10.0 / 12.0).abs() < 1e-9);
        assert_eq!(ads[1].lord, Graha::Buddh);
        assert!((ads[1].duration_years() - 17.0 / 12.0).abs() < 1e-9);
        assert_eq!(ads[4].lord, Graha::Surya);
        assert_eq!(ads[4].end_jd, tree[0].end_jd);

        // Later mahadashas are whole
        assert_eq!(tree[1].sub_periods.len(), 9);
        assert_eq!(tree[1].sub_periods[0].lord, Graha::Mangal);
    }

    #[test]
    fn birth_chain_clipped_at_every_level() {
        let cfg = vimshottari_config();
        let moon = 100.0;
        let tree = vimshottari_cycle_from_moon(J2000, moon, 3, &cfg).unwrap();
        crate::dasha::validate::validate_periods(&tree).unwrap();

        let level0 = vimshottari_level0_from_moon(J2000, moon, &cfg);
        let snap = vimshottari_snapshot(&level0, J2000, 3, &cfg);
        let mut node = &tree[0];
        for (depth, active) in snap.iter().enumerate() {
            assert_eq!(node.lord, active.lord, "level {depth}");
            assert_eq!(node.start_jd, J2000, "level {depth}");
            assert!((node.end_jd - active.end_jd).abs() < 1e-9, "level {depth}");
            if let Some(first) = node.sub_periods.first() {
                node = first;
            }
        }
    }

    #[test]
    fn adjacent_periods_no_gaps() {
        let cfg = vimshottari_config();
        let periods = vimshottari_level0_from_moon(J2000, 100.0, &cfg);
        for pair in periods.windows(2) {
            assert!((pair[1].start_jd - pair[0].end_jd).abs() < 1e-10);
        }
    }

    #[test]
    fn children_start_with_parent_lord() {
        let cfg = vimshottari_config();
        let periods = vimshottari_level0(J2000, Graha::Ketu, &cfg);
        let children = vimshottari_children(&periods[0], &cfg);
        assert_eq!(children.len(), 9);
        assert_eq!(children[0].lord, Graha::Ketu);
        assert_eq!(children[1].lord, Graha::Shukra);
        assert!((children[0].start_jd - periods[0].start_jd).abs() < 1e-10);
        assert_eq!(children[8].end_jd, periods[0].end_jd);
    }

    #[test]
    fn pranadasha_has_no_children() {
        let p = DashaPeriod::new(Graha::Ketu, 0.0, 1.0, DashaLevel::Pranadasha, 1);
        assert!(vimshottari_children(&p, &vimshottari_config()).is_empty());
    }

    #[test]
    fn tree_level_counts() {
        let cfg = vimshottari_config();
        let tree = vimshottari_cycle(J2000, Graha::Ketu, 2, &cfg).unwrap();
        assert_eq!(tree.len(), 9);
        assert!(tree.iter().all(|md| md.sub_periods.len() == 9));
        let level2: usize = tree
            .iter()
            .flat_map(|md| md.sub_periods.iter())
            .map(|ad| ad.sub_periods.len())
            .sum();
        assert_eq!(level2, 729);
        assert_eq!(tree[0].depth(), 3);
    }

    #[test]
    fn tree_level_zero_has_no_children() {
        let cfg = vimshottari_config();
        let tree = vimshottari_cycle(J2000, Graha::Ketu, 0, &cfg).unwrap();
        assert!(tree.iter().all(|md| md.sub_periods.is_empty()));
    }

    #[test]
    fn tree_rejects_too_many_periods() {
        let cfg = vimshottari_config();
        // Two cycles' worth of mahadashas at level 4 exceed the cap
        let mut level0 = vimshottari_level0(J2000, Graha::Ketu, &cfg);
        level0.extend(vimshottari_level0(J2000 + 43830.0, Graha::Ketu, &cfg));
        assert!(vimshottari_tree(level0, 4, &cfg).is_err());
    }

    #[test]
    fn non_finite_moon_rejected() {
        let cfg = vimshottari_config();
        assert!(vimshottari_cycle_from_moon(J2000, f64::NAN, 1, &cfg).is_err());
    }

    #[test]
    fn snapshot_matches_tree() {
        let cfg = vimshottari_config();
        let level0 = vimshottari_level0_from_moon(J2000, 100.0, &cfg);
        let tree = vimshottari_tree(level0.clone(), 2, &cfg).unwrap();
        let query = J2000 + 1000.0;
        let snap = vimshottari_snapshot(&level0, query, 2, &cfg);
        assert_eq!(snap.len(), 3);

        let md = tree.iter().find(|p| p.is_current(query)).unwrap();
        let ad = md.sub_periods.iter().find(|p| p.is_current(query)).unwrap();
        let pd = ad.sub_periods.iter().find(|p| p.is_current(query)).unwrap();
        assert_eq!(snap[0].lord, md.lord);
        assert_eq!(snap[1].lord, ad.lord);
        assert_eq!(snap[2].lord, pd.lord);
        assert!((snap[2].start_jd - pd.start_jd).abs() < 1e-9);
    }

    #[test]
    fn snapshot_outside_cycle_is_empty() {
        let cfg = vimshottari_config();
        let level0 = vimshottari_level0(J2000, Graha::Ketu, &cfg);
        assert!(vimshottari_snapshot(&level0, J2000 - 1.0, 2, &cfg).is_empty());
    }
}
