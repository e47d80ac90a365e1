//! Structural checks on period trees from outside this crate.

use crate::error::VedicError;

use super::types::DashaPeriod;

/// Largest overlap between neighbours accepted, in days (~0.09 s).
///
/// Gaps get no tolerance: an instant inside one would have no current period.
/// An instant inside an accepted overlap resolves to the earlier period.
pub const BOUNDARY_TOLERANCE_DAYS: f64 = 1e-6;

/// Check that `periods` are contiguous and each level of sub-periods covers
/// its parent, recursively.
pub fn validate_periods(periods: &[DashaPeriod]) -> Result<(), VedicError> {
    validate_level(periods, "timeline")
}

fn validate_level(periods: &[DashaPeriod], path: &str) -> Result<(), VedicError> {
    for (i, p) in periods.iter().enumerate() {
        if !p.start_jd.is_finite() || !p.end_jd.is_finite() {
            return Err(VedicError::MalformedPeriods(format!(
                "{path}[{i}] ({}) has a non-finite boundary",
                p.lord
            )));
        }
        if p.end_jd < p.start_jd {
            return Err(VedicError::MalformedPeriods(format!(
                "{path}[{i}] ({}) ends before it starts",
                p.lord
            )));
        }
    }

    for (i, pair) in periods.windows(2).enumerate() {
        let gap = pair[1].start_jd - pair[0].end_jd;
        if gap > 0.0 || -gap > BOUNDARY_TOLERANCE_DAYS {
            let kind = if gap > 0.0 { "gap" } else { "overlap" };
            return Err(VedicError::MalformedPeriods(format!(
                "{kind} of {:.6} days between {path}[{i}] and {path}[{}]",
                gap.abs(),
                i + 1
            )));
        }
    }

    for (i, p) in periods.iter().enumerate() {
        let (Some(first), Some(last)) = (p.sub_periods.first(), p.sub_periods.last()) else {
            continue;
        };
        let late_start = first.start_jd - p.start_jd;
        let early_end = p.end_jd - last.end_jd;
        if late_start > 0.0
            || early_end > 0.0
            || -late_start > BOUNDARY_TOLERANCE_DAYS
            || -early_end > BOUNDARY_TOLERANCE_DAYS
        {
            return Err(VedicError::MalformedPeriods(format!(
                "sub-periods of {path}[{i}] ({}) do not cover it",
                p.lord
            )));
        }
        validate_level(&p.sub_periods, &format!("{path}[{i}]"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dasha::types::DashaLevel;
    use crate::dasha::vimshottari::vimshottari_cycle;
    use crate::dasha::vimshottari_data::vimshottari_config;
    use crate::graha::Graha;

    #[test]
    fn generated_tree_is_valid() {
        let tree = vimshottari_cycle(2451545.0, Graha::Shukra, 3, &vimshottari_config()).unwrap();
        assert_eq!(validate_periods(&tree), Ok(()));
    }

    #[test]
    fn empty_is_valid() {
        assert_eq!(validate_periods(&[]), Ok(()));
    }

    #[test]
    fn gap_rejected() {
        let periods = vec![
            DashaPeriod::new(Graha::Ketu, 0.0, 10.0, DashaLevel::Mahadasha, 1),
            DashaPeriod::new(Graha::Shukra, 10.5, 20.0, DashaLevel::Mahadasha, 2),
        ];
        let err = validate_periods(&periods).unwrap_err();
        assert!(err.to_string().contains("gap"));
    }

    #[test]
    fn sub_tolerance_gap_rejected() {
        let periods = vec![
            DashaPeriod::new(Graha::Ketu, 0.0, 10.0, DashaLevel::Mahadasha, 1),
            DashaPeriod::new(Graha::Shukra, 10.0 + 1e-7, 20.0, DashaLevel::Mahadasha, 2),
        ];
        let err = validate_periods(&periods).unwrap_err();
        assert!(err.to_string().contains("gap"));

        let mut parent = DashaPeriod::new(Graha::Ketu, 0.0, 10.0, DashaLevel::Mahadasha, 1);
        parent.sub_periods = vec![
            DashaPeriod::new(Graha::Ketu, 1e-7, 4.0, DashaLevel::Antardasha, 1),
            DashaPeriod::new(Graha::Shukra, 4.0, 10.0, DashaLevel::Antardasha, 2),
        ];
        assert!(validate_periods(&[parent]).is_err());
    }

    #[test]
    fn sub_tolerance_overlap_resolves_to_earlier() {
        let mut parent = DashaPeriod::new(Graha::Ketu, 0.0, 10.0, DashaLevel::Mahadasha, 1);
        parent.sub_periods = vec![
            DashaPeriod::new(Graha::Ketu, 0.0, 4.0 + 1e-7, DashaLevel::Antardasha, 1),
            DashaPeriod::new(Graha::Shukra, 4.0, 10.0, DashaLevel::Antardasha, 2),
        ];
        let periods = [parent];
        assert_eq!(validate_periods(&periods), Ok(()));

        let cur = crate::dasha::resolve::resolve_validated(&periods, 4.0 + 5e-8);
        assert_eq!(cur.antardasha.map(|p| p.lord), Some(Graha::Ketu));
        let cur = crate::dasha::resolve::resolve_validated(&periods, 4.0 + 2e-7);
        assert_eq!(cur.antardasha.map(|p| p.lord), Some(Graha::Shukra));
    }

    #[test]
    fn overlap_rejected() {
        let periods = vec![
            DashaPeriod::new(Graha::Ketu, 0.0, 10.0, DashaLevel::Mahadasha, 1),
            DashaPeriod::new(Graha::Shukra, 9.0, 20.0, DashaLevel::Mahadasha, 2),
        ];
        let err = validate_periods(&periods).unwrap_err();
        assert!(err.to_string().contains("overlap"));
    }

    #[test]
    fn inverted_period_rejected() {
        let periods = vec![DashaPeriod::new(Graha::Ketu, 10.0, 0.0, DashaLevel::Mahadasha, 1)];
        assert!(validate_periods(&periods).is_err());
    }

    #[test]
    fn zero_length_allowed() {
        let periods = vec![
            DashaPeriod::new(Graha::Ketu, 0.0, 0.0, DashaLevel::Mahadasha, 1),
            DashaPeriod::new(Graha::Shukra, 0.0, 20.0, DashaLevel::Mahadasha, 2),
        ];
        assert!(validate_periods(&periods).is_ok());
    }

    #[test]
    fn uncovered_parent_rejected() {
        let mut parent = DashaPeriod::new(Graha::Ketu, 0.0, 10.0, DashaLevel::Mahadasha, 1);
        parent.sub_periods = vec![
            DashaPeriod::new(Graha::Ketu, 0.0, 4.0, DashaLevel::Antardasha, 1),
            DashaPeriod::new(Graha::Shukra, 4.0, 9.0, DashaLevel::Antardasha, 2),
        ];
        assert!(matches!(
            validate_periods(&[parent]),
            Err(VedicError::MalformedPeriods(_))
        ));
    }

    #[test]
    fn nested_gap_rejected() {
        let mut parent = DashaPeriod::new(Graha::Ketu, 0.0, 10.0, DashaLevel::Mahadasha, 1);
        parent.sub_periods = vec![
            DashaPeriod::new(Graha::Ketu, 0.0, 4.0, DashaLevel::Antardasha, 1),
            DashaPeriod::new(Graha::Shukra, 5.0, 10.0, DashaLevel::Antardasha, 2),
        ];
        let err = validate_periods(&[parent]).unwrap_err();
        assert!(err.to_string().contains("timeline[0][0]"));
    }
}
