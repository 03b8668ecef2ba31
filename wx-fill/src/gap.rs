//! Gap-size analysis around a target cell.

use wx_station::{ReferenceSeries, Result, Target};

/// Contiguous missing neighbours of a target in its own column.
///
/// `above` counts rows before the target, `below` rows after it. Both are
/// capped at `probe_limit`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct GapProfile {
    pub above: usize,
    pub below: usize,
}

impl GapProfile {
    /// Both sides are short enough for windowed interpolation.
    pub fn is_interpolation_eligible(&self, bound: usize) -> bool {
        self.above <= bound && self.below <= bound
    }
}

/// Count missing cells in `target.variable` immediately above and below
/// `target.row`.
///
/// Each walk stops at the first present value, at the series boundary, or
/// after `probe_limit` steps, whichever comes first. Fails with
/// `InvalidTarget` when the row is outside the series.
pub fn analyze(series: &ReferenceSeries, target: Target, probe_limit: usize) -> Result<GapProfile> {
    series.get(target.row)?;
    let observations = series.observations();

    let above = observations[..target.row]
        .iter()
        .rev()
        .take(probe_limit)
        .take_while(|obs| obs.is_missing(target.variable))
        .count();
    let below = observations[target.row + 1..]
        .iter()
        .take(probe_limit)
        .take_while(|obs| obs.is_missing(target.variable))
        .count();

    Ok(GapProfile { above, below })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wx_station::{Observation, Period, Variable, WxError};

    fn series_from(column: &[Option<f64>]) -> ReferenceSeries {
        let period = Period::new(1).unwrap();
        ReferenceSeries::new(
            column
                .iter()
                .map(|v| Observation::new("S", period, [*v, Some(0.0), Some(0.0), Some(0.0), Some(0.0)]))
                .collect(),
        )
    }

    fn target(row: usize) -> Target {
        Target::new(row, Variable::WindDirection)
    }

    #[test]
    fn test_counts_both_sides_independently() {
        let series = series_from(&[
            Some(1.0),
            None,
            None,
            None,
            None,
            None,
            None,
            Some(2.0),
        ]);
        // target at row 4: rows 1..=3 above, rows 5..=6 below
        let profile = analyze(&series, target(4), 20).unwrap();
        assert_eq!(profile, GapProfile { above: 3, below: 2 });
        assert!(profile.is_interpolation_eligible(6));
    }

    #[test]
    fn test_present_neighbours_give_zero() {
        let series = series_from(&[Some(1.0), None, Some(2.0)]);
        let profile = analyze(&series, target(1), 20).unwrap();
        assert_eq!(profile, GapProfile { above: 0, below: 0 });
    }

    #[test]
    fn test_boundary_counts_steps_taken() {
        let series = series_from(&[None, None, None, Some(1.0)]);
        let profile = analyze(&series, target(2), 20).unwrap();
        assert_eq!(profile.above, 2);
        assert_eq!(profile.below, 0);

        let profile = analyze(&series, target(0), 20).unwrap();
        assert_eq!(profile.above, 0);
        assert_eq!(profile.below, 2);
    }

    #[test]
    fn test_probe_limit_caps_counts() {
        let mut column = vec![Some(0.0)];
        column.extend(std::iter::repeat(None).take(60));
        column.push(Some(0.0));
        let series = series_from(&column);
        let profile = analyze(&series, target(30), 20).unwrap();
        assert_eq!(profile, GapProfile { above: 20, below: 20 });
        assert!(!profile.is_interpolation_eligible(6));
    }

    #[test]
    fn test_adjacent_observation_shrinks_gap() {
        let mut column = vec![Some(0.0), None, None, None, None, Some(0.0)];
        let before = analyze(&series_from(&column), target(4), 20).unwrap();
        column[2] = Some(1.0);
        let after = analyze(&series_from(&column), target(4), 20).unwrap();
        assert_eq!(before.above, 3);
        assert_eq!(after.above, 1);
        assert!(after.above < before.above);
    }

    #[test]
    fn test_out_of_range_row() {
        let series = series_from(&[Some(1.0)]);
        assert!(matches!(
            analyze(&series, target(5), 20),
            Err(WxError::InvalidTarget { row: 5, len: 1 })
        ));
    }
}
