//! Group-mean estimators used when regression is unavailable.

use wx_station::{Observation, Period, ReferenceSeries, Variable};

fn mean_where<F>(series: &ReferenceSeries, variable: Variable, keep: F) -> Option<f64>
where
    F: Fn(&Observation) -> bool,
{
    let (sum, count) = series
        .observations()
        .iter()
        .filter(|obs| keep(*obs))
        .filter_map(|obs| obs.value(variable))
        .fold((0.0, 0usize), |(sum, count), x| (sum + x, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Mean of `variable` over rows of `station` in `period`, ignoring missing
/// readings. `None` when the group has no observed value.
pub fn group_mean(
    series: &ReferenceSeries,
    variable: Variable,
    station: &str,
    period: Period,
) -> Option<f64> {
    mean_where(series, variable, |obs| {
        obs.period == period && obs.station == station
    })
}

/// Mean of `variable` over every station's rows in `period`.
pub fn period_mean(series: &ReferenceSeries, variable: Variable, period: Period) -> Option<f64> {
    mean_where(series, variable, |obs| obs.period == period)
}
