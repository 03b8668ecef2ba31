//! Adaptive choice of regression predictors for a target row.

use crate::regression::RegressionMode;
use log::debug;
use wx_station::{Period, ReferenceSeries, Result, Target, Variable};

/// A column of the regression design.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Covariate {
    /// A measured variable used as a continuous predictor.
    Predictor(Variable),
    /// One-hot period-of-year indicators.
    PeriodOfYear,
    /// One-hot station indicators (pooled fits only).
    StationIdentity,
}

/// Predictors that are both observed at the target row and reliable for
/// the target's station, along with the row's categorical context.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictorSet {
    pub station: String,
    pub period: Period,
    pub predictors: Vec<Variable>,
}

impl PredictorSet {
    pub fn is_empty(&self) -> bool {
        self.predictors.is_empty()
    }

    /// Design columns for a fit in the given mode.
    pub fn covariates(&self, mode: RegressionMode) -> Vec<Covariate> {
        let mut covariates: Vec<Covariate> = self
            .predictors
            .iter()
            .map(|v| Covariate::Predictor(*v))
            .collect();
        covariates.push(Covariate::PeriodOfYear);
        if mode == RegressionMode::Pooled {
            covariates.push(Covariate::StationIdentity);
        }
        covariates
    }
}

/// Fraction of `station`'s rows where `variable` is missing.
///
/// A station with no rows at all counts as fully missing.
pub fn missingness_rate(series: &ReferenceSeries, station: &str, variable: Variable) -> f64 {
    let (total, missing) = series
        .station_rows(station)
        .fold((0usize, 0usize), |(total, missing), obs| {
            (total + 1, missing + usize::from(obs.is_missing(variable)))
        });
    if total == 0 {
        return 1.0;
    }
    missing as f64 / total as f64
}

/// Pick the predictors for `target`.
///
/// Keeps the other four variables that are observed at the target row, then
/// drops those missing at a rate of `reliability_threshold` or more across
/// the station's history. An empty result means regression should be skipped.
pub fn select(
    series: &ReferenceSeries,
    target: Target,
    reliability_threshold: f64,
) -> Result<PredictorSet> {
    let obs = series.get(target.row)?;

    let predictors = target
        .variable
        .others()
        .filter(|v| !obs.is_missing(*v))
        .filter(|v| {
            let rate = missingness_rate(series, &obs.station, *v);
            let reliable = rate < reliability_threshold;
            if !reliable {
                debug!(
                    "row {}: dropping predictor {} ({:.0}% missing at station {})",
                    target.row,
                    v,
                    rate * 100.0,
                    obs.station
                );
            }
            reliable
        })
        .collect();

    Ok(PredictorSet {
        station: obs.station.clone(),
        period: obs.period,
        predictors,
    })
}
