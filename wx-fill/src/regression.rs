//! Per-station and pooled least-squares imputation.
//!
//! The response is regressed on the selected predictors plus one-hot
//! period-of-year indicators. A station with enough complete history gets
//! its own model; otherwise rows from every station are pooled and station
//! identity enters as reference-coded indicators.

use crate::predictors::{Covariate, PredictorSet};
use log::debug;
use nalgebra::{DMatrix, DVector};
use std::collections::BTreeSet;
use wx_station::{Observation, Period, ReferenceSeries, Result, Target, Variable, WxError};

/// Singular values of X'X below this fraction of the largest one count as
/// zero when checking the design for rank deficiency.
pub const RANK_TOLERANCE: f64 = 1e-10;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum RegressionMode {
    PerStation,
    Pooled,
}

/// Column layout of a design matrix: continuous predictors first, then the
/// period levels seen in the fitting rows, then the non-reference station
/// levels.
#[derive(Debug, Clone)]
pub struct DesignLayout {
    covariates: Vec<Covariate>,
    periods: Vec<Period>,
    reference_station: Option<String>,
    stations: Vec<String>,
}

impl DesignLayout {
    pub fn new(set: &PredictorSet, mode: RegressionMode, rows: &[&Observation]) -> Self {
        let periods: Vec<Period> = rows
            .iter()
            .map(|obs| obs.period)
            .collect::<BTreeSet<Period>>()
            .into_iter()
            .collect();
        let (reference_station, stations) = match mode {
            RegressionMode::PerStation => (None, Vec::new()),
            RegressionMode::Pooled => {
                let mut levels = rows
                    .iter()
                    .map(|obs| obs.station.as_str())
                    .collect::<BTreeSet<&str>>()
                    .into_iter()
                    .map(String::from);
                let reference = levels.next();
                (reference, levels.collect())
            }
        };
        DesignLayout {
            covariates: set.covariates(mode),
            periods,
            reference_station,
            stations,
        }
    }

    pub fn width(&self) -> usize {
        self.covariates
            .iter()
            .map(|c| match c {
                Covariate::Predictor(_) => 1,
                Covariate::PeriodOfYear => self.periods.len(),
                Covariate::StationIdentity => self.stations.len(),
            })
            .sum()
    }

    /// Encode one observation as a design row.
    ///
    /// Fails when a predictor is missing or the row's period or station was
    /// not seen among the fitting rows.
    pub fn encode(&self, obs: &Observation) -> Result<Vec<f64>> {
        let mut row = Vec::with_capacity(self.width());
        for covariate in &self.covariates {
            match covariate {
                Covariate::Predictor(v) => {
                    let value = obs.value(*v).ok_or_else(|| {
                        WxError::PredictionFailed(format!("predictor {v} is missing"))
                    })?;
                    row.push(value);
                }
                Covariate::PeriodOfYear => {
                    let level = self.periods.binary_search(&obs.period).map_err(|_| {
                        WxError::PredictionFailed(format!(
                            "period {} has no complete rows to fit on",
                            obs.period
                        ))
                    })?;
                    push_one_hot(&mut row, self.periods.len(), Some(level));
                }
                Covariate::StationIdentity => {
                    let level = if self.reference_station.as_deref() == Some(obs.station.as_str()) {
                        None
                    } else {
                        let position = self.stations.binary_search(&obs.station).map_err(|_| {
                            WxError::PredictionFailed(format!(
                                "station {} has no complete rows to fit on",
                                obs.station
                            ))
                        })?;
                        Some(position)
                    };
                    push_one_hot(&mut row, self.stations.len(), level);
                }
            }
        }
        Ok(row)
    }
}

fn push_one_hot(row: &mut Vec<f64>, levels: usize, hot: Option<usize>) {
    row.extend((0..levels).map(|i| if Some(i) == hot { 1.0 } else { 0.0 }));
}

/// Solve ordinary least squares through the normal equations.
///
/// Fails with `PredictionFailed` when the design is empty or rank
/// deficient.
pub fn least_squares(design: &DMatrix<f64>, response: &DVector<f64>) -> Result<DVector<f64>> {
    let width = design.ncols();
    if design.nrows() == 0 || width == 0 {
        return Err(WxError::PredictionFailed("empty design matrix".to_string()));
    }
    let xtx = design.transpose() * design;
    let xty = design.transpose() * response;

    let svd = xtx.svd(true, true);
    let largest = svd.singular_values.max();
    if !(largest.is_finite() && largest > 0.0) {
        return Err(WxError::PredictionFailed("degenerate design matrix".to_string()));
    }
    let tolerance = largest * RANK_TOLERANCE;
    let rank = svd.rank(tolerance);
    if rank < width {
        return Err(WxError::PredictionFailed(format!(
            "rank deficient design ({rank} of {width} columns)"
        )));
    }
    svd.solve(&xty, tolerance)
        .map_err(|e| WxError::PredictionFailed(e.to_string()))
}

/// A fitted linear model together with the layout needed to apply it.
#[derive(Debug, Clone)]
pub struct LinearModel {
    pub mode: RegressionMode,
    pub n_rows: usize,
    layout: DesignLayout,
    coefficients: DVector<f64>,
}

impl LinearModel {
    pub fn fit(
        rows: &[&Observation],
        response: Variable,
        set: &PredictorSet,
        mode: RegressionMode,
    ) -> Result<Self> {
        let layout = DesignLayout::new(set, mode, rows);
        let width = layout.width();
        let mut flat = Vec::with_capacity(rows.len() * width);
        let mut y = Vec::with_capacity(rows.len());
        for obs in rows {
            let value = obs.value(response).ok_or_else(|| {
                WxError::PredictionFailed(format!("response {response} is missing"))
            })?;
            flat.extend(layout.encode(obs)?);
            y.push(value);
        }
        let design = DMatrix::from_row_slice(rows.len(), width, &flat);
        let coefficients = least_squares(&design, &DVector::from_vec(y))?;
        Ok(LinearModel {
            mode,
            n_rows: rows.len(),
            layout,
            coefficients,
        })
    }

    pub fn predict(&self, obs: &Observation) -> Result<f64> {
        let x = DVector::from_vec(self.layout.encode(obs)?);
        let value = x.dot(&self.coefficients);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(WxError::PredictionFailed(format!("non-finite prediction {value}")))
        }
    }
}

/// A regression estimate and how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub value: f64,
    pub mode: RegressionMode,
    pub n_rows: usize,
}

fn is_complete(obs: &Observation, response: Variable, predictors: &[Variable]) -> bool {
    !obs.is_missing(response) && predictors.iter().all(|v| !obs.is_missing(*v))
}

/// Estimate `target` by regression on `set`.
///
/// Uses a per-station model when the station has more than
/// `sample_size_threshold` complete rows, a pooled model otherwise.
/// `InsufficientData` means there was nothing to fit on; `PredictionFailed`
/// covers degenerate designs and non-finite results.
pub fn predict(
    series: &ReferenceSeries,
    target: Target,
    set: &PredictorSet,
    sample_size_threshold: usize,
) -> Result<Prediction> {
    if set.is_empty() {
        return Err(WxError::PredictionFailed("no predictors selected".to_string()));
    }
    let obs = series.get(target.row)?;
    let complete = |o: &&Observation| is_complete(o, target.variable, &set.predictors);

    let station_rows: Vec<&Observation> = series.station_rows(&set.station).filter(complete).collect();
    let (mode, rows) = if station_rows.len() > sample_size_threshold {
        (RegressionMode::PerStation, station_rows)
    } else {
        let pooled: Vec<&Observation> = series.observations().iter().filter(complete).collect();
        (RegressionMode::Pooled, pooled)
    };
    if rows.is_empty() {
        return Err(WxError::InsufficientData {
            station: set.station.clone(),
        });
    }

    debug!(
        "row {}: fitting {:?} model for {} on {} rows with {:?}",
        target.row,
        mode,
        target.variable,
        rows.len(),
        set.predictors
    );
    let model = LinearModel::fit(&rows, target.variable, set, mode)?;
    let value = model.predict(obs)?;
    Ok(Prediction {
        value,
        mode,
        n_rows: model.n_rows,
    })
}
