//! The imputation cascade: gap analysis, interpolation, regression, then
//! group and period means, with an output clamp on whatever comes out.

use crate::{
    fallback::{group_mean, period_mean},
    gap::{analyze, GapProfile},
    interpolation::interpolate,
    predictors::select,
    regression::{predict, Prediction, RegressionMode},
};
use log::{debug, info, warn};
use std::fmt;
use wx_station::{ImputeConfig, ReferenceSeries, Result, Target, Variable, WxError};

/// The estimator that produced a target's value.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Stage {
    Interpolated,
    Regression(RegressionMode),
    GroupMean,
    PeriodMean,
}

/// Final estimate for one target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub target: Target,
    pub gap: GapProfile,
    pub stage: Stage,
    /// Value after the output clamp.
    pub value: f64,
    /// Whether the output clamp replaced the estimate.
    pub clamped: bool,
}

/// Resolve one target against two snapshots of the same series: `raw`
/// (inputs clamped, nothing filled) for gap analysis and `filled` (after
/// window interpolation) for every estimator.
///
/// Recoverable regression failures fall through to the group means; an
/// out-of-range target or a period with no observation at all is an error.
pub fn resolve(
    raw: &ReferenceSeries,
    filled: &ReferenceSeries,
    target: Target,
    config: &ImputeConfig,
) -> Result<Resolution> {
    let gap = analyze(raw, target, config.probe_limit)?;
    let (estimate, stage) = estimate(filled, target, gap, config)?;
    let value = config.clamp_output(estimate);
    let clamped = value != estimate;
    if clamped {
        debug!(
            "row {}: {} estimate {} outside output bound, using {}",
            target.row, target.variable, estimate, value
        );
    }
    Ok(Resolution {
        target,
        gap,
        stage,
        value,
        clamped,
    })
}

fn estimate(
    filled: &ReferenceSeries,
    target: Target,
    gap: GapProfile,
    config: &ImputeConfig,
) -> Result<(f64, Stage)> {
    if gap.is_interpolation_eligible(config.interpolation_bound) {
        if let Some(value) = filled.value(target.row, target.variable) {
            return Ok((value, Stage::Interpolated));
        }
        debug!(
            "row {}: gap {:?} is eligible but the run was not filled",
            target.row, gap
        );
    }

    match regress(filled, target, config) {
        Ok(Some(prediction)) => return Ok((prediction.value, Stage::Regression(prediction.mode))),
        Ok(None) => debug!("row {}: no usable predictors for {}", target.row, target.variable),
        Err(WxError::PredictionFailed(reason)) => {
            warn!("row {}: prediction for {} failed: {}", target.row, target.variable, reason)
        }
        Err(e) if e.is_recoverable() => debug!("row {}: {}", target.row, e),
        Err(e) => return Err(e),
    }

    let obs = filled.get(target.row)?;
    if let Some(value) = group_mean(filled, target.variable, &obs.station, obs.period) {
        return Ok((value, Stage::GroupMean));
    }
    if let Some(value) = period_mean(filled, target.variable, obs.period) {
        return Ok((value, Stage::PeriodMean));
    }
    Err(WxError::UnresolvedTarget {
        row: target.row,
        variable: target.variable.to_string(),
        period: obs.period.month(),
    })
}

fn regress(filled: &ReferenceSeries, target: Target, config: &ImputeConfig) -> Result<Option<Prediction>> {
    let set = select(filled, target, config.reliability_threshold)?;
    if set.is_empty() {
        return Ok(None);
    }
    predict(filled, target, &set, config.sample_size_threshold).map(Some)
}

/// Holds the prepared snapshots of a reference series and resolves targets
/// against them.
#[derive(Debug, Clone)]
pub struct Imputer {
    config: ImputeConfig,
    raw: ReferenceSeries,
    filled: ReferenceSeries,
}

impl Imputer {
    /// Clamp inputs and run window interpolation once over the whole series.
    pub fn new(series: &ReferenceSeries, config: ImputeConfig) -> Result<Self> {
        config.validate()?;
        let raw = series.with_clamped_inputs(config.input_bound);
        let filled = interpolate(&raw, &Variable::ALL, config.interpolation_bound)?;
        Ok(Imputer {
            config,
            raw,
            filled,
        })
    }

    pub fn config(&self) -> &ImputeConfig {
        &self.config
    }

    /// The series after input clamping, before interpolation.
    pub fn raw(&self) -> &ReferenceSeries {
        &self.raw
    }

    /// The series after input clamping and interpolation.
    pub fn filled(&self) -> &ReferenceSeries {
        &self.filled
    }

    pub fn gap_profile(&self, target: Target) -> Result<GapProfile> {
        analyze(&self.raw, target, self.config.probe_limit)
    }

    pub fn resolve(&self, target: Target) -> Result<Resolution> {
        resolve(&self.raw, &self.filled, target, &self.config)
    }

    /// Resolve every target, stopping at the first unrecoverable error.
    pub fn run(&self, targets: &[Target]) -> Result<Vec<Resolution>> {
        let resolutions = targets
            .iter()
            .map(|target| self.resolve(*target))
            .collect::<Result<Vec<Resolution>>>()?;
        info!("{}", ImputationReport::from_resolutions(&resolutions));
        Ok(resolutions)
    }
}

/// Per-stage counts for a batch of resolutions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImputationReport {
    pub interpolated: usize,
    pub per_station: usize,
    pub pooled: usize,
    pub group_mean: usize,
    pub period_mean: usize,
    pub clamped: usize,
}

impl ImputationReport {
    pub fn from_resolutions(resolutions: &[Resolution]) -> Self {
        resolutions
            .iter()
            .fold(ImputationReport::default(), |mut report, r| {
                match r.stage {
                    Stage::Interpolated => report.interpolated += 1,
                    Stage::Regression(RegressionMode::PerStation) => report.per_station += 1,
                    Stage::Regression(RegressionMode::Pooled) => report.pooled += 1,
                    Stage::GroupMean => report.group_mean += 1,
                    Stage::PeriodMean => report.period_mean += 1,
                }
                report.clamped += usize::from(r.clamped);
                report
            })
    }

    pub fn total(&self) -> usize {
        self.interpolated + self.per_station + self.pooled + self.group_mean + self.period_mean
    }
}

impl fmt::Display for ImputationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Resolved {} targets: {} interpolated, {} per-station regression, {} pooled regression, {} group mean, {} period mean ({} clamped)",
            self.total(),
            self.interpolated,
            self.per_station,
            self.pooled,
            self.group_mean,
            self.period_mean,
            self.clamped
        )
    }
}
