//! Cascading imputation of missing weather station readings.
//!
//! Each target cell is classified by the size of the gap around it, then
//! resolved by the first estimator that produces a value:
//!
//! 1. [`interpolation`]: bounded linear interpolation, for short gaps;
//! 2. [`regression`]: least squares on reliable co-observed variables
//!    ([`predictors`]), per station or pooled across stations;
//! 3. [`fallback`]: the (station, period) mean, then the period mean.
//!
//! [`cascade::Imputer`] runs the whole sequence and clamps the result.

pub mod cascade;
pub mod fallback;
pub mod gap;
pub mod interpolation;
pub mod predictors;
pub mod regression;

pub use cascade::{ImputationReport, Imputer, Resolution, Stage};
pub use gap::GapProfile;
pub use regression::RegressionMode;
