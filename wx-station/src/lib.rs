//! Core types and CSV loading for multi-station weather observations.
//!
//! A reference series holds time-ordered observations from many stations,
//! each carrying a period-of-year and five standardised measurements
//! (wind direction, wind speed, temperature, dewpoint, pressure) that may be
//! missing. Targets name the cells whose values must be estimated.

pub mod config;
pub mod error;
pub mod observation;
pub mod series;
pub mod target;
pub mod variable;

pub use config::ImputeConfig;
pub use error::{Result, WxError};
pub use observation::Observation;
pub use series::ReferenceSeries;
pub use target::{Target, TargetId};
pub use variable::{Period, Variable};
