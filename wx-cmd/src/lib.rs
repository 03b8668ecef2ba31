//! Command implementations for the wx CLI.
//!
//! Provides subcommands for filling missing station readings and for
//! inspecting the gap structure and interpolated form of a reference series.

use clap::{Args, Subcommand};
use log::info;
use wx_station::ImputeConfig;

pub mod impute;
pub mod inspect;

/// Imputation parameters: an optional JSON file plus per-field overrides.
/// Overrides win over the file, the file wins over built-in defaults.
#[derive(Args, Debug, Default, Clone)]
pub struct TuningArgs {
    /// JSON file with imputation parameters
    #[arg(short = 'c', long)]
    pub config: Option<String>,

    /// Longest run of missing neighbours counted on each side of a target
    #[arg(long)]
    pub probe_limit: Option<usize>,

    /// Largest gap on either side still filled by interpolation
    #[arg(long)]
    pub interpolation_bound: Option<usize>,

    /// Predictors missing at this rate or more for a station are dropped
    #[arg(long)]
    pub reliability_threshold: Option<f64>,

    /// Complete rows a station needs (exclusive) for its own regression
    #[arg(long)]
    pub sample_size_threshold: Option<usize>,

    /// Readings with a larger magnitude are treated as missing
    #[arg(long)]
    pub input_bound: Option<f64>,

    /// Estimates with a larger magnitude are replaced by the neutral value
    #[arg(long)]
    pub output_bound: Option<f64>,
}

impl TuningArgs {
    pub fn resolve(&self) -> anyhow::Result<ImputeConfig> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Reading imputation parameters from {}", path);
                ImputeConfig::from_json_path(path)?
            }
            None => ImputeConfig::default(),
        };
        if let Some(v) = self.probe_limit {
            config.probe_limit = v;
        }
        if let Some(v) = self.interpolation_bound {
            config.interpolation_bound = v;
        }
        if let Some(v) = self.reliability_threshold {
            config.reliability_threshold = v;
        }
        if let Some(v) = self.sample_size_threshold {
            config.sample_size_threshold = v;
        }
        if let Some(v) = self.input_bound {
            config.input_bound = v;
        }
        if let Some(v) = self.output_bound {
            config.output_bound = v;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Estimate every target cell and write an ID,value table
    Impute {
        /// Reference series CSV (USAF, MONTH or DATE, five measurements)
        #[arg(short = 'r', long)]
        reference_csv: String,

        /// Target list CSV with an ID column of the form <record>-<code>
        #[arg(short = 't', long)]
        targets_csv: String,

        /// Output path for the ID,value results CSV
        #[arg(short = 'o', long)]
        output_csv: String,

        #[command(flatten)]
        tuning: TuningArgs,
    },

    /// Report the missing-neighbour gap around every target
    Gaps {
        #[arg(short = 'r', long)]
        reference_csv: String,

        #[arg(short = 't', long)]
        targets_csv: String,

        /// Output path for the ID,above,below,eligible CSV
        #[arg(short = 'o', long)]
        output_csv: String,

        #[command(flatten)]
        tuning: TuningArgs,
    },

    /// Write the reference series after input clamping and interpolation
    Interpolate {
        #[arg(short = 'r', long)]
        reference_csv: String,

        /// Output path for the filled reference CSV
        #[arg(short = 'o', long)]
        output_csv: String,

        #[command(flatten)]
        tuning: TuningArgs,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Impute {
            reference_csv,
            targets_csv,
            output_csv,
            tuning,
        } => impute::run_impute(&reference_csv, &targets_csv, &output_csv, &tuning.resolve()?),
        Command::Gaps {
            reference_csv,
            targets_csv,
            output_csv,
            tuning,
        } => inspect::run_gaps(&reference_csv, &targets_csv, &output_csv, &tuning.resolve()?),
        Command::Interpolate {
            reference_csv,
            output_csv,
            tuning,
        } => inspect::run_interpolate(&reference_csv, &output_csv, &tuning.resolve()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuning_defaults() {
        let config = TuningArgs::default().resolve().unwrap();
        assert_eq!(config, ImputeConfig::default());
    }

    #[test]
    fn test_tuning_overrides() {
        let tuning = TuningArgs {
            sample_size_threshold: Some(50),
            output_bound: Some(3.0),
            ..TuningArgs::default()
        };
        let config = tuning.resolve().unwrap();
        assert_eq!(config.sample_size_threshold, 50);
        assert!((config.output_bound - 3.0).abs() < f64::EPSILON);
        assert_eq!(config.probe_limit, 20);
    }

    #[test]
    fn test_tuning_rejects_invalid_override() {
        let tuning = TuningArgs {
            probe_limit: Some(2),
            ..TuningArgs::default()
        };
        assert!(tuning.resolve().is_err());
    }
}
