/// Error types for the weather station library
use thiserror::Error;

/// Main error type for loading, analysing and imputing observations
#[derive(Error, Debug)]
pub enum WxError {
    /// Target row is outside the reference series
    #[error("Invalid target: row {row} is outside a series of {len} rows")]
    InvalidTarget { row: usize, len: usize },

    /// Column name or code does not name one of the five measurements
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// Composite target identifier could not be decoded
    #[error("Invalid target identifier: {0}")]
    InvalidTargetId(String),

    /// Period-of-year outside 1..=12
    #[error("Invalid period-of-year: {0}")]
    InvalidPeriod(i64),

    /// A reference record is missing a required field
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Tunable parameters are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No complete historical rows to fit a regression on
    #[error("Insufficient data to fit a regression for station {station}")]
    InsufficientData { station: String },

    /// Degenerate design or non-finite prediction
    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    /// No estimator could produce a value for the target
    #[error("Unresolved target: no observed {variable} anywhere in period {period} (row {row})")]
    UnresolvedTarget {
        row: usize,
        variable: String,
        period: u8,
    },

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Failed to read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a JSON configuration file
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl WxError {
    /// Whether the cascade should fall through to the next estimator
    /// instead of aborting the batch.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WxError::InsufficientData { .. } | WxError::PredictionFailed(_)
        )
    }
}

/// Type alias for Results using WxError
pub type Result<T> = std::result::Result<T, WxError>;
