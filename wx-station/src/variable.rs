use crate::error::WxError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Number of measurement columns carried by every observation.
pub const VARIABLE_COUNT: usize = 5;

/// Number of period-of-year levels.
pub const PERIOD_COUNT: usize = 12;

/// One of the five measured quantities.
///
/// The discriminant order matches the numeric codes used in composite
/// target identifiers (`1` = wind direction ... `5` = pressure).
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Serialize, Deserialize)]
pub enum Variable {
    WindDirection,
    WindSpeed,
    Temperature,
    Dewpoint,
    Pressure,
}

impl Variable {
    pub const ALL: [Variable; VARIABLE_COUNT] = [
        Variable::WindDirection,
        Variable::WindSpeed,
        Variable::Temperature,
        Variable::Dewpoint,
        Variable::Pressure,
    ];

    /// Position of this variable inside an observation's value array.
    pub fn index(self) -> usize {
        match self {
            Variable::WindDirection => 0,
            Variable::WindSpeed => 1,
            Variable::Temperature => 2,
            Variable::Dewpoint => 3,
            Variable::Pressure => 4,
        }
    }

    /// Header used for this variable in reference CSV files.
    pub fn column_name(self) -> &'static str {
        match self {
            Variable::WindDirection => "WINDDIR",
            Variable::WindSpeed => "WINDSPEED",
            Variable::Temperature => "TEMPERATURE",
            Variable::Dewpoint => "DEWPOINT",
            Variable::Pressure => "PRESSURE",
        }
    }

    /// Numeric code used in composite target identifiers.
    pub fn code(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn from_code(code: u8) -> Result<Variable, WxError> {
        match code {
            1..=5 => Ok(Variable::ALL[code as usize - 1]),
            _ => Err(WxError::UnknownVariable(code.to_string())),
        }
    }

    /// The four variables other than `self`, in canonical order.
    pub fn others(self) -> impl Iterator<Item = Variable> {
        Variable::ALL.into_iter().filter(move |v| *v != self)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Variable {
    type Err = WxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Variable::ALL
            .into_iter()
            .find(|v| v.column_name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| WxError::UnknownVariable(trimmed.to_string()))
    }
}

/// Period-of-year category (calendar month, 1..=12).
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Serialize, Deserialize)]
pub struct Period(u8);

impl Period {
    pub fn new(month: i64) -> Result<Period, WxError> {
        match month {
            1..=12 => Ok(Period(month as u8)),
            _ => Err(WxError::InvalidPeriod(month)),
        }
    }

    /// The period an observation date falls in.
    pub fn from_date(date: &NaiveDate) -> Period {
        Period(date.month() as u8)
    }

    pub fn month(self) -> u8 {
        self.0
    }

    /// Zero-based position used for one-hot encoding.
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
