use crate::{
    error::WxError,
    variable::{Period, Variable, VARIABLE_COUNT},
};
use chrono::NaiveDate;
use serde::Deserialize;

/// Date formats accepted in the optional `DATE` column.
pub const DATE_FORMATS: [&str; 2] = ["%Y%m%d", "%Y-%m-%d"];

/// One reference-series record: a station, its period-of-year and up to
/// five measurements, each present or missing.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub station: String,
    pub period: Period,
    pub values: [Option<f64>; VARIABLE_COUNT],
}

impl Observation {
    pub fn new(station: &str, period: Period, values: [Option<f64>; VARIABLE_COUNT]) -> Self {
        Observation {
            station: station.to_string(),
            period,
            values,
        }
    }

    pub fn value(&self, variable: Variable) -> Option<f64> {
        self.values[variable.index()]
    }

    pub fn is_missing(&self, variable: Variable) -> bool {
        self.value(variable).is_none()
    }

    /// Replace every measurement whose magnitude exceeds `bound` with missing.
    pub fn clamp_inputs(&mut self, bound: f64) {
        for value in self.values.iter_mut() {
            if matches!(value, Some(x) if x.abs() > bound) {
                *value = None;
            }
        }
    }
}

/// Row of a reference CSV as it appears on disk.
///
/// Blank or unparseable measurements deserialize to `None`; extra columns
/// are ignored.
#[derive(Debug, Deserialize)]
pub struct ReferenceRecord {
    #[serde(rename = "USAF")]
    pub station: String,
    #[serde(rename = "MONTH", default, deserialize_with = "csv::invalid_option")]
    pub month: Option<i64>,
    #[serde(rename = "DATE", default)]
    pub date: Option<String>,
    #[serde(rename = "WINDDIR", default, deserialize_with = "csv::invalid_option")]
    pub wind_direction: Option<f64>,
    #[serde(rename = "WINDSPEED", default, deserialize_with = "csv::invalid_option")]
    pub wind_speed: Option<f64>,
    #[serde(rename = "TEMPERATURE", default, deserialize_with = "csv::invalid_option")]
    pub temperature: Option<f64>,
    #[serde(rename = "DEWPOINT", default, deserialize_with = "csv::invalid_option")]
    pub dewpoint: Option<f64>,
    #[serde(rename = "PRESSURE", default, deserialize_with = "csv::invalid_option")]
    pub pressure: Option<f64>,
}

impl ReferenceRecord {
    fn period(&self) -> Result<Period, WxError> {
        if let Some(month) = self.month {
            return Period::new(month);
        }
        let raw = self
            .date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                WxError::InvalidRecord(format!(
                    "station {} has neither MONTH nor DATE",
                    self.station
                ))
            })?;
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
            .map(|date| Period::from_date(&date))
            .ok_or_else(|| WxError::InvalidRecord(format!("unparseable DATE {raw}")))
    }
}

impl TryFrom<ReferenceRecord> for Observation {
    type Error = WxError;

    fn try_from(record: ReferenceRecord) -> Result<Self, Self::Error> {
        let station = record.station.trim().to_string();
        if station.is_empty() {
            return Err(WxError::InvalidRecord("empty USAF station id".to_string()));
        }
        let period = record.period()?;
        // "NaN" parses as a float, but it is a missing reading
        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
        Ok(Observation {
            station,
            period,
            values: [
                finite(record.wind_direction),
                finite(record.wind_speed),
                finite(record.temperature),
                finite(record.dewpoint),
                finite(record.pressure),
            ],
        })
    }
}
