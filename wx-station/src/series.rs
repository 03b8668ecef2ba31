use crate::{
    error::{Result, WxError},
    observation::{Observation, ReferenceRecord},
    variable::Variable,
};
use csv::{ReaderBuilder, WriterBuilder};
use log::info;
use std::{
    collections::BTreeSet,
    io::{Read, Write},
    path::Path,
};

/// Time-ordered reference series shared by every station.
///
/// The row index is the position of an observation in the series. A series
/// is an immutable snapshot: stages that change values (input clamping,
/// interpolation) return a new series instead of mutating this one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReferenceSeries {
    observations: Vec<Observation>,
}

impl ReferenceSeries {
    pub fn new(observations: Vec<Observation>) -> Self {
        ReferenceSeries { observations }
    }

    /// Parse a headered reference CSV (`USAF`, `MONTH` or `DATE`, and the
    /// five measurement columns).
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut observations = Vec::new();
        for (line, result) in rdr.deserialize::<ReferenceRecord>().enumerate() {
            let record = result?;
            let observation = Observation::try_from(record).map_err(|e| match e {
                WxError::InvalidRecord(msg) => {
                    WxError::InvalidRecord(format!("record {}: {}", line + 1, msg))
                }
                other => other,
            })?;
            observations.push(observation);
        }
        info!("Loaded {} reference observations", observations.len());
        Ok(ReferenceSeries { observations })
    }

    pub fn parse_csv(csv_data: &str) -> Result<Self> {
        Self::from_csv_reader(csv_data.as_bytes())
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Write the series back out in the same column layout it is read in.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = WriterBuilder::new().from_writer(writer);
        let mut header = vec!["USAF", "MONTH"];
        header.extend(Variable::ALL.iter().map(|v| v.column_name()));
        wtr.write_record(&header)?;
        for obs in &self.observations {
            let mut record = vec![obs.station.clone(), obs.period.to_string()];
            record.extend(
                obs.values
                    .iter()
                    .map(|v| v.map_or(String::new(), |x| x.to_string())),
            );
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Observation at `row`, or `InvalidTarget` if the row is out of range.
    pub fn get(&self, row: usize) -> Result<&Observation> {
        self.observations.get(row).ok_or(WxError::InvalidTarget {
            row,
            len: self.observations.len(),
        })
    }

    /// Measurement at (`row`, `variable`); `None` when missing or out of range.
    pub fn value(&self, row: usize, variable: Variable) -> Option<f64> {
        self.observations
            .get(row)
            .and_then(|obs| obs.value(variable))
    }

    pub fn column(&self, variable: Variable) -> Vec<Option<f64>> {
        self.observations
            .iter()
            .map(|obs| obs.value(variable))
            .collect()
    }

    /// A copy of this series with `variable` replaced by `values`, which
    /// must hold exactly one value per row.
    pub fn with_column(&self, variable: Variable, values: &[Option<f64>]) -> Result<Self> {
        if values.len() != self.len() {
            return Err(WxError::InvalidRecord(format!(
                "{} column has {} values for {} rows",
                variable,
                values.len(),
                self.len()
            )));
        }
        let observations = self
            .observations
            .iter()
            .zip(values)
            .map(|(obs, value)| {
                let mut obs = obs.clone();
                obs.values[variable.index()] = *value;
                obs
            })
            .collect();
        Ok(ReferenceSeries { observations })
    }

    /// A copy of this series with every `|x| > bound` reading set missing.
    pub fn with_clamped_inputs(&self, bound: f64) -> Self {
        let observations = self
            .observations
            .iter()
            .map(|obs| {
                let mut obs = obs.clone();
                obs.clamp_inputs(bound);
                obs
            })
            .collect();
        ReferenceSeries { observations }
    }

    /// Distinct station identifiers in sorted order.
    pub fn stations(&self) -> Vec<&str> {
        self.observations
            .iter()
            .map(|obs| obs.station.as_str())
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .collect()
    }

    pub fn station_rows<'a>(&'a self, station: &'a str) -> impl Iterator<Item = &'a Observation> {
        self.observations
            .iter()
            .filter(move |obs| obs.station == station)
    }

    pub fn missing_count(&self, variable: Variable) -> usize {
        self.observations
            .iter()
            .filter(|obs| obs.is_missing(variable))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV_DATA: &str = "\
USAF,MONTH,WINDDIR,WINDSPEED,TEMPERATURE,DEWPOINT,PRESSURE,EXTRA
725300,1,0.1,0.2,0.3,0.4,0.5,x
725300,1,,NA,4.5,-0.4,NaN,y
725301,2,1.0,1.1,1.2,1.3,1.4,z
";

    #[test]
    fn test_parse_csv() {
        let series = ReferenceSeries::parse_csv(CSV_DATA).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.value(0, Variable::Pressure), Some(0.5));
        assert_eq!(series.value(1, Variable::WindDirection), None);
        assert_eq!(series.value(1, Variable::WindSpeed), None);
        assert_eq!(series.value(1, Variable::Pressure), None);
        assert_eq!(series.value(1, Variable::Temperature), Some(4.5));
        assert_eq!(series.get(2).unwrap().period.month(), 2);
        assert_eq!(series.stations(), vec!["725300", "725301"]);
    }

    #[test]
    fn test_parse_csv_with_date_column() {
        let csv_data = "\
USAF,DATE,WINDDIR,WINDSPEED,TEMPERATURE,DEWPOINT,PRESSURE
A,20200315,0.1,0.2,0.3,0.4,0.5
";
        let series = ReferenceSeries::parse_csv(csv_data).unwrap();
        assert_eq!(series.get(0).unwrap().period.month(), 3);
    }

    #[test]
    fn test_parse_csv_reports_record_number() {
        let csv_data = "\
USAF,WINDDIR,WINDSPEED,TEMPERATURE,DEWPOINT,PRESSURE
A,0.1,0.2,0.3,0.4,0.5
";
        let err = ReferenceSeries::parse_csv(csv_data).unwrap_err();
        assert!(err.to_string().contains("record 1"));
    }

    #[test]
    fn test_get_out_of_range() {
        let series = ReferenceSeries::parse_csv(CSV_DATA).unwrap();
        assert!(matches!(
            series.get(3),
            Err(WxError::InvalidTarget { row: 3, len: 3 })
        ));
    }

    #[test]
    fn test_clamped_inputs_return_new_snapshot() {
        let series = ReferenceSeries::parse_csv(CSV_DATA).unwrap();
        let clamped = series.with_clamped_inputs(4.0);
        assert_eq!(clamped.value(1, Variable::Temperature), None);
        assert_eq!(series.value(1, Variable::Temperature), Some(4.5));
        assert_eq!(clamped.missing_count(Variable::Temperature), 1);
    }

    #[test]
    fn test_with_column() {
        let series = ReferenceSeries::parse_csv(CSV_DATA).unwrap();
        let replaced = series
            .with_column(Variable::WindDirection, &[None, Some(9.0), None])
            .unwrap();
        assert_eq!(replaced.value(1, Variable::WindDirection), Some(9.0));
        assert_eq!(replaced.value(0, Variable::WindSpeed), Some(0.2));
        assert_eq!(series.value(1, Variable::WindDirection), None);
    }

    #[test]
    fn test_with_column_length_mismatch() {
        let series = ReferenceSeries::parse_csv(CSV_DATA).unwrap();
        let err = series
            .with_column(Variable::Pressure, &[Some(1.0)])
            .unwrap_err();
        assert!(matches!(err, WxError::InvalidRecord(_)));
        assert!(err.to_string().contains("1 values for 3 rows"));
    }

    #[test]
    fn test_write_csv_round_trip() {
        let series = ReferenceSeries::parse_csv(CSV_DATA).unwrap();
        let mut buf = Vec::new();
        series.write_csv(&mut buf).unwrap();
        let reread = ReferenceSeries::from_csv_reader(buf.as_slice()).unwrap();
        assert_eq!(reread, series);
    }

    #[test]
    fn test_station_rows() {
        let series = ReferenceSeries::parse_csv(CSV_DATA).unwrap();
        assert_eq!(series.station_rows("725300").count(), 2);
        assert_eq!(series.station_rows("nope").count(), 0);
    }
}
