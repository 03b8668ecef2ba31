use crate::{
    error::{Result, WxError},
    variable::Variable,
};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Deserialize;
use std::{
    fmt,
    io::{Read, Write},
    path::Path,
    str::FromStr,
};

/// A (row, variable) cell of the reference series that needs an estimate.
///
/// `row` is the zero-based position in the reference series.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Target {
    pub row: usize,
    pub variable: Variable,
}

impl Target {
    pub fn new(row: usize, variable: Variable) -> Self {
        Target { row, variable }
    }
}

/// Composite target identifier as exchanged with the outside world:
/// `"<record>-<code>"`, e.g. `"1042-3"` for the temperature of the 1042nd
/// reference record. Records are numbered from 1.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct TargetId {
    pub record: usize,
    pub variable: Variable,
}

impl TargetId {
    /// The zero-based target this identifier names. Record 0 has no row.
    pub fn target(&self) -> Result<Target> {
        self.record
            .checked_sub(1)
            .map(|row| Target::new(row, self.variable))
            .ok_or_else(|| WxError::InvalidTargetId(self.to_string()))
    }
}

impl From<Target> for TargetId {
    fn from(target: Target) -> Self {
        TargetId {
            record: target.row + 1,
            variable: target.variable,
        }
    }
}

impl FromStr for TargetId {
    type Err = WxError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || WxError::InvalidTargetId(s.to_string());
        let (record, code) = s.trim().split_once('-').ok_or_else(invalid)?;
        let record = record.parse::<usize>().map_err(|_| invalid())?;
        if record == 0 {
            return Err(invalid());
        }
        let code = code.parse::<u8>().map_err(|_| invalid())?;
        let variable = Variable::from_code(code)?;
        Ok(TargetId { record, variable })
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.record, self.variable.code())
    }
}

#[derive(Debug, Deserialize)]
struct TargetRecord {
    #[serde(rename = "ID")]
    id: String,
}

/// Read the `ID` column of a headered target list.
pub fn read_target_ids<R: Read>(reader: R) -> Result<Vec<TargetId>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    rdr.deserialize::<TargetRecord>()
        .map(|result| result?.id.parse::<TargetId>())
        .collect()
}

pub fn read_target_ids_path<P: AsRef<Path>>(path: P) -> Result<Vec<TargetId>> {
    let file = std::fs::File::open(path)?;
    read_target_ids(file)
}

/// Write `ID,value` rows in the order given.
pub fn write_results<W: Write>(writer: W, results: &[(TargetId, f64)]) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(["ID", "value"])?;
    for (id, value) in results {
        wtr.write_record([id.to_string(), value.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}
