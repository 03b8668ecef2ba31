//! Full imputation run: reference series + target list -> ID,value table.

use log::info;
use std::io::{Read, Write};
use wx_fill::{ImputationReport, Imputer};
use wx_station::{
    target::{read_target_ids, write_results},
    ImputeConfig, ReferenceSeries, Target, TargetId,
};

/// Run the cascade over in-memory tables and write the results.
pub fn impute_tables<R, T, W>(
    reference: R,
    targets: T,
    output: W,
    config: &ImputeConfig,
) -> anyhow::Result<ImputationReport>
where
    R: Read,
    T: Read,
    W: Write,
{
    let series = ReferenceSeries::from_csv_reader(reference)?;
    let ids: Vec<TargetId> = read_target_ids(targets)?;
    info!("Imputing {} targets against {} reference rows", ids.len(), series.len());

    let imputer = Imputer::new(&series, config.clone())?;
    let targets = ids
        .iter()
        .map(TargetId::target)
        .collect::<wx_station::Result<Vec<Target>>>()?;
    let resolutions = imputer.run(&targets)?;

    let results: Vec<(TargetId, f64)> = ids
        .into_iter()
        .zip(&resolutions)
        .map(|(id, resolution)| (id, resolution.value))
        .collect();
    write_results(output, &results)?;
    Ok(ImputationReport::from_resolutions(&resolutions))
}

pub fn run_impute(
    reference_csv: &str,
    targets_csv: &str,
    output_csv: &str,
    config: &ImputeConfig,
) -> anyhow::Result<()> {
    let reference = std::fs::File::open(reference_csv)?;
    let targets = std::fs::File::open(targets_csv)?;
    let output = std::fs::File::create(output_csv)?;
    let report = impute_tables(reference, targets, output, config)?;
    info!("Imputation complete. {} values written to {}", report.total(), output_csv);
    Ok(())
}
