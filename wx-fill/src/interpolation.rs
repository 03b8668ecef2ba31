//! Bounded-window linear interpolation over reference-series columns.

use log::debug;
use wx_station::{ReferenceSeries, Result, Variable};

/// A present reading used as an interpolation anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub row: usize,
    pub value: f64,
}

/// Linearly interpolate the rows strictly between two anchors.
///
/// Returns one value per interior row; empty when the anchors are adjacent.
pub fn interpolate_pair(start: Anchor, end: Anchor) -> Vec<f64> {
    let steps = end.row.saturating_sub(start.row);
    if steps <= 1 {
        return Vec::new();
    }
    let slope = (end.value - start.value) / steps as f64;
    (1..steps)
        .map(|i| start.value + slope * i as f64)
        .collect()
}

/// Fill every run of at most `max_gap` missing values that has a present
/// neighbour on both sides. Longer runs and runs touching either end of the
/// column stay missing.
pub fn fill_column(values: &[Option<f64>], max_gap: usize) -> Vec<Option<f64>> {
    let anchors: Vec<Anchor> = values
        .iter()
        .enumerate()
        .filter_map(|(row, v)| v.map(|value| Anchor { row, value }))
        .collect();

    let mut result = values.to_vec();
    for window in anchors.windows(2) {
        let (start, end) = (window[0], window[1]);
        let gap = end.row - start.row - 1;
        if gap == 0 || gap > max_gap {
            continue;
        }
        for (offset, value) in interpolate_pair(start, end).into_iter().enumerate() {
            result[start.row + 1 + offset] = Some(value);
        }
    }
    result
}

/// Return a new series whose `variables` columns have short gaps filled.
///
/// Filled cells are present afterwards, so applying this twice yields the
/// same series as applying it once.
pub fn interpolate(
    series: &ReferenceSeries,
    variables: &[Variable],
    max_gap: usize,
) -> Result<ReferenceSeries> {
    let mut filled = series.clone();
    for &variable in variables {
        let column = filled.column(variable);
        let before = column.iter().filter(|v| v.is_none()).count();
        let new_column = fill_column(&column, max_gap);
        let after = new_column.iter().filter(|v| v.is_none()).count();
        debug!(
            "interpolation: {} filled {} of {} missing values",
            variable,
            before - after,
            before
        );
        filled = filled.with_column(variable, &new_column)?;
    }
    Ok(filled)
}
