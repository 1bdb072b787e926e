//! The four quality checks, in pipeline order.
//!
//! Every check takes the series and tally by value, alters whole columns at
//! once and writes its own tally row before handing both back.

use tracing::info;

use crate::config::QcConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{present_gt, CheckKind, SeriesTable, TallyRow, TallyTable, Variable};

pub type CheckFn = fn(SeriesTable, TallyTable, &QcConfig) -> Result<(SeriesTable, TallyTable)>;

/// Pipeline order. Later checks depend on the missingness left by earlier ones.
pub const CHECKS: [(CheckKind, CheckFn); CheckKind::COUNT] = [
    (CheckKind::NoData, remove_no_data_values as CheckFn),
    (CheckKind::GrossError, remove_gross_errors as CheckFn),
    (CheckKind::Swapped, swap_inverted_temperatures as CheckFn),
    (CheckKind::RangeFail, remove_excessive_ranges as CheckFn),
];

fn mask_where(column: &mut [Option<f64>], predicate: impl Fn(f64) -> bool) {
    for value in column.iter_mut() {
        if matches!(*value, Some(v) if predicate(v)) {
            *value = None;
        }
    }
}

/// Replace the no-data sentinel with the missing marker.
///
/// The NoData row holds the absolute missing count per variable afterwards,
/// which includes values that were already missing on input.
pub fn remove_no_data_values(
    mut series: SeriesTable,
    mut tally: TallyTable,
    config: &QcConfig,
) -> Result<(SeriesTable, TallyTable)> {
    let sentinel = config.sentinel;
    for variable in Variable::ALL {
        mask_where(series.column_mut(variable), |v| v == sentinel);
    }

    let row = series.missing_counts();
    tally.record(CheckKind::NoData, row)?;
    info!(check = %CheckKind::NoData, counts = ?row, "No-data values removed");

    Ok((series, tally))
}

/// Mask values strictly outside each variable's plausible range.
///
/// The GrossError row counts only values this check made missing: the
/// current missing total minus everything already tallied.
pub fn remove_gross_errors(
    mut series: SeriesTable,
    mut tally: TallyTable,
    config: &QcConfig,
) -> Result<(SeriesTable, TallyTable)> {
    for variable in Variable::ALL {
        let bounds = config.bounds(variable);
        mask_where(series.column_mut(variable), |v| !bounds.contains(v));
    }

    let mut row: TallyRow = [0; Variable::COUNT];
    for variable in Variable::ALL {
        let missing = series.missing_count(variable);
        let already_counted = tally.column_total(variable);
        row[variable.index()] =
            missing
                .checked_sub(already_counted)
                .ok_or_else(|| ProcessingError::TallyAccounting {
                    check: CheckKind::GrossError,
                    column: variable.column_name(),
                    message: format!(
                        "{} missing values but {} already counted",
                        missing, already_counted
                    ),
                })?;
    }

    tally.record(CheckKind::GrossError, row)?;
    info!(check = %CheckKind::GrossError, counts = ?row, "Gross errors removed");

    Ok((series, tally))
}

/// Swap max/min temperatures on days where the minimum exceeds the maximum.
pub fn swap_inverted_temperatures(
    mut series: SeriesTable,
    mut tally: TallyTable,
    _config: &QcConfig,
) -> Result<(SeriesTable, TallyTable)> {
    let (max_temp, min_temp) = series.temperatures_mut();

    let inverted: Vec<bool> = max_temp
        .iter()
        .zip(min_temp.iter())
        .map(|(max, min)| present_gt(*min, *max))
        .collect();
    let instances = inverted.iter().filter(|flag| **flag).count();

    for ((max, min), _) in max_temp
        .iter_mut()
        .zip(min_temp.iter_mut())
        .zip(inverted.iter())
        .filter(|(_, flag)| **flag)
    {
        std::mem::swap(max, min);
    }

    let row = [0, instances, instances, 0];
    tally.record(CheckKind::Swapped, row)?;
    info!(check = %CheckKind::Swapped, counts = ?row, "Inverted temperatures swapped");

    Ok((series, tally))
}

/// Mask both temperatures on days whose spread exceeds the configured limit.
///
/// Runs after the swap so the spread is measured on corrected pairs.
pub fn remove_excessive_ranges(
    mut series: SeriesTable,
    mut tally: TallyTable,
    config: &QcConfig,
) -> Result<(SeriesTable, TallyTable)> {
    let limit = config.max_spread;
    let (max_temp, min_temp) = series.temperatures_mut();

    let too_wide: Vec<bool> = max_temp
        .iter()
        .zip(min_temp.iter())
        .map(|(max, min)| matches!((max, min), (Some(max), Some(min)) if max - min > limit))
        .collect();
    let instances = too_wide.iter().filter(|flag| **flag).count();

    for ((max, min), _) in max_temp
        .iter_mut()
        .zip(min_temp.iter_mut())
        .zip(too_wide.iter())
        .filter(|(_, flag)| **flag)
    {
        *max = None;
        *min = None;
    }

    let row = [0, instances, instances, 0];
    tally.record(CheckKind::RangeFail, row)?;
    info!(check = %CheckKind::RangeFail, counts = ?row, "Excessive temperature ranges removed");

    Ok((series, tally))
}
