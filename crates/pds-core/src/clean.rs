//! Policy-driven cleaning of the merged dataset.
//!
//! Four order-sensitive steps, each logging how many rows it removed and
//! none of them reordering the survivors. The stage degrades to warnings
//! under anomalous input instead of failing.

use anyhow::Result;
use pds_model::CleanConfig;
use polars::prelude::{AnyValue, DataFrame};
use tracing::{info, warn};

use crate::frame_utils::{filter_rows, require_columns, year_column};

/// Removal counts per cleaning step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub null_province_removed: usize,
    /// True when the missing-province fraction hit the threshold and the
    /// drop was skipped.
    pub null_threshold_exceeded: bool,
    pub excluded_removed: usize,
    pub sentinel_removed: usize,
    pub out_of_range_removed: usize,
}

impl CleanReport {
    pub fn total_removed(&self) -> usize {
        self.null_province_removed
            + self.excluded_removed
            + self.sentinel_removed
            + self.out_of_range_removed
    }
}

/// Cleaned frame plus the per-step audit counts.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub frame: DataFrame,
    pub report: CleanReport,
}

fn province_cells(df: &DataFrame) -> Result<Vec<Option<String>>> {
    let column = df.column("Province")?;
    Ok((0..df.height())
        .map(|idx| match column.get(idx).unwrap_or(AnyValue::Null) {
            AnyValue::Null => None,
            AnyValue::String(text) if text.trim().is_empty() => None,
            AnyValue::StringOwned(ref text) if text.trim().is_empty() => None,
            AnyValue::String(text) => Some(text.to_string()),
            AnyValue::StringOwned(text) => Some(text.to_string()),
            other => Some(other.to_string()),
        })
        .collect())
}

/// Run the full cleaning sequence.
pub fn clean(df: &DataFrame, config: &CleanConfig) -> Result<CleanOutcome> {
    info!(record_count = df.height(), "starting dataset cleaning process");
    require_columns(df, &["Province", "Year"], "merged")?;
    let mut report = CleanReport::default();

    let df = remove_null_provinces(df, config, &mut report)?;
    let df = remove_excluded_provinces(&df, config, &mut report)?;
    let df = remove_sentinel_provinces(&df, config, &mut report)?;
    let df = filter_timeframe(&df, config, &mut report)?;

    info!(
        record_count = df.height(),
        removed = report.total_removed(),
        "dataset cleaning process completed"
    );
    Ok(CleanOutcome { frame: df, report })
}

/// Step 1: drop rows with a missing province, but only while they stay
/// below the configured fraction of the table. At or above it the drop is
/// skipped; destroying that much data would hide an upstream join failure.
fn remove_null_provinces(
    df: &DataFrame,
    config: &CleanConfig,
    report: &mut CleanReport,
) -> Result<DataFrame> {
    if df.height() == 0 {
        return Ok(df.clone());
    }
    let cells = province_cells(df)?;
    let missing = cells.iter().filter(|cell| cell.is_none()).count();
    let fraction = missing as f64 / df.height() as f64;

    if missing == 0 {
        info!("no null values found on Province");
        return Ok(df.clone());
    }
    if fraction >= config.null_province_threshold {
        report.null_threshold_exceeded = true;
        warn!(
            percentage = format!("{:.2}", fraction * 100.0),
            "null provinces at or above threshold, not removing them"
        );
        return Ok(df.clone());
    }
    info!(
        record_count = missing,
        percentage = format!("{:.2}", fraction * 100.0),
        "removing null provinces"
    );
    report.null_province_removed = missing;
    let keep: Vec<bool> = cells.iter().map(Option::is_some).collect();
    filter_rows(df, &keep)
}

/// Step 2: drop island and autonomous-city observations.
fn remove_excluded_provinces(
    df: &DataFrame,
    config: &CleanConfig,
    report: &mut CleanReport,
) -> Result<DataFrame> {
    let cells = province_cells(df)?;
    let keep: Vec<bool> = cells
        .iter()
        .map(|cell| match cell {
            Some(province) => !config.excluded_provinces.contains(province),
            None => true,
        })
        .collect();
    let removed = keep.iter().filter(|kept| !**kept).count();
    report.excluded_removed = removed;
    info!(record_count = removed, "removed island observations");
    filter_rows(df, &keep)
}

/// Step 3: drop the placeholder provinces some sources encode instead of
/// leaving the field blank.
fn remove_sentinel_provinces(
    df: &DataFrame,
    config: &CleanConfig,
    report: &mut CleanReport,
) -> Result<DataFrame> {
    let cells = province_cells(df)?;
    let keep: Vec<bool> = cells
        .iter()
        .map(|cell| match cell {
            Some(province) => !config.sentinel_provinces.contains(province),
            None => true,
        })
        .collect();
    let removed = keep.iter().filter(|kept| !**kept).count();
    report.sentinel_removed = removed;
    info!(record_count = removed, "removed undefined province observations");
    filter_rows(df, &keep)
}

/// Step 4: keep only rows inside the inclusive calendar range. Works for
/// date-typed, integer-typed and string year representations alike.
fn filter_timeframe(
    df: &DataFrame,
    config: &CleanConfig,
    report: &mut CleanReport,
) -> Result<DataFrame> {
    let years = year_column(df, "Year")?;
    let keep: Vec<bool> = years
        .iter()
        .map(|year| match year {
            Some(year) => config.year_in_range(*year),
            None => false,
        })
        .collect();
    let removed = keep.iter().filter(|kept| !**kept).count();
    report.out_of_range_removed = removed;
    info!(
        record_count = removed,
        year_min = config.year_min,
        year_max = config.year_max,
        "removed observations outside the timeframe"
    );
    filter_rows(df, &keep)
}
