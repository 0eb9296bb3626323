//! Air quality source normalizer.
//!
//! The primary source: one row per station/pollutant/year with the measured
//! annual level. Normalization lowercases pollutant names, buckets each
//! reading into a severity label, and resolves province names.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result, bail};
use pds_ingest::{ReadOptions, build_string_frame_with_columns, cast_f64_column, read_csv_table};
use pds_model::AliasTable;
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::{info, warn};

use crate::frame_utils::{f64_column, log_frame_info, require_columns, string_column};
use crate::resolve::resolve_province_column;
use crate::rules::{SEVERITY_UNCLASSIFIED, classify_level};

/// Columns consumed from the raw export.
pub const SOURCE_COLUMNS: [&str; 12] = [
    "Air Pollutant",
    "Air Pollutant Description",
    "Data Aggregation Process",
    "Year",
    "Air Pollution Level",
    "Unit Of Air Pollution Level",
    "Air Quality Station Type",
    "Air Quality Station Area",
    "Altitude",
    "Longitude",
    "Latitude",
    "Province",
];

/// Load the raw air quality export. Comma-separated UTF-8.
pub fn load(path: &Path) -> Result<DataFrame> {
    info!(path = %path.display(), "loading raw air quality data");
    let table = read_csv_table(path, &ReadOptions::default())?;
    if table.is_empty() {
        bail!("loaded file is empty: {}", path.display());
    }
    let mut df = build_string_frame_with_columns(&table, &SOURCE_COLUMNS)
        .context("air quality columns")?;
    for column in ["Air Pollution Level", "Altitude", "Longitude", "Latitude"] {
        cast_f64_column(&mut df, column, false)?;
    }
    log_frame_info(&df, "air quality");
    Ok(df)
}

/// Assign severity labels based on pollutant-specific thresholds.
///
/// `already_classified` marks input that carries labels from an earlier run;
/// the step is then a no-op, which makes re-running the stage safe.
pub fn classify(df: &mut DataFrame, already_classified: bool) -> Result<()> {
    if already_classified {
        info!("quality classification already present, skipping");
        return Ok(());
    }
    require_columns(df, &["Air Pollutant", "Air Pollution Level"], "air quality")?;

    let pollutants: Vec<String> = string_column(df, "Air Pollutant")?
        .iter()
        .map(|name| name.to_lowercase())
        .collect();
    let levels = f64_column(df, "Air Pollution Level")?;

    let labels: Vec<&'static str> = pollutants
        .iter()
        .zip(&levels)
        .map(|(pollutant, level)| classify_level(pollutant, *level))
        .collect();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for &label in &labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    info!(counts = ?counts, "air quality classification completed");

    let unclassified = counts.get(SEVERITY_UNCLASSIFIED).copied().unwrap_or(0);
    if unclassified > 0 {
        let percentage = unclassified as f64 / df.height() as f64 * 100.0;
        warn!(
            record_count = unclassified,
            percentage = format!("{percentage:.1}"),
            "records could not be classified"
        );
    }

    df.with_column(Series::new("Air Pollutant".into(), pollutants))?;
    let label_values: Vec<String> = labels.iter().map(|label| (*label).to_string()).collect();
    df.with_column(Series::new("Quality".into(), label_values))?;
    Ok(())
}

/// Full normalization: load, classify, resolve provinces.
///
/// Returns the normalized frame and the distinct unresolved province names.
pub fn normalize(path: &Path, aliases: &AliasTable) -> Result<(DataFrame, BTreeSet<String>)> {
    let mut df = load(path)?;
    classify(&mut df, false)?;
    let unresolved = resolve_province_column(&mut df, aliases, "air quality")?;
    Ok((df, unresolved))
}
