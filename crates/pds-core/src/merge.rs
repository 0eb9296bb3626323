//! Three-way dataset merge on the (province, year) key.
//!
//! Two sequential primary-preserving left joins: air quality with health,
//! then the result with socioeconomic data. Each source names its temporal
//! column differently (Year, Periodo, anio); the joins compare them as the
//! same semantic key by extracting the calendar year, and the redundant
//! right-side key columns never reach the output.

use anyhow::{Context, Result};
use polars::prelude::{AnyValue, Column, DataFrame, DataType, IdxCa, NamedFrom, Series};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::frame_utils::{any_to_f64, any_to_string, require_columns, string_column, year_column};

/// Merge the three normalized tables. All inputs must already be
/// province-resolved; missing key columns are fatal before any join runs.
pub fn merge_all(air: &DataFrame, health: &DataFrame, socio: &DataFrame) -> Result<DataFrame> {
    require_columns(air, &["Province", "Year"], "air quality")?;
    require_columns(health, &["Province", "Periodo"], "health")?;
    require_columns(socio, &["Province", "anio"], "socioeconomic")?;

    info!(
        air_records = air.height(),
        health_records = health.height(),
        socio_records = socio.height(),
        "starting data merge process"
    );
    let merged = left_join(air, "Year", health, "Periodo", "health")?;
    let merged = left_join(&merged, "Year", socio, "anio", "socioeconomic")?;
    info!(record_count = merged.height(), "dataset merged");
    Ok(merged)
}

/// Primary-preserving left join on (Province, year-of(temporal column)).
///
/// Every left row appears at least once. A key matching several right rows
/// expands to one output row per match; that multiplicity is counted and
/// warned about, not deduplicated. The right key columns are dropped.
fn left_join(
    left: &DataFrame,
    left_year: &str,
    right: &DataFrame,
    right_year: &str,
    right_label: &str,
) -> Result<DataFrame> {
    let left_provinces = string_column(left, "Province")?;
    let left_years = year_column(left, left_year)?;
    let right_provinces = string_column(right, "Province")?;
    let right_years = year_column(right, right_year)?;

    let mut right_index: HashMap<(String, Option<i32>), Vec<usize>> = HashMap::new();
    for idx in 0..right.height() {
        right_index
            .entry((right_provinces[idx].clone(), right_years[idx]))
            .or_default()
            .push(idx);
    }
    let duplicate_keys = right_index.values().filter(|rows| rows.len() > 1).count();

    let mut left_picks: Vec<u32> = Vec::with_capacity(left.height());
    let mut right_picks: Vec<Option<usize>> = Vec::with_capacity(left.height());
    for idx in 0..left.height() {
        let key = (left_provinces[idx].clone(), left_years[idx]);
        match right_index.get(&key) {
            Some(matches) => {
                for &right_idx in matches {
                    left_picks.push(idx as u32);
                    right_picks.push(Some(right_idx));
                }
            }
            None => {
                left_picks.push(idx as u32);
                right_picks.push(None);
            }
        }
    }

    if duplicate_keys > 0 {
        warn!(
            table = right_label,
            duplicate_keys,
            expanded_rows = left_picks.len() - left.height(),
            "duplicate (province, year) keys expand the merge"
        );
    }

    let indices = IdxCa::from_vec("idx".into(), left_picks);
    let mut merged = left.take(&indices).context("gather left rows")?;

    for column in right.get_columns() {
        let name = column.name().as_str();
        if name == "Province" || name == right_year {
            continue;
        }
        let out_name = if merged.column(name).is_ok() {
            format!("{name}_{right_label}")
        } else {
            name.to_string()
        };
        merged.with_column(gather_column(column, &right_picks, &out_name))?;
    }
    Ok(merged)
}

/// Gather right-side values by optional row index; None becomes null.
fn gather_column(column: &Column, picks: &[Option<usize>], out_name: &str) -> Series {
    if matches!(
        column.dtype(),
        DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32
    ) {
        let values: Vec<Option<f64>> = picks
            .iter()
            .map(|pick| {
                pick.and_then(|idx| any_to_f64(column.get(idx).unwrap_or(AnyValue::Null)))
            })
            .collect();
        Series::new(out_name.into(), values)
    } else {
        let values: Vec<Option<String>> = picks
            .iter()
            .map(|pick| pick.map(|idx| any_to_string(column.get(idx).unwrap_or(AnyValue::Null))))
            .collect();
        Series::new(out_name.into(), values)
    }
}
