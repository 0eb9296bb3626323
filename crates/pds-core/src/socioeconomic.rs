//! Socioeconomic source normalizer.
//!
//! GDP per capita arrives as a wide table: one row per province, one column
//! per year. Normalization unpivots it to one row per (province, year). The
//! inverse pivot reproduces the wide table exactly, which keeps the reshape
//! honest and testable.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use pds_ingest::{ReadOptions, build_string_frame, parse_f64_locale, read_csv_table};
use pds_model::AliasTable;
use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use tracing::info;

use crate::frame_utils::{f64_column, log_frame_info, require_columns, string_column};
use crate::resolve::resolve_province_column;

/// Load the raw wide table. Semicolon-delimited latin1 with decimal commas;
/// values stay as strings until the unpivot parses them.
pub fn load(path: &Path) -> Result<DataFrame> {
    info!(path = %path.display(), "loading raw socioeconomic data");
    let table = read_csv_table(path, &ReadOptions::spanish_locale())?;
    if table.is_empty() {
        bail!("loaded file is empty: {}", path.display());
    }
    let df = build_string_frame(&table).context("socioeconomic columns")?;
    require_columns(&df, &["Provincia"], "socioeconomic")?;
    log_frame_info(&df, "socioeconomic");
    Ok(df)
}

/// Unpivot the wide per-year table into long (Province, anio, pib) rows.
///
/// Output is stacked column by column: every province for the first year
/// column, then every province for the next.
pub fn unpivot_wide(df: &DataFrame) -> Result<DataFrame> {
    require_columns(df, &["Provincia"], "socioeconomic")?;
    let provinces = string_column(df, "Provincia")?;
    let year_columns: Vec<String> = df
        .get_column_names()
        .iter()
        .filter(|name| name.as_str() != "Provincia")
        .map(|name| name.to_string())
        .collect();
    if year_columns.is_empty() {
        bail!("socioeconomic table has no year columns");
    }

    let mut out_provinces: Vec<String> = Vec::with_capacity(provinces.len() * year_columns.len());
    let mut out_years: Vec<String> = Vec::with_capacity(out_provinces.capacity());
    let mut out_values: Vec<Option<f64>> = Vec::with_capacity(out_provinces.capacity());
    for year in &year_columns {
        let cells = string_column(df, year)?;
        for (province, cell) in provinces.iter().zip(&cells) {
            out_provinces.push(province.clone());
            out_years.push(year.clone());
            out_values.push(parse_f64_locale(cell, true));
        }
    }

    let long = DataFrame::new(vec![
        Series::new("Province".into(), out_provinces).into(),
        Series::new("anio".into(), out_years).into(),
        Series::new("pib".into(), out_values).into(),
    ])
    .context("build long socioeconomic frame")?;
    info!(
        record_count = long.height(),
        year_count = year_columns.len(),
        "socioeconomic table unpivoted"
    );
    Ok(long)
}

/// Re-pivot the long form back to a wide per-year table.
///
/// Provinces and year columns come out in first-appearance order, so a
/// frame produced by [`unpivot_wide`] pivots back to the original layout.
pub fn pivot_long(df: &DataFrame) -> Result<DataFrame> {
    require_columns(df, &["Province", "anio", "pib"], "socioeconomic")?;
    let provinces = string_column(df, "Province")?;
    let years = string_column(df, "anio")?;
    let values = f64_column(df, "pib")?;

    let mut province_order: Vec<String> = Vec::new();
    let mut year_order: Vec<String> = Vec::new();
    for province in &provinces {
        if !province_order.contains(province) {
            province_order.push(province.clone());
        }
    }
    for year in &years {
        if !year_order.contains(year) {
            year_order.push(year.clone());
        }
    }

    let mut columns: Vec<Column> =
        vec![Series::new("Provincia".into(), province_order.clone()).into()];
    for year in &year_order {
        let mut cells: Vec<Option<f64>> = vec![None; province_order.len()];
        for idx in 0..provinces.len() {
            if &years[idx] != year {
                continue;
            }
            if let Some(slot) = province_order.iter().position(|p| p == &provinces[idx]) {
                cells[slot] = values[idx];
            }
        }
        columns.push(Series::new(year.as_str().into(), cells).into());
    }
    DataFrame::new(columns).context("build wide socioeconomic frame")
}

/// Full normalization: load, unpivot, resolve provinces.
pub fn normalize(path: &Path, aliases: &AliasTable) -> Result<(DataFrame, BTreeSet<String>)> {
    let wide = load(path)?;
    let mut long = unpivot_wide(&wide)?;
    let unresolved = resolve_province_column(&mut long, aliases, "socioeconomic")?;
    Ok((long, unresolved))
}
