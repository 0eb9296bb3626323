//! DataFrame construction from raw CSV tables.

use anyhow::{Context, Result, bail};
use polars::prelude::{AnyValue, Column, DataFrame, NamedFrom, Series};

use crate::csv_table::CsvTable;

/// Build a DataFrame with one string column per header.
///
/// Type refinement (floats, years) happens per column afterwards; loading
/// everything as strings first keeps the locale quirks in one place.
pub fn build_string_frame(table: &CsvTable) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(table.headers.len());
    for (idx, header) in table.headers.iter().enumerate() {
        let values: Vec<String> = table
            .rows
            .iter()
            .map(|row| row.get(idx).cloned().unwrap_or_default())
            .collect();
        columns.push(Series::new(header.as_str().into(), values).into());
    }
    DataFrame::new(columns).context("build frame from csv table")
}

/// Build a string frame restricted to the given columns, in the given order.
///
/// Fails if any requested column is absent from the table.
pub fn build_string_frame_with_columns(table: &CsvTable, wanted: &[&str]) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(wanted.len());
    for name in wanted {
        let Some(idx) = table.column_index(name) else {
            bail!("missing required column: '{name}'");
        };
        let values: Vec<String> = table
            .rows
            .iter()
            .map(|row| row.get(idx).cloned().unwrap_or_default())
            .collect();
        columns.push(Series::new((*name).into(), values).into());
    }
    DataFrame::new(columns).context("build frame from csv table")
}

/// Parse a cell as f64, honoring a decimal-comma locale.
///
/// Returns None for empty or non-numeric cells.
pub fn parse_f64_locale(value: &str, decimal_comma: bool) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if decimal_comma {
        // INE files also use '.' as a thousands separator.
        let normalized: String = trimmed
            .chars()
            .filter(|ch| *ch != '.')
            .map(|ch| if ch == ',' { '.' } else { ch })
            .collect();
        normalized.parse::<f64>().ok()
    } else {
        trimmed.parse::<f64>().ok()
    }
}

pub fn parse_f64(value: &str) -> Option<f64> {
    parse_f64_locale(value, false)
}

pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

/// Replace a string column with its f64 parse, in place.
pub fn cast_f64_column(df: &mut DataFrame, name: &str, decimal_comma: bool) -> Result<()> {
    let series = df
        .column(name)
        .with_context(|| format!("missing column '{name}'"))?
        .clone();
    let mut values: Vec<Option<f64>> = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let parsed = match series.get(idx).context("read cell")? {
            AnyValue::String(text) => parse_f64_locale(text, decimal_comma),
            AnyValue::StringOwned(text) => parse_f64_locale(&text, decimal_comma),
            AnyValue::Float64(value) => Some(value),
            AnyValue::Float32(value) => Some(value as f64),
            AnyValue::Int64(value) => Some(value as f64),
            AnyValue::Int32(value) => Some(value as f64),
            _ => None,
        };
        values.push(parsed);
    }
    let parsed = Series::new(name.into(), values);
    df.with_column(parsed)?;
    Ok(())
}
