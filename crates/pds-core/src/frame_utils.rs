//! Shared DataFrame helpers: cell extraction, column checks, year handling.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Duration, NaiveDate};
use polars::prelude::{AnyValue, BooleanChunked, DataFrame, NewChunkedArray};
use tracing::{info, warn};

pub fn any_to_string(value: AnyValue) -> String {
    match value {
        AnyValue::String(value) => value.to_string(),
        AnyValue::StringOwned(value) => value.to_string(),
        AnyValue::Null => String::new(),
        _ => value.to_string(),
    }
}

pub fn any_to_f64(value: AnyValue) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Float32(value) => Some(value as f64),
        AnyValue::Float64(value) => Some(value),
        AnyValue::Int8(value) => Some(value as f64),
        AnyValue::Int16(value) => Some(value as f64),
        AnyValue::Int32(value) => Some(value as f64),
        AnyValue::Int64(value) => Some(value as f64),
        AnyValue::UInt8(value) => Some(value as f64),
        AnyValue::UInt16(value) => Some(value as f64),
        AnyValue::UInt32(value) => Some(value as f64),
        AnyValue::UInt64(value) => Some(value as f64),
        AnyValue::String(value) => value.trim().parse::<f64>().ok(),
        AnyValue::StringOwned(value) => value.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Extract the calendar year from any of the representations the sources
/// use: an integer year, a date, or a string holding either ("2005",
/// "2005-01-01").
pub fn year_of(value: &AnyValue) -> Option<i32> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(value) => Some(*value as i32),
        AnyValue::Int16(value) => Some(*value as i32),
        AnyValue::Int32(value) => Some(*value),
        AnyValue::Int64(value) => i32::try_from(*value).ok(),
        AnyValue::UInt8(value) => Some(*value as i32),
        AnyValue::UInt16(value) => Some(*value as i32),
        AnyValue::UInt32(value) => i32::try_from(*value).ok(),
        AnyValue::UInt64(value) => i32::try_from(*value).ok(),
        AnyValue::Date(days) => NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|epoch| epoch.checked_add_signed(Duration::days(*days as i64)))
            .map(|date| date.year()),
        AnyValue::String(value) => year_from_str(value),
        AnyValue::StringOwned(value) => year_from_str(value),
        _ => None,
    }
}

fn year_from_str(text: &str) -> Option<i32> {
    let bytes = text.trim().as_bytes();
    if bytes.len() < 4 || !bytes[..4].iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 4 && !matches!(bytes[4], b'-' | b'/' | b'.' | b' ') {
        return None;
    }
    std::str::from_utf8(&bytes[..4]).ok()?.parse().ok()
}

/// Fail fast if any required column is absent, naming every missing one.
pub fn require_columns(df: &DataFrame, required: &[&str], table_name: &str) -> Result<()> {
    let missing: Vec<&str> = required
        .iter()
        .filter(|name| df.column(name).is_err())
        .copied()
        .collect();
    if !missing.is_empty() {
        bail!("{table_name} table missing required columns: {missing:?}");
    }
    Ok(())
}

pub fn string_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df
        .column(name)
        .with_context(|| format!("missing column '{name}'"))?;
    Ok((0..df.height())
        .map(|idx| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect())
}

pub fn f64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .with_context(|| format!("missing column '{name}'"))?;
    Ok((0..df.height())
        .map(|idx| any_to_f64(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect())
}

pub fn year_column(df: &DataFrame, name: &str) -> Result<Vec<Option<i32>>> {
    let column = df
        .column(name)
        .with_context(|| format!("missing column '{name}'"))?;
    Ok((0..df.height())
        .map(|idx| year_of(&column.get(idx).unwrap_or(AnyValue::Null)))
        .collect())
}

/// Keep only the rows whose mask entry is true, preserving order.
pub fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    df.filter(&mask).context("filter rows")
}

/// Count empty or null cells per column.
pub fn null_summary(df: &DataFrame) -> BTreeMap<String, usize> {
    let mut summary = BTreeMap::new();
    for column in df.get_columns() {
        let mut count = 0usize;
        for idx in 0..df.height() {
            let value = column.get(idx).unwrap_or(AnyValue::Null);
            let missing = match value {
                AnyValue::Null => true,
                AnyValue::String(text) => text.trim().is_empty(),
                AnyValue::StringOwned(ref text) => text.trim().is_empty(),
                _ => false,
            };
            if missing {
                count += 1;
            }
        }
        if count > 0 {
            summary.insert(column.name().to_string(), count);
        }
    }
    summary
}

/// Log record/column counts and the per-column null summary for a frame.
pub fn log_frame_info(df: &DataFrame, description: &str) {
    info!(
        description,
        record_count = df.height(),
        column_count = df.width(),
        "loaded table"
    );
    let nulls = null_summary(df);
    if !nulls.is_empty() {
        warn!(description, nulls = ?nulls, "found null values");
    }
}
