//! Delimited artifact writing.
//!
//! One stable artifact per pipeline stage, UTF-8 comma-separated, with
//! floating-point columns fixed at three decimal places.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{AnyValue, DataFrame};
use tracing::info;

/// Render a cell for CSV output. Nulls become empty fields.
fn csv_field(value: AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(value) => value.to_string(),
        AnyValue::StringOwned(value) => value.to_string(),
        AnyValue::Float64(value) => format!("{value:.3}"),
        AnyValue::Float32(value) => format!("{:.3}", value as f64),
        AnyValue::Int64(value) => value.to_string(),
        AnyValue::Int32(value) => value.to_string(),
        AnyValue::Boolean(value) => {
            if value {
                "1".to_string()
            } else {
                "0".to_string()
            }
        }
        value => value.to_string(),
    }
}

/// Write a DataFrame as a flat CSV file, creating parent directories.
pub fn write_frame_csv(df: &DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("open {}", path.display()))?;

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    writer.write_record(&names).context("write header")?;

    let columns: Vec<_> = names
        .iter()
        .map(|name| df.column(name).with_context(|| format!("column '{name}'")))
        .collect::<Result<Vec<_>>>()?;
    for idx in 0..df.height() {
        let record: Vec<String> = columns
            .iter()
            .map(|column| csv_field(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect();
        writer
            .write_record(&record)
            .with_context(|| format!("write row {idx}"))?;
    }
    writer.flush().context("flush csv writer")?;

    info!(
        path = %path.display(),
        record_count = df.height(),
        column_count = df.width(),
        "artifact written"
    );
    Ok(())
}
