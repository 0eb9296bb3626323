//! Column-level province resolution.

use std::collections::BTreeSet;

use anyhow::Result;
use pds_model::AliasTable;
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::{info, warn};

use crate::frame_utils::{require_columns, string_column};

/// Overwrite the `Province` column with canonical names.
///
/// Unresolved surface forms stay in place; the distinct set is logged once
/// per batch and returned so callers can aggregate anomaly counts. The alias
/// table itself is never touched.
pub fn resolve_province_column(
    df: &mut DataFrame,
    aliases: &AliasTable,
    dataset_label: &str,
) -> Result<BTreeSet<String>> {
    require_columns(df, &["Province"], dataset_label)?;
    info!(dataset = dataset_label, "mapping province names");

    let values = string_column(df, "Province")?;
    let resolution = aliases.resolve_column(&values);
    if !resolution.fully_resolved() {
        warn!(
            dataset = dataset_label,
            unresolved = ?resolution.unresolved,
            "unrecognized provinces"
        );
    }
    df.with_column(Series::new("Province".into(), resolution.values))?;
    Ok(resolution.unresolved)
}
