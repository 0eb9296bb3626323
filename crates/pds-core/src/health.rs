//! Health source normalizer.
//!
//! Two independently published INE sub-tables — respiratory-disease deaths
//! and life expectancy — keyed by (province code+name, period). Both are
//! semicolon-delimited latin1; life expectancy additionally uses decimal
//! commas. The embedded locality codes are stripped before resolution, and
//! the sub-tables are combined with a full outer join so a province/period
//! present in only one of them still appears with the other metric null.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use anyhow::{Context, Result, bail};
use pds_ingest::{ReadOptions, build_string_frame_with_columns, cast_f64_column, read_csv_table};
use pds_model::AliasTable;
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::info;

use crate::frame_utils::{f64_column, log_frame_info, string_column};
use crate::resolve::resolve_province_column;

pub const RESPIRATORY_METRIC: &str = "Respiratory_diseases_total";
pub const LIFE_EXPECTANCY_METRIC: &str = "Life_expectancy_total";

/// Remove the numeric locality code and embedded whitespace from an INE
/// province label ("02 Albacete" -> "Albacete", "15 Coruña, A" -> "Coruña,A").
pub fn strip_locality_code(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !ch.is_ascii_digit() && !ch.is_whitespace())
        .collect()
}

/// Load one health sub-table and reduce it to (Province, Periodo, metric).
pub fn load_sub_table(
    path: &Path,
    metric_name: &str,
    decimal_comma: bool,
    description: &str,
) -> Result<DataFrame> {
    info!(path = %path.display(), description, "loading raw health data");
    let options = ReadOptions {
        decimal_comma,
        ..ReadOptions::spanish_locale()
    };
    let table = read_csv_table(path, &options)?;
    if table.is_empty() {
        bail!("loaded file is empty: {}", path.display());
    }
    let mut df = build_string_frame_with_columns(&table, &["Provincias", "Periodo", "Total"])
        .with_context(|| format!("{description} columns"))?;
    cast_f64_column(&mut df, "Total", decimal_comma)?;

    let provinces: Vec<String> = string_column(&df, "Provincias")?
        .iter()
        .map(|raw| strip_locality_code(raw))
        .collect();
    df.drop_in_place("Provincias")?;
    df.with_column(Series::new("Province".into(), provinces))?;
    df.rename("Total", metric_name.into())?;
    info!(description, "removed locality codes from province names");

    log_frame_info(&df, description);
    Ok(df)
}

/// Full outer join of the two sub-tables on (Province, Periodo).
///
/// Keys are emitted in respiratory order first, then life-expectancy-only
/// keys in their own order. This is the one place partial data is kept on
/// purpose: a one-sided key survives with the other metric null.
pub fn merge_sub_tables(respiratory: &DataFrame, life: &DataFrame) -> Result<DataFrame> {
    let resp_provinces = string_column(respiratory, "Province")?;
    let resp_periods = string_column(respiratory, "Periodo")?;
    let resp_values = f64_column(respiratory, RESPIRATORY_METRIC)?;
    let life_provinces = string_column(life, "Province")?;
    let life_periods = string_column(life, "Periodo")?;
    let life_values = f64_column(life, LIFE_EXPECTANCY_METRIC)?;

    let mut life_index: HashMap<(String, String), Vec<usize>> = HashMap::new();
    for idx in 0..life_provinces.len() {
        life_index
            .entry((life_provinces[idx].clone(), life_periods[idx].clone()))
            .or_default()
            .push(idx);
    }

    let mut provinces: Vec<String> = Vec::new();
    let mut periods: Vec<String> = Vec::new();
    let mut resp_out: Vec<Option<f64>> = Vec::new();
    let mut life_out: Vec<Option<f64>> = Vec::new();
    let mut matched_life: BTreeSet<usize> = BTreeSet::new();

    for idx in 0..resp_provinces.len() {
        let key = (resp_provinces[idx].clone(), resp_periods[idx].clone());
        match life_index.get(&key) {
            Some(matches) => {
                for &life_idx in matches {
                    matched_life.insert(life_idx);
                    provinces.push(key.0.clone());
                    periods.push(key.1.clone());
                    resp_out.push(resp_values[idx]);
                    life_out.push(life_values[life_idx]);
                }
            }
            None => {
                provinces.push(key.0.clone());
                periods.push(key.1.clone());
                resp_out.push(resp_values[idx]);
                life_out.push(None);
            }
        }
    }
    for idx in 0..life_provinces.len() {
        if matched_life.contains(&idx) {
            continue;
        }
        provinces.push(life_provinces[idx].clone());
        periods.push(life_periods[idx].clone());
        resp_out.push(None);
        life_out.push(life_values[idx]);
    }

    let merged = DataFrame::new(vec![
        Series::new("Province".into(), provinces).into(),
        Series::new("Periodo".into(), periods).into(),
        Series::new(RESPIRATORY_METRIC.into(), resp_out).into(),
        Series::new(LIFE_EXPECTANCY_METRIC.into(), life_out).into(),
    ])
    .context("build merged health frame")?;
    log_frame_info(&merged, "merged health data");
    Ok(merged)
}

/// Full normalization: load both sub-tables, resolve provinces, outer-join.
pub fn normalize(
    respiratory_path: &Path,
    life_expectancy_path: &Path,
    aliases: &AliasTable,
) -> Result<(DataFrame, BTreeSet<String>)> {
    let mut respiratory = load_sub_table(
        respiratory_path,
        RESPIRATORY_METRIC,
        false,
        "respiratory diseases",
    )?;
    let mut life = load_sub_table(
        life_expectancy_path,
        LIFE_EXPECTANCY_METRIC,
        true,
        "life expectancy",
    )?;

    let mut unresolved = resolve_province_column(&mut respiratory, aliases, "respiratory diseases")?;
    unresolved.extend(resolve_province_column(&mut life, aliases, "life expectancy")?);

    let merged = merge_sub_tables(&respiratory, &life)?;
    Ok((merged, unresolved))
}
