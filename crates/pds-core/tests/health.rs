//! Tests for the health sub-tables and their outer join.

use std::fs;

use pds_core::frame_utils::{f64_column, string_column};
use pds_core::health::{
    LIFE_EXPECTANCY_METRIC, RESPIRATORY_METRIC, load_sub_table, merge_sub_tables, normalize,
    strip_locality_code,
};
use pds_model::AliasTable;
use polars::prelude::{DataFrame, NamedFrom, Series};
use tempfile::tempdir;

fn sub_table(metric: &str, provinces: &[&str], periods: &[&str], values: &[Option<f64>]) -> DataFrame {
    DataFrame::new(vec![
        Series::new(
            "Province".into(),
            provinces.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "Periodo".into(),
            periods.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(metric.into(), values.to_vec()).into(),
    ])
    .expect("sub table")
}

#[test]
fn locality_codes_and_spaces_are_stripped() {
    assert_eq!(strip_locality_code("02 Albacete"), "Albacete");
    assert_eq!(strip_locality_code("15 Coruña, A"), "Coruña,A");
    assert_eq!(strip_locality_code("38 Santa Cruz de Tenerife"), "SantaCruzdeTenerife");
    assert_eq!(strip_locality_code("Madrid"), "Madrid");
}

#[test]
fn sub_table_loads_latin1_semicolon_files() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("respiratorias.csv");
    // "15 Coruña, A" in latin1; the ñ is a single 0xF1 byte.
    let mut content = b"Provincias;Periodo;Total\n".to_vec();
    content.extend_from_slice(b"02 Albacete;2005;123\n");
    content.extend_from_slice(b"15 Coru\xf1a, A;2005;456\n");
    fs::write(&path, content).expect("write raw file");

    let df = load_sub_table(&path, RESPIRATORY_METRIC, false, "respiratory diseases")
        .expect("load sub table");
    let provinces = string_column(&df, "Province").expect("column");
    assert_eq!(provinces, vec!["Albacete", "Coruña,A"]);
    let totals = f64_column(&df, RESPIRATORY_METRIC).expect("column");
    assert_eq!(totals, vec![Some(123.0), Some(456.0)]);
}

#[test]
fn sub_table_parses_decimal_commas_when_asked() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("esperanza.csv");
    fs::write(&path, "Provincias;Periodo;Total\n28 Madrid;2005;83,2\n").expect("write raw file");

    let df = load_sub_table(&path, LIFE_EXPECTANCY_METRIC, true, "life expectancy")
        .expect("load sub table");
    let totals = f64_column(&df, LIFE_EXPECTANCY_METRIC).expect("column");
    assert_eq!(totals, vec![Some(83.2)]);
}

#[test]
fn outer_join_keeps_one_sided_keys() {
    let respiratory = sub_table(
        RESPIRATORY_METRIC,
        &["Madrid", "Lugo"],
        &["2005", "2005"],
        &[Some(240.0), Some(80.0)],
    );
    let life = sub_table(
        LIFE_EXPECTANCY_METRIC,
        &["Madrid", "Zamora"],
        &["2005", "2005"],
        &[Some(83.2), Some(84.0)],
    );

    let merged = merge_sub_tables(&respiratory, &life).expect("merge");
    assert_eq!(merged.height(), 3);
    let provinces = string_column(&merged, "Province").expect("column");
    assert_eq!(provinces, vec!["Madrid", "Lugo", "Zamora"]);
    assert_eq!(
        f64_column(&merged, RESPIRATORY_METRIC).expect("column"),
        vec![Some(240.0), Some(80.0), None]
    );
    assert_eq!(
        f64_column(&merged, LIFE_EXPECTANCY_METRIC).expect("column"),
        vec![Some(83.2), None, Some(84.0)]
    );
}

#[test]
fn outer_join_distinguishes_periods_of_the_same_province() {
    let respiratory = sub_table(
        RESPIRATORY_METRIC,
        &["Madrid", "Madrid"],
        &["2005", "2006"],
        &[Some(240.0), Some(250.0)],
    );
    let life = sub_table(LIFE_EXPECTANCY_METRIC, &["Madrid"], &["2006"], &[Some(83.5)]);

    let merged = merge_sub_tables(&respiratory, &life).expect("merge");
    assert_eq!(merged.height(), 2);
    assert_eq!(
        f64_column(&merged, LIFE_EXPECTANCY_METRIC).expect("column"),
        vec![None, Some(83.5)]
    );
}

#[test]
fn normalize_resolves_stripped_ine_labels() {
    let dir = tempdir().expect("tempdir");
    let resp_path = dir.path().join("respiratorias.csv");
    let life_path = dir.path().join("esperanza.csv");
    let mut resp = b"Provincias;Periodo;Total\n".to_vec();
    resp.extend_from_slice(b"15 Coru\xf1a, A;2005;456\n");
    fs::write(&resp_path, resp).expect("write raw file");
    fs::write(&life_path, "Provincias;Periodo;Total\n28 Madrid;2005;83,2\n")
        .expect("write raw file");

    let aliases = AliasTable::embedded().expect("embedded mapping");
    let (merged, unresolved) = normalize(&resp_path, &life_path, &aliases).expect("normalize");

    assert!(unresolved.is_empty());
    let provinces = string_column(&merged, "Province").expect("column");
    assert_eq!(provinces, vec!["A Coruña", "Madrid"]);
}
