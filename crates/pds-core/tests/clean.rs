//! Tests for the cleaning policy steps.

use pds_core::clean;
use pds_core::frame_utils::string_column;
use pds_model::CleanConfig;
use polars::prelude::{DataFrame, NamedFrom, Series};

fn frame(provinces: Vec<Option<&str>>, years: Vec<&str>) -> DataFrame {
    let provinces: Vec<Option<String>> = provinces
        .into_iter()
        .map(|p| p.map(str::to_string))
        .collect();
    let years: Vec<String> = years.into_iter().map(str::to_string).collect();
    let values: Vec<f64> = (0..provinces.len()).map(|idx| idx as f64).collect();
    DataFrame::new(vec![
        Series::new("Province".into(), provinces).into(),
        Series::new("Year".into(), years).into(),
        Series::new("Value".into(), values).into(),
    ])
    .expect("build frame")
}

#[test]
fn zero_missing_provinces_is_a_noop() {
    let df = frame(
        vec![Some("Madrid"), Some("Barcelona")],
        vec!["2005-01-01", "2006-01-01"],
    );
    let outcome = clean(&df, &CleanConfig::default()).expect("clean");
    assert_eq!(outcome.frame.height(), 2);
    assert_eq!(outcome.report.null_province_removed, 0);
    assert!(!outcome.report.null_threshold_exceeded);
}

#[test]
fn small_missing_fraction_is_dropped() {
    // 1 of 25 rows missing: 4%, strictly below the 5% threshold.
    let mut provinces: Vec<Option<&str>> = vec![Some("Madrid"); 24];
    provinces.push(None);
    let years = vec!["2005-01-01"; 25];
    let df = frame(provinces, years);

    let outcome = clean(&df, &CleanConfig::default()).expect("clean");
    assert_eq!(outcome.report.null_province_removed, 1);
    assert_eq!(outcome.frame.height(), 24);
}

#[test]
fn large_missing_fraction_is_kept_with_warning() {
    // 2 of 20 rows missing: 10%, at or above the threshold.
    let mut provinces: Vec<Option<&str>> = vec![Some("Madrid"); 18];
    provinces.push(None);
    provinces.push(None);
    let years = vec!["2005-01-01"; 20];
    let df = frame(provinces, years);

    let outcome = clean(&df, &CleanConfig::default()).expect("clean");
    assert_eq!(outcome.report.null_province_removed, 0);
    assert!(outcome.report.null_threshold_exceeded);
    // The null rows survive step 1 and are never dropped by later steps.
    assert_eq!(outcome.frame.height(), 20);
}

#[test]
fn island_provinces_are_removed() {
    let df = frame(
        vec![
            Some("Madrid"),
            Some("Santa Cruz de Tenerife"),
            Some("Las Palmas"),
            Some("Illes Balears"),
            Some("Ceuta"),
            Some("Melilla"),
            Some("Barcelona"),
        ],
        vec!["2005-01-01"; 7],
    );
    let outcome = clean(&df, &CleanConfig::default()).expect("clean");
    assert_eq!(outcome.report.excluded_removed, 5);
    let provinces = string_column(&outcome.frame, "Province").expect("column");
    assert_eq!(provinces, vec!["Madrid", "Barcelona"]);
}

#[test]
fn sentinel_provinces_are_removed_regardless_of_other_fields() {
    let df = frame(
        vec![Some("Desconocido"), Some("Error"), Some("Lugo")],
        vec!["2010-01-01", "2011-01-01", "2012-01-01"],
    );
    let outcome = clean(&df, &CleanConfig::default()).expect("clean");
    assert_eq!(outcome.report.sentinel_removed, 2);
    let provinces = string_column(&outcome.frame, "Province").expect("column");
    assert_eq!(provinces, vec!["Lugo"]);
}

#[test]
fn year_bound_is_inclusive_for_date_years() {
    let df = frame(
        vec![Some("Madrid"); 4],
        vec!["1999-01-01", "2000-01-01", "2022-06-15", "2023-01-01"],
    );
    let outcome = clean(&df, &CleanConfig::default()).expect("clean");
    assert_eq!(outcome.report.out_of_range_removed, 2);
    let years = string_column(&outcome.frame, "Year").expect("column");
    assert_eq!(years, vec!["2000-01-01", "2022-06-15"]);
}

#[test]
fn year_bound_is_inclusive_for_integer_years() {
    let df = DataFrame::new(vec![
        Series::new("Province".into(), vec!["Madrid"; 4]).into(),
        Series::new("Year".into(), vec![1999i32, 2000, 2022, 2023]).into(),
    ])
    .expect("build frame");
    let outcome = clean(&df, &CleanConfig::default()).expect("clean");
    assert_eq!(outcome.report.out_of_range_removed, 2);
    assert_eq!(outcome.frame.height(), 2);
}

#[test]
fn surviving_rows_keep_their_order() {
    let df = frame(
        vec![Some("Zamora"), Some("Ceuta"), Some("Madrid"), Some("Lugo")],
        vec!["2001-01-01", "2002-01-01", "2003-01-01", "2004-01-01"],
    );
    let outcome = clean(&df, &CleanConfig::default()).expect("clean");
    let provinces = string_column(&outcome.frame, "Province").expect("column");
    assert_eq!(provinces, vec!["Zamora", "Madrid", "Lugo"]);
}

#[test]
fn missing_key_column_is_fatal() {
    let df = DataFrame::new(vec![
        Series::new("Region".into(), vec!["Madrid"]).into(),
    ])
    .expect("build frame");
    let error = clean(&df, &CleanConfig::default()).unwrap_err();
    assert!(error.to_string().contains("missing required columns"));
}
