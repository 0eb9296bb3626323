//! Tests for locale-aware CSV reading and artifact writing.

use std::io::Write;

use polars::prelude::{AnyValue, DataFrame, NamedFrom, Series};

use pds_ingest::{
    ReadOptions, build_string_frame, build_string_frame_with_columns, cast_f64_column,
    parse_f64_locale, read_csv_table, write_frame_csv,
};

fn write_temp(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("create temp file");
    file.write_all(bytes).expect("write temp file");
    path
}

#[test]
fn reads_comma_separated_utf8() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_temp(
        &dir,
        "plain.csv",
        b"Province,Year,Level\nMadrid,2005,12.5\nBarcelona,2006,\n",
    );
    let table = read_csv_table(&path, &ReadOptions::default()).expect("read");
    assert_eq!(table.headers, vec!["Province", "Year", "Level"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0], vec!["Madrid", "2005", "12.5"]);
    assert_eq!(table.rows[1][2], "");
}

#[test]
fn reads_semicolon_latin1_with_decimal_comma() {
    let dir = tempfile::tempdir().expect("tempdir");
    // "02 Albacete;83,61" in latin1; 0xE9 is 'é' (as in "Jaén").
    let path = write_temp(
        &dir,
        "ine.csv",
        b"Provincias;Total\n02 Albacete;83,61\n23 Ja\xe9n;79,20\n",
    );
    let table = read_csv_table(&path, &ReadOptions::spanish_locale()).expect("read");
    assert_eq!(table.headers, vec!["Provincias", "Total"]);
    assert_eq!(table.rows[1][0], "23 Jaén");
    assert_eq!(parse_f64_locale(&table.rows[0][1], true), Some(83.61));
}

#[test]
fn missing_file_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.csv");
    let error = read_csv_table(&path, &ReadOptions::default()).unwrap_err();
    assert!(error.to_string().contains("required file not found"));
}

#[test]
fn strips_bom_from_first_header() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_temp(&dir, "bom.csv", b"\xef\xbb\xbfProvince,Year\nMadrid,2001\n");
    let table = read_csv_table(&path, &ReadOptions::default()).expect("read");
    assert_eq!(table.headers[0], "Province");
}

#[test]
fn short_rows_are_padded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_temp(&dir, "short.csv", b"A,B,C\n1,2\n");
    let table = read_csv_table(&path, &ReadOptions::default()).expect("read");
    assert_eq!(table.rows[0], vec!["1", "2", ""]);
}

#[test]
fn builds_frame_with_selected_columns() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_temp(&dir, "sel.csv", b"A,B,C\n1,x,2\n3,y,4\n");
    let table = read_csv_table(&path, &ReadOptions::default()).expect("read");

    let df = build_string_frame_with_columns(&table, &["C", "A"]).expect("frame");
    assert_eq!(df.get_column_names()[0].as_str(), "C");
    assert_eq!(df.height(), 2);

    let error = build_string_frame_with_columns(&table, &["A", "Missing"]).unwrap_err();
    assert!(error.to_string().contains("missing required column"));
}

#[test]
fn casts_decimal_comma_column_to_f64() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_temp(&dir, "num.csv", b"Province;Total\nMadrid;1.234,5\nLugo;\n");
    let table = read_csv_table(&path, &ReadOptions::spanish_locale()).expect("read");
    let mut df = build_string_frame(&table).expect("frame");
    cast_f64_column(&mut df, "Total", true).expect("cast");

    let series = df.column("Total").expect("column");
    assert_eq!(series.get(0).unwrap().try_extract::<f64>().unwrap(), 1234.5);
    assert!(matches!(series.get(1).unwrap(), AnyValue::Null));
}

#[test]
fn written_floats_carry_three_decimals() {
    let dir = tempfile::tempdir().expect("tempdir");
    let df = DataFrame::new(vec![
        Series::new("Province".into(), vec!["Madrid", "Lugo"]).into(),
        Series::new("pib".into(), vec![Some(22134.0_f64), None]).into(),
    ])
    .expect("frame");

    let path = dir.path().join("out").join("artifact.csv");
    write_frame_csv(&df, &path).expect("write");
    let written = std::fs::read_to_string(&path).expect("read back");
    assert_eq!(written, "Province,pib\nMadrid,22134.000\nLugo,\n");
}
