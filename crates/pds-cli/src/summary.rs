//! Run summary rendering.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pds_core::PipelineResult;

pub fn print_summary(result: &PipelineResult) {
    if let Some(path) = &result.output_path {
        println!("Dataset: {}", path.display());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Records"),
        header_cell("Duration (ms)"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for stage in &result.stages {
        table.add_row(vec![
            Cell::new(&stage.stage)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(stage.records),
            Cell::new(stage.duration_ms),
        ]);
    }
    table.add_row(vec![
        Cell::new("FINAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.final_records).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");

    let report = &result.clean_report;
    println!(
        "Cleaning: {} removed ({} null province, {} excluded, {} sentinel, {} out of range)",
        report.total_removed(),
        report.null_province_removed,
        report.excluded_removed,
        report.sentinel_removed,
        report.out_of_range_removed,
    );
    if report.null_threshold_exceeded {
        eprintln!("warning: null-province fraction hit the threshold; those rows were kept");
    }
    if !result.unresolved_provinces.is_empty() {
        eprintln!("Unrecognized provinces:");
        for province in &result.unresolved_provinces {
            eprintln!("- {province}");
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
