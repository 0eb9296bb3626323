//! Command implementations.

use anyhow::{Context, Result};
use comfy_table::Table;
use pds_core::{PipelineConfig, PipelineResult, run_pipeline};
use pds_model::{AliasTable, CleanConfig};
use tracing::info_span;

use crate::cli::BuildArgs;
use crate::summary::apply_table_style;

pub fn run_build(args: &BuildArgs) -> Result<PipelineResult> {
    let span = info_span!("build", data_dir = %args.data_dir.display());
    let _guard = span.enter();
    let mut clean = CleanConfig::default();
    if let Some(year_min) = args.year_min {
        clean.year_min = year_min;
    }
    if let Some(year_max) = args.year_max {
        clean.year_max = year_max;
    }
    let config = PipelineConfig {
        data_dir: args.data_dir.clone(),
        output_dir: args.output_dir.clone(),
        mapping_path: args.mapping.clone(),
        clean,
        dry_run: args.dry_run,
    };
    run_pipeline(&config)
}

pub fn run_provinces() -> Result<()> {
    let aliases = AliasTable::embedded().context("load embedded province mapping")?;
    let mut table = Table::new();
    table.set_header(vec!["Province", "Accepted spellings"]);
    apply_table_style(&mut table);
    for province in aliases.canonical_names() {
        let spellings: Vec<&str> = aliases
            .aliases_of(province)
            .into_iter()
            .filter(|alias| *alias != province.as_str())
            .collect();
        table.add_row(vec![province.clone(), spellings.join(", ")]);
    }
    println!("{table}");
    Ok(())
}
