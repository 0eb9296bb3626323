//! Staged processing pipeline.
//!
//! Strictly sequential: each stage fully consumes its input and produces a
//! complete output before the next begins. A fatal error at any stage
//! unwinds the whole run and no final artifact is published; data-quality
//! anomalies are counted and the run proceeds.
//!
//! 1. **Air quality**: load, classify severity, resolve provinces
//! 2. **Health**: load both sub-tables, resolve, outer-join
//! 3. **Socioeconomic**: load wide table, unpivot, resolve
//! 4. **Merge**: two primary-preserving joins on (province, year)
//! 5. **Clean**: threshold, exclusion and year-range policies
//! 6. **Persist**: one artifact per stage plus the final dataset

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::Local;
use pds_ingest::write_frame_csv;
use pds_model::{AliasTable, CleanConfig};
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use crate::clean::{CleanReport, clean};
use crate::merge::merge_all;
use crate::{air_quality, health, socioeconomic};

pub const AIR_QUALITY_DIR: &str = "air_quality_data";
pub const HEALTH_DIR: &str = "health_data";
pub const SOCIOECONOMIC_DIR: &str = "socioeconomic_data";

pub const AIR_QUALITY_RAW: &str = "air_quality_with_province.csv";
pub const RESPIRATORY_RAW: &str = "enfermedades_respiratorias.csv";
pub const LIFE_EXPECTANCY_RAW: &str = "esperanza_vida.csv";
pub const SOCIOECONOMIC_RAW: &str = "PIB per cap provincias 2000-2021.csv";

/// Pipeline configuration assembled by the caller.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root folder holding the three source directories.
    pub data_dir: PathBuf,
    /// Final dataset directory; defaults to `<data_dir>/output`.
    pub output_dir: Option<PathBuf>,
    /// Alias mapping file; the embedded mapping is used when absent.
    pub mapping_path: Option<PathBuf>,
    pub clean: CleanConfig,
    /// Run every stage but write no artifacts.
    pub dry_run: bool,
}

/// Per-stage record count for the run summary.
#[derive(Debug, Clone)]
pub struct StageSummary {
    pub stage: String,
    pub records: usize,
    pub duration_ms: u128,
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub stages: Vec<StageSummary>,
    /// Distinct province strings that failed to resolve, across all sources.
    pub unresolved_provinces: BTreeSet<String>,
    pub clean_report: CleanReport,
    pub final_records: usize,
    pub final_columns: usize,
    pub output_path: Option<PathBuf>,
}

/// Verify the source directory layout before any work starts.
fn verify_structure(data_dir: &Path) -> Result<()> {
    let required = [AIR_QUALITY_DIR, HEALTH_DIR, SOCIOECONOMIC_DIR];
    let missing: Vec<String> = required
        .iter()
        .map(|name| data_dir.join(name))
        .filter(|path| !path.is_dir())
        .map(|path| path.display().to_string())
        .collect();
    if !missing.is_empty() {
        bail!("required data directories are missing: {}", missing.join(", "));
    }
    info!("project structure verified");
    Ok(())
}

fn load_alias_table(mapping_path: Option<&Path>) -> Result<AliasTable> {
    match mapping_path {
        Some(path) => {
            AliasTable::from_path(path).with_context(|| format!("load {}", path.display()))
        }
        None => AliasTable::embedded().context("load embedded province mapping"),
    }
}

/// Run the whole pipeline.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineResult> {
    verify_structure(&config.data_dir)?;
    let aliases = load_alias_table(config.mapping_path.as_deref())?;

    let mut stages = Vec::new();
    let mut unresolved: BTreeSet<String> = BTreeSet::new();

    let air = run_stage("air quality", &mut stages, || {
        let span = info_span!("air_quality");
        let _guard = span.enter();
        let raw = config.data_dir.join(AIR_QUALITY_DIR).join("raw").join(AIR_QUALITY_RAW);
        let (frame, stage_unresolved) = air_quality::normalize(&raw, &aliases)?;
        unresolved.extend(stage_unresolved);
        persist_stage(&frame, config, AIR_QUALITY_DIR, "air_quality.csv")?;
        Ok(frame)
    })?;

    let health_frame = run_stage("health", &mut stages, || {
        let span = info_span!("health");
        let _guard = span.enter();
        let raw_dir = config.data_dir.join(HEALTH_DIR).join("raw");
        let (frame, stage_unresolved) = health::normalize(
            &raw_dir.join(RESPIRATORY_RAW),
            &raw_dir.join(LIFE_EXPECTANCY_RAW),
            &aliases,
        )?;
        unresolved.extend(stage_unresolved);
        persist_stage(&frame, config, HEALTH_DIR, "health.csv")?;
        Ok(frame)
    })?;

    let socio = run_stage("socioeconomic", &mut stages, || {
        let span = info_span!("socioeconomic");
        let _guard = span.enter();
        let raw = config.data_dir.join(SOCIOECONOMIC_DIR).join("raw").join(SOCIOECONOMIC_RAW);
        let (frame, stage_unresolved) = socioeconomic::normalize(&raw, &aliases)?;
        unresolved.extend(stage_unresolved);
        persist_stage(&frame, config, SOCIOECONOMIC_DIR, "socioeconomic.csv")?;
        Ok(frame)
    })?;

    let merged = run_stage("merge", &mut stages, || {
        let span = info_span!("merge");
        let _guard = span.enter();
        merge_all(&air, &health_frame, &socio)
    })?;

    let mut clean_report = CleanReport::default();
    let cleaned = run_stage("clean", &mut stages, || {
        let span = info_span!("clean");
        let _guard = span.enter();
        let outcome = clean(&merged, &config.clean)?;
        clean_report = outcome.report;
        Ok(outcome.frame)
    })?;

    let output_path = if config.dry_run {
        info!("dry run, final dataset not written");
        None
    } else {
        let span = info_span!("persist");
        let _guard = span.enter();
        let output_dir = config
            .output_dir
            .clone()
            .unwrap_or_else(|| config.data_dir.join("output"));
        let stamped = output_dir.join(format!(
            "dataset_{}.csv",
            Local::now().format("%Y%m%d_%H%M%S")
        ));
        write_frame_csv(&cleaned, &stamped)?;
        let stable = output_dir.join("dataset.csv");
        write_frame_csv(&cleaned, &stable)?;
        info!(path = %stable.display(), "final dataset saved");
        Some(stable)
    };

    Ok(PipelineResult {
        stages,
        unresolved_provinces: unresolved,
        clean_report,
        final_records: cleaned.height(),
        final_columns: cleaned.width(),
        output_path,
    })
}

fn run_stage<F>(
    stage: &str,
    stages: &mut Vec<StageSummary>,
    run: F,
) -> Result<DataFrame>
where
    F: FnOnce() -> Result<DataFrame>,
{
    let start = Instant::now();
    let frame = run().with_context(|| format!("{stage} stage"))?;
    let duration_ms = start.elapsed().as_millis();
    info!(
        stage,
        record_count = frame.height(),
        duration_ms,
        "stage complete"
    );
    stages.push(StageSummary {
        stage: stage.to_string(),
        records: frame.height(),
        duration_ms,
    });
    Ok(frame)
}

fn persist_stage(
    frame: &DataFrame,
    config: &PipelineConfig,
    source_dir: &str,
    file_name: &str,
) -> Result<()> {
    if config.dry_run {
        return Ok(());
    }
    if frame.height() == 0 {
        bail!("no data available to save for {file_name}");
    }
    let path = config
        .data_dir
        .join(source_dir)
        .join("processed")
        .join(file_name);
    write_frame_csv(frame, &path)
}
