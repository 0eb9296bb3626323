//! CLI argument definitions for the provincial dataset builder.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pds",
    version,
    about = "Provincial dataset builder - merge Spanish environmental and health statistics",
    long_about = "Build a per-province, per-year dataset from three public sources:\n\n\
                  air quality measurements, INE health indicators, and GDP per capita.\n\
                  Province names are reconciled onto the 52 official provinces before\n\
                  merging, and the merged table is cleaned by configurable policies."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline over a data folder and write the final dataset.
    Build(BuildArgs),

    /// List the canonical provinces and their accepted spellings.
    Provinces,
}

#[derive(Parser)]
pub struct BuildArgs {
    /// Data folder holding the air_quality_data, health_data and
    /// socioeconomic_data directories.
    #[arg(value_name = "DATA_FOLDER")]
    pub data_dir: PathBuf,

    /// Directory for the final dataset (default: <DATA_FOLDER>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Province alias mapping file (default: the embedded mapping).
    #[arg(long = "mapping", value_name = "PATH")]
    pub mapping: Option<PathBuf>,

    /// First calendar year kept by the cleaning stage.
    #[arg(long = "year-min", value_name = "YEAR")]
    pub year_min: Option<i32>,

    /// Last calendar year kept by the cleaning stage.
    #[arg(long = "year-max", value_name = "YEAR")]
    pub year_max: Option<i32>,

    /// Run every stage and report, but write no files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
