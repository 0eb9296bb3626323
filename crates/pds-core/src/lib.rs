pub mod air_quality;
pub mod clean;
pub mod frame_utils;
pub mod health;
pub mod merge;
pub mod pipeline;
pub mod resolve;
pub mod rules;
pub mod socioeconomic;

pub use clean::{CleanOutcome, CleanReport, clean};
pub use merge::merge_all;
pub use pipeline::{PipelineConfig, PipelineResult, StageSummary, run_pipeline};
pub use resolve::resolve_province_column;
pub use rules::{SEVERITY_LABELS, SEVERITY_UNCLASSIFIED, classify_level};
