//! CLI library components for the provincial dataset builder.

pub mod logging;
