use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating the alias mapping.
///
/// All of these are fatal configuration errors: a run cannot proceed with a
/// missing or inconsistent province mapping.
#[derive(Debug, Error)]
pub enum AliasTableError {
    #[error("alias mapping file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed alias mapping: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("expected {expected} canonical provinces in the mapping, found {found}")]
    WrongCardinality { expected: usize, found: usize },
    #[error("alias '{alias}' is claimed by both '{first}' and '{second}'")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },
}

pub type Result<T> = std::result::Result<T, AliasTableError>;
