//! Structural build failures.
//!
//! Row-level data problems (unknown keys, unindexed names, unconfirmed rows)
//! are never errors; they only shrink the triple set and show up in
//! [`crate::RelationStats`]. Everything here aborts the whole build.

use ibkh_tabular::TableError;
use std::path::PathBuf;
use thiserror::Error;

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("missing input file: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("schema error in {}: missing column {column}", path.display())]
    Schema { path: PathBuf, column: String },

    #[error("global index overflow: index {index} >= node count {node_count}")]
    IndexOverflow { index: usize, node_count: usize },

    #[error("failed to read {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("invalid build config: {0}")]
    Config(String),

    #[error("malformed triple graph: {message}")]
    Malformed { message: String },
}

impl From<TableError> for BuildError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::NotFound { path } => BuildError::MissingFile { path },
            TableError::MissingColumn { path, column } => BuildError::Schema { path, column },
            TableError::Malformed { path, message } => BuildError::Read { path, message },
        }
    }
}
