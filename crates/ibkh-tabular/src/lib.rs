//! Tabular input for the iBKH builder (boundary adapter).
//!
//! The graph builder never touches CSV directly. It asks a [`TableReader`] for
//! a [`Table`] and then addresses columns through explicit [`ColumnSpec`]
//! declarations, resolved once against the header:
//!
//! - `ColumnSpec::Name("symbol")` must match a header cell exactly.
//! - `ColumnSpec::Position(2)` must be inside the header width.
//!
//! Anything that fails to resolve is a [`TableError::MissingColumn`], so a
//! changed file layout surfaces at load time instead of as misaligned rows.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("table not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("{}: missing column {column}", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("{}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },
}

impl TableError {
    fn malformed(path: &Path, err: impl fmt::Display) -> Self {
        Self::Malformed {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Column declarations
// ============================================================================

/// A declared column: by header name or by zero-based position.
///
/// Serialized untagged, so config files can write `"symbol"` or `2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSpec {
    Name(String),
    Position(usize),
}

impl ColumnSpec {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn position(index: usize) -> Self {
        Self::Position(index)
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSpec::Name(name) => write!(f, "`{name}`"),
            ColumnSpec::Position(index) => write!(f, "#{index}"),
        }
    }
}

// ============================================================================
// Table
// ============================================================================

/// A fully-read table: header row plus string cells in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(path: impl Into<PathBuf>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            path: path.into(),
            headers,
            rows,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve a declared column to its position in this table.
    pub fn resolve(&self, spec: &ColumnSpec) -> Result<usize, TableError> {
        let found = match spec {
            ColumnSpec::Name(name) => self.headers.iter().position(|h| h == name),
            ColumnSpec::Position(index) => (*index < self.headers.len()).then_some(*index),
        };
        found.ok_or_else(|| TableError::MissingColumn {
            path: self.path.clone(),
            column: spec.to_string(),
        })
    }

    /// Resolve several declared columns at once, failing on the first miss.
    pub fn select<const N: usize>(&self, specs: [&ColumnSpec; N]) -> Result<[usize; N], TableError> {
        let mut out = [0usize; N];
        for (slot, spec) in out.iter_mut().zip(specs) {
            *slot = self.resolve(spec)?;
        }
        Ok(out)
    }

    /// Cell at `(row, column)`; short rows read as empty cells.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

// ============================================================================
// Readers
// ============================================================================

/// Source of tables, addressed by path.
pub trait TableReader {
    fn read(&self, path: &Path) -> Result<Table, TableError>;
}

/// Reads headered, delimiter-separated files with the `csv` crate.
///
/// Short rows are kept as-is and read back as empty trailing cells through
/// [`Table::cell`]. A row wider than the header is [`TableError::Malformed`].
#[derive(Debug, Clone, Copy)]
pub struct CsvTableReader {
    delimiter: u8,
}

impl CsvTableReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl Default for CsvTableReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TableReader for CsvTableReader {
    fn read(&self, path: &Path) -> Result<Table, TableError> {
        if !path.is_file() {
            return Err(TableError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(TableError::NotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(err) => return Err(TableError::malformed(path, err)),
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| TableError::malformed(path, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| TableError::malformed(path, e))?;
            if record.len() > headers.len() {
                let line = record.position().map_or(0, |p| p.line());
                return Err(TableError::malformed(
                    path,
                    format!(
                        "line {line}: {} fields, header has {}",
                        record.len(),
                        headers.len()
                    ),
                ));
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        tracing::debug!(
            path = %path.display(),
            columns = headers.len(),
            rows = rows.len(),
            "read table"
        );
        Ok(Table::new(path, headers, rows))
    }
}

/// Tables held in memory, keyed by the path they stand in for.
///
/// Useful for driving a build without touching the filesystem.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTables {
    tables: HashMap<PathBuf, Table>,
}

impl InMemoryTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table from a header and rows given as string slices.
    pub fn insert(&mut self, path: impl Into<PathBuf>, headers: &[&str], rows: &[&[&str]]) {
        let path = path.into();
        let headers = headers.iter().map(|h| h.to_string()).collect();
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        self.tables
            .insert(path.clone(), Table::new(path, headers, rows));
    }
}

impl TableReader for InMemoryTables {
    fn read(&self, path: &Path) -> Result<Table, TableError> {
        self.tables
            .get(path)
            .cloned()
            .ok_or_else(|| TableError::NotFound {
                path: path.to_path_buf(),
            })
    }
}
