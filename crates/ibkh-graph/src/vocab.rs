//! Vocabulary loading: primary key -> canonical name -> local index.

use ahash::AHashMap;
use ibkh_tabular::{ColumnSpec, Table, TableError, TableReader};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::entity::EntityType;
use crate::error::BuildResult;

/// Header of the primary-key column in every iBKH vocabulary file.
pub const PRIMARY_COLUMN: &str = "primary";

/// Declared layout of one vocabulary file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularySpec {
    pub entity_type: EntityType,
    pub file: String,
    pub primary: ColumnSpec,
    pub canonical: ColumnSpec,
}

impl VocabularySpec {
    /// The iBKH layout for `entity_type`.
    pub fn standard(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            file: entity_type.default_vocab_file().to_string(),
            primary: ColumnSpec::name(PRIMARY_COLUMN),
            canonical: ColumnSpec::name(entity_type.default_canonical_column()),
        }
    }

    pub fn path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.file)
    }
}

/// One vocabulary row. `canonical` is `None` when the cell was empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabRecord {
    pub primary: String,
    pub canonical: Option<String>,
}

/// Outcome of resolving a primary key to a local index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Local(usize),
    /// No canonical name for the primary key.
    Unmapped,
    /// A canonical name exists but is not in the index map.
    Unindexed,
}

/// A loaded vocabulary with its converter and index map.
///
/// Both maps collapse duplicates last-write-wins. An empty canonical cell
/// erases any earlier mapping for the same primary key, and never enters the
/// index map, but the row still takes its local index. `len()` counts rows.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    entity_type: EntityType,
    records: Vec<VocabRecord>,
    converter: AHashMap<String, String>,
    index: AHashMap<String, usize>,
}

impl Vocabulary {
    pub fn load<R: TableReader + ?Sized>(
        reader: &R,
        data_dir: &Path,
        spec: &VocabularySpec,
    ) -> BuildResult<Self> {
        let table = reader.read(&spec.path(data_dir))?;
        let vocab = Self::from_table(spec.entity_type, &table, spec)?;
        tracing::info!(
            entity_type = %spec.entity_type,
            path = %table.path().display(),
            rows = vocab.len(),
            "loaded vocabulary"
        );
        tracing::debug!(
            entity_type = %spec.entity_type,
            converter = vocab.converter.len(),
            index = vocab.index.len(),
            "vocabulary maps"
        );
        Ok(vocab)
    }

    pub fn from_table(
        entity_type: EntityType,
        table: &Table,
        spec: &VocabularySpec,
    ) -> Result<Self, TableError> {
        let [primary_col, canonical_col] = table.select([&spec.primary, &spec.canonical])?;

        let records: Vec<VocabRecord> = (0..table.len())
            .map(|row| {
                let canonical = table.cell(row, canonical_col);
                VocabRecord {
                    primary: table.cell(row, primary_col).to_string(),
                    canonical: (!canonical.is_empty()).then(|| canonical.to_string()),
                }
            })
            .collect();

        Ok(Self::from_records(entity_type, records))
    }

    pub fn from_records(entity_type: EntityType, records: Vec<VocabRecord>) -> Self {
        let mut converter = AHashMap::with_capacity(records.len());
        let mut index = AHashMap::with_capacity(records.len());

        for (local, record) in records.iter().enumerate() {
            if !record.primary.is_empty() {
                match &record.canonical {
                    Some(name) => {
                        converter.insert(record.primary.clone(), name.clone());
                    }
                    None => {
                        converter.remove(&record.primary);
                    }
                }
            }
            if let Some(name) = &record.canonical {
                index.insert(name.clone(), local);
            }
        }

        Self {
            entity_type,
            records,
            converter,
            index,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[VocabRecord] {
        &self.records
    }

    pub fn canonical(&self, primary: &str) -> Option<&str> {
        self.converter.get(primary).map(String::as_str)
    }

    pub fn local_index(&self, canonical: &str) -> Option<usize> {
        self.index.get(canonical).copied()
    }

    pub fn resolve(&self, primary: &str) -> Resolution {
        match self.canonical(primary) {
            None => Resolution::Unmapped,
            Some(name) => self
                .local_index(name)
                .map_or(Resolution::Unindexed, Resolution::Local),
        }
    }

    /// Human-readable node label, e.g. `gene::TP53`.
    ///
    /// Falls back to the primary key for rows without a canonical name.
    pub fn label(&self, local: usize) -> Option<String> {
        self.records.get(local).map(|r| {
            let name = r.canonical.as_deref().unwrap_or(&r.primary);
            format!("{}::{}", self.entity_type, name)
        })
    }
}
