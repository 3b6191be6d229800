//! Relation catalog and relation-type registry.

use ahash::AHashMap;
use ibkh_tabular::ColumnSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::entity::EntityType;

/// A relation kind: `(source type, label, target type)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationKey {
    pub source: EntityType,
    pub label: String,
    pub target: EntityType,
}

impl RelationKey {
    pub fn new(source: EntityType, label: impl Into<String>, target: EntityType) -> Self {
        Self {
            source,
            label: label.into(),
            target,
        }
    }
}

impl fmt::Display for RelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.label, self.target)
    }
}

/// Declared columns of a relation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationColumns {
    pub source: ColumnSpec,
    pub target: ColumnSpec,
    /// Confirmation flag; only rows equal to 1 become triples.
    pub flag: ColumnSpec,
}

impl Default for RelationColumns {
    /// iBKH layout: source key, target key, flag in the first three columns.
    fn default() -> Self {
        Self {
            source: ColumnSpec::position(0),
            target: ColumnSpec::position(1),
            flag: ColumnSpec::position(2),
        }
    }
}

/// One entry of the relation catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDef {
    /// File stem; the table lives at `<data_dir>/<stem>_res.csv`.
    pub stem: String,
    pub source: EntityType,
    pub label: String,
    pub target: EntityType,
    #[serde(default)]
    pub columns: RelationColumns,
}

impl RelationDef {
    pub fn new(
        stem: impl Into<String>,
        source: EntityType,
        label: impl Into<String>,
        target: EntityType,
    ) -> Self {
        Self {
            stem: stem.into(),
            source,
            label: label.into(),
            target,
            columns: RelationColumns::default(),
        }
    }

    pub fn with_columns(mut self, columns: RelationColumns) -> Self {
        self.columns = columns;
        self
    }

    pub fn file_name(&self) -> String {
        format!("{}_res.csv", self.stem)
    }

    pub fn path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.file_name())
    }

    pub fn key(&self) -> RelationKey {
        RelationKey::new(self.source, self.label.clone(), self.target)
    }
}

/// The six iBKH relation tables, in processing order.
///
/// Each stem doubles as the relation label, so every key is unique.
pub fn standard_catalog() -> Vec<RelationDef> {
    use EntityType::{Disease, Drug, Gene};
    vec![
        RelationDef::new("D_D", Drug, "D_D", Drug),
        RelationDef::new("D_Di", Drug, "D_Di", Disease),
        RelationDef::new("D_G", Drug, "D_G", Gene),
        RelationDef::new("Di_Di", Disease, "Di_Di", Disease),
        RelationDef::new("Di_G", Disease, "Di_G", Gene),
        RelationDef::new("G_G", Gene, "G_G", Gene),
    ]
}

/// Dense relation codes in first-seen order.
///
/// Lives for one build; codes mean nothing across builds.
#[derive(Debug, Clone, Default)]
pub struct RelationRegistry {
    codes: AHashMap<RelationKey, usize>,
    keys: Vec<RelationKey>,
}

impl RelationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Code for `key`, assigning the next one on first sight.
    pub fn code_for(&mut self, key: &RelationKey) -> usize {
        if let Some(&code) = self.codes.get(key) {
            return code;
        }
        let code = self.keys.len();
        self.codes.insert(key.clone(), code);
        self.keys.push(key.clone());
        code
    }

    pub fn get(&self, key: &RelationKey) -> Option<usize> {
        self.codes.get(key).copied()
    }

    pub fn key(&self, code: usize) -> Option<&RelationKey> {
        self.keys.get(code)
    }

    /// Keys in code order.
    pub fn keys(&self) -> &[RelationKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
