//! Build configuration.
//!
//! The default is the stock iBKH layout: three vocabularies with their
//! standard columns and the six-relation catalog. A JSON file may override
//! any part of it; omitted fields keep their defaults.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::entity::EntityType;
use crate::error::{BuildError, BuildResult};
use crate::relation::{standard_catalog, RelationDef};
use crate::vocab::VocabularySpec;

/// Environment variable naming the default data directory (read by the CLI).
pub const DATA_DIR_ENV: &str = "IBKH_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub data_dir: PathBuf,
    pub vocabularies: Vec<VocabularySpec>,
    pub relations: Vec<RelationDef>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            vocabularies: EntityType::ALL
                .iter()
                .map(|&ty| VocabularySpec::standard(ty))
                .collect(),
            relations: standard_catalog(),
        }
    }
}

impl BuildConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .map_err(|e| anyhow!("invalid config {}: {e}", path.display()))
    }

    pub fn vocabulary(&self, entity_type: EntityType) -> Option<&VocabularySpec> {
        self.vocabularies
            .iter()
            .find(|v| v.entity_type == entity_type)
    }

    /// Exactly one vocabulary per entity type, and non-empty relation stems.
    pub fn validate(&self) -> BuildResult<()> {
        for ty in EntityType::ALL {
            let count = self
                .vocabularies
                .iter()
                .filter(|v| v.entity_type == ty)
                .count();
            match count {
                1 => {}
                0 => return Err(BuildError::Config(format!("no vocabulary declared for {ty}"))),
                n => {
                    return Err(BuildError::Config(format!(
                        "{n} vocabularies declared for {ty}"
                    )))
                }
            }
        }
        if let Some(def) = self.relations.iter().find(|d| d.stem.trim().is_empty()) {
            return Err(BuildError::Config(format!(
                "relation {} has an empty file stem",
                def.key()
            )));
        }
        Ok(())
    }
}
