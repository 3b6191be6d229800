use ibkh_tabular::{CsvTableReader, TableReader};
use std::path::{Path, PathBuf};

use crate::builder::{BuildContext, BuildOutput};
use crate::config::BuildConfig;
use crate::entity::EntityType;
use crate::error::{BuildError, BuildResult};
use crate::index::GlobalIndex;
use crate::relation::RelationDef;
use crate::vocab::Vocabulary;

/// A loaded iBKH data directory.
///
/// Vocabularies are read once, at construction. Every call to
/// [`KnowledgeHub::build`] lays out a fresh global index and relation
/// registry, reads the relation tables and returns a new [`BuildOutput`].
pub struct KnowledgeHub<R = CsvTableReader> {
    config: BuildConfig,
    reader: R,
    /// In [`EntityType::ALL`] order.
    vocabularies: Vec<Vocabulary>,
}

impl KnowledgeHub<CsvTableReader> {
    /// Open `data_dir` with the standard layout.
    pub fn open(data_dir: impl Into<PathBuf>) -> BuildResult<Self> {
        Self::from_config(BuildConfig::new(data_dir))
    }

    pub fn from_config(config: BuildConfig) -> BuildResult<Self> {
        Self::with_reader(config, CsvTableReader::new())
    }
}

impl<R: TableReader> KnowledgeHub<R> {
    pub fn with_reader(config: BuildConfig, reader: R) -> BuildResult<Self> {
        config.validate()?;

        let mut vocabularies = Vec::with_capacity(EntityType::ALL.len());
        for ty in EntityType::ALL {
            let spec = config
                .vocabulary(ty)
                .ok_or_else(|| BuildError::Config(format!("no vocabulary declared for {ty}")))?;
            vocabularies.push(Vocabulary::load(&reader, &config.data_dir, spec)?);
        }

        Ok(Self {
            config,
            reader,
            vocabularies,
        })
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    pub fn vocabulary(&self, entity_type: EntityType) -> &Vocabulary {
        &self.vocabularies[entity_type.ordinal()]
    }

    pub fn node_count(&self) -> usize {
        self.vocabularies.iter().map(Vocabulary::len).sum()
    }

    /// Lay out drug, disease and gene blocks from the current vocabularies.
    pub fn assign_global_index(&self) -> GlobalIndex {
        let sizes: Vec<(EntityType, usize)> = EntityType::ALL
            .iter()
            .map(|&ty| (ty, self.vocabulary(ty).len()))
            .collect();
        GlobalIndex::assign(&sizes)
    }

    /// Build with the configured relation catalog.
    pub fn build(&self) -> BuildResult<BuildOutput> {
        self.build_with(&self.config.relations)
    }

    /// Build with an explicit catalog, processed in order.
    pub fn build_with(&self, catalog: &[RelationDef]) -> BuildResult<BuildOutput> {
        let mut ctx = BuildContext::new(self.assign_global_index());
        tracing::info!(
            data_dir = %self.data_dir().display(),
            relations = catalog.len(),
            nodes = self.node_count(),
            "building triple graph"
        );

        for def in catalog {
            let table = self.reader.read(&def.path(self.data_dir()))?;
            ctx.add_relation(
                def,
                &table,
                self.vocabulary(def.source),
                self.vocabulary(def.target),
            )?;
        }

        ctx.finish()
    }

    /// Label of a global node, e.g. `disease::250.0`.
    pub fn node_label(&self, index: &GlobalIndex, global: usize) -> Option<String> {
        let (ty, local) = index.locate(global)?;
        self.vocabulary(ty).label(local)
    }
}
