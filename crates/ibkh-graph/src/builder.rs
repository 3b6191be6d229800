//! Triple assembly.
//!
//! A [`BuildContext`] owns everything mutable for one build: the global index
//! layout, the relation registry and the edge accumulators. It is created by
//! [`crate::KnowledgeHub::build_with`], fed one relation table at a time and
//! consumed by [`BuildContext::finish`]. Nothing outlives the call except the
//! returned [`BuildOutput`].

use ahash::AHashSet;
use ibkh_tabular::Table;
use serde::{Deserialize, Serialize};

use crate::error::{BuildError, BuildResult};
use crate::graph::TripleGraph;
use crate::index::GlobalIndex;
use crate::relation::{RelationDef, RelationKey, RelationRegistry};
use crate::vocab::{Resolution, Vocabulary};

/// Per-relation counters. `confirmed == unmapped + unindexed + triples`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationStats {
    pub stem: String,
    pub key: RelationKey,
    /// `None` when the relation contributed no triples.
    pub code: Option<usize>,
    pub rows: usize,
    pub confirmed: usize,
    /// A primary key had no canonical name.
    pub unmapped: usize,
    /// A canonical name had no local index.
    pub unindexed: usize,
    pub triples: usize,
}

impl RelationStats {
    fn new(def: &RelationDef) -> Self {
        Self {
            stem: def.stem.clone(),
            key: def.key(),
            code: None,
            rows: 0,
            confirmed: 0,
            unmapped: 0,
            unindexed: 0,
            triples: 0,
        }
    }

    /// Confirmed rows that did not become triples.
    pub fn dropped(&self) -> usize {
        self.unmapped + self.unindexed
    }
}

/// Result of one build.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub graph: TripleGraph,
    pub index: GlobalIndex,
    pub relations: RelationRegistry,
    pub stats: Vec<RelationStats>,
}

/// `true` for a confirmation flag equal to 1 (`1`, `1.0`, `true`).
pub fn is_confirmed(flag: &str) -> bool {
    let flag = flag.trim();
    if flag.eq_ignore_ascii_case("true") {
        return true;
    }
    flag.parse::<f64>().map_or(false, |v| v == 1.0)
}

pub(crate) struct BuildContext {
    index: GlobalIndex,
    registry: RelationRegistry,
    seen: AHashSet<RelationKey>,
    heads: Vec<usize>,
    relations: Vec<usize>,
    tails: Vec<usize>,
    stats: Vec<RelationStats>,
}

impl BuildContext {
    pub(crate) fn new(index: GlobalIndex) -> Self {
        Self {
            index,
            registry: RelationRegistry::new(),
            seen: AHashSet::new(),
            heads: Vec::new(),
            relations: Vec::new(),
            tails: Vec::new(),
            stats: Vec::new(),
        }
    }

    fn offset(&self, def: &RelationDef, vocab: &Vocabulary) -> BuildResult<usize> {
        self.index.offset(vocab.entity_type()).ok_or_else(|| {
            BuildError::Config(format!(
                "relation {} uses entity type {} with no node block",
                def.stem,
                vocab.entity_type()
            ))
        })
    }

    /// Filter, resolve and shift one relation table into the accumulators.
    pub(crate) fn add_relation(
        &mut self,
        def: &RelationDef,
        table: &Table,
        source: &Vocabulary,
        target: &Vocabulary,
    ) -> BuildResult<&RelationStats> {
        let key = def.key();
        if !self.seen.insert(key.clone()) {
            tracing::warn!(
                stem = %def.stem,
                relation = %key,
                "relation key repeated in catalog; edges merge under one code"
            );
        }

        let [source_col, target_col, flag_col] =
            table.select([&def.columns.source, &def.columns.target, &def.columns.flag])?;
        let source_offset = self.offset(def, source)?;
        let target_offset = self.offset(def, target)?;

        let mut stats = RelationStats::new(def);
        let mut heads = Vec::new();
        let mut tails = Vec::new();

        for row in 0..table.len() {
            stats.rows += 1;
            if !is_confirmed(table.cell(row, flag_col)) {
                continue;
            }
            stats.confirmed += 1;

            let resolved = (
                source.resolve(table.cell(row, source_col)),
                target.resolve(table.cell(row, target_col)),
            );
            match resolved {
                (Resolution::Local(s), Resolution::Local(t)) => {
                    heads.push(s + source_offset);
                    tails.push(t + target_offset);
                }
                (Resolution::Unmapped, _) | (_, Resolution::Unmapped) => stats.unmapped += 1,
                _ => stats.unindexed += 1,
            }
        }

        stats.triples = heads.len();
        if !heads.is_empty() {
            let code = self.registry.code_for(&key);
            stats.code = Some(code);
            self.relations
                .extend(std::iter::repeat(code).take(heads.len()));
            self.heads.append(&mut heads);
            self.tails.append(&mut tails);
        }

        tracing::debug!(
            stem = %stats.stem,
            relation = %stats.key,
            code = ?stats.code,
            rows = stats.rows,
            confirmed = stats.confirmed,
            unmapped = stats.unmapped,
            unindexed = stats.unindexed,
            triples = stats.triples,
            "relation processed"
        );

        let slot = self.stats.len();
        self.stats.push(stats);
        Ok(&self.stats[slot])
    }

    /// Concatenate, bound-check and package the build.
    pub(crate) fn finish(self) -> BuildResult<BuildOutput> {
        let node_count = self.index.node_count();
        if let Some(&index) = self
            .heads
            .iter()
            .chain(&self.tails)
            .find(|&&i| i >= node_count)
        {
            return Err(BuildError::IndexOverflow { index, node_count });
        }

        let graph = TripleGraph::new(
            [self.heads, self.tails],
            self.relations,
            node_count,
            self.registry.len(),
        );

        tracing::info!(
            nodes = graph.num_nodes(),
            edges = graph.num_edges(),
            edge_types = graph.num_edge_types(),
            "triple graph built"
        );

        Ok(BuildOutput {
            graph,
            index: self.index,
            relations: self.registry,
            stats: self.stats,
        })
    }
}
