//! iBKH triple-graph builder
//!
//! Turns the iBKH CSV layout (drug, disease and gene vocabularies plus
//! pairwise relation tables) into one homogeneous triple set for
//! knowledge-graph-embedding training:
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────────┐
//! │ *_vocab.csv      │──►│ Vocabulary       │──►│ GlobalIndex          │
//! │ (primary, name)  │   │ primary→canonical│   │ drug|disease|gene    │
//! └──────────────────┘   │ canonical→local  │   │ blocks, reverse map  │
//!                        └────────┬─────────┘   └──────────┬───────────┘
//! ┌──────────────────┐            │                        │
//! │ <STEM>_res.csv   │──► confirm ─► resolve ─► shift ─────┤
//! │ (src, dst, flag) │                                     ▼
//! └──────────────────┘            RelationRegistry ─► TripleGraph
//!                                 (src, label, dst)   [heads; tails], types
//! ```
//!
//! ## Key behaviour
//!
//! - **Fixed block order**: drug, then disease, then gene; `global = offset + local`.
//! - **Silent row drops**: unconfirmed or unresolvable rows never fail a
//!   build; they are counted per relation in [`RelationStats`].
//! - **Fatal structure errors**: missing files, missing columns and index
//!   overflow abort the build with a [`BuildError`].
//! - **Build-scoped state**: offsets and relation codes live for one
//!   [`KnowledgeHub::build`] call only.

pub mod builder;
pub mod config;
pub mod entity;
pub mod error;
pub mod export;
pub mod graph;
pub mod hub;
pub mod index;
pub mod relation;
pub mod vocab;

pub use builder::{is_confirmed, BuildOutput, RelationStats};
pub use config::{BuildConfig, DATA_DIR_ENV};
pub use entity::EntityType;
pub use error::{BuildError, BuildResult};
pub use export::{
    decode_triple_graph_file_v1, encode_triple_graph_file_v1, export_tsv,
    read_triple_graph_file, write_triple_graph_file, ArtifactFormat, TripleGraphFileV1,
    TsvExport, TRIPLE_GRAPH_FILE_VERSION_V1,
};
pub use graph::TripleGraph;
pub use hub::KnowledgeHub;
pub use index::{GlobalIndex, NodeBlock};
pub use relation::{standard_catalog, RelationColumns, RelationDef, RelationKey, RelationRegistry};
pub use vocab::{Resolution, VocabRecord, Vocabulary, VocabularySpec, PRIMARY_COLUMN};

pub use ibkh_tabular::{ColumnSpec, CsvTableReader, InMemoryTables, Table, TableReader};
