//! Build artifacts on disk.
//!
//! Two outputs:
//! - a versioned triple-graph file (CBOR or JSON) that keeps the graph
//!   together with its node blocks, relation keys and drop counters, and
//! - a KGE-trainer TSV layout: `entities.tsv`, `relations.tsv`, `triples.tsv`.

use anyhow::{anyhow, Context, Result};
use ibkh_tabular::TableReader;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::builder::{BuildOutput, RelationStats};
use crate::graph::TripleGraph;
use crate::hub::KnowledgeHub;
use crate::index::NodeBlock;
use crate::relation::RelationKey;

pub const TRIPLE_GRAPH_FILE_VERSION_V1: &str = "ibkh_triple_graph_v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactFormat {
    Cbor,
    Json,
}

impl ArtifactFormat {
    /// `.json` means JSON; anything else is CBOR.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ArtifactFormat::Json,
            _ => ArtifactFormat::Cbor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripleGraphFileV1 {
    pub version: String,
    pub created_at_unix_secs: u64,
    pub blocks: Vec<NodeBlock>,
    /// Indexed by relation code.
    pub relation_types: Vec<RelationKey>,
    #[serde(default)]
    pub relations: Vec<RelationStats>,
    pub graph: TripleGraph,
}

impl TripleGraphFileV1 {
    pub fn from_output(output: &BuildOutput) -> Self {
        Self {
            version: TRIPLE_GRAPH_FILE_VERSION_V1.to_string(),
            created_at_unix_secs: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            blocks: output.index.blocks().to_vec(),
            relation_types: output.relations.keys().to_vec(),
            relations: output.stats.clone(),
            graph: output.graph.clone(),
        }
    }
}

pub fn encode_triple_graph_file_v1(file: &TripleGraphFileV1, format: ArtifactFormat) -> Result<Vec<u8>> {
    if file.version != TRIPLE_GRAPH_FILE_VERSION_V1 {
        return Err(anyhow!(
            "unsupported triple graph file version: {} (expected {TRIPLE_GRAPH_FILE_VERSION_V1})",
            file.version
        ));
    }
    match format {
        ArtifactFormat::Cbor => {
            let mut out = Vec::new();
            ciborium::ser::into_writer(file, &mut out)
                .map_err(|e| anyhow!("failed to CBOR-encode triple graph: {e}"))?;
            Ok(out)
        }
        ArtifactFormat::Json => Ok(serde_json::to_vec_pretty(file)?),
    }
}

pub fn decode_triple_graph_file_v1(bytes: &[u8], format: ArtifactFormat) -> Result<TripleGraphFileV1> {
    let file: TripleGraphFileV1 = match format {
        ArtifactFormat::Cbor => ciborium::de::from_reader(bytes)
            .map_err(|e| anyhow!("failed to CBOR-decode triple graph: {e}"))?,
        ArtifactFormat::Json => serde_json::from_slice(bytes)
            .map_err(|e| anyhow!("failed to JSON-decode triple graph: {e}"))?,
    };
    if file.version != TRIPLE_GRAPH_FILE_VERSION_V1 {
        return Err(anyhow!(
            "unsupported triple graph file version: {} (expected {TRIPLE_GRAPH_FILE_VERSION_V1})",
            file.version
        ));
    }
    if file.relation_types.len() != file.graph.num_edge_types() {
        return Err(anyhow!(
            "triple graph lists {} relation types but declares {}",
            file.relation_types.len(),
            file.graph.num_edge_types()
        ));
    }
    file.graph.validate()?;
    Ok(file)
}

pub fn write_triple_graph_file(path: &Path, file: &TripleGraphFileV1, format: ArtifactFormat) -> Result<()> {
    let bytes = encode_triple_graph_file_v1(file, format)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Read an artifact, choosing the format from the file extension.
pub fn read_triple_graph_file(path: &Path) -> Result<TripleGraphFileV1> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    decode_triple_graph_file_v1(&bytes, ArtifactFormat::from_path(path))
}

// ============================================================================
// TSV export
// ============================================================================

#[derive(Debug, Clone)]
pub struct TsvExport {
    pub entities: PathBuf,
    pub relations: PathBuf,
    pub triples: PathBuf,
}

fn tsv_writer(path: &Path) -> Result<csv::Writer<fs::File>> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))
}

/// Write `entities.tsv`, `relations.tsv` and `triples.tsv` into `dir`.
pub fn export_tsv<R: TableReader>(
    dir: &Path,
    hub: &KnowledgeHub<R>,
    output: &BuildOutput,
) -> Result<TsvExport> {
    fs::create_dir_all(dir)?;
    let export = TsvExport {
        entities: dir.join("entities.tsv"),
        relations: dir.join("relations.tsv"),
        triples: dir.join("triples.tsv"),
    };

    let mut w = tsv_writer(&export.entities)?;
    for global in 0..output.index.node_count() {
        let label = hub
            .node_label(&output.index, global)
            .ok_or_else(|| anyhow!("global index {global} has no vocabulary row"))?;
        w.write_record([global.to_string(), label])?;
    }
    w.flush()?;

    let mut w = tsv_writer(&export.relations)?;
    for (code, key) in output.relations.keys().iter().enumerate() {
        w.write_record([code.to_string(), key.to_string()])?;
    }
    w.flush()?;

    let mut w = tsv_writer(&export.triples)?;
    for (h, r, t) in output.graph.triples() {
        w.write_record([h.to_string(), r.to_string(), t.to_string()])?;
    }
    w.flush()?;

    tracing::info!(
        dir = %dir.display(),
        entities = output.index.node_count(),
        relations = output.relations.len(),
        triples = output.graph.num_edges(),
        "exported TSV"
    );
    Ok(export)
}
