//! iBKH CLI
//!
//! - `ibkh build`: read an iBKH data directory and write a triple-graph
//!   artifact (CBOR or JSON), optionally with a KGE TSV export
//! - `ibkh inspect`: summarize an artifact
//! - `ibkh catalog`: print the default build configuration

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};

use ibkh_graph::{
    export_tsv, read_triple_graph_file, write_triple_graph_file, ArtifactFormat, BuildConfig,
    KnowledgeHub, TripleGraphFileV1, DATA_DIR_ENV,
};

mod logging;

#[derive(Parser)]
#[command(name = "ibkh")]
#[command(
    author,
    version,
    about = "iBKH: build knowledge-graph-embedding triples from iBKH CSV files"
)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the triple graph from an iBKH data directory.
    Build(BuildArgs),

    /// Summarize a triple-graph artifact (`.cbor` or `.json`).
    Inspect {
        /// Artifact written by `ibkh build`
        input: PathBuf,
    },

    /// Print the default build configuration (vocabularies + relation catalog) as JSON.
    ///
    /// Edit the output and pass it back with `ibkh build --config`.
    Catalog,
}

#[derive(Args)]
struct BuildArgs {
    /// iBKH data directory (overrides the config file's `data_dir`)
    #[arg(env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,
    /// Output artifact
    #[arg(short, long)]
    out: PathBuf,
    /// Artifact encoding (default: from the output extension, `.json` or CBOR)
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
    /// Also write entities.tsv / relations.tsv / triples.tsv into this directory
    #[arg(long)]
    tsv: Option<PathBuf>,
    /// JSON build configuration
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Cbor,
    Json,
}

impl From<FormatArg> for ArtifactFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Cbor => ArtifactFormat::Cbor,
            FormatArg::Json => ArtifactFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match cli.command {
        Commands::Build(args) => cmd_build(&args),
        Commands::Inspect { input } => cmd_inspect(&input),
        Commands::Catalog => cmd_catalog(),
    }
}

fn resolve_config(args: &BuildArgs) -> Result<BuildConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let config = BuildConfig::from_json_file(path)?;
            tracing::debug!(config = %path.display(), "loaded build config");
            config
        }
        None => BuildConfig::default(),
    };
    match (&args.data_dir, &args.config) {
        (Some(dir), _) => config.data_dir = dir.clone(),
        (None, Some(_)) => {}
        (None, None) => {
            return Err(anyhow!(
                "no data directory: pass DATA_DIR, set {DATA_DIR_ENV}, or use --config"
            ))
        }
    }
    Ok(config)
}

fn cmd_build(args: &BuildArgs) -> Result<()> {
    let config = resolve_config(args)?;
    println!(
        "{} iBKH data {}",
        "Building".green().bold(),
        config.data_dir.display()
    );

    let hub = KnowledgeHub::from_config(config)?;
    let output = hub.build()?;

    for stats in &output.stats {
        println!(
            "  {} {:<6} rows={} confirmed={} dropped={} triples={}",
            "→".yellow(),
            stats.stem,
            stats.rows,
            stats.confirmed,
            stats.dropped(),
            stats.triples
        );
    }

    let format = args
        .format
        .map(ArtifactFormat::from)
        .unwrap_or_else(|| ArtifactFormat::from_path(&args.out));
    let file = TripleGraphFileV1::from_output(&output);
    write_triple_graph_file(&args.out, &file, format)?;
    println!(
        "  {} {} (nodes={}, edges={}, edge_types={})",
        "→".cyan(),
        args.out.display(),
        output.graph.num_nodes(),
        output.graph.num_edges(),
        output.graph.num_edge_types()
    );

    if let Some(dir) = &args.tsv {
        let export = export_tsv(dir, &hub, &output)?;
        println!("  {} {}", "→".cyan(), export.entities.display());
        println!("  {} {}", "→".cyan(), export.relations.display());
        println!("  {} {}", "→".cyan(), export.triples.display());
    }

    Ok(())
}

fn cmd_inspect(input: &Path) -> Result<()> {
    let file = read_triple_graph_file(input)?;
    let graph = &file.graph;

    println!("{} {}", "Inspecting".green().bold(), input.display());
    println!("  version: {}", file.version);
    println!(
        "  nodes={} edges={} edge_types={}",
        graph.num_nodes(),
        graph.num_edges(),
        graph.num_edge_types()
    );

    println!("  {}", "node blocks".bold());
    for block in &file.blocks {
        println!(
            "    {:<8} [{}, {}) count={}",
            block.entity_type.as_str(),
            block.offset,
            block.offset + block.count,
            block.count
        );
    }

    let mut per_code = vec![0usize; graph.num_edge_types()];
    for &code in graph.edge_type() {
        per_code[code] += 1;
    }
    println!("  {}", "relation types".bold());
    for (code, key) in file.relation_types.iter().enumerate() {
        println!("    {code:>3} {key} edges={}", per_code[code]);
    }

    if !file.relations.is_empty() {
        println!("  {}", "relation tables".bold());
        for stats in &file.relations {
            println!(
                "    {:<6} rows={} confirmed={} unmapped={} unindexed={} triples={}",
                stats.stem,
                stats.rows,
                stats.confirmed,
                stats.unmapped,
                stats.unindexed,
                stats.triples
            );
        }
    }

    Ok(())
}

fn cmd_catalog() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&BuildConfig::default())?);
    Ok(())
}
