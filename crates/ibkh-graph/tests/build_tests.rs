//! End-to-end builds over CSV fixtures on disk.

use std::fs;
use std::path::Path;

use ibkh_graph::{
    standard_catalog, BuildConfig, BuildError, ColumnSpec, EntityType, KnowledgeHub,
    RelationColumns, RelationDef,
};
use tempfile::{tempdir, TempDir};

const RELATION_HEADER: &str = "src,dst,flag\n";

fn write(dir: &Path, name: &str, text: &str) {
    fs::write(dir.join(name), text).unwrap();
}

/// Vocabulary sizes 2 (drug), 3 (disease), 1 (gene); every relation file empty.
fn fixture() -> TempDir {
    let dir = tempdir().unwrap();
    let d = dir.path();
    write(d, "drug_vocab.csv", "primary,name\nDB001,aspirin\nDB002,ibuprofen\n");
    write(
        d,
        "disease_vocab.csv",
        "primary,icd_9,name\nDOID:1,250.0,diabetes\nDOID:2,401.9,hypertension\nDOID:3,493.0,asthma\n",
    );
    write(d, "gene_vocab.csv", "primary,symbol\nNCBI:7157,TP53\n");
    for def in standard_catalog() {
        write(d, &def.file_name(), RELATION_HEADER);
    }
    dir
}

#[test]
fn node_blocks_follow_vocabulary_sizes() {
    let dir = fixture();
    let hub = KnowledgeHub::open(dir.path()).unwrap();
    let out = hub.build().unwrap();

    assert_eq!(out.graph.num_nodes(), 6);
    let ranges: Vec<_> = out.index.blocks().iter().map(|b| b.range()).collect();
    assert_eq!(ranges, vec![0..2, 2..5, 5..6]);
}

#[test]
fn zero_confirmed_rows_build_an_empty_graph() {
    let dir = fixture();
    write(dir.path(), "D_Di_res.csv", "src,dst,flag\nDB001,DOID:1,0\nDB002,DOID:2,0\n");

    let out = KnowledgeHub::open(dir.path()).unwrap().build().unwrap();
    assert_eq!(out.graph.num_edges(), 0);
    assert_eq!(out.graph.num_nodes(), 6);
    assert_eq!(out.graph.num_edge_types(), 0);
    assert_eq!(out.graph.edge_index(), &[Vec::<usize>::new(), Vec::new()]);
}

#[test]
fn confirmed_rows_only() {
    let dir = fixture();
    write(
        dir.path(),
        "D_Di_res.csv",
        "Drug,Disease,Treats\nDB001,DOID:1,1\nDB001,DOID:2,0\nDB002,DOID:3,1\n",
    );

    let out = KnowledgeHub::open(dir.path()).unwrap().build().unwrap();
    let triples: Vec<_> = out.graph.triples().collect();
    assert_eq!(triples, vec![(0, 0, 2), (1, 0, 4)]);
}

#[test]
fn short_relation_row_is_dropped_not_raised() {
    let dir = fixture();
    write(dir.path(), "D_D_res.csv", "a,b,c\nDB001,DB002,1\nDB002,DB001\n");

    let out = KnowledgeHub::open(dir.path()).unwrap().build().unwrap();
    assert_eq!(out.graph.triples().collect::<Vec<_>>(), vec![(0, 0, 1)]);

    let d_d = out.stats.iter().find(|s| s.stem == "D_D").unwrap();
    assert_eq!((d_d.rows, d_d.confirmed, d_d.triples), (2, 1, 1));
}

#[test]
fn unknown_source_key_is_dropped_silently() {
    let dir = fixture();
    write(
        dir.path(),
        "D_G_res.csv",
        "Drug,Gene,Target\nDB999,NCBI:7157,1\nDB002,NCBI:7157,1\n",
    );

    let out = KnowledgeHub::open(dir.path()).unwrap().build().unwrap();
    assert_eq!(out.graph.num_edges(), 1);
    assert_eq!(out.graph.triples().next(), Some((1, 0, 5)));

    let stats = out.stats.iter().find(|s| s.stem == "D_G").unwrap();
    assert_eq!((stats.confirmed, stats.unmapped, stats.triples), (2, 1, 1));
}

#[test]
fn relation_codes_follow_first_contributing_relation() {
    let dir = fixture();
    write(dir.path(), "G_G_res.csv", "a,b,c\nNCBI:7157,NCBI:7157,1\n");
    write(dir.path(), "D_D_res.csv", "a,b,c\nDB001,DB002,1\n");
    write(dir.path(), "Di_G_res.csv", "a,b,c\nDOID:3,NCBI:7157,1.0\n");

    let out = KnowledgeHub::open(dir.path()).unwrap().build().unwrap();
    assert_eq!(out.graph.num_edge_types(), 3);
    let labels: Vec<_> = out.relations.keys().iter().map(|k| k.label.as_str()).collect();
    assert_eq!(labels, vec!["D_D", "Di_G", "G_G"]);
    assert_eq!(
        out.graph.triples().collect::<Vec<_>>(),
        vec![(0, 0, 1), (4, 1, 5), (5, 2, 5)]
    );
    for (h, _, t) in out.graph.triples() {
        assert!(h < out.graph.num_nodes() && t < out.graph.num_nodes());
    }
}

#[test]
fn repeated_catalog_entry_shares_one_code() {
    let dir = fixture();
    write(dir.path(), "D_D_res.csv", "a,b,c\nDB001,DB002,1\n");
    let def = RelationDef::new("D_D", EntityType::Drug, "D_D", EntityType::Drug);

    let hub = KnowledgeHub::open(dir.path()).unwrap();
    let out = hub.build_with(&[def.clone(), def]).unwrap();
    assert_eq!(out.graph.num_edge_types(), 1);
    assert_eq!(out.graph.edge_type(), &[0, 0]);
    assert_eq!(out.stats[0].code, out.stats[1].code);
}

#[test]
fn duplicate_canonical_names_collapse_to_last_row() {
    let dir = fixture();
    write(dir.path(), "gene_vocab.csv", "primary,symbol\nNCBI:1,TP53\nNCBI:2,TP53\n");
    write(dir.path(), "G_G_res.csv", "a,b,c\nNCBI:1,NCBI:2,1\n");

    let out = KnowledgeHub::open(dir.path()).unwrap().build().unwrap();
    assert_eq!(out.graph.num_nodes(), 7);
    assert_eq!(out.graph.triples().collect::<Vec<_>>(), vec![(6, 0, 6)]);
}

#[test]
fn missing_vocabulary_file_fails_at_open() {
    let dir = fixture();
    fs::remove_file(dir.path().join("gene_vocab.csv")).unwrap();

    let err = KnowledgeHub::open(dir.path()).err().unwrap();
    assert!(matches!(err, BuildError::MissingFile { ref path } if path.ends_with("gene_vocab.csv")));
}

#[test]
fn missing_vocabulary_column_is_a_schema_error() {
    let dir = fixture();
    write(dir.path(), "drug_vocab.csv", "primary,drug_name\nDB001,aspirin\n");

    let err = KnowledgeHub::open(dir.path()).err().unwrap();
    assert!(matches!(err, BuildError::Schema { .. }), "{err}");
}

#[test]
fn missing_relation_file_fails_the_build() {
    let dir = fixture();
    fs::remove_file(dir.path().join("Di_Di_res.csv")).unwrap();

    let hub = KnowledgeHub::open(dir.path()).unwrap();
    let err = hub.build().unwrap_err();
    assert!(matches!(err, BuildError::MissingFile { ref path } if path.ends_with("Di_Di_res.csv")));
}

#[test]
fn relation_columns_can_be_declared_by_name() {
    let dir = fixture();
    write(
        dir.path(),
        "D_G_res.csv",
        "Source,Gene,Drug,Target\ndrugbank,NCBI:7157,DB001,1\ndrugbank,NCBI:7157,DB002,0\n",
    );
    let mut config = BuildConfig::new(dir.path());
    config.relations = vec![RelationDef::new("D_G", EntityType::Drug, "targets", EntityType::Gene)
        .with_columns(RelationColumns {
            source: ColumnSpec::name("Drug"),
            target: ColumnSpec::name("Gene"),
            flag: ColumnSpec::name("Target"),
        })];

    let out = KnowledgeHub::from_config(config).unwrap().build().unwrap();
    assert_eq!(out.graph.triples().collect::<Vec<_>>(), vec![(0, 0, 5)]);
    assert_eq!(out.relations.keys()[0].to_string(), "drug:targets:gene");
}

#[test]
fn undeclared_relation_column_is_a_schema_error() {
    let dir = fixture();
    let mut config = BuildConfig::new(dir.path());
    config.relations = vec![RelationDef::new("G_G", EntityType::Gene, "G_G", EntityType::Gene)
        .with_columns(RelationColumns {
            flag: ColumnSpec::name("Interaction"),
            ..RelationColumns::default()
        })];

    let err = KnowledgeHub::from_config(config).unwrap().build().unwrap_err();
    assert!(matches!(err, BuildError::Schema { ref column, .. } if column.contains("Interaction")));
}
