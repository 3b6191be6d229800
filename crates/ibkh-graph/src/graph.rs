use serde::{Deserialize, Serialize};

use crate::error::{BuildError, BuildResult};

/// The produced triple set, laid out for KGE trainers.
///
/// - `edge_index`: `[heads, tails]`, shape 2 x E
/// - `edge_type`: relation code per edge, length E
/// - `num_nodes`: N, size of the global index space
/// - `num_edge_types`: R, distinct relation kinds observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripleGraph {
    edge_index: [Vec<usize>; 2],
    edge_type: Vec<usize>,
    num_nodes: usize,
    num_edge_types: usize,
}

impl TripleGraph {
    /// Wrap already-assembled arrays; see [`TripleGraph::validate`].
    pub fn new(
        edge_index: [Vec<usize>; 2],
        edge_type: Vec<usize>,
        num_nodes: usize,
        num_edge_types: usize,
    ) -> Self {
        Self {
            edge_index,
            edge_type,
            num_nodes,
            num_edge_types,
        }
    }

    pub fn edge_index(&self) -> &[Vec<usize>; 2] {
        &self.edge_index
    }

    pub fn heads(&self) -> &[usize] {
        &self.edge_index[0]
    }

    pub fn tails(&self) -> &[usize] {
        &self.edge_index[1]
    }

    pub fn edge_type(&self) -> &[usize] {
        &self.edge_type
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_edge_types(&self) -> usize {
        self.num_edge_types
    }

    pub fn num_edges(&self) -> usize {
        self.edge_type.len()
    }

    /// `(head, relation, tail)` in edge order.
    pub fn triples(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.heads()
            .iter()
            .zip(&self.edge_type)
            .zip(self.tails())
            .map(|((&h, &r), &t)| (h, r, t))
    }

    /// Check shape and bounds: equal array lengths, every node index `< N`,
    /// every relation code `< R`.
    pub fn validate(&self) -> BuildResult<()> {
        let edges = self.edge_type.len();
        if self.heads().len() != edges || self.tails().len() != edges {
            return Err(BuildError::Malformed {
                message: format!(
                    "edge arrays disagree: {} heads, {} tails, {} relation codes",
                    self.heads().len(),
                    self.tails().len(),
                    edges
                ),
            });
        }
        if let Some(&index) = self
            .heads()
            .iter()
            .chain(self.tails())
            .find(|&&i| i >= self.num_nodes)
        {
            return Err(BuildError::IndexOverflow {
                index,
                node_count: self.num_nodes,
            });
        }
        if let Some(&code) = self.edge_type.iter().find(|&&r| r >= self.num_edge_types) {
            return Err(BuildError::Malformed {
                message: format!(
                    "relation code {code} out of range for {} relation types",
                    self.num_edge_types
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triples_zip_the_three_arrays() {
        let graph = TripleGraph::new([vec![0, 1], vec![2, 3]], vec![0, 1], 4, 2);
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(graph.triples().collect::<Vec<_>>(), vec![(0, 0, 2), (1, 1, 3)]);
        graph.validate().unwrap();
    }

    #[test]
    fn empty_graph_is_valid() {
        let graph = TripleGraph::new([vec![], vec![]], vec![], 6, 0);
        graph.validate().unwrap();
        assert_eq!(graph.num_edges(), 0);
    }

    #[test]
    fn tail_past_node_count_overflows() {
        let graph = TripleGraph::new([vec![0], vec![6]], vec![0], 6, 1);
        let err = graph.validate().unwrap_err();
        assert!(matches!(
            err,
            BuildError::IndexOverflow {
                index: 6,
                node_count: 6
            }
        ));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let graph = TripleGraph::new([vec![0, 1], vec![1]], vec![0, 0], 2, 1);
        let err = graph.validate().unwrap_err();
        assert!(matches!(err, BuildError::Malformed { .. }), "{err}");
        assert!(err.to_string().contains("1 tails"));
    }

    #[test]
    fn relation_code_past_count_is_rejected() {
        let graph = TripleGraph::new([vec![0], vec![1]], vec![3], 2, 1);
        assert!(matches!(graph.validate(), Err(BuildError::Malformed { .. })));
    }
}
