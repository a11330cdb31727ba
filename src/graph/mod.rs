use std::collections::{BTreeMap, BTreeSet};

use crate::core::node::{DependencyEdge, VersionedNode};

pub mod aggregate;
pub mod builder;
pub mod index;
pub mod ops;
pub mod traverse;
pub mod viz;

pub use index::VersionIndex;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    pub edges: BTreeMap<VersionedNode, Vec<DependencyEdge>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts unless an identical (source, target, app version) triple exists.
    pub fn insert_edge(&mut self, edge: DependencyEdge) -> bool {
        let outgoing = self.edges.entry(edge.source.clone()).or_default();
        if outgoing.contains(&edge) {
            return false;
        }
        outgoing.push(edge);
        true
    }

    pub fn outgoing(&self, node: &VersionedNode) -> &[DependencyEdge] {
        self.edges.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter_edges(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.values().flatten()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count() == 0
    }

    pub fn nodes(&self) -> BTreeSet<VersionedNode> {
        let mut nodes = BTreeSet::new();
        for edge in self.iter_edges() {
            nodes.insert(edge.source.clone());
            nodes.insert(edge.target.clone());
        }
        nodes
    }

    pub fn retain_known(&mut self, index: &VersionIndex) -> usize {
        let mut dropped = 0;
        for outgoing in self.edges.values_mut() {
            let before = outgoing.len();
            outgoing.retain(|edge| index.contains(&edge.source) && index.contains(&edge.target));
            dropped += before - outgoing.len();
        }
        self.edges.retain(|_, outgoing| !outgoing.is_empty());
        dropped
    }
}

#[cfg(test)]
mod tests {
    use crate::core::node::{DependencyEdge, VersionedNode};
    use crate::graph::DependencyGraph;

    fn edge(source: &str, target: &str, app_version: u64) -> DependencyEdge {
        DependencyEdge::new(
            VersionedNode::from_key(source),
            VersionedNode::from_key(target),
            app_version,
        )
    }

    #[test]
    fn insert_edge_dedups_exact_triples_only() {
        let mut graph = DependencyGraph::new();
        assert!(graph.insert_edge(edge("a/x@1", "a/y@1", 1)));
        assert!(!graph.insert_edge(edge("a/x@1", "a/y@1", 1)));
        assert!(graph.insert_edge(edge("a/x@1", "a/y@1", 2)));
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.nodes().len(), 2);
    }
}
