use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::core::node::{DependencyEdge, EdgeId, VersionedNode};
use crate::graph::DependencyGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    Neutral,
    Highlighted,
    Dimmed,
}

impl Emphasis {
    pub fn is_highlighted(self) -> bool {
        self == Emphasis::Highlighted
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightSet {
    pub focal: Option<VersionedNode>,
    pub nodes: BTreeSet<VersionedNode>,
    pub edges: BTreeSet<EdgeId>,
}

impl HighlightSet {
    pub fn is_active(&self) -> bool {
        self.focal.is_some()
    }

    pub fn contains_node(&self, node: &VersionedNode) -> bool {
        self.nodes.contains(node)
    }

    pub fn contains_edge(&self, edge: &DependencyEdge) -> bool {
        self.edges.contains(&edge.id())
    }

    pub fn node_emphasis(&self, node: &VersionedNode) -> Emphasis {
        self.emphasis(self.contains_node(node))
    }

    pub fn edge_emphasis(&self, edge: &DependencyEdge) -> Emphasis {
        self.emphasis(self.contains_edge(edge))
    }

    pub fn emphasis(&self, member: bool) -> Emphasis {
        match (self.is_active(), member) {
            (false, _) => Emphasis::Neutral,
            (true, true) => Emphasis::Highlighted,
            (true, false) => Emphasis::Dimmed,
        }
    }
}

/// Walks the graph in both directions from a focal node.
///
/// Incoming edges come either from a reverse index built up front or from a
/// scan of every edge in the graph; both produce the same sets.
pub struct Traversal<'a> {
    graph: &'a DependencyGraph,
    reverse: Option<HashMap<&'a VersionedNode, Vec<&'a DependencyEdge>>>,
}

impl<'a> Traversal<'a> {
    pub fn new(graph: &'a DependencyGraph) -> Self {
        let mut reverse: HashMap<&VersionedNode, Vec<&DependencyEdge>> = HashMap::new();
        for edge in graph.iter_edges() {
            reverse.entry(&edge.target).or_default().push(edge);
        }
        Self {
            graph,
            reverse: Some(reverse),
        }
    }

    pub fn scanning(graph: &'a DependencyGraph) -> Self {
        Self {
            graph,
            reverse: None,
        }
    }

    pub fn highlight(&self, focal: Option<&VersionedNode>) -> HighlightSet {
        let Some(focal) = focal else {
            return HighlightSet::default();
        };
        let mut set = HighlightSet {
            focal: Some(focal.clone()),
            ..HighlightSet::default()
        };
        self.walk_forward(focal, &mut set);
        self.walk_backward(focal, &mut set);
        set
    }

    fn walk_forward(&self, focal: &VersionedNode, set: &mut HighlightSet) {
        let mut visited: HashSet<&VersionedNode> = HashSet::new();
        let mut stack = vec![focal];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            set.nodes.insert(current.clone());
            for edge in self.graph.outgoing(current) {
                set.edges.insert(edge.id());
                set.nodes.insert(edge.target.clone());
                if !visited.contains(&edge.target) {
                    stack.push(&edge.target);
                }
            }
        }
    }

    fn walk_backward(&self, focal: &VersionedNode, set: &mut HighlightSet) {
        let mut visited: HashSet<&VersionedNode> = HashSet::new();
        let mut stack = vec![focal];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            set.nodes.insert(current.clone());
            for edge in self.incoming(current) {
                set.edges.insert(edge.id());
                set.nodes.insert(edge.source.clone());
                if !visited.contains(&edge.source) {
                    stack.push(&edge.source);
                }
            }
        }
    }

    fn incoming(&self, node: &VersionedNode) -> Vec<&'a DependencyEdge> {
        match self.reverse.as_ref() {
            Some(reverse) => reverse.get(node).cloned().unwrap_or_default(),
            None => self
                .graph
                .iter_edges()
                .filter(|edge| &edge.target == node)
                .collect(),
        }
    }
}

pub fn highlight_for(graph: &DependencyGraph, focal: Option<&VersionedNode>) -> HighlightSet {
    Traversal::new(graph).highlight(focal)
}
