use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

use crate::core::node::VersionedNode;
use crate::graph::aggregate::aggregate;
use crate::graph::index::VersionIndex;
use crate::graph::DependencyGraph;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub services: usize,
    pub nodes: usize,
    pub edges: usize,
    pub connections: usize,
    pub app_versions: usize,
}

pub fn graph_stats(graph: &DependencyGraph, index: &VersionIndex) -> GraphStats {
    let app_versions: BTreeSet<u64> = graph.iter_edges().map(|edge| edge.app_version).collect();
    GraphStats {
        services: index.len(),
        nodes: all_nodes(graph, index).len(),
        edges: graph.edge_count(),
        connections: aggregate(graph).len(),
        app_versions: app_versions.len(),
    }
}

pub fn all_nodes(graph: &DependencyGraph, index: &VersionIndex) -> BTreeSet<VersionedNode> {
    let mut nodes = graph.nodes();
    nodes.extend(index.nodes());
    nodes
}

pub fn node_adjacency(graph: &DependencyGraph) -> BTreeMap<VersionedNode, Vec<VersionedNode>> {
    let mut adjacency: BTreeMap<VersionedNode, Vec<VersionedNode>> = BTreeMap::new();
    for edge in graph.iter_edges() {
        let targets = adjacency.entry(edge.source.clone()).or_default();
        if !targets.contains(&edge.target) {
            targets.push(edge.target.clone());
        }
    }
    for targets in adjacency.values_mut() {
        targets.sort();
    }
    adjacency
}

pub fn connection_versions(graph: &DependencyGraph) -> HashMap<(VersionedNode, VersionedNode), Vec<u64>> {
    aggregate(graph)
        .into_values()
        .filter_map(|edges| {
            let first = edges.first()?;
            let key = (first.source.clone(), first.target.clone());
            Some((key, edges.iter().map(|edge| edge.app_version).collect()))
        })
        .collect()
}

pub fn roots(graph: &DependencyGraph, scope: &BTreeSet<VersionedNode>) -> Vec<VersionedNode> {
    let mut indegree: BTreeMap<&VersionedNode, usize> = scope.iter().map(|node| (node, 0)).collect();
    for edge in graph.iter_edges() {
        if edge.source == edge.target {
            continue;
        }
        if let Some(count) = indegree.get_mut(&edge.target) {
            *count += 1;
        }
    }
    let mut out: Vec<VersionedNode> = indegree
        .into_iter()
        .filter_map(|(node, count)| if count == 0 { Some(node.clone()) } else { None })
        .collect();
    if out.is_empty() {
        out = scope.iter().cloned().collect();
    }
    out
}

pub fn find_cycles(graph: &DependencyGraph) -> Vec<Vec<VersionedNode>> {
    let mut digraph: DiGraph<VersionedNode, ()> = DiGraph::new();
    let mut indices: HashMap<VersionedNode, NodeIndex> = HashMap::new();
    for node in graph.nodes() {
        let idx = digraph.add_node(node.clone());
        indices.insert(node, idx);
    }
    for (source, targets) in node_adjacency(graph) {
        for target in targets {
            if let (Some(&from), Some(&to)) = (indices.get(&source), indices.get(&target)) {
                digraph.add_edge(from, to, ());
            }
        }
    }

    let mut cycles: Vec<Vec<VersionedNode>> = tarjan_scc(&digraph)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component
                    .first()
                    .map(|idx| digraph.contains_edge(*idx, *idx))
                    .unwrap_or(false)
        })
        .map(|component| {
            let mut members: Vec<VersionedNode> =
                component.into_iter().map(|idx| digraph[idx].clone()).collect();
            members.sort();
            members
        })
        .collect();
    cycles.sort();
    cycles
}
