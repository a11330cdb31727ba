use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::node::{ConnectionKey, DependencyEdge, VersionedNode};
use crate::graph::traverse::HighlightSet;
use crate::graph::DependencyGraph;

pub const FULL_LABEL_LIMIT: usize = 3;
pub const MARKER_STEP_X: f64 = 12.0;
pub const MARKER_STEP_Y: f64 = 8.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionGroup {
    pub key: ConnectionKey,
    pub source: VersionedNode,
    pub target: VersionedNode,
    pub edges: Vec<DependencyEdge>,
}

impl ConnectionGroup {
    pub fn any_highlighted(&self, highlight: &HighlightSet) -> bool {
        self.edges.iter().any(|edge| highlight.contains_edge(edge))
    }

    pub fn markers(&self, highlight: &HighlightSet) -> Vec<ConnectionMarker> {
        connection_markers(&self.edges, highlight)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "app_version", rename_all = "lowercase")]
pub enum MarkerLabel {
    AppVersion(u64),
    Ellipsis,
}

impl MarkerLabel {
    pub fn text(&self) -> String {
        match self {
            MarkerLabel::AppVersion(version) => version.to_string(),
            MarkerLabel::Ellipsis => "\u{2026}".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionMarker {
    pub label: MarkerLabel,
    pub offset_x: f64,
    pub offset_y: f64,
    pub highlighted: bool,
}

pub fn aggregate(graph: &DependencyGraph) -> BTreeMap<ConnectionKey, Vec<DependencyEdge>> {
    let mut groups: BTreeMap<ConnectionKey, Vec<DependencyEdge>> = BTreeMap::new();
    for edge in graph.iter_edges() {
        groups
            .entry(edge.connection_key())
            .or_default()
            .push(edge.clone());
    }
    for edges in groups.values_mut() {
        edges.sort_by_key(|edge| edge.app_version);
    }
    groups
}

pub fn connection_groups(graph: &DependencyGraph) -> Vec<ConnectionGroup> {
    aggregate(graph)
        .into_iter()
        .filter_map(|(key, edges)| {
            let first = edges.first()?;
            Some(ConnectionGroup {
                key,
                source: first.source.clone(),
                target: first.target.clone(),
                edges,
            })
        })
        .collect()
}

pub fn connection_markers(edges: &[DependencyEdge], highlight: &HighlightSet) -> Vec<ConnectionMarker> {
    let count = edges.len();
    if count <= FULL_LABEL_LIMIT {
        let center = (count as f64 - 1.0) / 2.0;
        return edges
            .iter()
            .enumerate()
            .map(|(idx, edge)| {
                let step = idx as f64 - center;
                ConnectionMarker {
                    label: MarkerLabel::AppVersion(edge.app_version),
                    offset_x: step * MARKER_STEP_X,
                    offset_y: step * MARKER_STEP_Y,
                    highlighted: highlight.contains_edge(edge),
                }
            })
            .collect();
    }

    let first = &edges[0];
    let last = &edges[count - 1];
    vec![
        ConnectionMarker {
            label: MarkerLabel::AppVersion(first.app_version),
            offset_x: -MARKER_STEP_X,
            offset_y: -MARKER_STEP_Y,
            highlighted: highlight.contains_edge(first),
        },
        ConnectionMarker {
            label: MarkerLabel::Ellipsis,
            offset_x: 0.0,
            offset_y: 0.0,
            highlighted: edges.iter().any(|edge| highlight.contains_edge(edge)),
        },
        ConnectionMarker {
            label: MarkerLabel::AppVersion(last.app_version),
            offset_x: MARKER_STEP_X,
            offset_y: MARKER_STEP_Y,
            highlighted: highlight.contains_edge(last),
        },
    ]
}
