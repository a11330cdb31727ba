use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::core::model::{AdjacencyEntry, AppVersionRecord, Document, LinkRecord};
use crate::core::node::{DependencyEdge, ServiceIdentity, VersionedNode};
use crate::graph::index::{build_version_index, VersionIndex};
use crate::graph::DependencyGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphSource {
    #[default]
    Auto,
    Links,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLink {
    pub app_version: u64,
    pub source: ServiceIdentity,
    pub target: ServiceIdentity,
    pub implicit: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub graph: DependencyGraph,
    pub skipped: Vec<SkippedLink>,
    pub duplicates: usize,
}

#[derive(Debug, Default)]
pub struct GraphBuilder {
    report: BuildReport,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_edge(&mut self, source: VersionedNode, target: VersionedNode, app_version: u64) -> bool {
        let inserted = self
            .report
            .graph
            .insert_edge(DependencyEdge::new(source, target, app_version));
        if !inserted {
            self.report.duplicates += 1;
        }
        inserted
    }

    pub fn add_app_version(&mut self, record: &AppVersionRecord) {
        let lookup = version_lookup(record);
        for link in &record.links {
            self.add_link(record.version, link, &lookup, false);
        }
        for link in &record.implicit_links {
            self.add_link(record.version, link, &lookup, true);
        }
    }

    fn add_link(
        &mut self,
        app_version: u64,
        link: &LinkRecord,
        lookup: &HashMap<ServiceIdentity, &str>,
        implicit: bool,
    ) {
        let source = link.source.identity();
        let target = link.target.identity();
        match (lookup.get(&source), lookup.get(&target)) {
            (Some(source_ver), Some(target_ver)) => {
                let from = source.at(source_ver);
                let to = target.at(target_ver);
                self.add_edge(from, to, app_version);
            }
            _ => {
                debug!(
                    app_version,
                    source = %source,
                    target = %target,
                    implicit,
                    "skipping link with unresolved endpoint"
                );
                self.report.skipped.push(SkippedLink {
                    app_version,
                    source,
                    target,
                    implicit,
                });
            }
        }
    }

    pub fn finish(self) -> BuildReport {
        self.report
    }
}

// Own services win over dependencies for the same identity.
fn version_lookup(record: &AppVersionRecord) -> HashMap<ServiceIdentity, &str> {
    let mut lookup = HashMap::new();
    for dep in &record.dependencies {
        lookup.insert(dep.identity(), dep.svc_ver.as_str());
    }
    for svc in &record.services {
        lookup.insert(svc.identity(), svc.svc_ver.as_str());
    }
    lookup
}

pub fn build_graph(app_versions: &[AppVersionRecord]) -> DependencyGraph {
    build_graph_with_report(app_versions).graph
}

pub fn build_graph_with_report(app_versions: &[AppVersionRecord]) -> BuildReport {
    let mut builder = GraphBuilder::new();
    for record in app_versions {
        builder.add_app_version(record);
    }
    let report = builder.finish();
    debug!(
        edges = report.graph.edge_count(),
        skipped = report.skipped.len(),
        "built dependency graph from links"
    );
    report
}

pub fn graph_from_adjacency(adjacency: &BTreeMap<String, Vec<AdjacencyEntry>>) -> DependencyGraph {
    adjacency_report(adjacency).graph
}

fn adjacency_report(adjacency: &BTreeMap<String, Vec<AdjacencyEntry>>) -> BuildReport {
    let mut builder = GraphBuilder::new();
    for (source, targets) in adjacency {
        for entry in targets {
            builder.add_edge(
                VersionedNode::from_key(source.clone()),
                VersionedNode::from_key(entry.target.clone()),
                entry.app_version,
            );
        }
    }
    builder.finish()
}

#[derive(Debug, Clone, Default)]
pub struct LoadedGraph {
    pub graph: DependencyGraph,
    pub index: VersionIndex,
    pub skipped: Vec<SkippedLink>,
    pub duplicates: usize,
    pub dropped_unknown: usize,
}

pub fn load_graph(doc: &Document, source: GraphSource) -> LoadedGraph {
    let precomputed = match source {
        GraphSource::Auto => doc.dependency_graph.as_ref(),
        GraphSource::Links => None,
    };

    if let Some(adjacency) = precomputed {
        let BuildReport {
            mut graph,
            duplicates,
            ..
        } = adjacency_report(adjacency);
        let index = if doc.app_versions.is_empty() {
            VersionIndex::from_graph(&graph)
        } else {
            build_version_index(&doc.app_versions)
        };
        let dropped_unknown = graph.retain_known(&index);
        if dropped_unknown > 0 {
            debug!(dropped_unknown, "dropped precomputed edges with unknown endpoints");
        }
        return LoadedGraph {
            graph,
            index,
            skipped: Vec::new(),
            duplicates,
            dropped_unknown,
        };
    }

    let report = build_graph_with_report(&doc.app_versions);
    LoadedGraph {
        graph: report.graph,
        index: build_version_index(&doc.app_versions),
        skipped: report.skipped,
        duplicates: report.duplicates,
        dropped_unknown: 0,
    }
}
