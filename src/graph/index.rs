use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::core::model::AppVersionRecord;
use crate::core::node::{ServiceIdentity, VersionedNode};
use crate::core::version::sort_versions;
use crate::graph::DependencyGraph;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VersionIndex {
    versions: BTreeMap<ServiceIdentity, Vec<String>>,
}

impl VersionIndex {
    pub fn services(&self) -> impl Iterator<Item = &ServiceIdentity> {
        self.versions.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ServiceIdentity, &[String])> {
        self.versions
            .iter()
            .map(|(identity, versions)| (identity, versions.as_slice()))
    }

    pub fn versions(&self, identity: &ServiceIdentity) -> &[String] {
        self.versions
            .get(identity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, node: &VersionedNode) -> bool {
        self.position(node).is_some()
    }

    pub fn position(&self, node: &VersionedNode) -> Option<usize> {
        let version = node.version();
        self.versions(&node.identity())
            .iter()
            .position(|known| known == version)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = VersionedNode> + '_ {
        self.versions
            .iter()
            .flat_map(|(identity, versions)| versions.iter().map(move |ver| identity.at(ver)))
    }

    pub fn from_graph(graph: &DependencyGraph) -> Self {
        let mut builder = IndexBuilder::default();
        for edge in graph.iter_edges() {
            builder.add(edge.source.identity(), edge.source.version());
            builder.add(edge.target.identity(), edge.target.version());
        }
        builder.finish()
    }
}

#[derive(Default)]
struct IndexBuilder {
    versions: BTreeMap<ServiceIdentity, Vec<String>>,
    seen: HashSet<(ServiceIdentity, String)>,
}

impl IndexBuilder {
    fn add(&mut self, identity: ServiceIdentity, version: &str) {
        if !self.seen.insert((identity.clone(), version.to_string())) {
            return;
        }
        self.versions
            .entry(identity)
            .or_default()
            .push(version.to_string());
    }

    fn finish(mut self) -> VersionIndex {
        for versions in self.versions.values_mut() {
            sort_versions(versions);
        }
        VersionIndex {
            versions: self.versions,
        }
    }
}

pub fn build_version_index(app_versions: &[AppVersionRecord]) -> VersionIndex {
    let mut builder = IndexBuilder::default();
    for record in app_versions {
        for svc in &record.services {
            builder.add(svc.identity(), &svc.svc_ver);
        }
    }
    // Shared services only show up as dependencies of the apps using them.
    for record in app_versions {
        for dep in &record.dependencies {
            builder.add(dep.identity(), &dep.svc_ver);
        }
    }
    builder.finish()
}
