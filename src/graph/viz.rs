use std::collections::{BTreeMap, HashMap};

use crate::core::node::VersionedNode;

pub fn app_version_label(versions: &[u64]) -> String {
    if versions.len() > crate::graph::aggregate::FULL_LABEL_LIMIT {
        let first = versions[0];
        let last = versions[versions.len() - 1];
        return format!("{first}, \u{2026}, {last}");
    }
    versions
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_tree(
    roots: &[VersionedNode],
    edges: &BTreeMap<VersionedNode, Vec<VersionedNode>>,
    versions: &HashMap<(VersionedNode, VersionedNode), Vec<u64>>,
) -> String {
    let mut out = String::new();
    for (idx, root) in roots.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(root.as_str());
        out.push('\n');
        let mut path = vec![root.clone()];
        render_tree_children(root, edges, versions, "", &mut path, &mut out);
    }
    out
}

pub fn render_flat(
    roots: &[VersionedNode],
    edges: &BTreeMap<VersionedNode, Vec<VersionedNode>>,
    versions: &HashMap<(VersionedNode, VersionedNode), Vec<u64>>,
) -> String {
    let mut out = String::new();
    for (idx, root) in roots.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(root.as_str());
        out.push('\n');
        let mut path = vec![root.clone()];
        render_flat_children(root, edges, versions, 1, &mut path, &mut out);
    }
    out
}

pub fn render_dot(
    nodes: &[VersionedNode],
    versions: &HashMap<(VersionedNode, VersionedNode), Vec<u64>>,
) -> String {
    let mut clusters: BTreeMap<String, Vec<&VersionedNode>> = BTreeMap::new();
    for node in nodes {
        clusters
            .entry(node.identity().as_str().to_string())
            .or_default()
            .push(node);
    }

    let mut out = String::from("digraph svcgraph {\n");
    for (cluster_idx, (identity, members)) in clusters.iter().enumerate() {
        out.push_str(&format!("  subgraph cluster_{cluster_idx} {{\n"));
        out.push_str(&format!("    label=\"{}\";\n", escape_dot_label(identity)));
        for node in members {
            out.push_str(&format!(
                "    \"{}\" [label=\"{}\"];\n",
                escape_dot_label(node.as_str()),
                escape_dot_label(node.version())
            ));
        }
        out.push_str("  }\n");
    }

    let mut pairs: Vec<_> = versions.iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    for ((source, target), app_versions) in pairs {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
            escape_dot_label(source.as_str()),
            escape_dot_label(target.as_str()),
            app_version_label(app_versions)
        ));
    }
    out.push_str("}\n");
    out
}

fn edge_suffix(
    versions: &HashMap<(VersionedNode, VersionedNode), Vec<u64>>,
    source: &VersionedNode,
    target: &VersionedNode,
) -> String {
    versions
        .get(&(source.clone(), target.clone()))
        .map(|list| format!(" [{}]", app_version_label(list)))
        .unwrap_or_default()
}

fn render_tree_children(
    node: &VersionedNode,
    edges: &BTreeMap<VersionedNode, Vec<VersionedNode>>,
    versions: &HashMap<(VersionedNode, VersionedNode), Vec<u64>>,
    prefix: &str,
    path: &mut Vec<VersionedNode>,
    out: &mut String,
) {
    let children = edges.get(node).cloned().unwrap_or_default();
    for (idx, child) in children.iter().enumerate() {
        let is_last = idx + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if is_last { "`-- " } else { "|-- " });
        out.push_str(child.as_str());
        out.push_str(&edge_suffix(versions, node, child));
        if path.iter().any(|id| id == child) {
            out.push_str(" (cycle)\n");
            continue;
        }
        out.push('\n');
        path.push(child.clone());
        let mut next_prefix = prefix.to_string();
        next_prefix.push_str(if is_last { "    " } else { "|   " });
        render_tree_children(child, edges, versions, &next_prefix, path, out);
        path.pop();
    }
}

fn render_flat_children(
    node: &VersionedNode,
    edges: &BTreeMap<VersionedNode, Vec<VersionedNode>>,
    versions: &HashMap<(VersionedNode, VersionedNode), Vec<u64>>,
    depth: usize,
    path: &mut Vec<VersionedNode>,
    out: &mut String,
) {
    let children = edges.get(node).cloned().unwrap_or_default();
    for child in children {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(child.as_str());
        out.push_str(&edge_suffix(versions, node, &child));
        if path.iter().any(|id| id == &child) {
            out.push_str(" (cycle)\n");
            continue;
        }
        out.push('\n');
        path.push(child.clone());
        render_flat_children(&child, edges, versions, depth + 1, path, out);
        path.pop();
    }
}

fn escape_dot_label(label: &str) -> String {
    label.replace('"', "\\\"")
}
