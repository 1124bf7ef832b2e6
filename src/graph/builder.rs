use std::collections::{HashSet, VecDeque};
use std::path::Path;

use anyhow::Result;

use super::{DependencyGraph, TraversalOptions};
use crate::models::PackageKey;

/// Build the transitive dependency graph of `root` breadth-first.
///
/// Packages are marked visited when first discovered, so each versioned
/// package is expanded at most once even if the repository layout is cyclic.
/// Version-less dependencies become edges but are never expanded.
pub fn build_graph(
    root: &PackageKey,
    repo: &Path,
    options: &TraversalOptions,
) -> Result<DependencyGraph> {
    let mut graph = DependencyGraph::new();
    let mut visited: HashSet<PackageKey> = HashSet::new();
    let mut queue: VecDeque<PackageKey> = VecDeque::new();

    visited.insert(root.clone());
    queue.push_back(root.clone());

    while let Some(package) = queue.pop_front() {
        let node_key = package.canonical();
        graph.entry(&node_key);

        let Some(version) = package.version.as_deref() else {
            continue;
        };
        tracing::debug!("expanding {}", node_key);

        let Some(deps) = options.dependencies_of(repo, &package.name, version)? else {
            continue;
        };

        for dep in deps {
            let Some(dep_key) = options.admit(&dep) else {
                continue;
            };
            tracing::trace!("{} -> {}", node_key, dep_key);
            graph.add_edge(&node_key, &dep_key.canonical());

            if dep_key.is_versioned() && visited.insert(dep_key.clone()) {
                queue.push_back(dep_key);
            }
        }
    }

    tracing::info!(
        "built graph for {}: {} packages, {} edges",
        root,
        graph.len(),
        graph.edge_count()
    );
    Ok(graph)
}
