use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;

use super::TraversalOptions;
use crate::models::{NodeStatus, PackageKey};

/// A package on the active depth-first path with its remaining dependencies.
struct Frame {
    key: PackageKey,
    deps: Vec<PackageKey>,
    next: usize,
}

/// Compute the order in which packages must be loaded, dependencies first.
///
/// Depth-first post-order from `root`. An edge leading back into the active
/// path closes a cycle and is not followed; packages reachable through several
/// paths are emitted once, at their first completion. The walk keeps its own
/// stack so long dependency chains do not grow the native call stack.
pub fn resolve_load_order(
    root: &PackageKey,
    repo: &Path,
    options: &TraversalOptions,
) -> Result<Vec<String>> {
    let mut status: HashMap<PackageKey, NodeStatus> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    let mut stack: Vec<Frame> = vec![enter(root.clone(), repo, options, &mut status)?];

    while let Some(frame) = stack.last_mut() {
        if let Some(dep) = frame.deps.get(frame.next).cloned() {
            frame.next += 1;
            match status.get(&dep).copied().unwrap_or_default() {
                NodeStatus::Unvisited => {
                    let child = enter(dep, repo, options, &mut status)?;
                    stack.push(child);
                }
                NodeStatus::InProgress => {
                    tracing::debug!("cycle through {}, edge skipped", dep);
                }
                NodeStatus::Done => {}
            }
            continue;
        }

        if let Some(done) = stack.pop() {
            status.insert(done.key.clone(), NodeStatus::Done);
            order.push(done.key.canonical());
        }
    }

    Ok(order)
}

/// Mark `key` in progress and load its admissible dependencies.
///
/// Version-less packages are leaves; their descriptor is never looked up.
fn enter(
    key: PackageKey,
    repo: &Path,
    options: &TraversalOptions,
    status: &mut HashMap<PackageKey, NodeStatus>,
) -> Result<Frame> {
    status.insert(key.clone(), NodeStatus::InProgress);

    let deps = match key.version.as_deref() {
        Some(version) => options
            .dependencies_of(repo, &key.name, version)?
            .unwrap_or_default()
            .iter()
            .filter_map(|record| options.admit(record))
            .collect(),
        None => Vec::new(),
    };
    tracing::debug!("visiting {} ({} dependencies)", key, deps.len());

    Ok(Frame { key, deps, next: 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::build_graph;
    use crate::graph::testing::write_pom;
    use tempfile::TempDir;

    fn position(order: &[String], key: &str) -> usize {
        order.iter().position(|k| k == key).unwrap()
    }

    #[test]
    fn test_end_to_end_order() {
        let repo = TempDir::new().unwrap();
        write_pom(repo.path(), "app", "1.0", &[("lib-a", "2.0"), ("lib-b", "3.0")]);
        write_pom(repo.path(), "lib-a", "2.0", &[("lib-b", "3.0")]);
        write_pom(repo.path(), "lib-b", "3.0", &[]);

        let order = resolve_load_order(
            &PackageKey::new("app", "1.0"),
            repo.path(),
            &TraversalOptions::default(),
        )
        .unwrap();

        assert_eq!(order, vec!["lib-b:3.0", "lib-a:2.0", "app:1.0"]);
    }

    #[test]
    fn test_mutual_dependency_emits_each_once() {
        let repo = TempDir::new().unwrap();
        write_pom(repo.path(), "A", "1", &[("B", "1")]);
        write_pom(repo.path(), "B", "1", &[("A", "1")]);

        let order = resolve_load_order(
            &PackageKey::new("A", "1"),
            repo.path(),
            &TraversalOptions::default(),
        )
        .unwrap();

        assert_eq!(order, vec!["B:1", "A:1"]);
    }

    #[test]
    fn test_absent_descriptor_gives_only_root() {
        let repo = TempDir::new().unwrap();
        let order = resolve_load_order(
            &PackageKey::new("solo", "0.1"),
            repo.path(),
            &TraversalOptions::default(),
        )
        .unwrap();
        assert_eq!(order, vec!["solo:0.1"]);
    }

    #[test]
    fn test_filter_and_unnamed_dependencies_are_skipped() {
        let repo = TempDir::new().unwrap();
        write_pom(
            repo.path(),
            "app",
            "1.0",
            &[("log4j-core", "2.17"), ("commons-io", "2.11"), ("", "9")],
        );

        let order = resolve_load_order(
            &PackageKey::new("app", "1.0"),
            repo.path(),
            &TraversalOptions::with_filter("log"),
        )
        .unwrap();

        assert_eq!(order, vec!["commons-io:2.11", "app:1.0"]);
    }

    #[test]
    fn test_versionless_dependency_is_a_leaf() {
        let repo = TempDir::new().unwrap();
        write_pom(repo.path(), "app", "1.0", &[("junit", "")]);

        let order = resolve_load_order(
            &PackageKey::new("app", "1.0"),
            repo.path(),
            &TraversalOptions::default(),
        )
        .unwrap();

        assert_eq!(order, vec!["junit", "app:1.0"]);
    }

    #[test]
    fn test_shared_dependency_does_not_look_cyclic_later() {
        // d is finished under b, then reached again from c.
        let repo = TempDir::new().unwrap();
        write_pom(repo.path(), "a", "1", &[("b", "1"), ("c", "1")]);
        write_pom(repo.path(), "b", "1", &[("d", "1")]);
        write_pom(repo.path(), "c", "1", &[("d", "1")]);
        write_pom(repo.path(), "d", "1", &[]);

        let order = resolve_load_order(
            &PackageKey::new("a", "1"),
            repo.path(),
            &TraversalOptions::default(),
        )
        .unwrap();

        assert_eq!(order, vec!["d:1", "b:1", "c:1", "a:1"]);
    }

    #[test]
    fn test_order_respects_every_acyclic_edge() {
        let repo = TempDir::new().unwrap();
        write_pom(repo.path(), "root", "1", &[("x", "1"), ("y", "1"), ("z", "1")]);
        write_pom(repo.path(), "x", "1", &[("z", "1"), ("w", "1")]);
        write_pom(repo.path(), "y", "1", &[("x", "1"), ("w", "1")]);
        write_pom(repo.path(), "z", "1", &[("w", "1")]);
        write_pom(repo.path(), "w", "1", &[]);

        let root = PackageKey::new("root", "1");
        let options = TraversalOptions::default();
        let order = resolve_load_order(&root, repo.path(), &options).unwrap();
        let graph = build_graph(&root, repo.path(), &options).unwrap();

        assert_eq!(order.len(), graph.len());
        for (from, neighbors) in graph.iter() {
            for to in neighbors {
                assert!(
                    position(&order, to) < position(&order, from),
                    "{} must load before {}",
                    to,
                    from
                );
            }
        }
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let repo = TempDir::new().unwrap();
        let depth = 2000;
        for i in 0..depth {
            let next = format!("p{}", i + 1);
            if i + 1 < depth {
                write_pom(repo.path(), &format!("p{}", i), "1", &[(next.as_str(), "1")]);
            } else {
                write_pom(repo.path(), &format!("p{}", i), "1", &[]);
            }
        }

        let order = resolve_load_order(
            &PackageKey::new("p0", "1"),
            repo.path(),
            &TraversalOptions::default(),
        )
        .unwrap();

        assert_eq!(order.len(), depth);
        assert_eq!(order.first().map(String::as_str), Some("p1999:1"));
        assert_eq!(order.last().map(String::as_str), Some("p0:1"));
    }
}
