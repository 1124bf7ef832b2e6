use std::collections::HashSet;

use crate::graph::DependencyGraph;

/// Message printed instead of a listing when the graph has no nodes.
pub const EMPTY_GRAPH: &str = "graph is empty";

/// One `node - dep1, dep2` line per node, in insertion order.
pub fn render_flat(graph: &DependencyGraph) -> String {
    if graph.is_empty() {
        return EMPTY_GRAPH.to_string();
    }

    graph
        .iter()
        .map(|(node, neighbors)| format!("{} - {}", node, neighbors.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Box-drawing tree rooted at `root`.
///
/// A node's children are expanded only at its first appearance; later
/// appearances print the node alone, which keeps cycles finite.
pub fn render_tree(graph: &DependencyGraph, root: &str) -> String {
    let mut lines = Vec::new();
    let mut expanded = HashSet::new();
    walk(graph, root, "", true, &mut expanded, &mut lines);
    lines.join("\n")
}

fn walk<'g>(
    graph: &'g DependencyGraph,
    node: &'g str,
    prefix: &str,
    is_last: bool,
    expanded: &mut HashSet<&'g str>,
    lines: &mut Vec<String>,
) {
    if prefix.is_empty() {
        lines.push(node.to_string());
    } else {
        let connector = if is_last { "└─ " } else { "├─ " };
        lines.push(format!("{}{}{}", prefix, connector, node));
    }

    if !expanded.insert(node) {
        return;
    }

    let children = graph.neighbors(node);
    let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
    for (i, child) in children.iter().enumerate() {
        walk(
            graph,
            child,
            &child_prefix,
            i + 1 == children.len(),
            expanded,
            lines,
        );
    }
}
