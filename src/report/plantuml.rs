use std::collections::BTreeSet;

use crate::graph::DependencyGraph;

/// Render the graph as PlantUML.
///
/// Nodes and deduplicated edges are emitted in sorted order, so the output
/// does not depend on how the graph was built.
pub fn render(graph: &DependencyGraph) -> String {
    let mut nodes: BTreeSet<&str> = BTreeSet::new();
    let mut edges: BTreeSet<(&str, &str)> = BTreeSet::new();

    for (node, neighbors) in graph.iter() {
        nodes.insert(node);
        for neighbor in neighbors {
            nodes.insert(neighbor.as_str());
            edges.insert((node, neighbor.as_str()));
        }
    }

    let mut lines = vec!["@startuml".to_string()];
    lines.extend(nodes.iter().map(|node| format!("\"{}\"", node)));
    lines.extend(
        edges
            .iter()
            .map(|(src, dst)| format!("\"{}\" -> \"{}\"", src, dst)),
    );
    lines.push("@enduml".to_string());
    lines.join("\n")
}
