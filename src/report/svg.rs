use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::graph::DependencyGraph;

const BOX_FILL: &str = "#9C8B72";
const INK: &str = "#5B7187";
const FONT_SIZE: u32 = 14;
const LABEL_DX: f64 = 10.0;
const LABEL_DY: f64 = 25.0;

/// Geometry of the leveled diagram. Overridable from the `[layout]` config table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub node_width: f64,
    pub node_height: f64,
    pub margin: f64,
    pub horiz_gap: f64,
    pub vert_gap: f64,
    pub arrow_size: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            node_width: 220.0,
            node_height: 40.0,
            margin: 40.0,
            horiz_gap: 40.0,
            vert_gap: 80.0,
            arrow_size: 5.0,
        }
    }
}

/// Breadth-first distance of every node reachable from `root`, in discovery order.
pub fn assign_levels<'g>(graph: &'g DependencyGraph, root: &'g str) -> Vec<(&'g str, usize)> {
    let mut level: HashMap<&str, usize> = HashMap::from([(root, 0)]);
    let mut discovered = vec![(root, 0)];
    let mut queue: VecDeque<&str> = VecDeque::from([root]);

    while let Some(node) = queue.pop_front() {
        let next_level = level[node] + 1;
        for neighbor in graph.neighbors(node) {
            if !level.contains_key(neighbor.as_str()) {
                level.insert(neighbor, next_level);
                discovered.push((neighbor.as_str(), next_level));
                queue.push_back(neighbor);
            }
        }
    }

    discovered
}

/// Top-left corner of a placed box.
#[derive(Debug, Clone, Copy)]
struct Placement {
    x: f64,
    y: f64,
}

/// Render the graph as a standalone SVG document.
///
/// Each level is a centered row of boxes. Edges run from the bottom center of
/// the source box to the top center of the target; edges touching a node not
/// reachable from `root` are skipped.
pub fn render(graph: &DependencyGraph, root: &str, layout: &Layout) -> String {
    let mut rows: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
    for (node, lvl) in assign_levels(graph, root) {
        rows.entry(lvl).or_default().push(node);
    }

    let widest = rows.values().map(Vec::len).max().unwrap_or(1) as f64;
    let level_count = rows.len() as f64;
    let width = widest * layout.node_width + (widest - 1.0) * layout.horiz_gap + layout.margin * 2.0;
    let height =
        level_count * layout.node_height + (level_count - 1.0) * layout.vert_gap + layout.margin * 2.0;

    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#);
    let _ = write!(
        out,
        "\n<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\">",
        width, height
    );

    let mut placements: HashMap<&str, Placement> = HashMap::new();
    for (&lvl, nodes) in &rows {
        let n = nodes.len() as f64;
        let row_width = n * layout.node_width + (n - 1.0) * layout.horiz_gap;
        let start_x = (width - row_width) / 2.0;
        let y = layout.margin + lvl as f64 * (layout.node_height + layout.vert_gap);

        for (i, node) in nodes.iter().enumerate() {
            let x = start_x + i as f64 * (layout.node_width + layout.horiz_gap);
            let _ = write!(
                out,
                "\n<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" style=\"fill:{};stroke:{};stroke-width:2\"/>",
                x, y, layout.node_width, layout.node_height, BOX_FILL, INK
            );
            let _ = write!(
                out,
                "\n<text x=\"{}\" y=\"{}\" font-size=\"{}\" style=\"font-family: monospace\">{}</text>",
                x + LABEL_DX,
                y + LABEL_DY,
                FONT_SIZE,
                escape(node)
            );
            placements.insert(*node, Placement { x, y });
        }
    }

    let center = |p: &Placement| p.x + layout.node_width / 2.0;
    for (src, neighbors) in graph.iter() {
        let Some(from) = placements.get(src) else {
            continue;
        };
        let x1 = center(from);
        let y1 = from.y + layout.node_height;

        for dst in neighbors {
            let Some(to) = placements.get(dst.as_str()) else {
                continue;
            };
            let x2 = center(to);
            let y2 = to.y;
            let a = layout.arrow_size;

            let _ = write!(
                out,
                "\n<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" style=\"stroke:{};stroke-width:2\"/>",
                x1, y1, x2, y2, INK
            );
            let _ = write!(
                out,
                "\n<polygon points=\"{},{} {},{} {},{}\" style=\"fill:{}\"/>",
                x2 - a,
                y2 - a,
                x2 + a,
                y2 - a,
                x2,
                y2,
                INK
            );
        }
    }

    out.push_str("\n</svg>");
    out
}

/// Render and write the diagram to `path` in one piece.
pub fn write(graph: &DependencyGraph, root: &str, layout: &Layout, path: &Path) -> Result<()> {
    let document = render(graph, root, layout);
    std::fs::write(path, document)
        .with_context(|| format!("Failed to write SVG to {}", path.display()))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
