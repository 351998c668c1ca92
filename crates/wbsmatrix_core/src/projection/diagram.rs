//! Diagram projection: node/edge lists for a layered hierarchical layout.
//!
//! # Invariants
//! - Exactly one diagram node per tree node and one edge per parent/child pair.
//! - Nodes and edges are emitted pre-order, in document order.
//! - Color is a pure function of depth.

use crate::model::node::{Node, NodeLevel, NodePath};
use crate::projection::{node_id, wbs_number};
use serde::Serialize;

/// Depth palette (Gruvbox), cycled by `depth % WBS_PALETTE.len()`.
pub const WBS_PALETTE: [&str; 8] = [
    "#fbf1c7", "#d3869b", "#8ec07c", "#fe8019", "#83a598", "#b8bb26", "#fb4934", "#fabd2f",
];

/// Fill color for one depth.
pub fn depth_color(depth: usize) -> &'static str {
    WBS_PALETTE[depth % WBS_PALETTE.len()]
}

/// One node as handed to the layout engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramNode {
    pub id: String,
    /// Multi-line label; lines separated by `\n`.
    pub label: String,
    pub color: &'static str,
    pub depth: usize,
    pub level: NodeLevel,
    pub wbs_number: String,
    pub path: NodePath,
}

/// Directed parent → child edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramEdge {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagram {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

/// Flattens a tree into diagram nodes and edges.
pub fn project_for_diagram(root: &Node) -> Diagram {
    let mut diagram = Diagram::default();
    let mut index_path = Vec::new();
    visit(root, None, &mut index_path, &mut diagram);
    diagram
}

fn visit(node: &Node, parent_id: Option<&str>, index_path: &mut Vec<usize>, out: &mut Diagram) {
    let id = node_id(index_path);
    let number = wbs_number(index_path);
    out.nodes.push(DiagramNode {
        id: id.clone(),
        label: node_label(node, &number),
        color: depth_color(node.depth()),
        depth: node.depth(),
        level: node.level(),
        wbs_number: number,
        path: node.path().clone(),
    });
    if let Some(parent_id) = parent_id {
        out.edges.push(DiagramEdge {
            from: parent_id.to_string(),
            to: id.clone(),
            label: None,
        });
    }

    for (index, child) in node.children().iter().enumerate() {
        index_path.push(index + 1);
        visit(child, Some(&id), index_path, out);
        index_path.pop();
    }
}

fn node_label(node: &Node, number: &str) -> String {
    let title = if number.is_empty() {
        node.name().to_string()
    } else {
        format!("{} ({number})", node.name())
    };

    match node.leaf_data() {
        Some(leaf) => {
            let glyphs: Vec<String> = leaf
                .responsibilities
                .involved()
                .map(|(role, code)| format!("{}:{}", role.glyph(), code.code()))
                .collect();
            if glyphs.is_empty() {
                format!("{title}\n-")
            } else {
                format!("{title}\n{}", glyphs.join(" "))
            }
        }
        None => {
            let aggregate = node.aggregate();
            format!(
                "{title}\n{} d / {} h",
                aggregate.total_duration, aggregate.total_labor
            )
        }
    }
}
