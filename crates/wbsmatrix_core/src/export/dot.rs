//! Graphviz DOT emission for the tree view and the matrix view.

use crate::model::node::NodeLevel;
use crate::model::responsibility::{LegendEntry, Role};
use crate::projection::diagram::{depth_color, Diagram};
use crate::projection::matrix::{MatrixRow, ProjectSummary};

const BACKGROUND: &str = "#f9f5d7";
const INK: &str = "#3c3836";
const TEXT: &str = "#282828";
const HEADER_FILL: &str = "lightgray";
const FONT_SIZES: [u8; 8] = [12, 11, 10, 9, 8, 8, 7, 7];

/// Layout direction handed to the layout engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GraphDirection {
    #[default]
    TopBottom,
    LeftRight,
}

impl GraphDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopBottom => "TB",
            Self::LeftRight => "LR",
        }
    }
}

/// Row fill for rollup rows, by level.
pub fn level_color(level: NodeLevel) -> &'static str {
    match level {
        NodeLevel::Project => "#f9f5d7",
        NodeLevel::Phase => "#ebdbb2",
        NodeLevel::Activity => "#d5c4a1",
        NodeLevel::Task => "#bdae93",
        NodeLevel::WorkPackage => "white",
    }
}

/// Renders the WBS tree view.
pub fn wbs_dot(diagram: &Diagram, direction: GraphDirection) -> String {
    let mut out = String::from("digraph wbs {\n");
    out.push_str(&format!(
        "  graph [rankdir={}, splines=line, nodesep=0.2, ranksep=0.25, pad=0.2, bgcolor=\"{BACKGROUND}\", fontname=\"Arial\"];\n",
        direction.as_str()
    ));
    out.push_str(&format!(
        "  node [shape=box, style=filled, color=\"{INK}\", fontcolor=\"{TEXT}\", fontname=\"Arial\", margin=0.05, penwidth=1.0];\n"
    ));
    out.push_str(&format!(
        "  edge [color=\"{INK}\", arrowsize=0.6, penwidth=1.0];\n"
    ));

    for node in &diagram.nodes {
        let font_size = FONT_SIZES[node.depth.min(FONT_SIZES.len() - 1)];
        out.push_str(&format!(
            "  {} [label=\"{}\", fillcolor=\"{}\", fontsize={font_size}];\n",
            node.id,
            escape_quoted(&node.label),
            node.color
        ));
    }
    for edge in &diagram.edges {
        match &edge.label {
            Some(label) => out.push_str(&format!(
                "  {} -> {} [label=\"{}\"];\n",
                edge.from,
                edge.to,
                escape_quoted(label)
            )),
            None => out.push_str(&format!("  {} -> {};\n", edge.from, edge.to)),
        }
    }
    out.push_str("}\n");
    out
}

/// Renders the responsibility matrix view as an HTML-like table node.
pub fn ram_dot(
    project_name: &str,
    rows: &[MatrixRow],
    summary: &ProjectSummary,
    legend: &[LegendEntry],
) -> String {
    let column_count = 5 + Role::ALL.len();
    let mut table = format!(
        "<TABLE BORDER=\"1\" CELLBORDER=\"1\" CELLSPACING=\"0\" CELLPADDING=\"4\">\
         <TR><TD BGCOLOR=\"{HEADER_FILL}\" COLSPAN=\"{column_count}\"><B>{} - Responsibility Assignment Matrix</B></TD></TR><TR>",
        escape_html(project_name)
    );
    for header in ["WBS Element/Personnel", "Work Package Type", "Work Package"] {
        table.push_str(&header_cell(header));
    }
    for role in Role::ALL {
        table.push_str(&header_cell(role.label()));
    }
    table.push_str(&header_cell("Duration (Days)"));
    table.push_str(&header_cell("Labor (Person Hours)"));
    table.push_str("</TR>");

    for row in rows {
        table.push_str(&ram_row(row));
    }
    table.push_str("</TABLE>");

    let mut out = String::from("digraph ram {\n");
    out.push_str(
        "  graph [rankdir=TB, splines=none, nodesep=0.2, ranksep=0.3, pad=0.2, bgcolor=\"white\"];\n",
    );
    out.push_str(&format!("  ram_table [shape=none, label=<{table}>];\n"));
    out.push_str(&format!(
        "  ram_summary [shape=none, label=<{}>];\n",
        summary_table(summary, legend)
    ));
    out.push_str("  ram_table -> ram_summary [style=invis];\n");
    out.push_str("}\n");
    out
}

fn header_cell(text: &str) -> String {
    format!("<TD BGCOLOR=\"{HEADER_FILL}\">{text}</TD>")
}

fn cell(fill: &str, align: &str, text: &str) -> String {
    format!("<TD BGCOLOR=\"{fill}\" ALIGN=\"{align}\">{text}</TD>")
}

fn ram_row(row: &MatrixRow) -> String {
    let indent = "&nbsp;".repeat(4 * row.depth());
    let name = escape_html(row.path().leaf_name().unwrap_or_default());
    let mut out = String::from("<TR>");
    match row {
        MatrixRow::Task(task) => {
            let fill = depth_color(task.depth);
            out.push_str(&cell(fill, "left", &format!("{indent}{name}")));
            out.push_str(&cell(fill, "left", NodeLevel::WorkPackage.label()));
            out.push_str(&cell(fill, "left", &task.wbs_number));
            for (_, code) in task.responsibilities.iter() {
                let cell_fill = if code.is_involved() { code.color() } else { fill };
                out.push_str(&cell(cell_fill, "center", code.code()));
            }
            out.push_str(&cell(fill, "right", &task.duration.to_string()));
            out.push_str(&cell(fill, "right", &task.labor.to_string()));
        }
        MatrixRow::Totals(totals) => {
            let fill = level_color(totals.level);
            out.push_str(&cell(fill, "left", &format!("{indent}<B>{name}</B>")));
            out.push_str(&cell(
                fill,
                "left",
                &format!("{} Totals", totals.level.label()),
            ));
            out.push_str(&cell(fill, "left", &totals.wbs_number));
            for (_, count) in totals.role_counts.iter() {
                out.push_str(&cell(fill, "center", &count.to_string()));
            }
            out.push_str(&cell(
                fill,
                "right",
                &format!("<B>{}</B>", totals.total_duration),
            ));
            out.push_str(&cell(fill, "right", &format!("<B>{}</B>", totals.total_labor)));
        }
    }
    out.push_str("</TR>");
    out
}

fn summary_table(summary: &ProjectSummary, legend: &[LegendEntry]) -> String {
    let mut out = String::from(
        "<TABLE BORDER=\"0\" CELLBORDER=\"0\" CELLSPACING=\"20\" CELLPADDING=\"4\"><TR><TD>\
         <TABLE BORDER=\"1\" CELLBORDER=\"1\" CELLSPACING=\"0\" CELLPADDING=\"4\">",
    );
    out.push_str(&format!(
        "<TR><TD BGCOLOR=\"{HEADER_FILL}\" COLSPAN=\"2\"><B>Project Totals</B></TD></TR>"
    ));
    for (label, value) in summary.lines() {
        out.push_str("<TR>");
        out.push_str(&cell(HEADER_FILL, "right", label));
        out.push_str(&cell("white", "left", &value));
        out.push_str("</TR>");
    }
    out.push_str(
        "</TABLE></TD><TD><TABLE BORDER=\"1\" CELLBORDER=\"1\" CELLSPACING=\"0\" CELLPADDING=\"4\">",
    );
    out.push_str(&format!(
        "<TR><TD BGCOLOR=\"{HEADER_FILL}\" COLSPAN=\"{}\"><B>Key</B></TD></TR><TR>",
        legend.len()
    ));
    for entry in legend {
        out.push_str(&cell(entry.color, "left", &legend_text(entry)));
    }
    out.push_str("</TR></TABLE></TD></TR></TABLE>");
    out
}

/// `L = Lead` for involved codes, the bare label for no involvement.
pub fn legend_text(entry: &LegendEntry) -> String {
    if entry.code.is_involved() {
        format!("{} = {}", entry.code.code(), entry.label)
    } else {
        entry.label.to_string()
    }
}

/// Escapes text for a DOT double-quoted string; `\n` becomes a line break.
pub fn escape_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

/// Escapes text for a DOT HTML-like label.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{escape_html, escape_quoted, legend_text, wbs_dot, GraphDirection};
    use crate::model::responsibility::role_legend;
    use crate::builder::build;
    use crate::projection::diagram::project_for_diagram;

    #[test]
    fn escape_quoted_handles_quotes_backslashes_and_newlines() {
        assert_eq!(escape_quoted("a \"b\"\\c\nd"), "a \\\"b\\\"\\\\c\\nd");
    }

    #[test]
    fn escape_html_handles_markup() {
        assert_eq!(escape_html("R&D <v2>"), "R&amp;D &lt;v2&gt;");
    }

    #[test]
    fn wbs_dot_declares_every_node_and_edge() {
        let root = build(
            "Root:\n  A:\n    responsibilities: {project_manager: L, hardware: '', software: '', testing: '', sponsor: '', other: ''}\n    duration: 1\n    labor: 8\n",
        )
        .unwrap();
        let dot = wbs_dot(&project_for_diagram(&root), GraphDirection::LeftRight);
        assert!(dot.starts_with("digraph wbs {\n"));
        assert!(dot.contains("rankdir=LR"));
        assert!(dot.contains("  n [label=\"Root\\n1 d / 8 h\", fillcolor=\"#fbf1c7\", fontsize=12];"));
        assert!(dot.contains("  n_1 [label=\"A (1.0)\\nPM:L\", fillcolor=\"#d3869b\", fontsize=11];"));
        assert!(dot.contains("  n -> n_1;"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn legend_text_names_involved_codes_only() {
        let texts: Vec<String> = role_legend().iter().map(legend_text).collect();
        assert_eq!(texts[0], "L = Lead");
        assert!(!texts.last().unwrap().contains('='));
    }
}
