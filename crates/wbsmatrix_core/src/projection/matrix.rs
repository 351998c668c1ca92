//! Matrix projection: responsibility assignment rows plus rollups.
//!
//! # Responsibility
//! - Emit one row per work package with its per-role codes.
//! - Emit one totals row per interior node with its involvement counts.
//! - Summarize project-wide counts for the totals block.
//!
//! # Invariants
//! - Work package rows keep document order.
//! - A totals row follows the last row of its subtree; the root's is last.

use crate::model::node::{Node, NodeLevel, NodePath};
use crate::model::responsibility::{Responsibilities, RoleCounts};
use crate::projection::wbs_number;
use serde::Serialize;

/// Per-work-package row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    pub path: NodePath,
    pub wbs_number: String,
    pub depth: usize,
    pub responsibilities: Responsibilities,
    pub duration: u64,
    pub labor: u64,
}

/// Synthetic rollup row for one interior node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotalsRow {
    pub path: NodePath,
    pub wbs_number: String,
    pub depth: usize,
    pub level: NodeLevel,
    pub role_counts: RoleCounts,
    pub total_duration: u64,
    pub total_labor: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "row", rename_all = "snake_case")]
pub enum MatrixRow {
    Task(TaskRow),
    Totals(TotalsRow),
}

impl MatrixRow {
    pub fn path(&self) -> &NodePath {
        match self {
            Self::Task(row) => &row.path,
            Self::Totals(row) => &row.path,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Self::Task(row) => row.depth,
            Self::Totals(row) => row.depth,
        }
    }
}

/// Flattens a tree into matrix rows.
pub fn project_for_matrix(root: &Node) -> Vec<MatrixRow> {
    let mut rows = Vec::new();
    let mut index_path = Vec::new();
    visit(root, &mut index_path, &mut rows);
    rows
}

fn visit(node: &Node, index_path: &mut Vec<usize>, out: &mut Vec<MatrixRow>) {
    if let Some(leaf) = node.leaf_data() {
        out.push(MatrixRow::Task(TaskRow {
            path: node.path().clone(),
            wbs_number: wbs_number(index_path),
            depth: node.depth(),
            responsibilities: leaf.responsibilities,
            duration: leaf.duration,
            labor: leaf.labor,
        }));
        return;
    }

    for (index, child) in node.children().iter().enumerate() {
        index_path.push(index + 1);
        visit(child, index_path, out);
        index_path.pop();
    }

    let aggregate = node.aggregate();
    out.push(MatrixRow::Totals(TotalsRow {
        path: node.path().clone(),
        wbs_number: wbs_number(index_path),
        depth: node.depth(),
        level: node.level(),
        role_counts: aggregate.role_counts,
        total_duration: aggregate.total_duration,
        total_labor: aggregate.total_labor,
    }));
}

/// Project-wide totals block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub total_items: usize,
    pub phases: usize,
    pub activities: usize,
    pub tasks: usize,
    pub work_packages: usize,
    pub total_duration: u64,
    pub total_labor: u64,
}

impl ProjectSummary {
    /// Label/value lines of the project totals block.
    pub fn lines(&self) -> [(&'static str, String); 7] {
        [
            ("Total Items:", self.total_items.to_string()),
            ("Total Phases:", self.phases.to_string()),
            ("Total Activities:", self.activities.to_string()),
            ("Total Tasks:", self.tasks.to_string()),
            ("Total Work Packages:", self.work_packages.to_string()),
            ("Total Duration (Days):", self.total_duration.to_string()),
            ("Total Labor (Hours):", self.total_labor.to_string()),
        ]
    }
}

/// Counts nodes per level and carries the root's totals.
pub fn summarize(root: &Node) -> ProjectSummary {
    let mut summary = ProjectSummary {
        total_duration: root.aggregate().total_duration,
        total_labor: root.aggregate().total_labor,
        ..ProjectSummary::default()
    };
    for node in root.descendants() {
        summary.total_items += 1;
        match node.level() {
            NodeLevel::Project => {}
            NodeLevel::Phase => summary.phases += 1,
            NodeLevel::Activity => summary.activities += 1,
            NodeLevel::Task => summary.tasks += 1,
            NodeLevel::WorkPackage => summary.work_packages += 1,
        }
    }
    summary
}
