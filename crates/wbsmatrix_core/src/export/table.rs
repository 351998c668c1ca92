//! Rectangular tables for spreadsheet consumers, emitted as CSV.
//!
//! # Invariants
//! - Every row has exactly as many cells as the header.
//! - CSV quoting follows RFC 4180 (quote on `,`, `"`, CR/LF, edge spaces).

use crate::model::responsibility::Role;
use crate::projection::diagram::Diagram;
use crate::projection::matrix::{MatrixRow, ProjectSummary};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Appends one row, padding or truncating to the header width.
    pub fn push_row(&mut self, mut cells: Vec<String>) {
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        write_csv_line(&mut out, &self.headers);
        for row in &self.rows {
            write_csv_line(&mut out, row);
        }
        out
    }
}

/// WBS data sheet: one row per node, pre-order.
pub fn wbs_table(diagram: &Diagram) -> Table {
    let mut table = Table::new(
        ["WBS Number", "Level", "Type", "Name", "Parent"]
            .map(str::to_string)
            .to_vec(),
    );
    for node in &diagram.nodes {
        table.push_row(vec![
            node.wbs_number.clone(),
            node.depth.to_string(),
            node.level.label().to_string(),
            node.path.leaf_name().unwrap_or_default().to_string(),
            node.path.parent_name().unwrap_or_default().to_string(),
        ]);
    }
    table
}

/// RAM data sheet: matrix rows, a blank separator, then the totals block.
pub fn ram_table(rows: &[MatrixRow], summary: &ProjectSummary) -> Table {
    let mut headers: Vec<String> = ["WBS Element/Personnel", "Work Package Type", "Work Package"]
        .map(str::to_string)
        .to_vec();
    headers.extend(Role::ALL.iter().map(|role| role.label().to_string()));
    headers.push("Work Package Duration (Days)".to_string());
    headers.push("Work Package Labor (Person Hours)".to_string());
    let mut table = Table::new(headers);

    for row in rows {
        let indent = "    ".repeat(row.depth());
        let name = row.path().leaf_name().unwrap_or_default();
        let cells = match row {
            MatrixRow::Task(task) => {
                let mut cells = vec![
                    format!("{indent}{name}"),
                    "Subtask".to_string(),
                    task.wbs_number.clone(),
                ];
                cells.extend(
                    task.responsibilities
                        .iter()
                        .map(|(_, code)| code.code().to_string()),
                );
                cells.push(task.duration.to_string());
                cells.push(task.labor.to_string());
                cells
            }
            MatrixRow::Totals(totals) => {
                let mut cells = vec![
                    format!("{indent}{name}"),
                    format!("{} Totals", totals.level.label()),
                    totals.wbs_number.clone(),
                ];
                cells.extend(totals.role_counts.iter().map(|(_, count)| count.to_string()));
                cells.push(totals.total_duration.to_string());
                cells.push(totals.total_labor.to_string());
                cells
            }
        };
        table.push_row(cells);
    }

    table.push_row(Vec::new());
    table.push_row(vec!["Project Totals".to_string()]);
    for (label, value) in summary.lines() {
        table.push_row(vec![label.to_string(), value]);
    }
    table
}

fn write_csv_line(out: &mut String, cells: &[String]) {
    for (index, cell) in cells.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&csv_field(cell));
    }
    out.push_str("\r\n");
}

fn csv_field(value: &str) -> String {
    let needs_quotes = value.contains([',', '"', '\n', '\r'])
        || value.starts_with(' ')
        || value.ends_with(' ');
    if !needs_quotes {
        return value.to_string();
    }
    format!("\"{}\"", value.replace('"', "\"\""))
}
