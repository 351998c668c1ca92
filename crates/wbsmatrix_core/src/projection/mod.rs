//! Read-only projections of a built tree.
//!
//! # Responsibility
//! - Flatten the tree into renderer-facing shapes (diagram, matrix).
//! - Derive positional WBS numbers and stable node ids.
//!
//! # Invariants
//! - Projections are total over a validated tree and never mutate it.
//! - Emission follows document order, so identical input yields identical
//!   output.

pub mod diagram;
pub mod matrix;

/// Positional WBS number for a sibling-index path (1-based, root excluded).
///
/// The root has no number, first-level nodes read `i.0`, deeper nodes join
/// their indices: `i.j`, `i.j.k`, ...
pub fn wbs_number(index_path: &[usize]) -> String {
    match index_path {
        [] => String::new(),
        [first] => format!("{first}.0"),
        indices => indices
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join("."),
    }
}

/// DOT-safe node id for a sibling-index path.
pub fn node_id(index_path: &[usize]) -> String {
    let mut id = String::from("n");
    for index in index_path {
        id.push('_');
        id.push_str(&index.to_string());
    }
    id
}
