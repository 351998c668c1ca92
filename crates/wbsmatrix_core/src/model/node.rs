//! Work breakdown tree node model.
//!
//! # Responsibility
//! - Represent one breakdown level as either an interior node or a work
//!   package leaf, decided once at build time.
//! - Carry the rolled-up aggregate computed by the builder.
//!
//! # Invariants
//! - Interior nodes own at least one child, in document order.
//! - `aggregate` is derived only; interior duration/labor is never authored.
//! - Nodes are immutable after construction.

use crate::model::responsibility::{Responsibilities, RoleCounts};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Ordered names from the root down to one node (inclusive).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NodePath(Vec<String>);

impl NodePath {
    /// Path of the project root.
    pub fn root(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// Returns a new path extended by one child name.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    /// Name of the node this path points at.
    pub fn leaf_name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Name of the direct parent, if any.
    pub fn parent_name(&self) -> Option<&str> {
        let len = self.0.len();
        if len < 2 {
            return None;
        }
        Some(self.0[len - 2].as_str())
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<document>");
        }
        write!(f, "{}", self.0.join(" / "))
    }
}

/// Authored data of one work package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeafData {
    pub responsibilities: Responsibilities,
    /// Days.
    pub duration: u64,
    /// Person-hours.
    pub labor: u64,
}

/// Structural variant of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Interior { children: Vec<Node> },
    Leaf(LeafData),
}

/// Bottom-up rollup for one subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    pub total_duration: u64,
    pub total_labor: u64,
    pub role_counts: RoleCounts,
}

impl Aggregate {
    pub fn from_leaf(leaf: &LeafData) -> Self {
        Self {
            total_duration: leaf.duration,
            total_labor: leaf.labor,
            role_counts: RoleCounts::from_responsibilities(&leaf.responsibilities),
        }
    }

    /// Element-wise sum with another subtree aggregate, `None` when a total
    /// leaves the `u64` range.
    pub fn checked_add(&self, other: &Aggregate) -> Option<Aggregate> {
        let mut role_counts = self.role_counts;
        role_counts.absorb(&other.role_counts);
        Some(Self {
            total_duration: self.total_duration.checked_add(other.total_duration)?,
            total_labor: self.total_labor.checked_add(other.total_labor)?,
            role_counts,
        })
    }
}

/// Breakdown level classification shared by both views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeLevel {
    Project,
    Phase,
    Activity,
    Task,
    /// Leaf carrying authored data.
    WorkPackage,
}

impl NodeLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::Phase => "Phase",
            Self::Activity => "Activity",
            Self::Task => "Task",
            Self::WorkPackage => "Subtask",
        }
    }
}

/// One level of the work breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    path: NodePath,
    depth: usize,
    kind: NodeKind,
    aggregate: Aggregate,
}

impl Node {
    pub(crate) fn leaf(path: NodePath, depth: usize, data: LeafData) -> Self {
        let aggregate = Aggregate::from_leaf(&data);
        Self {
            name: path.leaf_name().unwrap_or_default().to_string(),
            path,
            depth,
            kind: NodeKind::Leaf(data),
            aggregate,
        }
    }

    /// Builds an interior node; children must already carry their aggregates.
    ///
    /// Returns `None` when the summed totals overflow.
    pub(crate) fn interior(path: NodePath, depth: usize, children: Vec<Node>) -> Option<Self> {
        let aggregate = children
            .iter()
            .try_fold(Aggregate::default(), |sum, child| {
                sum.checked_add(&child.aggregate)
            })?;
        Some(Self {
            name: path.leaf_name().unwrap_or_default().to_string(),
            path,
            depth,
            kind: NodeKind::Interior { children },
            aggregate,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &NodePath {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn aggregate(&self) -> &Aggregate {
        &self.aggregate
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Direct children in document order; empty for leaves.
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Interior { children } => children,
            NodeKind::Leaf(_) => &[],
        }
    }

    pub fn leaf_data(&self) -> Option<&LeafData> {
        match &self.kind {
            NodeKind::Leaf(data) => Some(data),
            NodeKind::Interior { .. } => None,
        }
    }

    pub fn level(&self) -> NodeLevel {
        if self.is_leaf() {
            return NodeLevel::WorkPackage;
        }
        match self.depth {
            0 => NodeLevel::Project,
            1 => NodeLevel::Phase,
            2 => NodeLevel::Activity,
            _ => NodeLevel::Task,
        }
    }

    /// Pre-order iterator over this node and all descendants.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Work packages under this node in document order.
    pub fn leaves(&self) -> impl Iterator<Item = &Node> {
        self.descendants().filter(|node| node.is_leaf())
    }

    /// Finds a node by its path.
    pub fn find(&self, path: &[&str]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        if *first != self.name {
            return None;
        }
        rest.iter().try_fold(self, |node, segment| {
            node.children().iter().find(|child| child.name == *segment)
        })
    }

    /// Longest root-to-leaf distance below this node.
    pub fn height(&self) -> usize {
        self.children()
            .iter()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Pre-order traversal in document order.
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::{LeafData, Node, NodeLevel, NodePath};
    use crate::model::responsibility::{Responsibilities, Responsibility, Role};

    fn leaf(path: NodePath, depth: usize, duration: u64, labor: u64, lead: Role) -> Node {
        let responsibilities: Responsibilities =
            [(lead, Responsibility::Lead)].into_iter().collect();
        Node::leaf(
            path,
            depth,
            LeafData {
                responsibilities,
                duration,
                labor,
            },
        )
    }

    fn sample() -> Node {
        let root = NodePath::root("Root");
        let phase = root.child("Phase");
        let a = leaf(phase.child("A"), 2, 2, 16, Role::Hardware);
        let b = leaf(phase.child("B"), 2, 3, 24, Role::Hardware);
        let c = leaf(root.child("C"), 1, 1, 8, Role::Software);
        let phase_node = Node::interior(phase, 1, vec![a, b]).unwrap();
        Node::interior(root, 0, vec![phase_node, c]).unwrap()
    }

    #[test]
    fn path_display_joins_segments() {
        let path = NodePath::root("Root").child("Design").child("Sketch");
        assert_eq!(path.to_string(), "Root / Design / Sketch");
        assert_eq!(path.parent_name(), Some("Design"));
        assert_eq!(NodePath::root("Root").parent_name(), None);
        assert_eq!(NodePath::default().to_string(), "<document>");
    }

    #[test]
    fn interior_aggregate_sums_children() {
        let root = sample();
        let aggregate = root.aggregate();
        assert_eq!(aggregate.total_duration, 6);
        assert_eq!(aggregate.total_labor, 48);
        assert_eq!(aggregate.role_counts.get(Role::Hardware), 2);
        assert_eq!(aggregate.role_counts.get(Role::Software), 1);
        assert_eq!(aggregate.role_counts.get(Role::Testing), 0);
    }

    #[test]
    fn interior_rejects_totals_past_u64() {
        let root = NodePath::root("Root");
        let big = leaf(root.child("Big"), 1, u64::MAX, 0, Role::Hardware);
        let one = leaf(root.child("One"), 1, 1, 0, Role::Hardware);
        assert!(Node::interior(root.clone(), 0, vec![big.clone()]).is_some());
        assert!(Node::interior(root, 0, vec![big, one]).is_none());
    }

    #[test]
    fn descendants_follow_document_order() {
        let root = sample();
        let names: Vec<&str> = root.descendants().map(Node::name).collect();
        assert_eq!(names, vec!["Root", "Phase", "A", "B", "C"]);
        let leaves: Vec<&str> = root.leaves().map(Node::name).collect();
        assert_eq!(leaves, vec!["A", "B", "C"]);
    }

    #[test]
    fn level_is_structural_for_leaves_and_depth_based_otherwise() {
        let root = sample();
        assert_eq!(root.level(), NodeLevel::Project);
        assert_eq!(
            root.find(&["Root", "Phase"]).map(Node::level),
            Some(NodeLevel::Phase)
        );
        assert_eq!(
            root.find(&["Root", "C"]).map(Node::level),
            Some(NodeLevel::WorkPackage)
        );
        assert!(root.find(&["Root", "Missing"]).is_none());
        assert_eq!(root.height(), 2);
    }
}
