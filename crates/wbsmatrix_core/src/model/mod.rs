//! Work breakdown domain model.
//!
//! # Responsibility
//! - Define the fixed responsibility vocabulary (roles, codes, legend).
//! - Define the immutable tree of nodes and their rolled-up aggregates.
//!
//! # Invariants
//! - A node is exactly one of interior or work package.
//! - Aggregates are a pure function of the work packages under a node.

pub mod node;
pub mod responsibility;
