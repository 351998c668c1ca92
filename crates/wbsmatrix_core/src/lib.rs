//! Core domain logic for wbsmatrix.
//! Builds a validated work breakdown tree from a plan document and projects it
//! into a hierarchy diagram and a responsibility assignment matrix.

pub mod builder;
pub mod export;
pub mod logging;
pub mod model;
pub mod projection;

pub use builder::{build, build_file, BuildError, ValidationError, ValidationErrorKind};
pub use export::{
    artifact_stem, export, render_artifacts, write_artifacts, Artifact, ArtifactKind,
    ExportConfig, ExportError, ExportReport, GraphDirection,
};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::node::{Aggregate, LeafData, Node, NodeKind, NodeLevel, NodePath};
pub use model::responsibility::{
    role_legend, LegendEntry, Responsibilities, Responsibility, Role, RoleCounts,
};
pub use projection::diagram::{project_for_diagram, Diagram, DiagramEdge, DiagramNode};
pub use projection::matrix::{
    project_for_matrix, summarize, MatrixRow, ProjectSummary, TaskRow, TotalsRow,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
