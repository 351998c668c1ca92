//! Artifact export for external renderers.
//!
//! # Responsibility
//! - Turn projections into renderer input: DOT text for the tree and matrix
//!   views, CSV tables and styled `.xlsx` workbooks for spreadsheet consumers.
//! - Write artifacts all-or-nothing and optionally hand DOT files to Graphviz.
//!
//! # Invariants
//! - Every artifact is rendered in memory before the first file is written.
//! - Artifacts are staged next to their targets; a failed write leaves no
//!   artifact of the run behind.
//! - File names derive from a sanitized stem; identical input yields
//!   byte-identical DOT and CSV artifacts.

pub mod dot;
pub mod graphviz;
pub mod table;
pub mod workbook;

pub use dot::GraphDirection;

use crate::model::node::Node;
use crate::model::responsibility::role_legend;
use crate::projection::diagram::project_for_diagram;
use crate::projection::matrix::{project_for_matrix, summarize};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_xlsxwriter::XlsxError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

static UNSAFE_STEM_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid stem regex"));

const FALLBACK_STEM: &str = "project";

/// Errors from writing or rendering artifacts.
#[derive(Debug)]
pub enum ExportError {
    /// Output directory or artifact file could not be written.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Render format is not a plain Graphviz format name.
    InvalidFormat(String),
    /// A spreadsheet workbook could not be assembled.
    Workbook(XlsxError),
    /// The `dot` binary could not be started.
    GraphvizSpawn { source: std::io::Error },
    /// The `dot` binary ran and failed.
    GraphvizFailed {
        input: PathBuf,
        status: Option<i32>,
        stderr: String,
    },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to write `{}`: {source}", path.display())
            }
            Self::InvalidFormat(value) => write!(f, "unsupported render format `{value}`"),
            Self::Workbook(source) => write!(f, "failed to build workbook: {source}"),
            Self::GraphvizSpawn { source } => {
                write!(f, "failed to start graphviz `dot`: {source}")
            }
            Self::GraphvizFailed {
                input,
                status,
                stderr,
            } => {
                let status = status.map_or_else(|| "signal".to_string(), |code| code.to_string());
                write!(
                    f,
                    "graphviz `dot` failed on `{}` (status {status}): {stderr}",
                    input.display()
                )
            }
        }
    }
}

impl From<XlsxError> for ExportError {
    fn from(value: XlsxError) -> Self {
        Self::Workbook(value)
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::GraphvizSpawn { source } => Some(source),
            Self::Workbook(source) => Some(source),
            Self::InvalidFormat(_) | Self::GraphvizFailed { .. } => None,
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub out_dir: PathBuf,
    /// File stem; defaults to the sanitized project name.
    pub stem: Option<String>,
    pub direction: GraphDirection,
    /// Graphviz output format (`pdf`, `svg`, ...). `None` keeps DOT only.
    pub render_format: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            stem: None,
            direction: GraphDirection::default(),
            render_format: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    WbsDiagram,
    RamDiagram,
    WbsTable,
    RamTable,
    WbsWorkbook,
    RamWorkbook,
}

impl ArtifactKind {
    fn suffix(self) -> &'static str {
        match self {
            Self::WbsDiagram => "_wbs.dot",
            Self::RamDiagram => "_ram.dot",
            Self::WbsTable => "_wbs.csv",
            Self::RamTable => "_ram.csv",
            Self::WbsWorkbook => "_wbs.xlsx",
            Self::RamWorkbook => "_ram.xlsx",
        }
    }

    /// DOT and CSV artifacts are UTF-8 text; workbooks are binary.
    pub fn is_text(self) -> bool {
        !matches!(self, Self::WbsWorkbook | Self::RamWorkbook)
    }

    pub fn is_diagram(self) -> bool {
        matches!(self, Self::WbsDiagram | Self::RamDiagram)
    }
}

/// One rendered, not yet written artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl Artifact {
    /// Contents as text, `None` for binary artifacts.
    pub fn text(&self) -> Option<&str> {
        if !self.kind.is_text() {
            return None;
        }
        std::str::from_utf8(&self.contents).ok()
    }
}

/// Paths produced by one export run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
    pub rendered: Vec<PathBuf>,
}

/// Sanitizes a project name into a file stem.
pub fn artifact_stem(name: &str) -> String {
    let stem = UNSAFE_STEM_CHARS_RE.replace_all(name.trim(), "_");
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem.into_owned()
    }
}

/// Renders every artifact for one tree, in memory.
///
/// # Errors
/// - Returns [`ExportError::Workbook`] when a workbook cannot be assembled.
pub fn render_artifacts(root: &Node, config: &ExportConfig) -> Result<Vec<Artifact>, ExportError> {
    let stem = artifact_stem(config.stem.as_deref().unwrap_or(root.name()));
    let diagram = project_for_diagram(root);
    let rows = project_for_matrix(root);
    let summary = summarize(root);
    let legend = role_legend();
    debug!(
        "event=projection_ok module=export diagram_nodes={} diagram_edges={} matrix_rows={}",
        diagram.nodes.len(),
        diagram.edges.len(),
        rows.len()
    );

    let artifacts = [
        (
            ArtifactKind::WbsDiagram,
            dot::wbs_dot(&diagram, config.direction).into_bytes(),
        ),
        (
            ArtifactKind::RamDiagram,
            dot::ram_dot(root.name(), &rows, &summary, &legend).into_bytes(),
        ),
        (
            ArtifactKind::WbsTable,
            table::wbs_table(&diagram).to_csv().into_bytes(),
        ),
        (
            ArtifactKind::RamTable,
            table::ram_table(&rows, &summary).to_csv().into_bytes(),
        ),
        (ArtifactKind::WbsWorkbook, workbook::wbs_workbook(&diagram)?),
        (
            ArtifactKind::RamWorkbook,
            workbook::ram_workbook(&rows, &summary, &legend)?,
        ),
    ];

    Ok(artifacts
        .into_iter()
        .map(|(kind, contents)| Artifact {
            kind,
            file_name: format!("{stem}{}", kind.suffix()),
            contents,
        })
        .collect())
}

/// Writes rendered artifacts into `out_dir`, creating it when missing.
///
/// Every artifact is staged in a temporary file inside `out_dir` first, then
/// moved into place. When a move fails, artifacts already moved by this call
/// are removed again.
///
/// # Errors
/// - Returns [`ExportError::Io`] naming the directory or the artifact path
///   that could not be written.
pub fn write_artifacts(artifacts: &[Artifact], out_dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(out_dir).map_err(|source| ExportError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut staged = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = out_dir.join(&artifact.file_name);
        staged.push((artifact, stage(out_dir, artifact, &path)?, path));
    }

    let mut written = Vec::with_capacity(staged.len());
    for (artifact, file, path) in staged {
        if let Err(err) = file.persist(&path) {
            discard(&written);
            return Err(ExportError::Io {
                path,
                source: err.error,
            });
        }
        info!(
            "event=artifact_written module=export kind={:?} bytes={} path={}",
            artifact.kind,
            artifact.contents.len(),
            path.display()
        );
        written.push(path);
    }
    Ok(written)
}

fn stage(out_dir: &Path, artifact: &Artifact, path: &Path) -> Result<NamedTempFile, ExportError> {
    let io_error = |source: std::io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = NamedTempFile::new_in(out_dir).map_err(io_error)?;
    file.write_all(&artifact.contents).map_err(io_error)?;
    file.flush().map_err(io_error)?;
    Ok(file)
}

fn discard(written: &[PathBuf]) {
    for path in written {
        if let Err(err) = std::fs::remove_file(path) {
            warn!(
                "event=artifact_rollback module=export status=error path={} error={err}",
                path.display()
            );
        }
    }
}

/// Renders, writes, and optionally lays out every artifact for one tree.
pub fn export(root: &Node, config: &ExportConfig) -> Result<ExportReport, ExportError> {
    // Reject a bad format before anything touches the disk.
    let format = config
        .render_format
        .as_deref()
        .map(graphviz::validate_format)
        .transpose()?;

    let artifacts = render_artifacts(root, config)?;
    let written = write_artifacts(&artifacts, &config.out_dir)?;

    let mut rendered = Vec::new();
    if let Some(format) = format {
        for (artifact, path) in artifacts.iter().zip(&written) {
            if artifact.kind.is_diagram() {
                rendered.push(graphviz::render_with_dot(path, format)?);
            }
        }
    }
    Ok(ExportReport { written, rendered })
}
