//! Builder error taxonomy.

use crate::model::node::NodePath;
use crate::model::responsibility::Role;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Structural problem found while validating a plan document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Work package lacks `duration`, `labor`, `responsibilities` or a role entry.
    MissingField { field: String },
    /// `duration` or `labor` is below zero.
    NegativeValue { field: &'static str, value: String },
    /// Responsibilities block names a role outside the fixed six.
    UnknownRole { role: String },
    /// Responsibility value is not one of `L`, `P`, `R`, `I`, `""`.
    InvalidCode { role: Role, code: String },
    /// Interior node has no children.
    EmptyInterior,
    /// Two children of the same interior node share `name`.
    DuplicateSibling { name: String },
    /// Value has the wrong shape for its position in the document.
    Malformed { detail: String },
}

impl ValidationErrorKind {
    /// Stable kind name used in user-facing diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "MissingField",
            Self::NegativeValue { .. } => "NegativeValue",
            Self::UnknownRole { .. } => "UnknownRole",
            Self::InvalidCode { .. } => "InvalidCode",
            Self::EmptyInterior => "EmptyInterior",
            Self::DuplicateSibling { .. } => "DuplicateSibling",
            Self::Malformed { .. } => "Malformed",
        }
    }
}

impl Display for ValidationErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "missing required field `{field}`"),
            Self::NegativeValue { field, value } => {
                write!(f, "`{field}` must be non-negative, got {value}")
            }
            Self::UnknownRole { role } => write!(f, "unknown role `{role}`"),
            Self::InvalidCode { role, code } => write!(
                f,
                "invalid responsibility code `{code}` for role `{}` (expected L|P|R|I or empty)",
                role.as_str()
            ),
            Self::EmptyInterior => write!(f, "interior node has no children"),
            Self::DuplicateSibling { name } => write!(f, "duplicate child name `{name}`"),
            Self::Malformed { detail } => write!(f, "{detail}"),
        }
    }
}

/// Validation failure anchored at the offending node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    /// For `DuplicateSibling`, the path of the interior node owning both children.
    pub path: NodePath,
}

impl ValidationError {
    pub fn new(path: &NodePath, kind: ValidationErrorKind) -> Self {
        Self {
            kind,
            path: path.clone(),
        }
    }

    pub(crate) fn missing(path: &NodePath, field: impl Into<String>) -> Self {
        Self::new(
            path,
            ValidationErrorKind::MissingField {
                field: field.into(),
            },
        )
    }

    pub(crate) fn malformed(path: &NodePath, detail: impl Into<String>) -> Self {
        Self::new(
            path,
            ValidationErrorKind::Malformed {
                detail: detail.into(),
            },
        )
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at `{}`: {}", self.kind.name(), self.path, self.kind)
    }
}

impl Error for ValidationError {}

/// Errors from building a tree out of a plan document.
#[derive(Debug)]
pub enum BuildError {
    /// Plan file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Document is not valid YAML.
    Parse(serde_yaml::Error),
    /// Document is valid YAML but not a valid plan.
    Validation(ValidationError),
}

impl BuildError {
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl Display for BuildError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read plan `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid plan document: {err}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BuildError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<ValidationError> for BuildError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<serde_yaml::Error> for BuildError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Parse(value)
    }
}
