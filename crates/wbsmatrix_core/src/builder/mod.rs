//! Tree model builder.
//!
//! # Responsibility
//! - Parse a plan document into an immutable, aggregated node tree.
//! - Classify every mapping exactly once: a mapping with `responsibilities`
//!   is a work package, anything else is an interior level.
//!
//! # Invariants
//! - Validation stops at the first error; no partial tree is returned.
//! - A node's own structure is checked before any of its descendants.
//! - Each interior aggregate is computed once, after all of its children
//!   (post-order).

mod error;
pub mod raw;

pub use error::{BuildError, ValidationError, ValidationErrorKind};

use crate::model::node::{LeafData, Node, NodePath};
use crate::model::responsibility::{parse_code, parse_role, Responsibilities, Role};
use log::{debug, info, warn};
use raw::RawValue;
use std::collections::BTreeSet;
use std::path::Path;

/// Key whose presence marks a mapping as a work package.
pub const RESPONSIBILITIES_KEY: &str = "responsibilities";
pub const DURATION_KEY: &str = "duration";
pub const LABOR_KEY: &str = "labor";
/// Root-level key overriding the project display name.
pub const DISPLAY_NAME_KEY: &str = "name";

/// Scalar keys that annotate a node and are never children.
const METADATA_KEYS: &[&str] = &[DISPLAY_NAME_KEY, "type", "wbs_number"];

/// Builds a validated, aggregated tree from plan document text.
///
/// # Errors
/// - `BuildError::Parse` when the text is not YAML.
/// - `BuildError::Validation` for the first structural problem found.
pub fn build(raw_description: &str) -> Result<Node, BuildError> {
    debug!(
        "event=build_start module=builder bytes={}",
        raw_description.len()
    );
    let document: RawValue = serde_yaml::from_str(raw_description).map_err(|err| {
        warn!("event=build_failed module=builder kind=Parse");
        BuildError::Parse(err)
    })?;
    let root = build_from_value(&document).map_err(|err| {
        warn!(
            "event=build_failed module=builder kind={} path=\"{}\"",
            err.kind.name(),
            err.path
        );
        err
    })?;

    info!(
        "event=build_ok module=builder nodes={} work_packages={} height={}",
        root.descendants().count(),
        root.leaves().count(),
        root.height()
    );
    Ok(root)
}

/// Reads and builds a plan file.
pub fn build_file(path: &Path) -> Result<Node, BuildError> {
    let text = std::fs::read_to_string(path).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    build(&text)
}

/// Builds a tree from an already decoded document.
///
/// The document must be a mapping with exactly one key: the project root.
pub fn build_from_value(document: &RawValue) -> Result<Node, ValidationError> {
    let entries = match document {
        RawValue::Map(entries) if entries.len() == 1 => entries,
        RawValue::Map(entries) => {
            return Err(ValidationError::malformed(
                &NodePath::default(),
                format!(
                    "document must have exactly one project key, found {}",
                    entries.len()
                ),
            ))
        }
        other => {
            return Err(ValidationError::malformed(
                &NodePath::default(),
                format!("document must be a mapping, found {}", other.type_name()),
            ))
        }
    };

    let (key, value) = &entries[0];
    let root_key = node_name(&NodePath::default(), key)?;
    let name = display_name(value).unwrap_or(root_key);
    build_node(NodePath::root(name), 0, value)
}

fn display_name(value: &RawValue) -> Option<String> {
    let RawValue::Map(entries) = value else {
        return None;
    };
    entries.iter().find_map(|(key, value)| {
        if key.as_str() != Some(DISPLAY_NAME_KEY) {
            return None;
        }
        value
            .as_str()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    })
}

fn build_node(path: NodePath, depth: usize, value: &RawValue) -> Result<Node, ValidationError> {
    let entries: &[(RawValue, RawValue)] = match value {
        RawValue::Map(entries) => entries,
        RawValue::Null => &[],
        other => {
            return Err(ValidationError::malformed(
                &path,
                format!("expected a mapping, found {}", other.type_name()),
            ))
        }
    };

    let is_leaf = entries
        .iter()
        .any(|(key, _)| key.as_str() == Some(RESPONSIBILITIES_KEY));
    if is_leaf {
        build_leaf(path, depth, entries)
    } else {
        build_interior(path, depth, entries)
    }
}

fn build_interior(
    path: NodePath,
    depth: usize,
    entries: &[(RawValue, RawValue)],
) -> Result<Node, ValidationError> {
    let mut children: Vec<(String, &RawValue)> = Vec::with_capacity(entries.len());
    let mut seen = BTreeSet::<String>::new();

    for (key, value) in entries {
        let name = node_name(&path, key)?;
        if is_metadata(&name, value) {
            continue;
        }
        if (name == DURATION_KEY || name == LABOR_KEY) && value.is_scalar() {
            // Leaf fields without the classifying key: a mis-typed work package.
            return Err(ValidationError::missing(&path, RESPONSIBILITIES_KEY));
        }
        if !seen.insert(name.clone()) {
            return Err(ValidationError::new(
                &path,
                ValidationErrorKind::DuplicateSibling { name },
            ));
        }
        children.push((name, value));
    }

    if children.is_empty() {
        return Err(ValidationError::new(
            &path,
            ValidationErrorKind::EmptyInterior,
        ));
    }

    let children = children
        .into_iter()
        .map(|(name, value)| build_node(path.child(name), depth + 1, value))
        .collect::<Result<Vec<_>, _>>()?;
    Node::interior(path.clone(), depth, children).ok_or_else(|| {
        ValidationError::malformed(&path, "rolled-up totals exceed the supported range")
    })
}

fn build_leaf(
    path: NodePath,
    depth: usize,
    entries: &[(RawValue, RawValue)],
) -> Result<Node, ValidationError> {
    let mut responsibilities = None;
    let mut duration = None;
    let mut labor = None;
    let mut seen = BTreeSet::<String>::new();

    for (key, value) in entries {
        let name = node_name(&path, key)?;
        if !seen.insert(name.clone()) {
            return Err(ValidationError::malformed(
                &path,
                format!("field `{name}` is declared more than once"),
            ));
        }
        match name.as_str() {
            RESPONSIBILITIES_KEY => responsibilities = Some(parse_responsibilities(&path, value)?),
            DURATION_KEY => duration = parse_quantity(&path, DURATION_KEY, value)?,
            LABOR_KEY => labor = parse_quantity(&path, LABOR_KEY, value)?,
            _ if is_metadata(&name, value) => {}
            _ if matches!(value, RawValue::Map(_)) => {
                return Err(ValidationError::malformed(
                    &path,
                    format!("work package cannot also declare child `{name}`"),
                ))
            }
            _ => {
                return Err(ValidationError::malformed(
                    &path,
                    format!("unexpected work package field `{name}`"),
                ))
            }
        }
    }

    let responsibilities =
        responsibilities.ok_or_else(|| ValidationError::missing(&path, RESPONSIBILITIES_KEY))?;
    let duration = duration.ok_or_else(|| ValidationError::missing(&path, DURATION_KEY))?;
    let labor = labor.ok_or_else(|| ValidationError::missing(&path, LABOR_KEY))?;

    Ok(Node::leaf(
        path,
        depth,
        LeafData {
            responsibilities,
            duration,
            labor,
        },
    ))
}

fn parse_responsibilities(
    path: &NodePath,
    value: &RawValue,
) -> Result<Responsibilities, ValidationError> {
    let entries: &[(RawValue, RawValue)] = match value {
        RawValue::Map(entries) => entries,
        RawValue::Null => &[],
        other => {
            return Err(ValidationError::malformed(
                path,
                format!(
                    "`{RESPONSIBILITIES_KEY}` must be a mapping, found {}",
                    other.type_name()
                ),
            ))
        }
    };

    let mut out = Responsibilities::default();
    let mut declared = BTreeSet::<Role>::new();
    for (key, code) in entries {
        let key = key.scalar_text().ok_or_else(|| {
            ValidationError::malformed(path, "role keys must be scalar strings")
        })?;
        let role = parse_role(&key)
            .ok_or_else(|| ValidationError::new(path, ValidationErrorKind::UnknownRole { role: key }))?;
        if !declared.insert(role) {
            return Err(ValidationError::malformed(
                path,
                format!("role `{}` is declared more than once", role.as_str()),
            ));
        }

        let parsed = match code {
            RawValue::Null => parse_code(""),
            RawValue::Str(text) => parse_code(text),
            _ => None,
        };
        let parsed = parsed.ok_or_else(|| {
            ValidationError::new(
                path,
                ValidationErrorKind::InvalidCode {
                    role,
                    code: code.scalar_text().unwrap_or_else(|| code.type_name().to_string()),
                },
            )
        })?;
        out.set(role, parsed);
    }

    if let Some(missing) = Role::ALL.into_iter().find(|role| !declared.contains(role)) {
        return Err(ValidationError::missing(
            path,
            format!("{RESPONSIBILITIES_KEY}.{}", missing.as_str()),
        ));
    }
    Ok(out)
}

/// Parses a non-negative integer field. `Ok(None)` means the field is null.
fn parse_quantity(
    path: &NodePath,
    field: &'static str,
    value: &RawValue,
) -> Result<Option<u64>, ValidationError> {
    match value {
        RawValue::Null => Ok(None),
        RawValue::Integer(number) if *number < 0 => Err(ValidationError::new(
            path,
            ValidationErrorKind::NegativeValue {
                field,
                value: number.to_string(),
            },
        )),
        RawValue::Float(number) if *number < 0.0 => Err(ValidationError::new(
            path,
            ValidationErrorKind::NegativeValue {
                field,
                value: number.to_string(),
            },
        )),
        RawValue::Integer(number) => u64::try_from(*number).map(Some).map_err(|_| {
            ValidationError::malformed(path, format!("`{field}` is out of range: {number}"))
        }),
        other => Err(ValidationError::malformed(
            path,
            format!("`{field}` must be an integer, found {}", other.type_name()),
        )),
    }
}

fn node_name(path: &NodePath, key: &RawValue) -> Result<String, ValidationError> {
    let name = key.scalar_text().ok_or_else(|| {
        ValidationError::malformed(
            path,
            format!("node names must be scalars, found {}", key.type_name()),
        )
    })?;
    if name.trim().is_empty() {
        return Err(ValidationError::malformed(path, "node name must not be blank"));
    }
    Ok(name)
}

fn is_metadata(name: &str, value: &RawValue) -> bool {
    METADATA_KEYS.contains(&name) && value.is_scalar()
}

#[cfg(test)]
mod tests {
    use super::{build, display_name, ValidationErrorKind};
    use crate::builder::raw::RawValue;

    #[test]
    fn display_name_ignores_blank_values() {
        let value: RawValue = serde_yaml::from_str("name: '  '\nA: {}\n").unwrap();
        assert_eq!(display_name(&value), None);
        let value: RawValue = serde_yaml::from_str("name: ' Camera '\n").unwrap();
        assert_eq!(display_name(&value), Some("Camera".to_string()));
    }

    #[test]
    fn null_child_is_an_empty_interior() {
        let err = build("Root:\n  Pending:\n").unwrap_err();
        let err = err.validation().expect("validation error").clone();
        assert_eq!(err.kind, ValidationErrorKind::EmptyInterior);
        assert_eq!(err.path.to_string(), "Root / Pending");
    }

    #[test]
    fn scalar_child_is_malformed() {
        let err = build("Root:\n  owner: bob\n").unwrap_err();
        let err = err.validation().expect("validation error").clone();
        assert!(matches!(err.kind, ValidationErrorKind::Malformed { .. }));
        assert_eq!(err.path.to_string(), "Root / owner");
    }

    #[test]
    fn non_yaml_is_a_parse_error() {
        let err = build("Root: [unclosed\n").unwrap_err();
        assert!(err.validation().is_none());
    }
}
