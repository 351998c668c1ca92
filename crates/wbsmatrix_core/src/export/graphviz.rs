//! Hand-off to the external Graphviz `dot` layout engine.

use crate::export::ExportError;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;

const DOT_BINARY: &str = "dot";
const MAX_STDERR_CHARS: usize = 400;

static FORMAT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(:[a-z0-9]+)*$").expect("valid format regex"));

/// Validates a Graphviz output format such as `pdf`, `svg` or `png:cairo`.
pub fn validate_format(format: &str) -> Result<&str, ExportError> {
    let trimmed = format.trim();
    if FORMAT_RE.is_match(trimmed) {
        Ok(trimmed)
    } else {
        Err(ExportError::InvalidFormat(format.to_string()))
    }
}

/// Renders one DOT file next to itself and returns the output path.
///
/// # Errors
/// - `GraphvizSpawn` when the `dot` binary cannot be started.
/// - `GraphvizFailed` when `dot` exits unsuccessfully.
pub fn render_with_dot(dot_path: &Path, format: &str) -> Result<PathBuf, ExportError> {
    let format = validate_format(format)?;
    let extension = format.split(':').next().unwrap_or(format);
    let output_path = dot_path.with_extension(extension);

    let output = Command::new(DOT_BINARY)
        .arg(format!("-T{format}"))
        .arg(dot_path)
        .arg("-o")
        .arg(&output_path)
        .output()
        .map_err(|source| ExportError::GraphvizSpawn { source })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr)
            .replace(['\n', '\r'], " ")
            .chars()
            .take(MAX_STDERR_CHARS)
            .collect::<String>();
        return Err(ExportError::GraphvizFailed {
            input: dot_path.to_path_buf(),
            status: output.status.code(),
            stderr: stderr.trim().to_string(),
        });
    }

    info!(
        "event=render_ok module=export format={} output={}",
        format,
        output_path.display()
    );
    Ok(output_path)
}
