//! Constraint file serialization.
//!
//! The constraint file is a small XML document read by the placer:
//!
//! ```text
//! <design name="_Z5adderii">
//!   <port name="a[0]" position="P151"/>
//! </design>
//! ```
//!
//! Files are written through a temporary sibling and moved into place with a
//! no-clobber rename, so the destination either holds a complete document or
//! does not exist.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::allocate::PinAssignment;
use crate::error::ConstraintError;

/// Renders the constraint document for `module_name`.
pub fn render_constraints(module_name: &str, assignments: &[PinAssignment]) -> String {
    let mut out = String::new();
    out.push_str("<design name=\"");
    out.push_str(&escape_attr(module_name));
    out.push_str("\">\n");
    for assignment in assignments {
        out.push_str("  <port name=\"");
        out.push_str(&escape_attr(&assignment.instance));
        out.push_str("\" position=\"");
        out.push_str(&escape_attr(&assignment.pin));
        out.push_str("\"/>\n");
    }
    out.push_str("</design>\n");
    out
}

/// Writes the constraint file unless one already exists at `destination`.
///
/// An existing file is returned as-is without looking at its contents.
pub fn synthesize(
    module_name: &str,
    assignments: &[PinAssignment],
    destination: &Path,
) -> Result<PathBuf, ConstraintError> {
    if destination.exists() {
        info!(path = %destination.display(), "constraint file already present, keeping it");
        return Ok(destination.to_path_buf());
    }

    let contents = render_constraints(module_name, assignments);
    write_new_file(destination, contents.as_bytes())?;

    info!(
        path = %destination.display(),
        module = module_name,
        ports = assignments.len(),
        "wrote constraint file"
    );
    Ok(destination.to_path_buf())
}

/// Writes `data` to a new file at `path` in a single rename.
fn write_new_file(path: &Path, data: &[u8]) -> Result<(), ConstraintError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let io_err = |operation: &'static str, source: std::io::Error| ConstraintError::Io {
        operation,
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| io_err("create", e))?;
    tmp.write_all(data).map_err(|e| io_err("write", e))?;
    tmp.as_file().sync_all().map_err(|e| io_err("write", e))?;

    match tmp.persist_noclobber(path) {
        Ok(_) => Ok(()),
        // Another writer got there first; the existing file wins.
        Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(io_err("persist", e.error)),
    }
}

/// Escapes a string for use inside a double-quoted XML attribute.
fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
