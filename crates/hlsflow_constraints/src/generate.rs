//! End-to-end constraint generation: read, extract, allocate, write.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::allocate::assign_pins;
use crate::catalog::PinCatalog;
use crate::error::ConstraintError;
use crate::extract::{extract_top_module, ExtractMode};
use crate::writer::synthesize;

/// Inputs for one constraint generation run.
#[derive(Debug, Clone)]
pub struct ConstraintRequest<'a> {
    /// The generated hardware description to read ports from.
    pub hdl_path: &'a Path,
    /// The top function name to look for among the module names.
    pub top_function: &'a str,
    /// Pins available on the target device.
    pub catalog: &'a PinCatalog,
    /// Where the constraint file lives.
    pub destination: &'a Path,
    /// How strictly the port section is read.
    pub mode: ExtractMode,
}

/// Produces the constraint file for `request`, or returns the existing one.
///
/// The destination acts as a cache keyed only by its path: if it exists, the
/// hardware description is not read at all and the path is returned as-is.
/// Otherwise every step must succeed before anything is written.
pub fn generate_constraints(request: &ConstraintRequest<'_>) -> Result<PathBuf, ConstraintError> {
    if request.destination.exists() {
        info!(
            path = %request.destination.display(),
            "reusing existing constraint file"
        );
        return Ok(request.destination.to_path_buf());
    }

    let hdl = std::fs::read_to_string(request.hdl_path).map_err(|e| ConstraintError::Io {
        operation: "read",
        path: request.hdl_path.to_path_buf(),
        source: e,
    })?;

    let module = extract_top_module(&hdl, request.top_function, request.mode)?;
    let assignments = assign_pins(&module.ports, request.catalog)?;

    debug!(
        module = %module.name,
        device = request.catalog.device(),
        assignments = assignments.len(),
        "allocated pins"
    );

    synthesize(&module.name, &assignments, request.destination)
}
