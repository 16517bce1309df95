//! Error types for constraint generation.

use std::path::PathBuf;

use crate::port::Direction;

/// Errors that can occur while generating a constraint file.
///
/// Every variant is raised before anything is written to disk.
#[derive(Debug, thiserror::Error)]
pub enum ConstraintError {
    /// No module in the hardware description contains the target function name.
    #[error("no module matching top function '{function}' in generated hardware description")]
    MissingModule {
        /// The top function name that was searched for.
        function: String,
    },

    /// The device ran out of pins of the required direction.
    #[error("device has no {direction} pin left for port '{instance}'")]
    PinExhaustion {
        /// Direction of the pin sequence that ran dry.
        direction: Direction,
        /// The declared port name.
        port: String,
        /// The port instance being assigned (`name` or `name[bit]`).
        instance: String,
    },

    /// A prerequisite could not be read or the artifact could not be written.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        /// Short description of the failed operation (e.g. "read").
        operation: &'static str,
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Strict extraction found a line in the port section it could not interpret.
    #[error("unrecognized declaration in module '{module}' at line {line}: {text}")]
    UnrecognizedDeclaration {
        /// The module being extracted.
        module: String,
        /// 1-based line number within the module block.
        line: usize,
        /// The offending line, trimmed.
        text: String,
    },
}
