//! Error types for configuration loading and validation.

use hlsflow_constraints::CatalogError;

/// Errors that can occur when loading, validating or saving an `hlsflow.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading or writing the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// The configuration could not be serialized back to TOML.
    #[error("failed to serialize configuration: {0}")]
    SerializeError(String),

    /// A required field is missing from the configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// The project names a device with no built-in or configured pin catalog.
    #[error("unknown device '{0}'")]
    UnknownDevice(String),

    /// A configured pin catalog is malformed.
    #[error("invalid pin catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}
