//! Configuration file loading, validation and saving.

use crate::error::ConfigError;
use crate::resolve::{resolve_project, Project};
use crate::settings::{Settings, SettingsUpdate};
use crate::types::ProjectConfig;
use std::path::Path;
use tracing::debug;

/// Name of the project configuration file at the project root.
pub const CONFIG_FILE: &str = "hlsflow.toml";

/// Loads and validates an `hlsflow.toml` configuration from a project directory.
///
/// Reads `<project_dir>/hlsflow.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates an `hlsflow.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Loads the configuration in `project_dir` and resolves it into a [`Project`].
pub fn load_project(project_dir: &Path) -> Result<Project, ConfigError> {
    let config = load_config(project_dir)?;
    resolve_project(&config, project_dir)
}

/// Writes `config` to `<project_dir>/hlsflow.toml`, replacing the file.
///
/// Comments and formatting of the previous file are not preserved.
pub fn save_config(project_dir: &Path, config: &ProjectConfig) -> Result<(), ConfigError> {
    validate_config(config)?;
    let content =
        toml::to_string(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;
    std::fs::write(project_dir.join(CONFIG_FILE), content)?;
    Ok(())
}

/// Applies one settings update to the project on disk and returns the new settings.
///
/// The file is the single owner of the settings: the update is applied to a
/// freshly loaded value and written back, and nothing is written if the
/// resulting settings are invalid.
pub fn update_settings(project_dir: &Path, update: SettingsUpdate) -> Result<Settings, ConfigError> {
    let mut config = load_config(project_dir)?;
    let key = update.key();
    config.settings = config.settings.apply(update);
    save_config(project_dir, &config)?;
    debug!(key = %key, "updated project settings");
    Ok(config.settings)
}

/// Validates that required fields are present and configuration values are consistent.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.trim().is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.files.iter().any(|f| f.path.trim().is_empty()) {
        return Err(ConfigError::MissingField("files.path".to_string()));
    }
    config.settings.validate()
}
