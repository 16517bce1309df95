//! Parsing and resolution of `hlsflow.toml` project configuration files.
//!
//! This crate reads the project configuration file and produces a strongly-typed
//! [`ProjectConfig`], then resolves it into an immutable [`Project`]: source files
//! tagged by kind, per-stage [`Settings`] with defaults filled in, the toolchain
//! description, and the device [`PinCatalog`](hlsflow_constraints::PinCatalog).

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod settings;
pub mod types;

pub use error::ConfigError;
pub use loader::{
    load_config, load_config_from_str, load_project, save_config, update_settings, CONFIG_FILE,
};
pub use resolve::{resolve_project, Project, SourceFile};
pub use settings::{PlacementMode, RoutingMode, SettingKey, Settings, SettingsUpdate};
pub use types::*;
