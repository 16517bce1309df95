//! Configuration types deserialized from `hlsflow.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::settings::Settings;

/// The top-level project configuration parsed from `hlsflow.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata.
    pub project: ProjectMeta,
    /// Per-stage settings; missing fields take their defaults.
    #[serde(default)]
    pub settings: Settings,
    /// Stage executables and shared device files.
    #[serde(default)]
    pub toolchain: ToolchainConfig,
    /// Project-defined pin catalogs keyed by device identifier.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub devices: BTreeMap<String, DeviceConfig>,
    /// Ordered source-file records. When empty, sources are discovered under `src/`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileEntry>,
}

/// Core project metadata required in every `hlsflow.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMeta {
    /// The project name; prefixes every stage artifact.
    pub name: String,
    /// Pin catalog key of the target device. Defaults to the built-in board.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

/// The role a project file plays in the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// A C/C++ file compiled by the HLS stage.
    Source,
    /// A hand-written pin constraint file for placement.
    Constraint,
    /// Anything else.
    Other,
}

impl FileKind {
    /// Infers the kind from a file extension. Constraint files are never inferred.
    pub fn infer(path: &std::path::Path) -> FileKind {
        match path.extension().and_then(|e| e.to_str()) {
            Some("c" | "cc" | "cpp" | "cxx" | "c++") => FileKind::Source,
            _ => FileKind::Other,
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileKind::Source => write!(f, "source"),
            FileKind::Constraint => write!(f, "constraint"),
            FileKind::Other => write!(f, "other"),
        }
    }
}

/// A file listed in `[[files]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path relative to the project root.
    pub path: String,
    /// Explicit kind; inferred from the extension when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FileKind>,
}

/// A pin catalog declared in `[devices.<id>]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Input-capable pins in allocation order.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Output-capable pins in allocation order.
    #[serde(default)]
    pub outputs: Vec<String>,
}

/// External executables for each stage plus the device description files
/// shared by the back-end tools.
///
/// Paths are relative to the project root unless absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// High-level synthesis tool.
    pub hls: String,
    /// Logic synthesis tool.
    pub synthesis: String,
    /// Technology mapper.
    pub map: String,
    /// Packer.
    pub pack: String,
    /// Placer.
    pub place: String,
    /// Router.
    pub route: String,
    /// Bitstream generator.
    pub bitstream: String,
    /// Device architecture description.
    pub arch_file: String,
    /// Cell library.
    pub cell_library: String,
    /// Delay model used by timing-driven placement.
    pub delay_file: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            hls: "bambu".to_string(),
            synthesis: "yosys".to_string(),
            map: "map".to_string(),
            pack: "pack".to_string(),
            place: "place".to_string(),
            route: "route".to_string(),
            bitstream: "bitgen".to_string(),
            arch_file: "hw_lib/fdp3p7_arch.xml".to_string(),
            cell_library: "hw_lib/fdp3_cell.xml".to_string(),
            delay_file: "hw_lib/fdp3p7_dly.xml".to_string(),
        }
    }
}
